use std::collections::BTreeMap;

use hs_core::{Score, ScoredId};
use serde_json::Value;
use tracing::debug;

use crate::{ScanPolicy, TopNConfig};

/// Outcome of offering one pair to a [`TopNSelector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// New score, stored.
    Inserted,
    /// Known score, id overwritten with the newer one.
    Replaced,
    /// New score stored after dropping the lowest held score.
    Evicted { score: Score },
    /// New score at or below every held score while full.
    Rejected,
    /// The selector stopped accepting input.
    Halted,
}

/// Keeps the top `limit` distinct scores, last id wins per score.
///
/// Memory is bounded by `limit` no matter how many pairs are offered. Under
/// [`ScanPolicy::FullScan`] a score that was evicted can never come back, since
/// `limit` higher scores are already held, so every emitted id is the last one
/// seen for its score.
#[derive(Debug)]
pub struct TopNSelector {
    cfg: TopNConfig,
    entries: BTreeMap<Score, Value>,
    halted: bool,
}

impl TopNSelector {
    pub fn new(cfg: TopNConfig) -> Self {
        Self {
            cfg,
            entries: BTreeMap::new(),
            halted: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once a [`ScanPolicy::StopAtCapacity`] selector is full.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn offer(&mut self, pair: ScoredId) -> Offer {
        if self.halted {
            return Offer::Halted;
        }
        let ScoredId { score, id } = pair;

        if let Some(slot) = self.entries.get_mut(&score) {
            *slot = id;
            return Offer::Replaced;
        }

        if self.entries.len() < self.cfg.limit {
            self.entries.insert(score, id);
            if self.cfg.policy == ScanPolicy::StopAtCapacity && self.entries.len() == self.cfg.limit {
                debug!(limit = self.cfg.limit, "selector full, halting");
                self.halted = true;
            }
            return Offer::Inserted;
        }

        // Full (or limit 0): only a score above the current floor gets in.
        match self.floor() {
            Some(floor) if score > floor => {
                self.entries.remove(&floor);
                self.entries.insert(score, id);
                Offer::Evicted { score: floor }
            }
            _ => Offer::Rejected,
        }
    }

    /// Current lowest held score.
    pub fn floor(&self) -> Option<Score> {
        self.entries.keys().next().copied()
    }

    /// Entries sorted by score, highest first.
    pub fn finalize(self) -> Vec<ScoredId> {
        self.entries
            .into_iter()
            .rev()
            .map(|(score, id)| ScoredId { score, id })
            .collect()
    }
}
