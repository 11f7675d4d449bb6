//! Reusable views over scored records (top-N selection).

pub mod top_n;

pub use top_n::{Offer, TopNSelector};

/// What the selector does with a new score once it already holds `limit` scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanPolicy {
    /// Keep the `limit` highest distinct scores over the whole input.
    #[default]
    FullScan,
    /// Stop as soon as `limit` distinct scores have been seen.
    StopAtCapacity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopNConfig {
    pub limit: usize,
    pub policy: ScanPolicy,
}

impl Default for TopNConfig {
    fn default() -> Self {
        Self { limit: 10, policy: ScanPolicy::default() }
    }
}

impl TopNConfig {
    pub fn new(limit: usize) -> Self {
        Self { limit, ..Self::default() }
    }

    pub fn with_policy(mut self, policy: ScanPolicy) -> Self {
        self.policy = policy;
        self
    }
}
