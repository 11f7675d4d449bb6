//! Core types for Highest Scores: scores, parsed records, parse errors.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

pub mod record;

pub use record::parse_record;

/// Largest magnitude below which every whole `f64` is an exact integer.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// A finite numeric score with a total order.
///
/// Negative zero is folded into zero so `0` and `-0` share one key.
#[derive(Debug, Clone, Copy)]
pub struct Score(f64);

impl Score {
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() {
            Some(Self(value + 0.0))
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    fn as_exact_int(self) -> Option<i64> {
        if self.0.fract() == 0.0 && self.0.abs() < MAX_EXACT_INT {
            Some(self.0 as i64)
        } else {
            None
        }
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_exact_int() {
            Some(int) => write!(f, "{int}"),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_exact_int() {
            Some(int) => serializer.serialize_i64(int),
            None => serializer.serialize_f64(self.0),
        }
    }
}

/// A validated record: its score and the value of its `id` field.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredId {
    pub score: Score,
    pub id: Value,
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("invalid JSON payload `{payload}`")]
    InvalidJson {
        payload: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("JSON payload is missing an `id` field: {payload}")]
    MissingId { payload: String },
    #[error("score `{score}` is not a finite number")]
    InvalidScore { score: String },
}
