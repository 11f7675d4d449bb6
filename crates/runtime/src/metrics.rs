use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

#[derive(Clone, Default)]
pub struct MetricsRegistry {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    lines_read: AtomicU64,
    records_parsed: AtomicU64,
    duplicates_replaced: AtomicU64,
    scores_evicted: AtomicU64,
    scores_rejected: AtomicU64,
    result_peak: AtomicU64,
}

impl MetricsRegistry {
    pub fn inc_lines_read(&self, delta: u64) {
        self.inner.lines_read.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_records_parsed(&self, delta: u64) {
        self.inner.records_parsed.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_duplicates_replaced(&self, delta: u64) {
        self.inner.duplicates_replaced.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_scores_evicted(&self, delta: u64) {
        self.inner.scores_evicted.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_scores_rejected(&self, delta: u64) {
        self.inner.scores_rejected.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn record_result_peak(&self, size: u64) {
        self.inner.result_peak.fetch_max(size, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_read: self.inner.lines_read.load(Ordering::Relaxed),
            records_parsed: self.inner.records_parsed.load(Ordering::Relaxed),
            duplicates_replaced: self.inner.duplicates_replaced.load(Ordering::Relaxed),
            scores_evicted: self.inner.scores_evicted.load(Ordering::Relaxed),
            scores_rejected: self.inner.scores_rejected.load(Ordering::Relaxed),
            result_peak: self.inner.result_peak.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub lines_read: u64,
    pub records_parsed: u64,
    pub duplicates_replaced: u64,
    pub scores_evicted: u64,
    pub scores_rejected: u64,
    pub result_peak: u64,
}

impl MetricsSnapshot {
    pub fn to_json_line(&self, label: &str, elapsed: Option<Duration>) -> String {
        #[derive(Serialize)]
        struct Line<'a> {
            label: &'a str,
            #[serde(flatten)]
            counters: &'a MetricsSnapshot,
            elapsed_ms: Option<u128>,
        }

        let payload = Line {
            label,
            counters: self,
            elapsed_ms: elapsed.map(|d| d.as_millis()),
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"))
    }
}
