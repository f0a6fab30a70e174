use std::sync::atomic::{AtomicU64, Ordering};

/// Lifetime query counters shared by every handler task.
///
/// Independent of the ruleset snapshot so counting never contends with a
/// reload. `fetch_add` wraps on overflow.
#[derive(Debug, Default)]
pub struct QueryCounters {
    total: AtomicU64,
    blocked: AtomicU64,
}

impl QueryCounters {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_query(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_blocked(&self) {
        self.blocked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn blocked(&self) -> u64 {
        self.blocked.load(Ordering::Relaxed)
    }
}

/// Snapshot returned by the stats use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineStats {
    pub queries_total: u64,
    pub queries_blocked: u64,
    pub active_rules: usize,
}
