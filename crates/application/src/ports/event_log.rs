/// Receiver of human-readable engine events (`[BLOCKED] ads.example`, load
/// summaries, per-source failures).
///
/// Called concurrently from handler and loader tasks.
pub trait EventSink: Send + Sync {
    fn emit(&self, message: &str);
}

/// Read side of a bounded event history.
pub trait EventLogReader: Send + Sync {
    /// Most recent `count` lines in chronological order; `None` returns all.
    fn recent(&self, count: Option<usize>) -> Vec<String>;
}
