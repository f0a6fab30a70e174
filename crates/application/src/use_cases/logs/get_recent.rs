use crate::ports::EventLogReader;
use std::sync::Arc;

pub struct GetRecentLogsUseCase {
    reader: Arc<dyn EventLogReader>,
}

impl GetRecentLogsUseCase {
    pub fn new(reader: Arc<dyn EventLogReader>) -> Self {
        Self { reader }
    }

    /// A non-positive `count`, or one past what the platform can address,
    /// returns the whole buffer.
    pub fn execute(&self, count: i64) -> Vec<String> {
        let limit = if count <= 0 {
            None
        } else {
            usize::try_from(count).ok()
        };
        self.reader.recent(limit)
    }
}
