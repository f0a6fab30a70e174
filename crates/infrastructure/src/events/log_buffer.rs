use chrono::Local;
use sinkhole_application::ports::{EventLogReader, EventSink};
use std::collections::VecDeque;
use std::sync::Mutex;

pub const DEFAULT_CAPACITY: usize = 200;

/// Fixed-size history of timestamped engine events. Oldest lines fall off.
pub struct LogRingBuffer {
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl LogRingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LogRingBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventSink for LogRingBuffer {
    fn emit(&self, message: &str) {
        self.push(format!("[{}] {}", Local::now().format("%H:%M:%S"), message));
    }
}

impl EventLogReader for LogRingBuffer {
    fn recent(&self, count: Option<usize>) -> Vec<String> {
        let lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        let skip = match count {
            Some(n) if n < lines.len() => lines.len() - n,
            _ => 0,
        };
        lines.iter().skip(skip).cloned().collect()
    }
}
