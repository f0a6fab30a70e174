pub mod emitter;
pub mod log_buffer;

pub use emitter::EventEmitter;
pub use log_buffer::LogRingBuffer;
