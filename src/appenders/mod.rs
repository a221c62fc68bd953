//! Sink implementations

pub mod console;
pub mod memory;

pub use console::StdoutSink;
pub use memory::MemorySink;

pub use crate::core::LineSink;
