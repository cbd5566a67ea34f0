pub mod memory;
pub mod simple_log;
pub mod terminal;

pub use memory::{Event, MemoryEmitter};
pub use terminal::TerminalEmitter;
