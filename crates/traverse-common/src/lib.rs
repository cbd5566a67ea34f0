// traverse-common: ambient stack for the task traversal engine — config
// loading, error types, and concrete Emitter implementations. Depends on
// traverse-sdk for the Emitter/LogLevel contracts.

pub mod config_store;
pub mod emitters;
pub mod errors;
pub mod multi_file;

pub use config_store::ConfigStore;
pub use emitters::{Event, MemoryEmitter, TerminalEmitter};
pub use errors::{ConfigError, EmitterError};
pub use multi_file::MultiFile;
