pub mod config;
pub mod dialogue;
pub mod error;
pub mod kernel;
pub mod storage;

// Re-export specific items if needed for convenient access
pub use config::MascotConfig;
pub use dialogue::engine::DialogueEngine;
pub use error::{MascotError, Result};
pub use kernel::reactor::Reactor;
