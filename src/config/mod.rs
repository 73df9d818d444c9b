//! Configuration storage and settings.
//!
//! - [`store`] - Key/value store persisted as YAML
//! - [`settings`] - Update-related settings and config keys

pub mod settings;
pub mod store;

pub use settings::{keys, UpdateSettings};
pub use store::{home_dir, ConfigStore, FileConfigStore, MemoryConfigStore};
