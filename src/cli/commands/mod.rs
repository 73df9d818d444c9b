//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`fp update`, `fp config`)
//! - Shared initialization logic, such as the update notice
//! - Consistent global flag handling

pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod update;
pub mod version;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
