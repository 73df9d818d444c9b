//! footprint - Track git activity from your terminal.
//!
//! The `fp` binary records git activity through hooks. This library holds
//! everything behind the CLI, most notably the self-update machinery.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Key/value configuration store and update settings
//! - [`error`] - Error types and result aliases
//! - [`ui`] - Spinners and terminal output
//! - [`updates`] - Update checks, binary installs and source builds
//!
//! # Example
//!
//! ```
//! use footprint::updates::clean;
//!
//! // Builds from a git checkout compare equal to the release they came from
//! assert_eq!(clean("v1.2.0-3-gabc1234-dirty"), "v1.2.0");
//! assert_eq!(clean("v1.2.0-alpha-gabc123"), "v1.2.0-alpha-gabc123");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod ui;
pub mod updates;

pub use error::{FootprintError, Result};
