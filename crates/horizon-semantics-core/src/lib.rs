//! Core systems for Horizon Semantics.
//!
//! This crate holds the pieces shared by every layer of the accessibility
//! bridge:
//!
//! - [`error`]: typed errors for update decoding and configuration
//! - [`logging`]: tracing targets, span names, perf spans and tree formatting
//! - [`thread_check`]: thread affinity checks for single-threaded objects
//! - [`config`]: bridge configuration, loadable from TOML

pub mod config;
pub mod error;
pub mod logging;
pub mod thread_check;

pub use config::{BridgeConfig, BridgeConfigBuilder};
pub use error::{BridgeError, BridgeResult, ConfigError, DecodeError};
pub use logging::{PerfSpan, TreeFormatOptions, TreeStyle};
pub use thread_check::ThreadAffinity;
