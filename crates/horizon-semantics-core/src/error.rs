//! Error types for Horizon Semantics.
//!
//! Decoding faults are protocol desyncs between the engine and the bridge:
//! they are reported with enough positional detail to find the offending
//! record, and they never leave the node cache half-written.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while decoding a semantics update buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ended in the middle of a record.
    #[error(
        "update buffer truncated reading {field} at byte {offset}: needed {needed} bytes, {remaining} remaining"
    )]
    Truncated {
        field: &'static str,
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A length prefix was negative.
    #[error("negative {field} count {count} at byte {offset}")]
    NegativeCount {
        field: &'static str,
        count: i32,
        offset: usize,
    },

    /// A string-table index pointed outside the table.
    #[error("{field} string index {index} out of range for a table of {len} strings")]
    StringIndexOutOfRange {
        field: &'static str,
        index: i32,
        len: usize,
    },
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for [`BridgeConfig`](crate::BridgeConfig).
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A field holds a value the bridge cannot work with.
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level error type for bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A semantics update buffer was malformed.
    #[error("malformed semantics update: {0}")]
    Decode(#[from] DecodeError),

    /// Configuration failed to load or validate.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
