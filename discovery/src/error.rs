//! Error types for manual generation.
//!
//! Parsing never fails; everything here comes from running the external
//! tool, walking its command tree, loading configuration or writing output.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a manual run.
#[derive(Debug, Error)]
pub enum ManualError {
    /// The external tool could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or waiting on a running probe failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The probe did not exit within the configured timeout.
    #[error("'{argv}' did not exit within {timeout_ms} ms")]
    Timeout { argv: String, timeout_ms: u64 },

    /// A subcommand printed the same help as a same-named ancestor, so the
    /// tool keeps listing the same command under itself.
    #[error("command cycle: '{path}' prints the same help as its ancestor '{ancestor}'")]
    CommandCycle { path: String, ancestor: String },

    /// Recursion went deeper than the configured limit.
    #[error("command tree deeper than {max_depth} levels at '{path}'")]
    DepthLimit { path: String, max_depth: usize },

    /// The finished manual could not be written.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is incomplete or inconsistent.
    #[error("invalid config: {0}")]
    Config(String),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results with [`ManualError`].
pub type Result<T> = std::result::Result<T, ManualError>;
