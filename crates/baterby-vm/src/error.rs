//! Error types for the edges of the interpreter
//!
//! A run itself never fails: malformed lines become skipped events and
//! policy blocks become refusals. Errors only arise while:
//! - Loading or validating a policy configuration
//! - Reading a program from disk

use std::path::PathBuf;

/// Top-level error type
#[derive(Debug, thiserror::Error)]
pub enum BaterbyError {
    /// Policy configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Program source could not be read
    #[error("program error: {0}")]
    Program(#[from] ProgramError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Probability outside the unit interval
    #[error("random_prefer_not_probability must be within [0, 1], got {0}")]
    ProbabilityOutOfRange(f64),

    /// A keyword that would match every line
    #[error("sensitive keyword at index {0} is empty")]
    EmptyKeyword(usize),

    /// TOML syntax or schema error
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// IO error during config read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Program loading errors
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// IO error during program read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create parse error for path
    pub fn parse_error(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}

impl ProgramError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for fallible edge operations
pub type Result<T, E = BaterbyError> = std::result::Result<T, E>;
