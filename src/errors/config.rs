use std::env::VarError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was present but unreadable (e.g. not unicode).
    #[error("Environment variable error: {0}")]
    EnvVarError(#[from] VarError),

    /// A variable (or its default) failed to parse into the target type.
    #[error("Parse error: {0}")]
    ParseError(String),
}
