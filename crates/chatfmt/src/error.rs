//! CLI error types.

use chatfmt_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid history file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input is {len} bytes, limit is {max} bytes")]
    InputTooLarge { len: usize, max: usize },
}
