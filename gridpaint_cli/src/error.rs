// gridpaint_cli/src/error.rs
#![forbid(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

use gridpaint_engine::{ConfigError, SessionError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown stuck strategy '{0}' (expected rollback | perturb)")]
    UnknownStrategy(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize trace: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}
