use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TsumuError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bundle error: {message}")]
    Bundle {
        message: String,
        entry: Option<PathBuf>,
    },

    #[error("Minify error: {0}")]
    Minify(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl TsumuError {
    /// Create a bundle error without an entry path
    pub fn bundle(message: impl Into<String>) -> Self {
        Self::Bundle {
            message: message.into(),
            entry: None,
        }
    }

    /// Create a bundle error tied to a specific entry module
    pub fn bundle_for(message: impl Into<String>, entry: PathBuf) -> Self {
        Self::Bundle {
            message: message.into(),
            entry: Some(entry),
        }
    }

    pub fn minify(message: impl Into<String>) -> Self {
        Self::Minify(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, TsumuError>;

impl From<regex::Error> for TsumuError {
    fn from(err: regex::Error) -> Self {
        TsumuError::Other(format!("Regex error: {}", err))
    }
}

impl From<serde_json::Error> for TsumuError {
    fn from(err: serde_json::Error) -> Self {
        TsumuError::config(format!("JSON error: {}", err))
    }
}

impl From<anyhow::Error> for TsumuError {
    fn from(err: anyhow::Error) -> Self {
        TsumuError::Other(err.to_string())
    }
}

impl From<sourcemap::Error> for TsumuError {
    fn from(err: sourcemap::Error) -> Self {
        TsumuError::bundle(format!("Source map error: {}", err))
    }
}
