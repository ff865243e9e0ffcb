use thiserror::Error;

/// Failure inside a single preview step. Never escapes the orchestrator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreviewError {
    #[error("Could not resolve download URL: {0}")]
    Resolve(String),

    #[error("Could not fetch file: {0}")]
    Fetch(String),

    #[error("Could not convert file: {0}")]
    Convert(String),

    #[error("Could not load document: {0}")]
    Load(String),

    #[error("{0}")]
    Unsupported(String),
}
