use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid classification family: {0:?}")]
    InvalidFamily(String),
    #[error("invalid classification version: {0:?}")]
    InvalidVersion(String),
    #[error("unknown note kind: {0}")]
    UnknownNoteKind(String),
    #[error("unknown match kind: {0}")]
    UnknownMatchKind(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
