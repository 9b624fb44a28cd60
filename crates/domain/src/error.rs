use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("record id must be positive, got {0}")]
    InvalidRecordId(i64),
    #[error("file name must not be empty")]
    EmptyFileName,
    #[error("declared size {declared} does not match payload length {actual}")]
    SizeMismatch { declared: u64, actual: u64 },
    #[error("unknown sort mode: {0}")]
    UnknownSortMode(String),
}
