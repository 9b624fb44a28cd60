use shelf_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("schema upgrade failed: {0}")]
    SchemaUpgradeFailed(String),
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("read failed: {0}")]
    ReadFailed(String),
    #[error("resource error: {0}")]
    Resource(String),
    #[error("ingest stopped at {name} after storing {stored} file(s): {source}")]
    IngestInterrupted {
        stored: usize,
        name: String,
        source: Box<ApplicationError>,
    },
}

impl ApplicationError {
    /// Whether retrying the same call may succeed without the environment changing.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::WriteFailed(_) | Self::ReadFailed(_) | Self::Resource(_) => true,
            Self::IngestInterrupted { source, .. } => source.is_retryable(),
            Self::Domain(_)
            | Self::InvalidInput(_)
            | Self::StorageUnavailable(_)
            | Self::SchemaUpgradeFailed(_) => false,
        }
    }
}
