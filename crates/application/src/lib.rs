mod error;
mod lease;
mod ports;
mod service;
mod state;
mod use_cases;

pub use error::ApplicationError;
pub use lease::ResourceLease;
pub use ports::{
    Clock, ConfirmationGate, ObjectStore, ResourceAllocator, SaveTarget, TemporaryResource,
};
pub use service::GalleryController;
pub use state::{ActivePreview, ViewState};
pub use use_cases::{
    DownloadCommand, DownloadOutcome, IngestCommand, IngestReport, OpenPreviewCommand,
    PreviewInfo, PreviewOutcome, RemoveCommand, RemoveOutcome,
};
