mod error;
mod preview;
mod record;
mod view;

pub use error::DomainError;
pub use preview::{classify_mime, PreviewKind};
pub use record::{FileRecord, RawFileInput, RecordId};
pub use view::{compare_names, derive_view, SortMode};
