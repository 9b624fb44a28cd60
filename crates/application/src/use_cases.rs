use shelf_domain::{PreviewKind, RawFileInput, RecordId};

#[derive(Debug, Clone)]
pub struct IngestCommand {
    pub files: Vec<RawFileInput>,
}

#[derive(Debug, Clone, Copy)]
pub struct OpenPreviewCommand {
    pub record_id: RecordId,
}

#[derive(Debug, Clone, Copy)]
pub struct DownloadCommand {
    pub record_id: RecordId,
}

#[derive(Debug, Clone, Copy)]
pub struct RemoveCommand {
    pub record_id: RecordId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub created: Vec<RecordId>,
}

/// Snapshot of the open preview for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewInfo {
    pub record_id: RecordId,
    pub name: String,
    pub mime_type: String,
    pub kind: PreviewKind,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    Opened(PreviewInfo),
    NotFound(RecordId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved { location: String },
    NotFound(RecordId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    Declined,
}
