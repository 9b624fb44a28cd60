use shelf_domain::{FileRecord, PreviewKind, RecordId, SortMode};

use crate::ResourceLease;

#[derive(Debug)]
pub struct ActivePreview {
    pub record_id: RecordId,
    pub name: String,
    pub mime_type: String,
    pub kind: PreviewKind,
    pub lease: ResourceLease,
}

#[derive(Debug, Default)]
pub struct ViewState {
    pub records: Vec<FileRecord>,
    pub search_text: String,
    pub sort_mode: SortMode,
    pub active_preview: Option<ActivePreview>,
}
