pub mod fs;
pub mod migrations;
pub mod presenters;
pub mod sqlite;

pub use fs::{
    detect_mime, parse_dropped_uris, read_dropped, select_files, DirectorySaveTarget,
    SystemClock, TempFileResources,
};
pub use presenters::{
    human_size, present_ingest_report, present_preview, present_record_row, present_records_json,
};
pub use sqlite::SqliteObjectStore;
