use shelf_application::{IngestReport, PreviewInfo};
use shelf_domain::{classify_mime, FileRecord, PreviewKind};

pub fn present_record_row(record: &FileRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        record.id,
        kind_label(classify_mime(&record.mime_type)),
        human_size(record.size_bytes),
        record.created_at.format("%Y-%m-%d %H:%M:%S"),
        record.name
    )
}

pub fn present_records_json(records: &[FileRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

pub fn present_preview(preview: &PreviewInfo) -> String {
    let hint = match preview.kind {
        PreviewKind::Video => "play with a video player",
        PreviewKind::Pdf => "open with a PDF viewer",
        PreviewKind::Unsupported => "no inline preview, download instead",
    };
    format!(
        "previewing {} ({}, {}) at {} [{hint}]",
        preview.name,
        kind_label(preview.kind),
        if preview.mime_type.is_empty() {
            "unknown type"
        } else {
            preview.mime_type.as_str()
        },
        preview.uri
    )
}

pub fn present_ingest_report(report: &IngestReport) -> String {
    let ids: Vec<String> = report.created.iter().map(ToString::to_string).collect();
    match ids.len() {
        0 => "no files stored".to_string(),
        1 => format!("stored 1 file (id {})", ids[0]),
        n => format!("stored {n} files (ids {})", ids.join(", ")),
    }
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

fn kind_label(kind: PreviewKind) -> &'static str {
    match kind {
        PreviewKind::Video => "VIDEO",
        PreviewKind::Pdf => "PDF",
        PreviewKind::Unsupported => "FILE",
    }
}
