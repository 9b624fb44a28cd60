use serde::Serialize;

/// How a stored file can be shown inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Video,
    Pdf,
    Unsupported,
}

pub fn classify_mime(mime_type: &str) -> PreviewKind {
    let normalized = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if normalized.starts_with("video/") {
        return PreviewKind::Video;
    }
    match normalized.as_str() {
        "application/pdf" => PreviewKind::Pdf,
        _ => PreviewKind::Unsupported,
    }
}
