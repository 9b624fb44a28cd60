use std::fs;
use std::path::{Path, PathBuf};

use shelf_application::ApplicationError;
use shelf_domain::RawFileInput;
use walkdir::WalkDir;

/// Reads picked files into ingest inputs. Directories contribute every file
/// below them, in file-name order.
pub fn select_files(paths: &[PathBuf]) -> Result<Vec<RawFileInput>, ApplicationError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
            {
                if entry.file_type().is_file() {
                    files.push(read_input(entry.path())?);
                }
            }
        } else if path.is_file() {
            files.push(read_input(path)?);
        } else {
            return Err(ApplicationError::InvalidInput(format!(
                "not a file or directory: {}",
                path.display()
            )));
        }
    }
    Ok(files)
}

/// Paths named by a dropped `text/uri-list` payload. Plain paths are accepted
/// as well; comment and blank lines are skipped.
pub fn parse_dropped_uris(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            if let Some(rest) = line.strip_prefix("file://") {
                let path = rest.strip_prefix("localhost").unwrap_or(rest);
                return Some(PathBuf::from(percent_decode(path)));
            }
            if line.contains("://") {
                return None;
            }
            Some(PathBuf::from(line))
        })
        .collect()
}

pub fn read_dropped(text: &str) -> Result<Vec<RawFileInput>, ApplicationError> {
    select_files(&parse_dropped_uris(text))
}

/// Content sniffing first, then the extension; empty when neither is known.
pub fn detect_mime(path: &Path, payload: &[u8]) -> String {
    if let Some(kind) = infer::get(payload) {
        return kind.mime_type().to_string();
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let mime = match extension.as_str() {
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        _ => "",
    };
    mime.to_string()
}

fn read_input(path: &Path) -> Result<RawFileInput, ApplicationError> {
    let payload = fs::read(path).map_err(|error| {
        ApplicationError::InvalidInput(format!("cannot read {}: {error}", path.display()))
    })?;
    let name = path
        .file_name()
        .map(|part| part.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = detect_mime(path, &payload);
    Ok(RawFileInput::new(name, mime_type, payload))
}

fn percent_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' && index + 2 < bytes.len() {
            let high = (bytes[index + 1] as char).to_digit(16);
            let low = (bytes[index + 2] as char).to_digit(16);
            if let (Some(high), Some(low)) = (high, low) {
                decoded.push((high * 16 + low) as u8);
                index += 3;
                continue;
            }
        }
        decoded.push(bytes[index]);
        index += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}
