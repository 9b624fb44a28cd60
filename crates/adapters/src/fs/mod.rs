mod clock;
mod downloads;
mod resources;
mod sources;

pub use clock::SystemClock;
pub use downloads::DirectorySaveTarget;
pub use resources::TempFileResources;
pub use sources::{detect_mime, parse_dropped_uris, read_dropped, select_files};

use std::path::Path;

/// Leaves room for the prefixes and ` (n)` suffixes added to stored names
/// within the usual 255-byte file name limit.
const MAX_NAME_BYTES: usize = 120;

/// Reduces a user-supplied name to a single path component that is safe to
/// create inside a directory we own. Long names are shortened, keeping the
/// extension.
pub(crate) fn safe_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .map(|part| part.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '\0' => '_',
            other => other,
        })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        "file".to_string()
    } else {
        cap_length(trimmed)
    }
}

fn cap_length(name: &str) -> String {
    if name.len() <= MAX_NAME_BYTES {
        return name.to_string();
    }
    let (stem, extension) = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= 16 => name.split_at(dot),
        _ => (name, ""),
    };
    let mut end = MAX_NAME_BYTES - extension.len();
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{extension}", &stem[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_file_name_strips_directories() {
        assert_eq!(safe_file_name("clip.mp4"), "clip.mp4");
        assert_eq!(safe_file_name("../../etc/passwd"), "passwd");
        assert_eq!(safe_file_name("a:b.txt"), "a_b.txt");
        assert_eq!(safe_file_name(""), "file");
        assert_eq!(safe_file_name(".."), "file");
    }

    #[test]
    fn long_names_are_shortened_keeping_extension() {
        let long = format!("{}.mp4", "a".repeat(250));
        let short = safe_file_name(&long);
        assert_eq!(short.len(), MAX_NAME_BYTES);
        assert!(short.ends_with("aaa.mp4"));

        let wide = "é".repeat(200);
        let short = safe_file_name(&wide);
        assert!(short.len() <= MAX_NAME_BYTES);
        assert!(short.chars().all(|ch| ch == 'é'));
    }
}
