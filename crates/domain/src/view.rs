use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DomainError, FileRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    NewestFirst,
    OldestFirst,
    NameAscending,
    NameDescending,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::NewestFirst,
        SortMode::OldestFirst,
        SortMode::NameAscending,
        SortMode::NameDescending,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewestFirst => "newest",
            Self::OldestFirst => "oldest",
            Self::NameAscending => "name-asc",
            Self::NameDescending => "name-desc",
        }
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "newest" | "newest-first" => Ok(Self::NewestFirst),
            "oldest" | "oldest-first" => Ok(Self::OldestFirst),
            "name-asc" | "name-ascending" | "name" => Ok(Self::NameAscending),
            "name-desc" | "name-descending" => Ok(Self::NameDescending),
            other => Err(DomainError::UnknownSortMode(other.to_string())),
        }
    }
}

/// Filters `records` by a case-insensitive substring of `search_text` in the
/// name, then orders them by `sort_mode`. Both sorts are stable, so records
/// that compare equal keep the order they arrived in.
pub fn derive_view(
    records: &[FileRecord],
    search_text: &str,
    sort_mode: SortMode,
) -> Vec<FileRecord> {
    let needle = search_text.to_lowercase();
    let mut view: Vec<FileRecord> = records
        .iter()
        .filter(|record| needle.is_empty() || record.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    match sort_mode {
        SortMode::NewestFirst => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::OldestFirst => view.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortMode::NameAscending => view.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortMode::NameDescending => view.sort_by(|a, b| compare_names(&b.name, &a.name)),
    }
    view
}

/// Case-folded comparison first so "apple" sorts next to "Apple"; the raw
/// strings break the tie.
pub fn compare_names(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}
