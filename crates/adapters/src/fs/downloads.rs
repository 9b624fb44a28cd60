use std::fs;
use std::path::{Path, PathBuf};

use shelf_application::{ApplicationError, SaveTarget, TemporaryResource};

use super::{safe_file_name, TempFileResources};

/// Saves downloads into a directory, never overwriting an existing file.
#[derive(Debug, Clone)]
pub struct DirectorySaveTarget {
    dir: PathBuf,
}

impl DirectorySaveTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SaveTarget for DirectorySaveTarget {
    fn save(
        &self,
        resource: &TemporaryResource,
        suggested_name: &str,
    ) -> Result<String, ApplicationError> {
        let source = TempFileResources::path_of(&resource.uri).ok_or_else(|| {
            ApplicationError::Resource(format!("cannot save from {}", resource.uri))
        })?;
        fs::create_dir_all(&self.dir).map_err(|error| {
            ApplicationError::Resource(format!("cannot create {}: {error}", self.dir.display()))
        })?;

        let destination = unique_destination(&self.dir, &safe_file_name(suggested_name));
        fs::copy(&source, &destination).map_err(|error| {
            ApplicationError::Resource(format!(
                "cannot save {}: {error}",
                destination.display()
            ))
        })?;
        Ok(destination.display().to_string())
    }
}

/// `name`, or `stem (n).ext` for the first `n` that is free.
fn unique_destination(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|part| part.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let extension = path
        .extension()
        .map(|part| format!(".{}", part.to_string_lossy()))
        .unwrap_or_default();

    (1_u32..)
        .map(|n| dir.join(format!("{stem} ({n}){extension}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(candidate)
}
