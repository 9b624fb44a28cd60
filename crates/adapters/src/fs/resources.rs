use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use shelf_application::{ApplicationError, ResourceAllocator, TemporaryResource};
use tracing::{info, warn};

use super::safe_file_name;

/// Files from other processes untouched for this long are deleted on startup.
const STALE_AFTER: Duration = Duration::from_secs(24 * 60 * 60);

/// Hands out blobs as files under a cache directory, addressed by `file://`
/// URIs. A released resource's file is deleted.
#[derive(Debug)]
pub struct TempFileResources {
    root: PathBuf,
    next_handle: AtomicU64,
    live: Mutex<HashMap<u64, PathBuf>>,
}

impl TempFileResources {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ApplicationError> {
        let root = root.as_ref();
        fs::create_dir_all(root).map_err(|error| {
            ApplicationError::Resource(format!("cannot create {}: {error}", root.display()))
        })?;
        let root = root
            .canonicalize()
            .map_err(|error| ApplicationError::Resource(error.to_string()))?;
        let removed = clear_stale(&root, STALE_AFTER);
        if removed > 0 {
            info!(removed, root = %root.display(), "cleared stale temporary resources");
        }
        Ok(Self {
            root,
            next_handle: AtomicU64::new(1),
            live: Mutex::new(HashMap::new()),
        })
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().map(|live| live.len()).unwrap_or_default()
    }

    /// Local path behind a `file://` URI handed out by this allocator.
    pub fn path_of(uri: &str) -> Option<PathBuf> {
        uri.strip_prefix("file://").map(PathBuf::from)
    }
}

impl ResourceAllocator for TempFileResources {
    fn allocate(
        &self,
        payload: &[u8],
        mime_type: &str,
        name: &str,
    ) -> Result<TemporaryResource, ApplicationError> {
        let handle = self.next_handle.fetch_add(1, Ordering::SeqCst);
        let file_name = format!("{}-{handle}-{}", std::process::id(), safe_file_name(name));
        let path = self.root.join(file_name);

        fs::write(&path, payload).map_err(|error| {
            ApplicationError::Resource(format!("cannot write {}: {error}", path.display()))
        })?;

        let uri = format!("file://{}", path.display());
        self.live
            .lock()
            .map_err(|_| ApplicationError::Resource("resource table poisoned".to_string()))?
            .insert(handle, path);

        Ok(TemporaryResource {
            handle,
            uri,
            mime_type: mime_type.to_string(),
        })
    }

    fn release(&self, resource: &TemporaryResource) {
        let path = match self.live.lock() {
            Ok(mut live) => live.remove(&resource.handle),
            Err(_) => None,
        };
        let Some(path) = path else {
            warn!(handle = resource.handle, "release of unknown resource");
            return;
        };
        if let Err(error) = fs::remove_file(&path) {
            warn!(path = %path.display(), %error, "failed to delete temporary resource");
        }
    }
}

/// Deletes files left behind by other processes that have not been modified
/// for `older_than`. Returns how many were removed.
fn clear_stale(root: &Path, older_than: Duration) -> usize {
    let own_prefix = format!("{}-", std::process::id());
    let Ok(entries) = fs::read_dir(root) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.filter_map(Result::ok) {
        if entry.file_name().to_string_lossy().starts_with(&own_prefix) {
            continue;
        }
        let stale = entry
            .metadata()
            .ok()
            .filter(|meta| meta.is_file())
            .and_then(|meta| meta.modified().ok())
            .and_then(|modified| modified.elapsed().ok())
            .is_some_and(|age| age >= older_than);
        if stale && fs::remove_file(entry.path()).is_ok() {
            removed += 1;
        }
    }
    removed
}
