mod queries;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{Connection, TransactionBehavior};
use shelf_application::{ApplicationError, Clock, ObjectStore};
use shelf_domain::{FileRecord, RawFileInput, RecordId};
use tracing::{debug, info};

use crate::migrations;

/// Object store backed by one SQLite file.
///
/// Each operation opens its own connection on the blocking pool; the schema
/// check runs on the first connection only.
#[derive(Clone)]
pub struct SqliteObjectStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    max_total_bytes: Option<u64>,
    schema_ready: AtomicBool,
}

impl SqliteObjectStore {
    pub fn new(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                path: path.into(),
                clock,
                max_total_bytes: None,
                schema_ready: AtomicBool::new(false),
            }),
        }
    }

    /// Caps the sum of stored payload sizes; writes past it fail.
    pub fn with_capacity(
        path: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
        max_total_bytes: u64,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                path: path.into(),
                clock,
                max_total_bytes: Some(max_total_bytes),
                schema_ready: AtomicBool::new(false),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    async fn with_connection<T, F>(&self, operation: F) -> Result<T, ApplicationError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection, &StoreInner) -> Result<T, ApplicationError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut conn = inner.connect()?;
            operation(&mut conn, &inner)
        })
        .await
        .map_err(|error| {
            ApplicationError::StorageUnavailable(format!("storage task did not complete: {error}"))
        })?
    }
}

impl StoreInner {
    fn connect(&self) -> Result<Connection, ApplicationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ApplicationError::StorageUnavailable(
                "catalog path must not be empty".to_string(),
            ));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|error| {
                    ApplicationError::StorageUnavailable(format!(
                        "cannot create {}: {error}",
                        parent.display()
                    ))
                })?;
            }
        }

        let mut conn = Connection::open(&self.path).map_err(|error| {
            ApplicationError::StorageUnavailable(format!(
                "cannot open {}: {error}",
                self.path.display()
            ))
        })?;
        conn.execute_batch("PRAGMA busy_timeout=5000; PRAGMA journal_mode=WAL;")
            .map_err(|error| ApplicationError::StorageUnavailable(error.to_string()))?;

        if !self.schema_ready.load(Ordering::Acquire) {
            let version = migrations::run_migrations(&mut conn)?;
            self.schema_ready.store(true, Ordering::Release);
            debug!(path = %self.path.display(), version, "object store ready");
        }

        Ok(conn)
    }
}

#[async_trait]
impl ObjectStore for SqliteObjectStore {
    async fn open(&self) -> Result<(), ApplicationError> {
        self.with_connection(|_, inner| {
            info!(path = %inner.path.display(), "object store opened");
            Ok(())
        })
        .await
    }

    async fn create(&self, file: RawFileInput) -> Result<RecordId, ApplicationError> {
        file.validate()?;
        self.with_connection(move |conn, inner| {
            let size_bytes = i64::try_from(file.size_bytes).map_err(|_| {
                ApplicationError::WriteFailed(format!("{} is too large", file.name))
            })?;
            let created_at_ms = inner.clock.now().timestamp_millis();

            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(write_failed)?;

            if let Some(limit) = inner.max_total_bytes {
                let used = queries::total_bytes(&tx).map_err(write_failed)? as u64;
                if used.saturating_add(file.size_bytes) > limit {
                    return Err(ApplicationError::WriteFailed(format!(
                        "quota exceeded: {used} of {limit} bytes in use, {} more requested",
                        file.size_bytes
                    )));
                }
            }

            let id_value = queries::insert_record(
                &tx,
                &file.name,
                &file.mime_type,
                size_bytes,
                created_at_ms,
                &file.payload,
            )
            .map_err(write_failed)?;
            tx.commit().map_err(write_failed)?;

            let id = RecordId::new(id_value)?;
            debug!(record_id = %id, name = %file.name, size = file.size_bytes, "record created");
            Ok(id)
        })
        .await
    }

    async fn list_all(&self) -> Result<Vec<FileRecord>, ApplicationError> {
        self.with_connection(|conn, _| queries::list_records(conn).map_err(read_failed))
            .await
    }

    async fn get_record(&self, id: RecordId) -> Result<Option<FileRecord>, ApplicationError> {
        self.with_connection(move |conn, _| {
            queries::find_record(conn, id.get()).map_err(read_failed)
        })
        .await
    }

    async fn get_payload(&self, id: RecordId) -> Result<Option<Vec<u8>>, ApplicationError> {
        self.with_connection(move |conn, _| {
            queries::find_payload(conn, id.get()).map_err(read_failed)
        })
        .await
    }

    async fn delete(&self, id: RecordId) -> Result<bool, ApplicationError> {
        self.with_connection(move |conn, _| {
            let removed = queries::delete_record(conn, id.get()).map_err(write_failed)?;
            debug!(record_id = %id, removed, "record deleted");
            Ok(true)
        })
        .await
    }
}

fn write_failed(error: rusqlite::Error) -> ApplicationError {
    ApplicationError::WriteFailed(error.to_string())
}

fn read_failed(error: rusqlite::Error) -> ApplicationError {
    ApplicationError::ReadFailed(error.to_string())
}
