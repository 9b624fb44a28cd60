use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shelf_domain::{FileRecord, RawFileInput, RecordId};

use crate::ApplicationError;

/// Durable table of file records keyed by an auto-assigned id.
///
/// Every operation ensures the database is open, so callers never have to
/// sequence `open` themselves; calling it explicitly just surfaces
/// `StorageUnavailable`/`SchemaUpgradeFailed` early.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn open(&self) -> Result<(), ApplicationError>;

    /// Stores one record atomically and returns its id.
    async fn create(&self, file: RawFileInput) -> Result<RecordId, ApplicationError>;

    /// Metadata of every stored record, in no guaranteed order.
    async fn list_all(&self) -> Result<Vec<FileRecord>, ApplicationError>;

    /// Metadata of one record; `Ok(None)` when the id does not exist.
    async fn get_record(&self, id: RecordId) -> Result<Option<FileRecord>, ApplicationError>;

    /// `Ok(None)` when the id does not exist.
    async fn get_payload(&self, id: RecordId) -> Result<Option<Vec<u8>>, ApplicationError>;

    /// Returns `true` whether or not the id existed.
    async fn delete(&self, id: RecordId) -> Result<bool, ApplicationError>;
}

/// A live reference to a blob's bytes that a front end can render or save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryResource {
    pub handle: u64,
    pub uri: String,
    pub mime_type: String,
}

pub trait ResourceAllocator: Send + Sync {
    fn allocate(
        &self,
        payload: &[u8],
        mime_type: &str,
        name: &str,
    ) -> Result<TemporaryResource, ApplicationError>;

    fn release(&self, resource: &TemporaryResource);
}

pub trait SaveTarget: Send + Sync {
    /// Saves the bytes behind `resource` and returns where they ended up.
    fn save(
        &self,
        resource: &TemporaryResource,
        suggested_name: &str,
    ) -> Result<String, ApplicationError>;
}

#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
