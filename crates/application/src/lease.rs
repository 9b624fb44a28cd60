use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use tracing::debug;

use crate::{ApplicationError, ResourceAllocator, TemporaryResource};

/// Owns one temporary resource and releases it when dropped.
pub struct ResourceLease {
    allocator: Arc<dyn ResourceAllocator>,
    resource: TemporaryResource,
}

impl ResourceLease {
    pub fn acquire(
        allocator: &Arc<dyn ResourceAllocator>,
        payload: &[u8],
        mime_type: &str,
        name: &str,
    ) -> Result<Self, ApplicationError> {
        let resource = allocator.allocate(payload, mime_type, name)?;
        debug!(handle = resource.handle, uri = %resource.uri, "temporary resource allocated");
        Ok(Self {
            allocator: Arc::clone(allocator),
            resource,
        })
    }

    pub fn resource(&self) -> &TemporaryResource {
        &self.resource
    }

    pub fn release(self) {}
}

impl Drop for ResourceLease {
    fn drop(&mut self) {
        debug!(handle = self.resource.handle, "temporary resource released");
        self.allocator.release(&self.resource);
    }
}

impl Debug for ResourceLease {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLease")
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}
