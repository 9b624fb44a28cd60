use std::sync::Arc;

use shelf_domain::{classify_mime, derive_view, FileRecord, RecordId, SortMode};
use tracing::{debug, info, warn};

use crate::{
    ActivePreview, ApplicationError, ConfirmationGate, DownloadCommand, DownloadOutcome,
    IngestCommand, IngestReport, ObjectStore, OpenPreviewCommand, PreviewInfo, PreviewOutcome,
    RemoveCommand, RemoveOutcome, ResourceAllocator, ResourceLease, SaveTarget, ViewState,
};

/// Keeps the in-memory view of the store and the temporary resources handed
/// out for previews and downloads.
///
/// The cached record list is only ever replaced by a full `list_all`, after
/// startup and after every mutation. At most one preview resource is live at
/// a time; it is released on close, on switching to another preview, on
/// removing the previewed record, and when the controller is dropped.
pub struct GalleryController {
    store: Box<dyn ObjectStore>,
    resources: Arc<dyn ResourceAllocator>,
    save_target: Box<dyn SaveTarget>,
    confirmation: Box<dyn ConfirmationGate>,
    state: ViewState,
}

impl GalleryController {
    pub fn new(
        store: Box<dyn ObjectStore>,
        resources: Arc<dyn ResourceAllocator>,
        save_target: Box<dyn SaveTarget>,
        confirmation: Box<dyn ConfirmationGate>,
    ) -> Self {
        Self {
            store,
            resources,
            save_target,
            confirmation,
            state: ViewState::default(),
        }
    }

    /// Opens the store and loads the first snapshot.
    pub async fn bootstrap(&mut self) -> Result<(), ApplicationError> {
        self.store.open().await?;
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Result<(), ApplicationError> {
        let records = self.store.list_all().await?;
        debug!(count = records.len(), "gallery refreshed");
        self.state.records = records;
        Ok(())
    }

    /// Stores the files one at a time and stops at the first failure. Files
    /// stored before the failure stay stored; the view is refreshed either way.
    pub async fn ingest(
        &mut self,
        command: IngestCommand,
    ) -> Result<IngestReport, ApplicationError> {
        let total = command.files.len();
        let mut report = IngestReport::default();
        let mut failure = None;

        for file in command.files {
            let name = file.name.clone();
            let created = match file.validate() {
                Ok(()) => self.store.create(file).await,
                Err(error) => Err(error.into()),
            };

            match created {
                Ok(record_id) => {
                    debug!(%record_id, name = %name, "file stored");
                    report.created.push(record_id);
                }
                Err(error) => {
                    warn!(name = %name, %error, "ingest stopped");
                    failure = Some((name, error));
                    break;
                }
            }
        }

        let refreshed = self.refresh().await;
        if let Some((name, error)) = failure {
            if let Err(refresh_error) = refreshed {
                warn!(%refresh_error, "refresh after interrupted ingest failed");
            }
            return Err(ApplicationError::IngestInterrupted {
                stored: report.created.len(),
                name,
                source: Box::new(error),
            });
        }
        refreshed?;

        info!(stored = report.created.len(), total, "ingest finished");
        Ok(report)
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.state.search_text = text.into();
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.state.sort_mode = mode;
    }

    pub fn search_text(&self) -> &str {
        &self.state.search_text
    }

    pub fn sort_mode(&self) -> SortMode {
        self.state.sort_mode
    }

    /// The last snapshot, in store order.
    pub fn records(&self) -> &[FileRecord] {
        &self.state.records
    }

    pub fn derived_view(&self) -> Vec<FileRecord> {
        derive_view(
            &self.state.records,
            &self.state.search_text,
            self.state.sort_mode,
        )
    }

    pub fn active_preview(&self) -> Option<PreviewInfo> {
        self.state.active_preview.as_ref().map(preview_info)
    }

    /// Closes the current preview before allocating the new one, so a failed
    /// allocation leaves no preview open.
    pub async fn open_preview(
        &mut self,
        command: OpenPreviewCommand,
    ) -> Result<PreviewOutcome, ApplicationError> {
        let Some(payload) = self.store.get_payload(command.record_id).await? else {
            debug!(record_id = %command.record_id, "preview target missing");
            return Ok(PreviewOutcome::NotFound(command.record_id));
        };

        let (name, mime_type) = self.describe(command.record_id).await?;

        self.close_preview();

        let lease = ResourceLease::acquire(&self.resources, &payload, &mime_type, &name)?;
        let preview = ActivePreview {
            record_id: command.record_id,
            kind: classify_mime(&mime_type),
            name,
            mime_type,
            lease,
        };
        let info = preview_info(&preview);
        info!(record_id = %info.record_id, kind = ?info.kind, "preview opened");
        self.state.active_preview = Some(preview);
        Ok(PreviewOutcome::Opened(info))
    }

    /// Returns whether a preview was open.
    pub fn close_preview(&mut self) -> bool {
        match self.state.active_preview.take() {
            Some(preview) => {
                debug!(record_id = %preview.record_id, "preview closed");
                preview.lease.release();
                true
            }
            None => false,
        }
    }

    pub async fn download(
        &self,
        command: DownloadCommand,
    ) -> Result<DownloadOutcome, ApplicationError> {
        let Some(payload) = self.store.get_payload(command.record_id).await? else {
            return Ok(DownloadOutcome::NotFound(command.record_id));
        };

        let (name, mime_type) = self.describe(command.record_id).await?;

        let lease = ResourceLease::acquire(&self.resources, &payload, &mime_type, &name)?;
        let location = self.save_target.save(lease.resource(), &name)?;
        lease.release();

        info!(record_id = %command.record_id, location = %location, "download saved");
        Ok(DownloadOutcome::Saved { location })
    }

    pub async fn remove(
        &mut self,
        command: RemoveCommand,
    ) -> Result<RemoveOutcome, ApplicationError> {
        let label = self
            .state
            .records
            .iter()
            .find(|record| record.id == command.record_id)
            .map(|record| record.name.clone())
            .unwrap_or_else(|| format!("record {}", command.record_id));

        if !self.confirmation.confirm(&format!("Delete {label}?")).await {
            debug!(record_id = %command.record_id, "removal declined");
            return Ok(RemoveOutcome::Declined);
        }

        let previewing = self
            .state
            .active_preview
            .as_ref()
            .is_some_and(|preview| preview.record_id == command.record_id);
        if previewing {
            self.close_preview();
        }

        self.store.delete(command.record_id).await?;
        info!(record_id = %command.record_id, "record removed");
        self.refresh().await?;
        Ok(RemoveOutcome::Removed)
    }

    /// Name and MIME type of a record, from the snapshot when it has the id
    /// and from the store otherwise.
    async fn describe(&self, record_id: RecordId) -> Result<(String, String), ApplicationError> {
        if let Some(record) = self.state.records.iter().find(|record| record.id == record_id) {
            return Ok((record.name.clone(), record.mime_type.clone()));
        }
        debug!(%record_id, "record not in snapshot, asking the store");
        Ok(match self.store.get_record(record_id).await? {
            Some(record) => (record.name, record.mime_type),
            None => (format!("record-{record_id}"), String::new()),
        })
    }
}

fn preview_info(preview: &ActivePreview) -> PreviewInfo {
    PreviewInfo {
        record_id: preview.record_id,
        name: preview.name.clone(),
        mime_type: preview.mime_type.clone(),
        kind: preview.kind,
        uri: preview.lease.resource().uri.clone(),
    }
}
