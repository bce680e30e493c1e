//! Attachment reference lifecycle.
//!
//! Records only hold opaque paths handed out by the storage service. When a
//! record is deleted every path it references is handed back for removal.
//! The record is the source of truth: it is removed first, and a file that
//! cannot be removed afterwards only produces a warning.

use std::future::Future;

use tokio::task::JoinSet;
use tracing::warn;

use crate::{
    error::{AppError, AppResult},
    models::{Achievement, Blog, DeletionReport, EventPost, Notice, ResearchPost, Resource},
    storage::StorageState,
};

/// Content that references stored files.
pub trait HasAttachments {
    /// Every stored path this record points at, empty slots skipped.
    fn attachment_paths(&self) -> Vec<String>;
}

impl HasAttachments for Resource {
    fn attachment_paths(&self) -> Vec<String> {
        vec![self.file_path.clone()]
    }
}

impl HasAttachments for Blog {
    fn attachment_paths(&self) -> Vec<String> {
        [&self.image_path, &self.document_path]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

impl HasAttachments for Notice {
    fn attachment_paths(&self) -> Vec<String> {
        self.file_path.iter().cloned().collect()
    }
}

impl HasAttachments for ResearchPost {
    fn attachment_paths(&self) -> Vec<String> {
        [&self.image_path, &self.document_path]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

impl HasAttachments for EventPost {
    fn attachment_paths(&self) -> Vec<String> {
        self.image_paths.clone()
    }
}

impl HasAttachments for Achievement {
    fn attachment_paths(&self) -> Vec<String> {
        self.image_paths.clone()
    }
}

/// Requests deletion of every path concurrently and waits for all of them.
///
/// Returns one warning per path that could not be removed. Failures are
/// logged and never retried.
pub async fn purge(storage: &StorageState, paths: Vec<String>) -> Vec<String> {
    let mut tasks = JoinSet::new();
    for path in paths.into_iter().filter(|p| !p.is_empty()) {
        let storage = storage.clone();
        tasks.spawn(async move {
            let result = storage.delete(&path).await;
            (path, result)
        });
    }

    let mut warnings = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(()))) => {}
            Ok((path, Err(e))) => {
                warn!(path = %path, error = %e, "failed to delete attachment");
                warnings.push(format!("Failed to delete attachment {path}: {e}"));
            }
            Err(e) => {
                warn!(error = %e, "attachment deletion task aborted");
                warnings.push(format!("Attachment deletion task aborted: {e}"));
            }
        }
    }
    warnings.sort();
    warnings
}

/// Awaits the insert of a record whose files are already stored. When the
/// insert fails those files are purged so none is left unreferenced.
pub async fn commit_or_discard<T, F>(
    storage: &StorageState,
    stored: Vec<String>,
    insert: F,
) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match insert.await {
        Ok(record) => Ok(record),
        Err(e) => {
            purge(storage, stored).await;
            Err(e)
        }
    }
}

/// Deletes a fetched record and then purges its attachments.
///
/// `record` is the result of looking the id up; `remove` is the (not yet
/// polled) repository delete for the same id. `label` names the record kind in
/// messages, e.g. `"Blog"`.
pub async fn delete_with_attachments<T, R>(
    storage: &StorageState,
    record: Option<T>,
    remove: R,
    label: &str,
) -> AppResult<DeletionReport>
where
    T: HasAttachments,
    R: Future<Output = AppResult<bool>>,
{
    let record = record.ok_or_else(|| AppError::NotFound(format!("{label} not found")))?;

    // Someone else may have deleted it between the lookup and now.
    if !remove.await? {
        return Err(AppError::NotFound(format!("{label} not found")));
    }

    let warnings = purge(storage, record.attachment_paths()).await;

    Ok(DeletionReport {
        message: format!("{label} deleted successfully"),
        warnings,
    })
}
