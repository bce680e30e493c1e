//! Multipart form intake.
//!
//! A handler declares which named file slots it accepts and how many files
//! each may hold. The whole form is read and checked before anything reaches
//! storage, so a rejected request leaves no files behind.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;
use tracing::debug;

use crate::{
    attachments,
    error::{AppError, AppResult},
    storage::StorageState,
};

/// A named file slot and the most files it may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSlot {
    pub name: &'static str,
    pub max: usize,
}

impl FileSlot {
    pub const fn single(name: &'static str) -> Self {
        Self { name, max: 1 }
    }

    pub const fn many(name: &'static str, max: usize) -> Self {
        Self { name, max }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// UploadForm
///
/// The text fields and files of one multipart request.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<&'static str, Vec<UploadedFile>>,
}

impl UploadForm {
    /// Reads the whole multipart body, enforcing the declared slots.
    pub async fn read(mut multipart: Multipart, slots: &[FileSlot]) -> AppResult<Self> {
        let mut form = UploadForm::default();

        loop {
            let field = multipart
                .next_field()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Malformed upload: {e}")))?;
            let Some(field) = field else { break };

            let name = field.name().unwrap_or_default().to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::InvalidInput(format!("Malformed upload: {e}")))?;

                    // Browsers submit an empty, unnamed part for an untouched file input.
                    if file_name.is_empty() && data.is_empty() {
                        continue;
                    }
                    form.accept_file(slots, &name, UploadedFile { file_name, data })?;
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::InvalidInput(format!("Malformed upload: {e}")))?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    fn accept_file(
        &mut self,
        slots: &[FileSlot],
        name: &str,
        file: UploadedFile,
    ) -> AppResult<()> {
        let slot = slots
            .iter()
            .find(|slot| slot.name == name)
            .ok_or_else(|| AppError::InvalidInput(format!("Unexpected file field: {name}")))?;

        let bucket = self.files.entry(slot.name).or_default();
        if bucket.len() >= slot.max {
            return Err(AppError::InvalidInput(format!(
                "Too many files for {} (max {})",
                slot.name, slot.max
            )));
        }
        bucket.push(file);
        Ok(())
    }

    /// A text field, trimmed. Blank values count as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// A text field that must be present and non-blank.
    pub fn require(&self, name: &str) -> AppResult<String> {
        self.text(name)
            .ok_or_else(|| AppError::InvalidInput(format!("Missing required field: {name}")))
    }

    pub fn file_count(&self, slot: &str) -> usize {
        self.files.get(slot).map_or(0, Vec::len)
    }

    /// Stores the single file of `slot`, if one was sent.
    pub async fn store_one(
        &mut self,
        storage: &StorageState,
        slot: &str,
    ) -> AppResult<Option<String>> {
        Ok(self.store_all(storage, slot).await?.into_iter().next())
    }

    /// Stores every file of `slot` in order and returns their paths.
    ///
    /// If one store fails, the files already stored by this call are purged
    /// before the error is returned.
    pub async fn store_all(&mut self, storage: &StorageState, slot: &str) -> AppResult<Vec<String>> {
        let files = self.files.remove(slot).unwrap_or_default();
        let mut paths = Vec::with_capacity(files.len());

        for file in files {
            match storage.store(&file.file_name, &file.data).await {
                Ok(path) => {
                    debug!(slot, path = %path, size = file.data.len(), "attachment stored");
                    paths.push(path);
                }
                Err(e) => {
                    attachments::purge(storage, paths).await;
                    return Err(AppError::Internal(e.context("failed to store upload")));
                }
            }
        }

        Ok(paths)
    }
}
