//! Filesystem-based output service implementation

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::{ApplicationError, OutputService, RenderedFile};

/// Output service that writes rendered files to the filesystem
///
/// Files whose current content already matches are left untouched so that
/// repeated runs keep timestamps stable.
pub struct FileSystemOutputService;

impl FileSystemOutputService {
    pub fn new() -> Self {
        Self
    }

    async fn write_file(&self, file: &RenderedFile) -> Result<(), ApplicationError> {
        let path = &file.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.ensure_directory(parent).await?;
        }

        if fs::read_to_string(path)
            .await
            .is_ok_and(|existing| existing == file.content)
        {
            tracing::debug!("{} is up to date", path.display());
            return Ok(());
        }

        let mut handle = fs::File::create(path).await.map_err(|e| {
            ApplicationError::OutputError(format!(
                "Failed to create file {}: {}",
                path.display(),
                e
            ))
        })?;

        handle
            .write_all(file.content.as_bytes())
            .await
            .map_err(|e| {
                ApplicationError::OutputError(format!(
                    "Failed to write file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        handle.flush().await.map_err(|e| {
            ApplicationError::OutputError(format!(
                "Failed to flush file {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl OutputService for FileSystemOutputService {
    async fn write_files(&self, files: &[RenderedFile]) -> Result<(), ApplicationError> {
        for file in files {
            self.write_file(file).await?;
        }
        Ok(())
    }

    async fn ensure_directory(&self, path: &Path) -> Result<(), ApplicationError> {
        fs::create_dir_all(path).await.map_err(|e| {
            ApplicationError::OutputError(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(())
    }
}

impl Default for FileSystemOutputService {
    fn default() -> Self {
        Self::new()
    }
}
