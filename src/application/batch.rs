//! Batch driver: runs one generation per settings file found under a directory

use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use crate::application::{ApplicationError, GenerateClientUseCase, GenerateRequest, GenerateResponse};
use crate::config::{SETTINGS_EXTENSION, load_settings_file};

/// Result of one settings file in a batch
#[derive(Debug)]
pub struct BatchOutcome {
    pub settings_file: PathBuf,
    pub result: Result<GenerateResponse, ApplicationError>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs independent generations concurrently, one task per settings file
pub struct BatchGenerator {
    use_case: Arc<GenerateClientUseCase>,
    dry_run: bool,
}

impl BatchGenerator {
    pub fn new(use_case: Arc<GenerateClientUseCase>) -> Self {
        Self {
            use_case,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Generate for every settings file under `directory`
    pub async fn run_directory(&self, directory: &Path) -> Result<Vec<BatchOutcome>, ApplicationError> {
        let files = discover_settings_files(directory).await?;
        if files.is_empty() {
            tracing::warn!(
                "No *.{SETTINGS_EXTENSION} files found under {}",
                directory.display()
            );
        }
        Ok(self.run(files).await)
    }

    /// Generate for each listed settings file; outcomes keep the input order
    pub async fn run(&self, settings_files: Vec<PathBuf>) -> Vec<BatchOutcome> {
        let tasks = settings_files.iter().cloned().map(|path| {
            let use_case = Arc::clone(&self.use_case);
            let dry_run = self.dry_run;
            tokio::spawn(async move {
                let settings = load_settings_file(&path).await?;
                let mut request = GenerateRequest::new(settings);
                request.dry_run = dry_run;
                use_case.execute(request).await
            })
        });

        join_all(tasks)
            .await
            .into_iter()
            .zip(settings_files)
            .map(|(joined, settings_file)| {
                let result = joined
                    .map_err(|e| ApplicationError::TaskFailed(e.to_string()))
                    .and_then(|result| result);
                if let Err(e) = &result {
                    tracing::error!("{}: {e}", settings_file.display());
                }
                BatchOutcome {
                    settings_file,
                    result,
                }
            })
            .collect()
    }
}

/// Find `*.bindsmith` files below `directory`, sorted by path
pub async fn discover_settings_files(directory: &Path) -> Result<Vec<PathBuf>, ApplicationError> {
    let mut found = Vec::new();
    let mut pending = vec![directory.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == SETTINGS_EXTENSION) {
                found.push(path);
            }
        }
    }

    found.sort();
    tracing::debug!("Discovered {} settings files", found.len());
    Ok(found)
}
