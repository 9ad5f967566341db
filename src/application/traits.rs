//! Port interfaces for the application layer

use async_trait::async_trait;
use std::path::Path;

use crate::application::{ApplicationError, RenderedFile};
use crate::config::GeneratorSettings;
use crate::generation::{Document, GenerationOutput};
use crate::infrastructure::openapi::DocumentError;

/// Loads and parses an OpenAPI document from a path or URL
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, source: &str) -> Result<Document, DocumentError>;
}

/// Turns a generation output into source files
#[async_trait]
pub trait ArtifactRenderer: Send + Sync {
    async fn render(
        &self,
        output: &GenerationOutput,
        settings: &GeneratorSettings,
        document_title: Option<&str>,
    ) -> Result<Vec<RenderedFile>, ApplicationError>;
}

/// Service for writing rendered files to the output destination
#[async_trait]
pub trait OutputService: Send + Sync {
    /// Write all files to the output destination
    async fn write_files(&self, files: &[RenderedFile]) -> Result<(), ApplicationError>;

    /// Ensure a directory exists
    async fn ensure_directory(&self, path: &Path) -> Result<(), ApplicationError>;
}
