//! File-based OpenAPI document loader
//!
//! This loader handles only file I/O. The actual parsing is done by the OpenApiParser.

use async_trait::async_trait;
use tokio::fs;

use super::parser::OpenApiParser;
use super::{DocumentError, parse_content};
use crate::application::DocumentLoader;
use crate::generation::Document;

/// Loads OpenAPI documents from local files
pub struct FileDocumentLoader;

impl FileDocumentLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentLoader for FileDocumentLoader {
    async fn load(&self, source: &str) -> Result<Document, DocumentError> {
        tracing::debug!("Reading OpenAPI document from {source}");
        let content = fs::read_to_string(source).await?;

        let value = parse_content(source, None, &content)?;
        OpenApiParser::new(value).parse()
    }
}

impl Default for FileDocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}
