//! Composite loader dispatching on the shape of the source

use async_trait::async_trait;

use super::{DocumentError, FileDocumentLoader, HttpDocumentLoader};
use crate::application::DocumentLoader;
use crate::generation::Document;

/// Sends URLs to the HTTP loader and everything else to the file loader
pub struct CompositeDocumentLoader {
    http: HttpDocumentLoader,
    file: FileDocumentLoader,
}

impl CompositeDocumentLoader {
    pub fn new() -> Result<Self, DocumentError> {
        Ok(Self {
            http: HttpDocumentLoader::new()?,
            file: FileDocumentLoader::new(),
        })
    }
}

#[async_trait]
impl DocumentLoader for CompositeDocumentLoader {
    async fn load(&self, source: &str) -> Result<Document, DocumentError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            tracing::debug!("CompositeDocumentLoader: using HTTP loader for {source}");
            self.http.load(source).await
        } else {
            tracing::debug!("CompositeDocumentLoader: using file loader for {source}");
            self.file.load(source).await
        }
    }
}
