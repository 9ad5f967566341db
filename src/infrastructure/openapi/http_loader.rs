//! HTTP-based OpenAPI document loader

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::parser::OpenApiParser;
use super::{DocumentError, parse_content};
use crate::application::DocumentLoader;
use crate::generation::Document;

/// Loads OpenAPI documents from HTTP/HTTPS URLs
pub struct HttpDocumentLoader {
    client: Client,
}

impl HttpDocumentLoader {
    pub fn new() -> Result<Self, DocumentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| DocumentError::LoadError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentLoader for HttpDocumentLoader {
    async fn load(&self, source: &str) -> Result<Document, DocumentError> {
        let url = url::Url::parse(source)
            .map_err(|e| DocumentError::LoadError(format!("Invalid URL {source}: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(DocumentError::LoadError(format!(
                "HttpDocumentLoader only handles HTTP(S) URLs, got: {source}"
            )));
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            DocumentError::LoadError(format!("Failed to fetch OpenAPI document from {source}: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocumentError::LoadError(format!(
                "HTTP {status} when fetching {source}"
            )));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let content = response.text().await.map_err(|e| {
            DocumentError::LoadError(format!("Failed to read response body: {e}"))
        })?;

        let value = parse_content(source, content_type.as_deref(), &content)?;
        OpenApiParser::new(value).parse()
    }
}
