//! OpenAPI document model, parser and loaders

pub mod composite_loader;
pub mod errors;
pub mod file_loader;
pub mod http_loader;
pub mod parser;
pub mod types;

pub use composite_loader::CompositeDocumentLoader;
pub use errors::DocumentError;
pub use file_loader::FileDocumentLoader;
pub use http_loader::HttpDocumentLoader;
pub use parser::OpenApiParser;
pub use types::*;

use serde_json::Value as JsonValue;

/// Parse raw content as JSON or YAML, guided by the content type or the source extension
pub(crate) fn parse_content(
    source: &str,
    content_type: Option<&str>,
    content: &str,
) -> Result<JsonValue, DocumentError> {
    let content_type = content_type.unwrap_or_default();

    if content_type.contains("json") || source.ends_with(".json") {
        Ok(serde_json::from_str(content)?)
    } else if content_type.contains("yaml") || source.ends_with(".yaml") || source.ends_with(".yml")
    {
        serde_yaml::from_str(content)
            .map_err(|e| DocumentError::LoadError(format!("Failed to parse YAML: {e}")))
    } else {
        // Try JSON first, then YAML
        serde_json::from_str(content)
            .or_else(|_| serde_yaml::from_str(content))
            .map_err(|e| DocumentError::LoadError(format!("Failed to parse OpenAPI document: {e}")))
    }
}
