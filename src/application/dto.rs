//! Request and response types of the application use cases

use std::path::PathBuf;

use crate::application::ValidationError;
use crate::config::{ConfigWarning, GeneratorSettings};

/// Request to generate client bindings for one settings value
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub settings: GeneratorSettings,
    /// Overrides `settings.openapi_path` when set
    pub openapi_source: Option<String>,
    /// Render and report without writing files
    pub dry_run: bool,
}

impl GenerateRequest {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self {
            settings,
            openapi_source: None,
            dry_run: false,
        }
    }

    /// Path or URL of the document to load
    pub fn source(&self) -> Result<&str, ValidationError> {
        let source = self
            .openapi_source
            .as_deref()
            .or(self.settings.openapi_path.as_deref())
            .ok_or_else(|| ValidationError::MissingField("openapiPath".to_string()))?;

        if source.trim().is_empty() {
            return Err(ValidationError::InvalidSource(
                "OpenAPI source cannot be empty".to_string(),
            ));
        }
        Ok(source)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.source().map(|_| ())
    }
}

/// One rendered output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Result of a generation request
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub source: String,
    pub files: Vec<RenderedFile>,
    pub interface_count: usize,
    pub contract_count: usize,
    pub warnings: Vec<ConfigWarning>,
    pub written: bool,
}
