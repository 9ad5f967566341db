//! Generator settings
//!
//! `GeneratorSettings` is the single configuration value handed to the
//! engine. It deserializes from settings files (camelCase keys) and every
//! field has a default, so a file only needs to name what it changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_NAMESPACE: &str = "GeneratedCode";
pub const DEFAULT_INTERFACE_NAME: &str = "ApiClient";
pub const DEFAULT_OUTPUT_FOLDER: &str = "./Generated";
pub const DEFAULT_REGISTRATION_FUNCTION: &str = "configure_api_clients";

/// How operations are split into interfaces
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum MultipleInterfaces {
    /// A single interface holding every operation
    #[default]
    Unset,
    /// One interface per operation
    ByEndpoint,
    /// One interface per tag
    ByTag,
}

/// Visibility of generated types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeAccessibility {
    #[default]
    Public,
    Internal,
}

/// Interface naming inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamingSettings {
    /// Name the single interface after the document title when one exists
    pub use_openapi_title: bool,
    pub interface_name: String,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            use_openapi_title: true,
            interface_name: DEFAULT_INTERFACE_NAME.to_string(),
        }
    }
}

/// Retry policy attached to registered clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrySettings {
    pub max_retry_count: u32,
    pub first_backoff_retry_in_seconds: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retry_count: 6,
            first_backoff_retry_in_seconds: 1.0,
        }
    }
}

/// Dependency registration glue for the generated interfaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationSettings {
    pub base_url: Option<String>,
    pub http_message_handlers: Vec<String>,
    pub retry: Option<RetrySettings>,
    pub extension_method_name: String,
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            http_message_handlers: Vec::new(),
            retry: None,
            extension_method_name: DEFAULT_REGISTRATION_FUNCTION.to_string(),
        }
    }
}

/// Complete configuration surface of a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorSettings {
    /// Path or URL of the OpenAPI document; only hosts read it
    pub openapi_path: Option<String>,
    pub namespace: String,
    pub contracts_namespace: Option<String>,
    pub naming: NamingSettings,

    pub generate_contracts: bool,
    pub generate_clients: bool,
    pub generate_doc_comments: bool,
    pub generate_status_code_comments: bool,
    pub add_auto_generated_header: bool,
    pub add_accept_headers: bool,
    pub return_api_response: bool,
    pub generate_operation_headers: bool,
    pub type_accessibility: TypeAccessibility,
    pub use_cancellation_tokens: bool,
    pub use_iso_date_format: bool,
    pub use_dynamic_querystring_parameters: bool,
    pub polymorphic_serialization: bool,
    /// Root object contracts without declared additional properties get a
    /// flattened catch-all map for unknown keys
    pub generate_default_additional_properties: bool,
    /// Contract fields are private, set through `new` and read through accessors
    pub immutable_records: bool,

    /// Operation id to explicit success response type
    pub response_type_overrides: BTreeMap<String, String>,

    pub additional_namespaces: Vec<String>,
    pub exclude_namespaces: Vec<String>,

    pub multiple_interfaces: MultipleInterfaces,
    pub operation_name_template: Option<String>,
    pub optional_parameters: bool,

    pub include_tags: Vec<String>,
    pub include_path_matches: Vec<String>,
    pub generate_deprecated_operations: bool,

    pub trim_unused_schema: bool,
    pub keep_schema_patterns: Vec<String>,

    pub output_folder: PathBuf,
    pub contracts_output_folder: Option<PathBuf>,
    pub output_filename: Option<String>,
    pub generate_multiple_files: bool,

    pub dependency_injection_settings: Option<RegistrationSettings>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            openapi_path: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            contracts_namespace: None,
            naming: NamingSettings::default(),
            generate_contracts: true,
            generate_clients: true,
            generate_doc_comments: true,
            generate_status_code_comments: true,
            add_auto_generated_header: true,
            add_accept_headers: true,
            return_api_response: false,
            generate_operation_headers: true,
            type_accessibility: TypeAccessibility::Public,
            use_cancellation_tokens: false,
            use_iso_date_format: false,
            use_dynamic_querystring_parameters: false,
            polymorphic_serialization: false,
            generate_default_additional_properties: true,
            immutable_records: false,
            response_type_overrides: BTreeMap::new(),
            additional_namespaces: Vec::new(),
            exclude_namespaces: Vec::new(),
            multiple_interfaces: MultipleInterfaces::Unset,
            operation_name_template: None,
            optional_parameters: false,
            include_tags: Vec::new(),
            include_path_matches: Vec::new(),
            generate_deprecated_operations: true,
            trim_unused_schema: false,
            keep_schema_patterns: Vec::new(),
            output_folder: PathBuf::from(DEFAULT_OUTPUT_FOLDER),
            contracts_output_folder: None,
            output_filename: None,
            generate_multiple_files: false,
            dependency_injection_settings: None,
        }
    }
}

impl GeneratorSettings {
    pub fn builder() -> super::GeneratorSettingsBuilder {
        super::GeneratorSettingsBuilder::new()
    }

    /// Namespace of contract types, defaulting to the interface namespace
    pub fn effective_contracts_namespace(&self) -> &str {
        self.contracts_namespace
            .as_deref()
            .unwrap_or(self.namespace.as_str())
    }

    /// Multi-file output is forced whenever contracts have their own folder
    pub fn is_multi_file(&self) -> bool {
        self.generate_multiple_files || self.contracts_output_folder.is_some()
    }
}
