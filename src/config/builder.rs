//! Fluent construction of [`GeneratorSettings`]

use std::path::PathBuf;

use super::validation::validate;
use super::{GeneratorSettings, MultipleInterfaces, RegistrationSettings, TypeAccessibility};
use crate::generation::GenerationError;

/// Builder for GeneratorSettings; `build` validates the result
#[derive(Debug, Default)]
pub struct GeneratorSettingsBuilder {
    settings: GeneratorSettings,
}

impl GeneratorSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn openapi_path<S: Into<String>>(mut self, path: S) -> Self {
        self.settings.openapi_path = Some(path.into());
        self
    }

    pub fn namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.settings.namespace = namespace.into();
        self
    }

    pub fn contracts_namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.settings.contracts_namespace = Some(namespace.into());
        self
    }

    pub fn interface_name<S: Into<String>>(mut self, name: S) -> Self {
        self.settings.naming.interface_name = name.into();
        self
    }

    pub fn use_openapi_title(mut self, enabled: bool) -> Self {
        self.settings.naming.use_openapi_title = enabled;
        self
    }

    pub fn multiple_interfaces(mut self, mode: MultipleInterfaces) -> Self {
        self.settings.multiple_interfaces = mode;
        self
    }

    pub fn operation_name_template<S: Into<String>>(mut self, template: S) -> Self {
        self.settings.operation_name_template = Some(template.into());
        self
    }

    pub fn optional_parameters(mut self, enabled: bool) -> Self {
        self.settings.optional_parameters = enabled;
        self
    }

    pub fn include_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.include_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_path_matches<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.include_path_matches = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn generate_deprecated_operations(mut self, enabled: bool) -> Self {
        self.settings.generate_deprecated_operations = enabled;
        self
    }

    pub fn trim_unused_schema(mut self, enabled: bool) -> Self {
        self.settings.trim_unused_schema = enabled;
        self
    }

    pub fn keep_schema_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.keep_schema_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn response_type_override<O: Into<String>, T: Into<String>>(
        mut self,
        operation_id: O,
        type_name: T,
    ) -> Self {
        self.settings
            .response_type_overrides
            .insert(operation_id.into(), type_name.into());
        self
    }

    pub fn additional_namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.settings.additional_namespaces.push(namespace.into());
        self
    }

    pub fn exclude_namespace<S: Into<String>>(mut self, pattern: S) -> Self {
        self.settings.exclude_namespaces.push(pattern.into());
        self
    }

    pub fn generate_contracts(mut self, enabled: bool) -> Self {
        self.settings.generate_contracts = enabled;
        self
    }

    pub fn generate_clients(mut self, enabled: bool) -> Self {
        self.settings.generate_clients = enabled;
        self
    }

    pub fn generate_operation_headers(mut self, enabled: bool) -> Self {
        self.settings.generate_operation_headers = enabled;
        self
    }

    pub fn return_api_response(mut self, enabled: bool) -> Self {
        self.settings.return_api_response = enabled;
        self
    }

    pub fn use_cancellation_tokens(mut self, enabled: bool) -> Self {
        self.settings.use_cancellation_tokens = enabled;
        self
    }

    pub fn use_iso_date_format(mut self, enabled: bool) -> Self {
        self.settings.use_iso_date_format = enabled;
        self
    }

    pub fn use_dynamic_querystring_parameters(mut self, enabled: bool) -> Self {
        self.settings.use_dynamic_querystring_parameters = enabled;
        self
    }

    pub fn polymorphic_serialization(mut self, enabled: bool) -> Self {
        self.settings.polymorphic_serialization = enabled;
        self
    }

    pub fn generate_default_additional_properties(mut self, enabled: bool) -> Self {
        self.settings.generate_default_additional_properties = enabled;
        self
    }

    pub fn immutable_records(mut self, enabled: bool) -> Self {
        self.settings.immutable_records = enabled;
        self
    }

    pub fn type_accessibility(mut self, accessibility: TypeAccessibility) -> Self {
        self.settings.type_accessibility = accessibility;
        self
    }

    pub fn output_folder<P: Into<PathBuf>>(mut self, folder: P) -> Self {
        self.settings.output_folder = folder.into();
        self
    }

    pub fn contracts_output_folder<P: Into<PathBuf>>(mut self, folder: P) -> Self {
        self.settings.contracts_output_folder = Some(folder.into());
        self
    }

    pub fn output_filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.settings.output_filename = Some(filename.into());
        self
    }

    pub fn generate_multiple_files(mut self, enabled: bool) -> Self {
        self.settings.generate_multiple_files = enabled;
        self
    }

    pub fn dependency_injection(mut self, registration: RegistrationSettings) -> Self {
        self.settings.dependency_injection_settings = Some(registration);
        self
    }

    pub fn build(self) -> Result<GeneratorSettings, GenerationError> {
        validate(&self.settings)?;
        Ok(self.settings)
    }
}
