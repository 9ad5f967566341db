//! Generation orchestration - drives the synthesis pipeline for one run

use serde::Serialize;

use crate::config::{ConfigWarning, GeneratorSettings, ValidatedSettings, validate};
use crate::generation::contracts::{ContractSet, synthesize_contracts};
use crate::generation::filter::filter_operations;
use crate::generation::grouping::resolve_groups;
use crate::generation::partition::{ArtifactSet, partition};
use crate::generation::trim::trim_schemas;
use crate::generation::utils::to_type_name;
use crate::generation::{Document, GenerationError};

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutput {
    pub artifacts: ArtifactSet,
    /// Contract set the artifacts were partitioned from, kept whole so
    /// emitters can resolve type names even when contracts are not emitted
    pub contracts: ContractSet,
    #[serde(skip)]
    pub warnings: Vec<ConfigWarning>,
}

/// Synthesis engine bound to one validated configuration.
///
/// The engine holds no per-run state; it can be shared across threads and
/// reused for any number of documents.
#[derive(Debug, Clone)]
pub struct Engine {
    config: ValidatedSettings,
}

impl Engine {
    /// Validate `settings` once and build an engine from them
    pub fn new(settings: GeneratorSettings) -> Result<Self, GenerationError> {
        Ok(Self::from_validated(validate(&settings)?))
    }

    pub fn from_validated(config: ValidatedSettings) -> Self {
        Self { config }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.config.settings
    }

    /// Warnings found while validating the settings
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.config.warnings
    }

    /// Run the pipeline against `document`. All or nothing: any failure
    /// aborts the run without partial output.
    pub fn generate(&self, document: &Document) -> Result<GenerationOutput, GenerationError> {
        let config = &self.config;
        tracing::debug!(
            "Engine starting generation with {} operations and {} schemas",
            document.operations.len(),
            document.schemas.len()
        );

        // 1. Filter operations
        let operations = filter_operations(&document.operations, &config.filter)?;

        // 2. Trim schemas to the closure of the retained operations
        let schemas = trim_schemas(&document.schemas, &operations, &config.trim)?;

        // 3. Group and name operations
        let reserved: Vec<String> = schemas.iter().map(|s| to_type_name(&s.id)).collect();
        let resolution = resolve_groups(
            &operations,
            document.title(),
            &config.naming,
            &config.signature,
            &reserved,
        )?;

        // 4. Synthesize contracts
        let contracts = synthesize_contracts(
            &schemas,
            &resolution.query_wrappers,
            &config.namespaces,
            config.settings.polymorphic_serialization,
        );

        // 5. Partition into artifacts
        let artifacts = partition(
            resolution.groups,
            contracts.clone(),
            &config.namespaces,
            &config.partition,
        );

        // 6. Collect warnings
        let mut warnings = config.warnings.clone();
        warnings.extend(
            config
                .signature
                .response_overrides
                .keys()
                .filter(|id| !operations.iter().any(|op| &op.id == *id))
                .map(|id| ConfigWarning::UnknownResponseOverride {
                    operation_id: id.clone(),
                }),
        );

        Ok(GenerationOutput {
            artifacts,
            contracts,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MultipleInterfaces;
    use crate::generation::partition::ArtifactKind;
    use crate::generation::{
        HttpMethod, Operation, Response, Schema, SchemaKind, TypeRef,
    };

    fn document() -> Document {
        let operation = |id: &str, tags: &[&str], returns: &str| Operation {
            id: id.to_string(),
            method: HttpMethod::Get,
            path: format!("/{id}"),
            summary: None,
            description: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            parameters: vec![],
            request_body: None,
            responses: vec![Response {
                status_code: "200".to_string(),
                description: "ok".to_string(),
                type_ref: Some(TypeRef::named(returns)),
            }],
            deprecated: false,
        };

        Document {
            openapi_version: "3.0.3".to_string(),
            operations: vec![
                operation("getUsers", &["Admin"], "User"),
                operation("createUser", &["Admin", "Public"], "User"),
            ],
            schemas: vec![
                Schema::new("User", SchemaKind::Object),
                Schema::new("Unused", SchemaKind::Object),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_engine_runs_the_pipeline() {
        let engine = Engine::new(GeneratorSettings {
            multiple_interfaces: MultipleInterfaces::ByTag,
            trim_unused_schema: true,
            ..Default::default()
        })
        .unwrap();

        let output = engine.generate(&document()).unwrap();
        assert!(output.warnings.is_empty());

        let artifact = &output.artifacts.artifacts[0];
        assert_eq!(artifact.kind, ArtifactKind::Interface);
        let groups: Vec<&str> = artifact
            .body
            .interfaces
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(groups, vec!["AdminApi", "PublicApi"]);
        assert_eq!(artifact.body.contracts.len(), 1);
        assert_eq!(output.contracts.type_name("User"), Some("User"));
    }

    #[test]
    fn test_engine_is_deterministic() {
        let engine = Engine::new(GeneratorSettings::default()).unwrap();
        let document = document();
        assert_eq!(
            engine.generate(&document).unwrap(),
            engine.generate(&document).unwrap()
        );
    }

    #[test]
    fn test_unknown_override_warns() {
        let engine = Engine::new(GeneratorSettings {
            include_tags: vec!["Public".to_string()],
            response_type_overrides: [
                ("createUser".to_string(), "String".to_string()),
                ("getUsers".to_string(), "String".to_string()),
            ]
            .into(),
            ..Default::default()
        })
        .unwrap();

        let output = engine.generate(&document()).unwrap();
        assert_eq!(
            output.warnings,
            vec![ConfigWarning::UnknownResponseOverride {
                operation_id: "getUsers".to_string()
            }]
        );
    }

    #[test]
    fn test_invalid_settings_fail_before_any_run() {
        let result = Engine::new(GeneratorSettings {
            keep_schema_patterns: vec!["(".to_string()],
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(GenerationError::InconsistentConfiguration(_))
        ));
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
        assert_send_sync::<Document>();
    }
}
