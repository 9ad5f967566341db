//! Settings validation
//!
//! Runs once per configuration value and compiles it into the policies each
//! pipeline stage consumes. Contradictions fail with
//! `InconsistentConfiguration`; settings that are legal but have no effect
//! become warnings.

use regex::Regex;
use std::fmt;

use super::{GeneratorSettings, MultipleInterfaces};
use crate::generation::filter::FilterCriteria;
use crate::generation::grouping::SignaturePolicy;
use crate::generation::namespaces::NamespacePolicy;
use crate::generation::naming::NamingPolicy;
use crate::generation::partition::PartitionPolicy;
use crate::generation::trim::TrimPolicy;
use crate::generation::GenerationError;

const TEMPLATE_PLACEHOLDERS: &[&str] = &["{operationName}", "{verb}", "{path}", "{tag}"];

/// Legal settings that will not behave the way they read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Keep patterns only apply while trimming is enabled
    KeepPatternsWithoutTrimming { patterns: Vec<String> },
    /// A response override names an operation that is not generated
    UnknownResponseOverride { operation_id: String },
    /// A contracts output folder is set but contracts are not generated
    ContractsFolderUnused,
    /// The template has no placeholder, so every method collides and is suffixed
    ConstantOperationTemplate { template: String },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::KeepPatternsWithoutTrimming { patterns } => write!(
                f,
                "Keep schema patterns {patterns:?} have no effect while schema trimming is disabled"
            ),
            ConfigWarning::UnknownResponseOverride { operation_id } => write!(
                f,
                "Response type override for '{operation_id}' does not match any generated operation"
            ),
            ConfigWarning::ContractsFolderUnused => write!(
                f,
                "Contracts output folder is set but contract generation is disabled"
            ),
            ConfigWarning::ConstantOperationTemplate { template } => write!(
                f,
                "Operation name template '{template}' has no placeholder; method names will be suffixed"
            ),
        }
    }
}

/// A checked configuration compiled into per-stage policies
#[derive(Debug, Clone)]
pub struct ValidatedSettings {
    pub settings: GeneratorSettings,
    pub filter: FilterCriteria,
    pub trim: TrimPolicy,
    pub naming: NamingPolicy,
    pub signature: SignaturePolicy,
    pub namespaces: NamespacePolicy,
    pub partition: PartitionPolicy,
    pub warnings: Vec<ConfigWarning>,
}

pub fn validate(settings: &GeneratorSettings) -> Result<ValidatedSettings, GenerationError> {
    let mut warnings = Vec::new();

    if settings.namespace.trim().is_empty() {
        return Err(GenerationError::inconsistent("namespace must not be empty"));
    }
    if settings
        .contracts_namespace
        .as_deref()
        .is_some_and(|ns| ns.trim().is_empty())
    {
        return Err(GenerationError::inconsistent(
            "contractsNamespace must not be empty when set",
        ));
    }
    if !settings.generate_contracts && !settings.generate_clients {
        return Err(GenerationError::inconsistent(
            "generateContracts and generateClients are both disabled; nothing would be generated",
        ));
    }
    if let Some(registration) = &settings.dependency_injection_settings {
        if !settings.generate_clients {
            return Err(GenerationError::inconsistent(
                "dependencyInjectionSettings require generateClients",
            ));
        }
        if registration.extension_method_name.trim().is_empty() {
            return Err(GenerationError::inconsistent(
                "dependencyInjectionSettings.extensionMethodName must not be empty",
            ));
        }
        let backoff = registration
            .retry
            .as_ref()
            .map(|retry| retry.first_backoff_retry_in_seconds);
        if backoff.is_some_and(|seconds| seconds.is_nan() || seconds < 0.0) {
            return Err(GenerationError::inconsistent(
                "firstBackoffRetryInSeconds must be a non-negative number",
            ));
        }
    }
    if let Some(filename) = settings
        .output_filename
        .as_deref()
        .filter(|name| name.trim().is_empty() || name.contains(['/', '\\']))
    {
        return Err(GenerationError::inconsistent(format!(
            "outputFilename '{filename}' must be a plain file name"
        )));
    }
    if let Some((operation_id, _)) = settings
        .response_type_overrides
        .iter()
        .find(|(_, type_name)| type_name.trim().is_empty())
    {
        return Err(GenerationError::inconsistent(format!(
            "response type override for '{operation_id}' is empty"
        )));
    }

    let include_paths = compile_patterns("includePathMatches", &settings.include_path_matches)?;
    let keep_patterns = compile_patterns("keepSchemaPatterns", &settings.keep_schema_patterns)?;
    let exclude_patterns = compile_patterns("excludeNamespaces", &settings.exclude_namespaces)?;

    if !settings.trim_unused_schema && !settings.keep_schema_patterns.is_empty() {
        warnings.push(ConfigWarning::KeepPatternsWithoutTrimming {
            patterns: settings.keep_schema_patterns.clone(),
        });
    }
    if !settings.generate_contracts && settings.contracts_output_folder.is_some() {
        warnings.push(ConfigWarning::ContractsFolderUnused);
    }
    if let Some(template) = settings.operation_name_template.as_ref().filter(|template| {
        settings.multiple_interfaces != MultipleInterfaces::ByEndpoint
            && !TEMPLATE_PLACEHOLDERS.iter().any(|p| template.contains(p))
    }) {
        warnings.push(ConfigWarning::ConstantOperationTemplate {
            template: template.clone(),
        });
    }

    Ok(ValidatedSettings {
        filter: FilterCriteria {
            include_tags: settings.include_tags.clone(),
            include_paths,
            exclude_deprecated: !settings.generate_deprecated_operations,
        },
        trim: TrimPolicy {
            enabled: settings.trim_unused_schema,
            keep_patterns,
        },
        naming: NamingPolicy {
            split: settings.multiple_interfaces,
            interface_name: settings.naming.interface_name.clone(),
            use_document_title: settings.naming.use_openapi_title,
            operation_name_template: settings.operation_name_template.clone(),
            reorder_optional_parameters: settings.optional_parameters,
        },
        signature: SignaturePolicy {
            include_headers: settings.generate_operation_headers,
            use_iso_date_format: settings.use_iso_date_format,
            dynamic_querystring: settings.use_dynamic_querystring_parameters,
            response_overrides: settings.response_type_overrides.clone(),
        },
        namespaces: NamespacePolicy {
            namespace: settings.namespace.clone(),
            contracts_namespace: settings.contracts_namespace.clone(),
            additional_namespaces: settings.additional_namespaces.clone(),
            exclude_patterns,
        },
        partition: PartitionPolicy {
            multi_file: settings.generate_multiple_files,
            output_folder: settings.output_folder.clone(),
            contracts_output_folder: settings.contracts_output_folder.clone(),
            output_filename: settings.output_filename.clone(),
            include_contracts: settings.generate_contracts,
            include_clients: settings.generate_clients,
            registration: settings.dependency_injection_settings.clone(),
        },
        settings: settings.clone(),
        warnings,
    })
}

fn compile_patterns(setting: &str, patterns: &[String]) -> Result<Vec<Regex>, GenerationError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| {
                GenerationError::inconsistent(format!(
                    "{setting} contains an invalid pattern '{pattern}': {e}"
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RegistrationSettings, RetrySettings};
    use std::path::PathBuf;

    fn inconsistent(settings: GeneratorSettings) -> String {
        match validate(&settings) {
            Err(GenerationError::InconsistentConfiguration(message)) => message,
            other => panic!("Expected InconsistentConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid_without_warnings() {
        let validated = validate(&GeneratorSettings::default()).unwrap();
        assert!(validated.warnings.is_empty());
        assert!(validated.filter.is_empty());
        assert!(!validated.trim.enabled);
        assert_eq!(validated.namespaces.namespace, "GeneratedCode");
        assert!(validated.signature.include_headers);
    }

    #[test]
    fn test_invalid_regex_is_inconsistent() {
        let message = inconsistent(GeneratorSettings {
            include_path_matches: vec!["^/pets(".to_string()],
            ..Default::default()
        });
        assert!(message.contains("includePathMatches"));

        let message = inconsistent(GeneratorSettings {
            exclude_namespaces: vec!["[".to_string()],
            ..Default::default()
        });
        assert!(message.contains("excludeNamespaces"));
    }

    #[test]
    fn test_empty_namespace_is_inconsistent() {
        let message = inconsistent(GeneratorSettings {
            namespace: "  ".to_string(),
            ..Default::default()
        });
        assert!(message.contains("namespace"));
    }

    #[test]
    fn test_nothing_to_generate_is_inconsistent() {
        inconsistent(GeneratorSettings {
            generate_contracts: false,
            generate_clients: false,
            ..Default::default()
        });
    }

    #[test]
    fn test_registration_requires_clients() {
        let message = inconsistent(GeneratorSettings {
            generate_clients: false,
            dependency_injection_settings: Some(RegistrationSettings::default()),
            ..Default::default()
        });
        assert!(message.contains("generateClients"));
    }

    #[test]
    fn test_negative_backoff_is_inconsistent() {
        inconsistent(GeneratorSettings {
            dependency_injection_settings: Some(RegistrationSettings {
                retry: Some(RetrySettings {
                    max_retry_count: 3,
                    first_backoff_retry_in_seconds: -1.0,
                }),
                ..Default::default()
            }),
            ..Default::default()
        });
    }

    #[test]
    fn test_output_filename_must_be_plain() {
        inconsistent(GeneratorSettings {
            output_filename: Some("nested/client.rs".to_string()),
            ..Default::default()
        });
    }

    #[test]
    fn test_keep_patterns_without_trimming_warn() {
        let validated = validate(&GeneratorSettings {
            keep_schema_patterns: vec!["^Error.*".to_string()],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            validated.warnings,
            vec![ConfigWarning::KeepPatternsWithoutTrimming {
                patterns: vec!["^Error.*".to_string()]
            }]
        );
        assert_eq!(validated.trim.keep_patterns.len(), 1);
    }

    #[test]
    fn test_contracts_folder_without_contracts_warns() {
        let validated = validate(&GeneratorSettings {
            generate_contracts: false,
            contracts_output_folder: Some(PathBuf::from("./Contracts")),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(validated.warnings, vec![ConfigWarning::ContractsFolderUnused]);
    }

    #[test]
    fn test_constant_template_warns_outside_by_endpoint() {
        let settings = GeneratorSettings {
            operation_name_template: Some("Call".to_string()),
            ..Default::default()
        };
        let validated = validate(&settings).unwrap();
        assert_eq!(
            validated.warnings,
            vec![ConfigWarning::ConstantOperationTemplate {
                template: "Call".to_string()
            }]
        );

        let by_endpoint = GeneratorSettings {
            multiple_interfaces: MultipleInterfaces::ByEndpoint,
            ..settings
        };
        assert!(validate(&by_endpoint).unwrap().warnings.is_empty());
    }

    #[test]
    fn test_policies_follow_settings() {
        let validated = validate(&GeneratorSettings {
            generate_deprecated_operations: false,
            optional_parameters: true,
            generate_operation_headers: false,
            contracts_output_folder: Some(PathBuf::from("./Contracts")),
            ..Default::default()
        })
        .unwrap();

        assert!(validated.filter.exclude_deprecated);
        assert!(validated.naming.reorder_optional_parameters);
        assert!(!validated.signature.include_headers);
        assert!(validated.partition.is_multi_file());
    }

    #[test]
    fn test_warning_display() {
        let warning = ConfigWarning::UnknownResponseOverride {
            operation_id: "getPet".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "Response type override for 'getPet' does not match any generated operation"
        );
    }
}
