//! Namespace and import resolution

use regex::Regex;

const INTERFACE_IMPORTS: &[&str] = &["std::collections::HashMap"];
const CONTRACT_IMPORTS: &[&str] = &["serde::{Deserialize, Serialize}", "std::collections::HashMap"];

#[derive(Debug, Clone)]
pub struct NamespacePolicy {
    pub namespace: String,
    /// Defaults to `namespace` when unset
    pub contracts_namespace: Option<String>,
    pub additional_namespaces: Vec<String>,
    pub exclude_patterns: Vec<Regex>,
}

impl Default for NamespacePolicy {
    fn default() -> Self {
        Self {
            namespace: crate::config::DEFAULT_NAMESPACE.to_string(),
            contracts_namespace: None,
            additional_namespaces: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl NamespacePolicy {
    pub fn contracts_namespace(&self) -> &str {
        self.contracts_namespace.as_deref().unwrap_or(&self.namespace)
    }

    /// Imports of the interface artifact. `contracts_elsewhere` is set when
    /// contracts are emitted into a different file.
    pub fn interface_imports(&self, contracts_elsewhere: bool) -> Vec<String> {
        let mut base: Vec<String> = INTERFACE_IMPORTS.iter().map(|s| s.to_string()).collect();
        if contracts_elsewhere {
            base.push(self.contracts_namespace().to_string());
        }
        self.effective_imports(base)
    }

    /// Imports of the contracts artifact
    pub fn contract_imports(&self) -> Vec<String> {
        self.effective_imports(CONTRACT_IMPORTS.iter().map(|s| s.to_string()).collect())
    }

    /// Base imports minus excluded entries, then additional namespaces
    /// appended. An additional namespace is kept even when it matches an
    /// exclude pattern.
    pub fn effective_imports(&self, base: Vec<String>) -> Vec<String> {
        let mut imports: Vec<String> = base
            .into_iter()
            .filter(|import| !self.exclude_patterns.iter().any(|p| p.is_match(import)))
            .collect();

        for namespace in &self.additional_namespaces {
            if !imports.contains(namespace) {
                imports.push(namespace.clone());
            }
        }
        imports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(additional: &[&str], exclude: &[&str]) -> NamespacePolicy {
        NamespacePolicy {
            namespace: "Petstore".to_string(),
            contracts_namespace: None,
            additional_namespaces: additional.iter().map(|s| s.to_string()).collect(),
            exclude_patterns: exclude.iter().map(|p| Regex::new(p).unwrap()).collect(),
        }
    }

    #[test]
    fn test_contracts_namespace_defaults_to_namespace() {
        let mut policy = policy(&[], &[]);
        assert_eq!(policy.contracts_namespace(), "Petstore");
        assert_eq!(policy.interface_imports(false), vec!["std::collections::HashMap"]);
        assert_eq!(
            policy.interface_imports(true),
            vec!["std::collections::HashMap", "Petstore"]
        );

        policy.contracts_namespace = Some("PetstoreContracts".to_string());
        assert_eq!(policy.contracts_namespace(), "PetstoreContracts");
        assert_eq!(
            policy.interface_imports(true),
            vec!["std::collections::HashMap", "PetstoreContracts"]
        );
    }

    #[test]
    fn test_exclusions_remove_base_imports() {
        let policy = policy(&[], &["^std::"]);
        assert_eq!(
            policy.contract_imports(),
            vec!["serde::{Deserialize, Serialize}"]
        );
        assert!(policy.interface_imports(false).is_empty());
    }

    #[test]
    fn test_additions_beat_exclusions() {
        let policy = policy(&["chrono::NaiveDate", "std::collections::HashMap"], &["HashMap"]);
        assert_eq!(
            policy.interface_imports(false),
            vec!["chrono::NaiveDate", "std::collections::HashMap"]
        );
    }

    #[test]
    fn test_additions_are_not_duplicated() {
        let policy = policy(&["std::collections::HashMap"], &[]);
        assert_eq!(policy.interface_imports(false), vec!["std::collections::HashMap"]);
    }
}
