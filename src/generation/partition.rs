//! Artifact partitioning
//!
//! Assigns interfaces, contracts and registration glue to artifacts and
//! output files. File assignment depends only on the settings.

use serde::Serialize;
use std::path::PathBuf;

use crate::config::{RegistrationSettings, RetrySettings};
use crate::generation::contracts::{ContractDefinition, ContractSet};
use crate::generation::grouping::InterfaceGroup;
use crate::generation::namespaces::NamespacePolicy;

pub const DEFAULT_OUTPUT_FILENAME: &str = "client.rs";
pub const INTERFACES_FILENAME: &str = "interfaces.rs";
pub const CONTRACTS_FILENAME: &str = "contracts.rs";
pub const REGISTRATION_FILENAME: &str = "registration.rs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactKind {
    Interface,
    Contract,
    Registration,
}

/// Declarations wiring the generated interfaces into a client registry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub function_name: String,
    pub base_url: Option<String>,
    pub http_message_handlers: Vec<String>,
    pub retry: Option<RetrySettings>,
    /// Interface names in group order
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArtifactBody {
    pub interfaces: Vec<InterfaceGroup>,
    pub contracts: Vec<ContractDefinition>,
    pub registration: Option<Registration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub name: String,
    pub namespace: String,
    pub imports: Vec<String>,
    pub file: PathBuf,
    pub body: ArtifactBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArtifactSet {
    pub artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn of_kind(&self, kind: ArtifactKind) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().filter(move |a| a.kind == kind)
    }

    /// Distinct target files in first-use order
    pub fn files(&self) -> Vec<&PathBuf> {
        let mut files: Vec<&PathBuf> = Vec::new();
        for artifact in &self.artifacts {
            if !files.contains(&&artifact.file) {
                files.push(&artifact.file);
            }
        }
        files
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionPolicy {
    pub multi_file: bool,
    pub output_folder: PathBuf,
    /// Forces multi-file output when set
    pub contracts_output_folder: Option<PathBuf>,
    pub output_filename: Option<String>,
    pub include_contracts: bool,
    pub include_clients: bool,
    pub registration: Option<RegistrationSettings>,
}

impl Default for PartitionPolicy {
    fn default() -> Self {
        Self {
            multi_file: false,
            output_folder: PathBuf::from(crate::config::DEFAULT_OUTPUT_FOLDER),
            contracts_output_folder: None,
            output_filename: None,
            include_contracts: true,
            include_clients: true,
            registration: None,
        }
    }
}

impl PartitionPolicy {
    pub fn is_multi_file(&self) -> bool {
        self.multi_file || self.contracts_output_folder.is_some()
    }

    fn single_file(&self) -> PathBuf {
        self.output_folder.join(
            self.output_filename
                .as_deref()
                .unwrap_or(DEFAULT_OUTPUT_FILENAME),
        )
    }
}

/// Lay out the artifact set
pub fn partition(
    groups: Vec<InterfaceGroup>,
    contracts: ContractSet,
    namespaces: &NamespacePolicy,
    policy: &PartitionPolicy,
) -> ArtifactSet {
    let registration = policy
        .registration
        .as_ref()
        .filter(|_| policy.include_clients)
        .map(|settings| Registration {
            function_name: settings.extension_method_name.clone(),
            base_url: settings.base_url.clone(),
            http_message_handlers: settings.http_message_handlers.clone(),
            retry: settings.retry.clone(),
            interfaces: groups.iter().map(|g| g.name.clone()).collect(),
        });

    let interfaces = if policy.include_clients { groups } else { Vec::new() };
    let contract_imports = contracts.imports;
    let contracts = if policy.include_contracts {
        contracts.contracts
    } else {
        Vec::new()
    };

    let artifacts = if policy.is_multi_file() {
        multi_file(interfaces, contracts, contract_imports, registration, namespaces, policy)
    } else {
        single_file(interfaces, contracts, contract_imports, registration, namespaces, policy)
    };

    tracing::debug!(
        "Partitioned output into {} artifacts (multi-file: {})",
        artifacts.len(),
        policy.is_multi_file()
    );
    ArtifactSet { artifacts }
}

fn multi_file(
    interfaces: Vec<InterfaceGroup>,
    contracts: Vec<ContractDefinition>,
    contract_imports: Vec<String>,
    registration: Option<Registration>,
    namespaces: &NamespacePolicy,
    policy: &PartitionPolicy,
) -> Vec<Artifact> {
    let mut artifacts = Vec::new();

    if policy.include_clients {
        artifacts.push(Artifact {
            kind: ArtifactKind::Interface,
            name: file_stem(INTERFACES_FILENAME),
            namespace: namespaces.namespace.clone(),
            imports: namespaces.interface_imports(policy.include_contracts),
            file: policy.output_folder.join(INTERFACES_FILENAME),
            body: ArtifactBody {
                interfaces,
                ..Default::default()
            },
        });
    }

    if policy.include_contracts {
        let folder = policy
            .contracts_output_folder
            .as_ref()
            .unwrap_or(&policy.output_folder);
        artifacts.push(Artifact {
            kind: ArtifactKind::Contract,
            name: file_stem(CONTRACTS_FILENAME),
            namespace: namespaces.contracts_namespace().to_string(),
            imports: contract_imports,
            file: folder.join(CONTRACTS_FILENAME),
            body: ArtifactBody {
                contracts,
                ..Default::default()
            },
        });
    }

    if let Some(registration) = registration {
        artifacts.push(Artifact {
            kind: ArtifactKind::Registration,
            name: file_stem(REGISTRATION_FILENAME),
            namespace: namespaces.namespace.clone(),
            imports: namespaces.effective_imports(Vec::new()),
            file: policy.output_folder.join(REGISTRATION_FILENAME),
            body: ArtifactBody {
                registration: Some(registration),
                ..Default::default()
            },
        });
    }

    artifacts
}

fn single_file(
    interfaces: Vec<InterfaceGroup>,
    contracts: Vec<ContractDefinition>,
    contract_imports: Vec<String>,
    registration: Option<Registration>,
    namespaces: &NamespacePolicy,
    policy: &PartitionPolicy,
) -> Vec<Artifact> {
    let file = policy.single_file();
    let name = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_stem(DEFAULT_OUTPUT_FILENAME));

    let mut imports: Vec<String> = Vec::new();
    let interface_imports = if policy.include_clients {
        namespaces.interface_imports(false)
    } else {
        Vec::new()
    };
    let contract_imports = if policy.include_contracts {
        contract_imports
    } else {
        Vec::new()
    };
    for import in interface_imports.into_iter().chain(contract_imports) {
        if !imports.contains(&import) {
            imports.push(import);
        }
    }

    let kind = if policy.include_clients {
        ArtifactKind::Interface
    } else {
        ArtifactKind::Contract
    };

    let mut artifacts = vec![Artifact {
        kind,
        name: name.clone(),
        namespace: namespaces.namespace.clone(),
        imports,
        file: file.clone(),
        body: ArtifactBody {
            interfaces,
            contracts,
            registration: None,
        },
    }];

    if let Some(registration) = registration {
        artifacts.push(Artifact {
            kind: ArtifactKind::Registration,
            name,
            namespace: namespaces.namespace.clone(),
            imports: Vec::new(),
            file,
            body: ArtifactBody {
                registration: Some(registration),
                ..Default::default()
            },
        });
    }

    artifacts
}

fn file_stem(filename: &str) -> String {
    filename.trim_end_matches(".rs").to_string()
}
