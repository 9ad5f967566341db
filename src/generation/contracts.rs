//! Contract synthesis
//!
//! Turns the retained schemas (and any synthesized query wrappers) into
//! contract definitions carrying a unique type name, the namespace they live
//! in and polymorphism metadata.

use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::generation::grouping::QueryWrapper;
use crate::generation::namespaces::NamespacePolicy;
use crate::generation::naming::NameAllocator;
use crate::generation::utils::to_type_name;
use crate::generation::{Discriminator, Field, Schema, SchemaKind, TypeRef};

/// Discriminator property used when polymorphic serialization is forced on a
/// schema that declares none
pub const DEFAULT_DISCRIMINATOR: &str = "$type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractOrigin {
    Schema,
    QueryWrapper,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedType {
    pub id: String,
    pub discriminator_value: String,
}

/// Closed set of concrete types a base type can deserialize into
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Polymorphism {
    pub discriminator: String,
    /// Discriminator value selecting the base type itself
    pub base_value: String,
    pub derived: Vec<DerivedType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractDefinition {
    /// Schema identifier, or the wrapper name for query wrappers
    pub id: String,
    /// Type name, unique across the contract set
    pub name: String,
    pub namespace: String,
    pub kind: SchemaKind,
    pub fields: Vec<Field>,
    pub base: Option<String>,
    pub enum_members: Vec<String>,
    pub polymorphism: Option<Polymorphism>,
    pub additional_properties: Option<TypeRef>,
    pub description: Option<String>,
    pub nullable: bool,
    pub deprecated: bool,
    pub origin: ContractOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractSet {
    pub namespace: String,
    pub imports: Vec<String>,
    pub contracts: Vec<ContractDefinition>,
}

impl ContractSet {
    /// Type name of the contract generated for `id`
    pub fn type_name(&self, id: &str) -> Option<&str> {
        self.contracts
            .iter()
            .find(|contract| contract.id == id)
            .map(|contract| contract.name.as_str())
    }

    /// Identifier to type name lookup for emission
    pub fn type_names(&self) -> HashMap<String, String> {
        self.contracts
            .iter()
            .map(|contract| (contract.id.clone(), contract.name.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

/// Build one contract per retained schema in document order, followed by the
/// query wrappers in creation order.
pub fn synthesize_contracts(
    schemas: &[&Schema],
    query_wrappers: &[QueryWrapper],
    namespaces: &NamespacePolicy,
    polymorphic_serialization: bool,
) -> ContractSet {
    let namespace = namespaces.contracts_namespace().to_string();
    let index: HashMap<&str, &Schema> = schemas.iter().map(|s| (s.id.as_str(), *s)).collect();
    let mut names = NameAllocator::new();
    let mut contracts = Vec::with_capacity(schemas.len() + query_wrappers.len());

    for schema in schemas {
        let name = names.allocate(&contract_base_name(&schema.id));
        contracts.push(ContractDefinition {
            id: schema.id.clone(),
            name,
            namespace: namespace.clone(),
            kind: schema.kind.clone(),
            fields: schema.fields.clone(),
            base: schema.base.clone().filter(|base| index.contains_key(base.as_str())),
            enum_members: schema.enum_members.clone(),
            polymorphism: polymorphism(schema, &index, polymorphic_serialization),
            additional_properties: schema.additional_properties.clone(),
            description: schema.description.clone(),
            nullable: schema.nullable,
            deprecated: schema.deprecated,
            origin: ContractOrigin::Schema,
        });
    }

    for wrapper in query_wrappers {
        contracts.push(ContractDefinition {
            id: wrapper.name.clone(),
            name: names.allocate(&wrapper.name),
            namespace: namespace.clone(),
            kind: SchemaKind::Object,
            fields: wrapper.fields.clone(),
            base: None,
            enum_members: Vec::new(),
            polymorphism: None,
            additional_properties: None,
            description: Some(format!("Query parameters of `{}`", wrapper.operation_id)),
            nullable: false,
            deprecated: false,
            origin: ContractOrigin::QueryWrapper,
        });
    }

    tracing::debug!(
        "Synthesized {} contracts in namespace {}",
        contracts.len(),
        namespace
    );

    ContractSet {
        namespace,
        imports: namespaces.contract_imports(),
        contracts,
    }
}

fn contract_base_name(id: &str) -> String {
    let name = to_type_name(id);
    if name.is_empty() {
        "Contract".to_string()
    } else {
        name
    }
}

/// Transitive derived set of `schema`, restricted to retained schemas, in
/// breadth-first order
fn polymorphism(
    schema: &Schema,
    index: &HashMap<&str, &Schema>,
    polymorphic_serialization: bool,
) -> Option<Polymorphism> {
    let declared = schema.discriminator.as_ref();
    if declared.is_none() && !(polymorphic_serialization && !schema.derived.is_empty()) {
        return None;
    }

    let mut derived = Vec::new();
    let mut seen: HashSet<&str> = HashSet::from([schema.id.as_str()]);
    let mut queue: VecDeque<&str> = schema.derived.iter().map(String::as_str).collect();

    while let Some(id) = queue.pop_front() {
        if !seen.insert(id) {
            continue;
        }
        let Some(child) = index.get(id) else {
            continue;
        };

        derived.push(DerivedType {
            id: id.to_string(),
            discriminator_value: discriminator_value(declared, id),
        });
        queue.extend(child.derived.iter().map(String::as_str));
    }

    Some(Polymorphism {
        discriminator: declared
            .map(|d| d.property_name.clone())
            .unwrap_or_else(|| DEFAULT_DISCRIMINATOR.to_string()),
        base_value: discriminator_value(declared, &schema.id),
        derived,
    })
}

/// Mapped value of `id`, else the identifier itself
fn discriminator_value(declared: Option<&Discriminator>, id: &str) -> String {
    declared
        .and_then(|d| d.mapping.iter().find(|(_, target)| target == id))
        .map(|(value, _)| value.clone())
        .unwrap_or_else(|| id.to_string())
}
