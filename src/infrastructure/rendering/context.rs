//! Render contexts for the Rust emission templates
//!
//! Everything that needs naming or type decisions is computed here so the
//! templates only lay out prepared strings.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::cycles::RecursionGroups;
use crate::config::{GeneratorSettings, TypeAccessibility};
use crate::generation::naming::NameAllocator;
use crate::generation::sanitizers::doc_lines;
use crate::generation::utils::{sanitize_rust_field_name, to_snake_case, to_type_name};
use crate::generation::{
    Artifact, ContractDefinition, ContractOrigin, ContractSet, InterfaceGroup, NamedOperation,
    ParameterLocation, PrimitiveType, Registration, ResponseType, SchemaKind, TypeRef,
};

const JSON_MEDIA_TYPE: &str = "application/json";
const CANCELLATION_TYPE: &str = "tokio_util::sync::CancellationToken";
const CATCH_ALL_TYPE: &str = "std::collections::HashMap<String, serde_json::Value>";
const ROUTE_TYPE: &str = "Route";

/// Maps document type references onto Rust types.
///
/// A reference to a polymorphic contract maps onto its `Kind` enum so the
/// concrete type survives a round trip. Emitted helper type names are
/// allocated once, against every contract and interface name of the run.
#[derive(Debug, Clone)]
pub struct RustTypeMapper {
    names: HashMap<String, String>,
    kinds: HashMap<String, String>,
    route_type: String,
}

impl Default for RustTypeMapper {
    fn default() -> Self {
        Self {
            names: HashMap::new(),
            kinds: HashMap::new(),
            route_type: ROUTE_TYPE.to_string(),
        }
    }
}

impl RustTypeMapper {
    pub fn new<'n>(
        contracts: &ContractSet,
        interfaces: impl IntoIterator<Item = &'n str>,
    ) -> Self {
        let mut allocator = NameAllocator::with_reserved(
            contracts
                .contracts
                .iter()
                .map(|c| c.name.clone())
                .chain(interfaces.into_iter().map(String::from)),
        );

        let kinds = contracts
            .contracts
            .iter()
            .filter(|contract| contract.polymorphism.is_some())
            .map(|contract| {
                let kind = allocator.allocate(&format!("{}Kind", contract.name));
                (contract.id.clone(), kind)
            })
            .collect();

        Self {
            names: contracts.type_names(),
            kinds,
            route_type: allocator.allocate(ROUTE_TYPE),
        }
    }

    /// Name of the tagged enum over a polymorphic contract's concrete types
    pub fn kind_name(&self, id: &str) -> Option<&str> {
        self.kinds.get(id).map(String::as_str)
    }

    pub fn route_type(&self) -> &str {
        &self.route_type
    }

    pub fn type_name(&self, id: &str) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| to_type_name(id))
    }

    pub fn rust_type(&self, type_ref: &TypeRef) -> String {
        match type_ref {
            TypeRef::Named(id) => self
                .kind_name(id)
                .map(String::from)
                .unwrap_or_else(|| self.type_name(id)),
            TypeRef::Primitive(primitive) => primitive_type(*primitive).to_string(),
            TypeRef::Array(item) => format!("Vec<{}>", self.rust_type(item)),
            TypeRef::Map(value) => format!("HashMap<String, {}>", self.rust_type(value)),
            TypeRef::Any => "serde_json::Value".to_string(),
        }
    }

    pub fn response_type(&self, response: &ResponseType) -> String {
        match response {
            ResponseType::Inferred(type_ref) => self.rust_type(type_ref),
            ResponseType::Override(type_name) => type_name.clone(),
            ResponseType::Empty => "()".to_string(),
        }
    }
}

fn primitive_type(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::String => "String",
        PrimitiveType::Int32 => "i32",
        PrimitiveType::Int64 => "i64",
        PrimitiveType::Float => "f32",
        PrimitiveType::Double => "f64",
        PrimitiveType::Boolean => "bool",
        PrimitiveType::Date => "chrono::NaiveDate",
        PrimitiveType::DateTime => "chrono::DateTime<chrono::Utc>",
        PrimitiveType::Uuid => "uuid::Uuid",
        PrimitiveType::Binary => "Vec<u8>",
    }
}

fn visibility(accessibility: TypeAccessibility) -> &'static str {
    match accessibility {
        TypeAccessibility::Public => "pub",
        TypeAccessibility::Internal => "pub(crate)",
    }
}

fn literal(value: &str) -> String {
    format!("{value:?}")
}

/// Discriminators of every polymorphic contract on each contract's base chain,
/// the contract itself included
fn inherited_tags(contracts: &ContractSet) -> HashMap<String, Vec<String>> {
    let index: HashMap<&str, &ContractDefinition> = contracts
        .contracts
        .iter()
        .map(|contract| (contract.id.as_str(), contract))
        .collect();

    let mut tags = HashMap::new();
    for contract in &contracts.contracts {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(contract);

        while let Some(ancestor) = current {
            if !seen.insert(ancestor.id.as_str()) {
                break;
            }
            if let Some(polymorphism) = &ancestor.polymorphism {
                found.push(polymorphism.discriminator.clone());
            }
            current = ancestor
                .base
                .as_deref()
                .and_then(|base| index.get(base).copied());
        }

        if !found.is_empty() {
            tags.insert(contract.id.clone(), found);
        }
    }
    tags
}

#[derive(Debug, Clone, Serialize)]
pub struct HeaderContext {
    pub version: String,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArgumentContext {
    pub name: String,
    pub rust_type: String,
}

/// HTTP binding of a method, emitted whether or not docs are
#[derive(Debug, Clone, Serialize)]
pub struct RouteContext {
    pub operation: String,
    pub verb: String,
    pub path: String,
    /// `Some("...")` or `None`
    pub accept: String,
    pub iso_date_arguments: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodContext {
    pub name: String,
    pub docs: Vec<String>,
    pub deprecated: bool,
    pub arguments: Vec<ArgumentContext>,
    pub return_type: String,
    pub route: RouteContext,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceContext {
    pub name: String,
    pub docs: Vec<String>,
    pub methods: Vec<MethodContext>,
    /// Name of the route table constant
    pub routes: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldContext {
    pub name: String,
    pub rust_type: String,
    /// Quoted wire name when it differs from the field name
    pub rename: Option<String>,
    pub optional: bool,
    pub flatten: bool,
    pub docs: Vec<String>,
    /// Accessor name when fields are private
    pub getter: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantContext {
    pub name: String,
    pub rename: Option<String>,
    pub payload: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolymorphismContext {
    pub name: String,
    pub tag: String,
    pub tag_literal: String,
    pub variants: Vec<VariantContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContractContext {
    /// `struct`, `enum`, `union` or `alias`
    pub kind: &'static str,
    pub name: String,
    pub docs: Vec<String>,
    pub deprecated: bool,
    pub fields: Vec<FieldContext>,
    pub variants: Vec<VariantContext>,
    pub alias: Option<String>,
    pub polymorphism: Option<PolymorphismContext>,
    /// Private fields behind a constructor and accessors
    pub immutable: bool,
}

/// Context of `module.rs`: interfaces and/or contracts
#[derive(Debug, Clone, Serialize)]
pub struct ModuleContext {
    pub header: Option<HeaderContext>,
    pub namespace: String,
    pub vis: &'static str,
    pub uses: Vec<String>,
    pub api_response: bool,
    /// Route type name, when the module holds interfaces
    pub route_type: Option<String>,
    pub interfaces: Vec<InterfaceContext>,
    pub contracts: Vec<ContractContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationEntryContext {
    pub interface: String,
    pub base_url: String,
    pub handlers: Vec<String>,
    pub retry: String,
}

/// Context of `registration.rs`
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationContext {
    pub header: Option<HeaderContext>,
    /// False when appended to a module that already has a header
    pub standalone: bool,
    pub vis: &'static str,
    pub function_name: String,
    pub entries: Vec<RegistrationEntryContext>,
}

/// Builds template contexts for the artifacts of one run
pub struct RustContextBuilder<'a> {
    settings: &'a GeneratorSettings,
    types: RustTypeMapper,
    recursion: RecursionGroups,
    /// Contract id to the discriminators of its own and its ancestors' `Kind`
    /// enums; those properties belong to the enum tag, not the struct
    tags: HashMap<String, Vec<String>>,
    document_title: Option<String>,
    /// Contract namespace to module name, for imports between artifacts
    modules: HashMap<String, String>,
}

impl<'a> RustContextBuilder<'a> {
    pub fn new(
        settings: &'a GeneratorSettings,
        contracts: &ContractSet,
        artifacts: &[Artifact],
        document_title: Option<&str>,
    ) -> Self {
        let modules = artifacts
            .iter()
            .filter(|a| !a.body.contracts.is_empty() && a.body.interfaces.is_empty())
            .map(|a| (a.namespace.clone(), a.name.clone()))
            .collect();

        let interfaces = artifacts
            .iter()
            .flat_map(|a| a.body.interfaces.iter())
            .map(|group| group.name.as_str());

        Self {
            settings,
            types: RustTypeMapper::new(contracts, interfaces),
            recursion: RecursionGroups::new(contracts),
            tags: inherited_tags(contracts),
            document_title: document_title.map(String::from),
            modules,
        }
    }

    fn vis(&self) -> &'static str {
        visibility(self.settings.type_accessibility)
    }

    fn header(&self) -> Option<HeaderContext> {
        self.settings
            .add_auto_generated_header
            .then(|| HeaderContext {
                version: env!("CARGO_PKG_VERSION").to_string(),
                source: self.document_title.clone(),
            })
    }

    fn use_line(&self, import: &str) -> String {
        if import.contains("::") {
            format!("use {import};")
        } else {
            let module = self
                .modules
                .get(import)
                .cloned()
                .unwrap_or_else(|| to_snake_case(import));
            format!("use super::{module}::*;")
        }
    }

    pub fn module(&self, artifact: &Artifact) -> ModuleContext {
        let has_interfaces = !artifact.body.interfaces.is_empty();
        let mut route_tables = NameAllocator::new();

        ModuleContext {
            header: self.header(),
            namespace: artifact.namespace.clone(),
            vis: self.vis(),
            uses: artifact.imports.iter().map(|i| self.use_line(i)).collect(),
            api_response: self.settings.return_api_response && has_interfaces,
            route_type: has_interfaces.then(|| self.types.route_type().to_string()),
            interfaces: artifact
                .body
                .interfaces
                .iter()
                .map(|group| self.interface(group, &mut route_tables))
                .collect(),
            contracts: artifact
                .body
                .contracts
                .iter()
                .map(|contract| self.contract(contract))
                .collect(),
        }
    }

    fn interface(
        &self,
        group: &InterfaceGroup,
        route_tables: &mut NameAllocator,
    ) -> InterfaceContext {
        let mut docs = Vec::new();
        if self.settings.generate_doc_comments {
            match &group.tag {
                Some(tag) => docs.push(format!("Operations tagged `{tag}`")),
                None => docs.push("Client operations".to_string()),
            }
        }

        let mut names = NameAllocator::new();
        InterfaceContext {
            name: group.name.clone(),
            docs,
            methods: group
                .operations
                .iter()
                .map(|operation| self.method(operation, &mut names))
                .collect(),
            routes: route_tables.allocate(&format!(
                "{}_ROUTES",
                to_snake_case(&group.name).to_uppercase()
            )),
        }
    }

    fn method(&self, operation: &NamedOperation, names: &mut NameAllocator) -> MethodContext {
        let settings = self.settings;
        let mut docs = Vec::new();

        if settings.generate_doc_comments {
            for text in [&operation.summary, &operation.description].into_iter().flatten() {
                if !docs.is_empty() {
                    docs.push(String::new());
                }
                docs.extend(doc_lines(text));
            }
            if !docs.is_empty() {
                docs.push(String::new());
            }
            docs.push(format!(
                "`{} {}`",
                operation.method.as_str().to_uppercase(),
                operation.path
            ));
            if settings.add_accept_headers {
                docs.push(format!("Accept: `{JSON_MEDIA_TYPE}`"));
            }
            for parameter in operation.parameters.iter().filter(|p| p.iso_date_format) {
                docs.push(format!(
                    "`{}` is sent in ISO-8601 format",
                    sanitize_rust_field_name(&parameter.name)
                ));
            }
        }

        if settings.generate_status_code_comments && !operation.error_responses.is_empty() {
            if !docs.is_empty() {
                docs.push(String::new());
            }
            docs.push("# Errors".to_string());
            docs.push(String::new());
            for response in &operation.error_responses {
                let description = doc_lines(&response.description).join(" ");
                docs.push(format!("- `{}`: {}", response.status_code, description));
            }
        }

        let mut arguments_names = NameAllocator::with_reserved(["self"]);
        let mut iso_date_arguments = Vec::new();
        let mut arguments = Vec::with_capacity(operation.parameters.len() + 2);
        for parameter in &operation.parameters {
            let base = match parameter.location {
                ParameterLocation::Cookie => {
                    format!("{}_cookie", sanitize_rust_field_name(&parameter.name))
                }
                _ => sanitize_rust_field_name(&parameter.name),
            };
            let name = arguments_names.allocate(&base);
            if parameter.iso_date_format {
                iso_date_arguments.push(literal(&name));
            }
            arguments.push(ArgumentContext {
                name,
                rust_type: self.optional(
                    self.types.rust_type(&parameter.type_ref),
                    !parameter.required,
                ),
            });
        }

        if let Some(body) = &operation.body {
            arguments.push(ArgumentContext {
                name: arguments_names.allocate("body"),
                rust_type: self.optional(self.types.rust_type(&body.type_ref), !body.required),
            });
        }
        if settings.use_cancellation_tokens {
            arguments.push(ArgumentContext {
                name: arguments_names.allocate("cancellation_token"),
                rust_type: CANCELLATION_TYPE.to_string(),
            });
        }

        let success = self.types.response_type(&operation.success);
        let return_type = if settings.return_api_response {
            format!("ApiResponse<{success}>")
        } else {
            success
        };

        let accept = if settings.add_accept_headers {
            format!("Some({})", literal(JSON_MEDIA_TYPE))
        } else {
            "None".to_string()
        };

        let name = names.allocate(&sanitize_rust_field_name(&operation.name));
        MethodContext {
            route: RouteContext {
                operation: literal(&name),
                verb: literal(&operation.method.as_str().to_uppercase()),
                path: literal(&operation.path),
                accept,
                iso_date_arguments,
            },
            name,
            docs,
            deprecated: operation.deprecated,
            arguments,
            return_type,
        }
    }

    fn optional(&self, rust_type: String, optional: bool) -> String {
        if optional {
            format!("Option<{rust_type}>")
        } else {
            rust_type
        }
    }

    fn contract(&self, contract: &ContractDefinition) -> ContractContext {
        let mut docs = Vec::new();
        if self.settings.generate_doc_comments {
            if let Some(description) = &contract.description {
                docs.extend(doc_lines(description));
            }
        }

        let mut context = ContractContext {
            kind: "alias",
            name: contract.name.clone(),
            docs,
            deprecated: contract.deprecated,
            fields: Vec::new(),
            variants: Vec::new(),
            alias: None,
            polymorphism: None,
            immutable: false,
        };

        match &contract.kind {
            SchemaKind::Object => {
                context.kind = "struct";
                context.fields = self.fields(contract);
                context.immutable = self.settings.immutable_records;
            }
            SchemaKind::Enum(PrimitiveType::String) => {
                context.kind = "enum";
                let mut variants = NameAllocator::new();
                context.variants = contract
                    .enum_members
                    .iter()
                    .enumerate()
                    .map(|(position, member)| {
                        let mut name = to_type_name(member);
                        if name.is_empty() {
                            name = format!("Value{}", position + 1);
                        }
                        let name = variants.allocate(&name);
                        VariantContext {
                            rename: (&name != member).then(|| literal(member)),
                            name,
                            payload: None,
                        }
                    })
                    .collect();
            }
            SchemaKind::Enum(primitive) | SchemaKind::Primitive(primitive) => {
                if !contract.enum_members.is_empty() && self.settings.generate_doc_comments {
                    if !context.docs.is_empty() {
                        context.docs.push(String::new());
                    }
                    context
                        .docs
                        .push(format!("Allowed values: {}", contract.enum_members.join(", ")));
                }
                context.alias = Some(primitive_type(*primitive).to_string());
            }
            SchemaKind::Array(item) => {
                context.alias = Some(format!("Vec<{}>", self.types.rust_type(item)));
            }
            SchemaKind::Union(members) => {
                context.kind = "union";
                let mut variants = NameAllocator::new();
                context.variants = members
                    .iter()
                    .enumerate()
                    .map(|(position, member)| {
                        let name = match member {
                            TypeRef::Named(id) => self.types.type_name(id),
                            _ => format!("Variant{}", position + 1),
                        };
                        let mut payload = self.types.rust_type(member);
                        if self.recursion.needs_box(&contract.id, member) {
                            payload = format!("Box<{payload}>");
                        }
                        VariantContext {
                            name: variants.allocate(&name),
                            rename: None,
                            payload: Some(payload),
                        }
                    })
                    .collect();
            }
        }

        let kind_name = self.types.kind_name(&contract.id);
        if let (Some(polymorphism), Some(kind_name)) = (&contract.polymorphism, kind_name) {
            // The base is a concrete type of its own enum when it is a struct
            let base = (contract.kind == SchemaKind::Object)
                .then(|| (contract.id.as_str(), polymorphism.base_value.as_str()));
            let derived = polymorphism
                .derived
                .iter()
                .map(|d| (d.id.as_str(), d.discriminator_value.as_str()));

            context.polymorphism = Some(PolymorphismContext {
                name: kind_name.to_string(),
                tag: polymorphism.discriminator.clone(),
                tag_literal: literal(&polymorphism.discriminator),
                variants: base
                    .into_iter()
                    .chain(derived)
                    .map(|(id, value)| {
                        let type_name = self.types.type_name(id);
                        VariantContext {
                            name: type_name.clone(),
                            rename: Some(literal(value)),
                            payload: Some(type_name),
                        }
                    })
                    .collect(),
            });
        }

        context
    }

    fn fields(&self, contract: &ContractDefinition) -> Vec<FieldContext> {
        let mut names = NameAllocator::new();
        let mut getters = NameAllocator::with_reserved(["new"]);
        let mut fields = Vec::new();

        if let Some(base) = &contract.base {
            let name = names.allocate("base");
            fields.push(FieldContext {
                getter: getters.allocate(&name),
                name,
                // Flattened by value; the tag lives on the enum
                rust_type: self.types.type_name(base),
                rename: None,
                optional: false,
                flatten: true,
                docs: Vec::new(),
            });
        }

        let tags = self.tags.get(&contract.id);
        let is_tag = |name: &str| tags.is_some_and(|tags| tags.iter().any(|t| t == name));

        for field in contract.fields.iter().filter(|f| !is_tag(&f.name)) {
            let name = names.allocate(&sanitize_rust_field_name(&field.name));
            let mut rust_type = self.types.rust_type(&field.type_ref);
            if self.recursion.needs_box(&contract.id, &field.type_ref) {
                rust_type = format!("Box<{rust_type}>");
            }
            let optional = !field.required || field.nullable;
            let docs = match (&field.description, self.settings.generate_doc_comments) {
                (Some(description), true) => doc_lines(description),
                _ => Vec::new(),
            };

            fields.push(FieldContext {
                rename: (name != field.name).then(|| literal(&field.name)),
                getter: getters.allocate(&name),
                name,
                rust_type: self.optional(rust_type, optional),
                optional,
                flatten: false,
                docs,
            });
        }

        let catch_all = match &contract.additional_properties {
            Some(values) => Some(format!("HashMap<String, {}>", self.types.rust_type(values))),
            // Derived types inherit the catch-all of their root through `base`
            None if self.settings.generate_default_additional_properties
                && contract.base.is_none()
                && contract.origin == ContractOrigin::Schema =>
            {
                Some(CATCH_ALL_TYPE.to_string())
            }
            None => None,
        };
        if let Some(rust_type) = catch_all {
            let name = names.allocate("additional_properties");
            fields.push(FieldContext {
                getter: getters.allocate(&name),
                name,
                rust_type,
                rename: None,
                optional: false,
                flatten: true,
                docs: Vec::new(),
            });
        }

        fields
    }

    pub fn registration(&self, registration: &Registration, standalone: bool) -> RegistrationContext {
        let base_url = match &registration.base_url {
            Some(url) => format!("Some({})", literal(url)),
            None => "None".to_string(),
        };
        let retry = match &registration.retry {
            Some(retry) => format!(
                "Some(RetryPolicy {{ max_retry_count: {}, first_backoff_retry_in_seconds: {:?} }})",
                retry.max_retry_count, retry.first_backoff_retry_in_seconds
            ),
            None => "None".to_string(),
        };
        let handlers: Vec<String> = registration
            .http_message_handlers
            .iter()
            .map(|h| literal(h))
            .collect();

        RegistrationContext {
            header: if standalone { self.header() } else { None },
            standalone,
            vis: self.vis(),
            function_name: sanitize_rust_field_name(&registration.function_name),
            entries: registration
                .interfaces
                .iter()
                .map(|interface| RegistrationEntryContext {
                    interface: literal(interface),
                    base_url: base_url.clone(),
                    handlers: handlers.clone(),
                    retry: retry.clone(),
                })
                .collect(),
        }
    }
}
