//! Interface grouping and operation signatures
//!
//! Places every retained operation into one or more interface groups,
//! assigns it a name that is unique within its group and builds the
//! signature the emission layer renders.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::MultipleInterfaces;
use crate::generation::naming::{NameAllocator, NamingPolicy};
use crate::generation::utils::to_type_name;
use crate::generation::{
    Field, GenerationError, HttpMethod, Operation, ParameterLocation, RequestBody, Response,
    TypeRef,
};

const QUERY_WRAPPER_PARAMETER: &str = "queryParams";

/// Signature-shaping options that do not affect naming
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignaturePolicy {
    pub include_headers: bool,
    pub use_iso_date_format: bool,
    pub dynamic_querystring: bool,
    /// Operation id to explicit success response type
    pub response_overrides: BTreeMap<String, String>,
}

/// Success type of an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "camelCase")]
pub enum ResponseType {
    Inferred(TypeRef),
    Override(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub type_ref: TypeRef,
    pub required: bool,
    pub deprecated: bool,
    pub description: Option<String>,
    pub iso_date_format: bool,
}

/// An operation with its resolved, group-unique name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedOperation {
    pub name: String,
    pub operation_id: String,
    pub method: HttpMethod,
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<OperationParameter>,
    pub body: Option<RequestBody>,
    pub success: ResponseType,
    pub error_responses: Vec<Response>,
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceGroup {
    pub name: String,
    /// Tag the group was formed from in `ByTag` mode
    pub tag: Option<String>,
    pub operations: Vec<NamedOperation>,
}

/// Synthesized type bundling the query parameters of one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryWrapper {
    pub name: String,
    pub operation_id: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub groups: Vec<InterfaceGroup>,
    pub query_wrappers: Vec<QueryWrapper>,
}

/// Group, name and shape the retained operations.
///
/// `reserved_type_names` are contract names a synthesized query wrapper must
/// not reuse.
pub fn resolve_groups(
    operations: &[&Operation],
    document_title: Option<&str>,
    naming: &NamingPolicy,
    signature: &SignaturePolicy,
    reserved_type_names: &[String],
) -> Result<Resolution, GenerationError> {
    let plan = plan_groups(operations, document_title, naming);
    let mut wrappers = QueryWrappers::new(reserved_type_names);
    let mut groups = Vec::with_capacity(plan.len());

    for (name, tag, members) in plan {
        let mut allocator = NameAllocator::new();
        let mut named = Vec::with_capacity(members.len());

        for operation in members {
            let base = naming.method_name(operation, tag.as_deref(), &name)?;
            let method_name = allocator.allocate(&base);
            named.push(build_signature(
                operation,
                method_name,
                naming,
                signature,
                &mut wrappers,
            ));
        }

        ensure_unique(&name, &named)?;
        groups.push(InterfaceGroup {
            name,
            tag,
            operations: named,
        });
    }

    tracing::debug!(
        "Resolved {} interface groups from {} operations",
        groups.len(),
        operations.len()
    );

    Ok(Resolution {
        groups,
        query_wrappers: wrappers.into_inner(),
    })
}

type GroupPlan<'a> = Vec<(String, Option<String>, Vec<&'a Operation>)>;

/// Decide group membership and unique group names, in first-appearance order
fn plan_groups<'a>(
    operations: &[&'a Operation],
    document_title: Option<&str>,
    naming: &NamingPolicy,
) -> GroupPlan<'a> {
    let base_name = naming.base_interface_name(document_title);
    let mut names = NameAllocator::new();

    match naming.split {
        MultipleInterfaces::Unset => {
            vec![(names.allocate(&base_name), None, operations.to_vec())]
        }
        MultipleInterfaces::ByEndpoint => operations
            .iter()
            .map(|operation| {
                let name = names.allocate(&format!("{}Endpoint", to_type_name(&operation.id)));
                (name, None, vec![*operation])
            })
            .collect(),
        MultipleInterfaces::ByTag => {
            let mut buckets: Vec<(Option<&str>, Vec<&Operation>)> = Vec::new();
            let mut push = |key: Option<&'a str>, operation: &'a Operation| {
                match buckets.iter_mut().find(|(existing, _)| *existing == key) {
                    Some((_, members)) => members.push(operation),
                    None => buckets.push((key, vec![operation])),
                }
            };

            for operation in operations {
                if operation.tags.is_empty() {
                    push(None, operation);
                    continue;
                }
                let mut seen = HashSet::new();
                for tag in &operation.tags {
                    // Fan-out: once per distinct tag
                    if seen.insert(tag.as_str()) {
                        push(Some(tag.as_str()), operation);
                    }
                }
            }

            buckets
                .into_iter()
                .map(|(tag, members)| {
                    let base = match tag {
                        Some(tag) => format!("{}Api", to_type_name(tag)),
                        None => base_name.clone(),
                    };
                    (names.allocate(&base), tag.map(String::from), members)
                })
                .collect()
        }
    }
}

fn build_signature(
    operation: &Operation,
    name: String,
    naming: &NamingPolicy,
    signature: &SignaturePolicy,
    wrappers: &mut QueryWrappers,
) -> NamedOperation {
    let mut parameters: Vec<OperationParameter> = operation
        .parameters
        .iter()
        .filter(|p| signature.include_headers || p.location != ParameterLocation::Header)
        .map(|p| OperationParameter {
            name: p.name.clone(),
            location: p.location,
            type_ref: p.type_ref.clone(),
            required: p.required,
            deprecated: p.deprecated,
            description: p.description.clone(),
            iso_date_format: signature.use_iso_date_format
                && p.location == ParameterLocation::Query
                && p.type_ref.is_date(),
        })
        .collect();

    if signature.dynamic_querystring {
        parameters = wrappers.wrap(operation, parameters);
    }

    if naming.reorder_optional_parameters {
        // Stable partition: required first, relative order kept on both sides
        let (required, optional): (Vec<_>, Vec<_>) =
            parameters.into_iter().partition(|p| p.required);
        parameters = required.into_iter().chain(optional).collect();
    }

    let success_response = operation.success_response();
    let success = match signature.response_overrides.get(&operation.id) {
        Some(type_name) => ResponseType::Override(type_name.clone()),
        None => success_response
            .and_then(|r| r.type_ref.clone())
            .map(ResponseType::Inferred)
            .unwrap_or(ResponseType::Empty),
    };

    let success_code = success_response.map(|r| r.status_code.as_str());
    let error_responses = operation
        .responses
        .iter()
        .filter(|r| Some(r.status_code.as_str()) != success_code)
        .cloned()
        .collect();

    NamedOperation {
        name,
        operation_id: operation.id.clone(),
        method: operation.method,
        path: operation.path.clone(),
        summary: operation.summary.clone(),
        description: operation.description.clone(),
        parameters,
        body: operation.request_body.clone(),
        success,
        error_responses,
        deprecated: operation.deprecated,
    }
}

fn ensure_unique(interface: &str, operations: &[NamedOperation]) -> Result<(), GenerationError> {
    let mut seen = HashSet::new();
    for operation in operations {
        if !seen.insert(operation.name.as_str()) {
            let colliding = operations
                .iter()
                .filter(|o| o.name == operation.name)
                .map(|o| o.operation_id.clone())
                .collect();
            return Err(GenerationError::NamingCollisionUnresolvable {
                interface: interface.to_string(),
                name: operation.name.clone(),
                operations: colliding,
            });
        }
    }
    Ok(())
}

/// Query wrappers created so far, keyed by verb and path since operation ids
/// may repeat. An operation fanned out to several groups shares one wrapper.
struct QueryWrappers {
    names: NameAllocator,
    by_operation: HashMap<(HttpMethod, String), usize>,
    wrappers: Vec<QueryWrapper>,
}

impl QueryWrappers {
    fn new(reserved: &[String]) -> Self {
        Self {
            names: NameAllocator::with_reserved(reserved.iter().cloned()),
            by_operation: HashMap::new(),
            wrappers: Vec::new(),
        }
    }

    /// Replace two or more query parameters with a single wrapper parameter
    fn wrap(
        &mut self,
        operation: &Operation,
        parameters: Vec<OperationParameter>,
    ) -> Vec<OperationParameter> {
        let query_count = parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Query)
            .count();
        if query_count < 2 {
            return parameters;
        }

        let key = (operation.method, operation.path.clone());
        let wrapper_name = match self.by_operation.get(&key) {
            Some(&position) => self.wrappers[position].name.clone(),
            None => {
                let name = self
                    .names
                    .allocate(&format!("{}QueryParams", to_type_name(&operation.id)));
                let fields = parameters
                    .iter()
                    .filter(|p| p.location == ParameterLocation::Query)
                    .map(|p| Field {
                        name: p.name.clone(),
                        type_ref: p.type_ref.clone(),
                        required: p.required,
                        nullable: false,
                        description: p.description.clone(),
                    })
                    .collect();
                self.by_operation.insert(key, self.wrappers.len());
                self.wrappers.push(QueryWrapper {
                    name: name.clone(),
                    operation_id: operation.id.clone(),
                    fields,
                });
                name
            }
        };

        let required = parameters
            .iter()
            .any(|p| p.location == ParameterLocation::Query && p.required);
        let mut wrapped = Vec::with_capacity(parameters.len() - query_count + 1);
        let mut inserted = false;
        for parameter in parameters {
            if parameter.location != ParameterLocation::Query {
                wrapped.push(parameter);
            } else if !inserted {
                inserted = true;
                wrapped.push(OperationParameter {
                    name: QUERY_WRAPPER_PARAMETER.to_string(),
                    location: ParameterLocation::Query,
                    type_ref: TypeRef::named(wrapper_name.clone()),
                    required,
                    deprecated: false,
                    description: None,
                    iso_date_format: false,
                });
            }
        }
        wrapped
    }

    fn into_inner(self) -> Vec<QueryWrapper> {
        self.wrappers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{Parameter, PrimitiveType};

    fn operation(id: &str, tags: &[&str]) -> Operation {
        Operation {
            id: id.to_string(),
            method: HttpMethod::Get,
            path: format!("/{id}"),
            summary: None,
            description: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            parameters: vec![],
            request_body: None,
            responses: vec![],
            deprecated: false,
        }
    }

    fn parameter(name: &str, location: ParameterLocation, required: bool) -> Parameter {
        Parameter {
            name: name.to_string(),
            location,
            type_ref: TypeRef::Primitive(PrimitiveType::String),
            required,
            deprecated: false,
            description: None,
        }
    }

    fn response(code: &str, type_ref: Option<TypeRef>) -> Response {
        Response {
            status_code: code.to_string(),
            description: code.to_string(),
            type_ref,
        }
    }

    fn by_tag() -> NamingPolicy {
        NamingPolicy {
            split: MultipleInterfaces::ByTag,
            ..Default::default()
        }
    }

    fn resolve(operations: &[Operation], naming: &NamingPolicy) -> Resolution {
        let refs: Vec<&Operation> = operations.iter().collect();
        resolve_groups(&refs, None, naming, &SignaturePolicy::default(), &[]).unwrap()
    }

    fn layout(resolution: &Resolution) -> Vec<(String, Vec<String>)> {
        resolution
            .groups
            .iter()
            .map(|g| {
                (
                    g.name.clone(),
                    g.operations.iter().map(|o| o.name.clone()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_unset_mode_uses_single_interface() {
        let operations = vec![operation("getUsers", &["Admin"]), operation("ping", &[])];
        let resolution = resolve(&operations, &NamingPolicy::default());

        assert_eq!(
            layout(&resolution),
            vec![(
                "ApiClient".to_string(),
                vec!["getUsers".to_string(), "ping".to_string()]
            )]
        );
    }

    #[test]
    fn test_unset_mode_prefers_document_title() {
        let operations = vec![operation("ping", &[])];
        let refs: Vec<&Operation> = operations.iter().collect();
        let resolution = resolve_groups(
            &refs,
            Some("Bindsmith Petstore"),
            &NamingPolicy::default(),
            &SignaturePolicy::default(),
            &[],
        )
        .unwrap();

        assert_eq!(resolution.groups[0].name, "BindsmithPetstore");
    }

    #[test]
    fn test_by_tag_fans_out_multi_tagged_operations() {
        let operations = vec![
            operation("getUsers", &["Admin"]),
            operation("createUser", &["Admin", "Public"]),
        ];
        let resolution = resolve(&operations, &by_tag());

        assert_eq!(
            layout(&resolution),
            vec![
                (
                    "AdminApi".to_string(),
                    vec!["getUsers".to_string(), "createUser".to_string()]
                ),
                ("PublicApi".to_string(), vec!["createUser".to_string()]),
            ]
        );
        assert_eq!(resolution.groups[0].tag.as_deref(), Some("Admin"));
    }

    #[test]
    fn test_by_tag_untagged_operations_fall_back_to_base_interface() {
        let operations = vec![
            operation("health", &[]),
            operation("listPets", &["pets"]),
            operation("version", &[]),
        ];
        let resolution = resolve(&operations, &by_tag());

        assert_eq!(
            layout(&resolution),
            vec![
                (
                    "ApiClient".to_string(),
                    vec!["health".to_string(), "version".to_string()]
                ),
                ("PetsApi".to_string(), vec!["listPets".to_string()]),
            ]
        );
    }

    #[test]
    fn test_by_tag_duplicate_tags_on_one_operation_count_once() {
        let operations = vec![operation("listPets", &["pets", "pets"])];
        let resolution = resolve(&operations, &by_tag());
        assert_eq!(resolution.groups.len(), 1);
        assert_eq!(resolution.groups[0].operations.len(), 1);
    }

    #[test]
    fn test_by_tag_group_names_are_unique() {
        let operations = vec![operation("a", &["pet store"]), operation("b", &["PetStore"])];
        let resolution = resolve(&operations, &by_tag());
        let names: Vec<&str> = resolution.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["PetStoreApi", "PetStoreApi2"]);
    }

    #[test]
    fn test_by_endpoint_creates_one_interface_per_operation() {
        let naming = NamingPolicy {
            split: MultipleInterfaces::ByEndpoint,
            ..Default::default()
        };
        let operations = vec![operation("getUsers", &["Admin"]), operation("getUsers", &[])];
        let resolution = resolve(&operations, &naming);

        assert_eq!(
            layout(&resolution),
            vec![
                ("GetUsersEndpoint".to_string(), vec!["Execute".to_string()]),
                ("GetUsersEndpoint2".to_string(), vec!["Execute".to_string()]),
            ]
        );
    }

    #[test]
    fn test_colliding_names_get_ordinal_suffixes() {
        let operations = vec![
            operation("getItem", &[]),
            operation("getItem", &[]),
            operation("getItem", &[]),
        ];
        let resolution = resolve(&operations, &NamingPolicy::default());

        let names: Vec<&str> = resolution.groups[0]
            .operations
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(names, vec!["getItem", "getItem2", "getItem3"]);
    }

    #[test]
    fn test_placeholder_free_template_collisions_are_suffixed() {
        let naming = NamingPolicy {
            operation_name_template: Some("Call".to_string()),
            ..Default::default()
        };
        let operations = vec![operation("a", &[]), operation("b", &[])];
        let resolution = resolve(&operations, &naming);

        let names: Vec<&str> = resolution.groups[0]
            .operations
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(names, vec!["Call", "Call2"]);
    }

    #[test]
    fn test_optional_parameters_move_after_required_ones() {
        let mut op = operation("search", &[]);
        op.parameters = vec![
            parameter("a", ParameterLocation::Query, false),
            parameter("b", ParameterLocation::Path, true),
            parameter("c", ParameterLocation::Query, false),
            parameter("d", ParameterLocation::Query, true),
        ];
        let naming = NamingPolicy {
            reorder_optional_parameters: true,
            ..Default::default()
        };
        let resolution = resolve(&[op], &naming);

        let order: Vec<&str> = resolution.groups[0].operations[0]
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_header_parameters_can_be_dropped() {
        let mut op = operation("deletePet", &[]);
        op.parameters = vec![
            parameter("petId", ParameterLocation::Path, true),
            parameter("api_key", ParameterLocation::Header, false),
        ];
        let refs = vec![&op];

        let without = resolve_groups(
            &refs,
            None,
            &NamingPolicy::default(),
            &SignaturePolicy::default(),
            &[],
        )
        .unwrap();
        assert_eq!(without.groups[0].operations[0].parameters.len(), 1);

        let with = resolve_groups(
            &refs,
            None,
            &NamingPolicy::default(),
            &SignaturePolicy {
                include_headers: true,
                ..Default::default()
            },
            &[],
        )
        .unwrap();
        assert_eq!(with.groups[0].operations[0].parameters.len(), 2);
    }

    #[test]
    fn test_response_override_replaces_only_success_type() {
        let mut op = operation("getPet", &[]);
        op.responses = vec![
            response("200", Some(TypeRef::named("Pet"))),
            response("404", Some(TypeRef::named("Error"))),
        ];
        let other = {
            let mut other = operation("listPets", &[]);
            other.responses = vec![response("204", None)];
            other
        };
        let refs = vec![&op, &other];

        let signature = SignaturePolicy {
            response_overrides: BTreeMap::from([(
                "getPet".to_string(),
                "serde_json::Value".to_string(),
            )]),
            ..Default::default()
        };
        let resolution =
            resolve_groups(&refs, None, &NamingPolicy::default(), &signature, &[]).unwrap();

        let get_pet = &resolution.groups[0].operations[0];
        assert_eq!(
            get_pet.success,
            ResponseType::Override("serde_json::Value".to_string())
        );
        assert_eq!(get_pet.error_responses.len(), 1);
        assert_eq!(get_pet.error_responses[0].status_code, "404");

        let list_pets = &resolution.groups[0].operations[1];
        assert_eq!(list_pets.success, ResponseType::Empty);
        assert!(list_pets.error_responses.is_empty());
    }

    #[test]
    fn test_dynamic_querystring_wraps_query_parameters() {
        let mut op = operation("findPets", &["pets", "search"]);
        op.parameters = vec![
            parameter("owner", ParameterLocation::Path, true),
            parameter("limit", ParameterLocation::Query, false),
            parameter("status", ParameterLocation::Query, true),
        ];
        let refs = vec![&op];
        let signature = SignaturePolicy {
            dynamic_querystring: true,
            ..Default::default()
        };

        let resolution = resolve_groups(
            &refs,
            None,
            &by_tag(),
            &signature,
            &["FindPetsQueryParams".to_string()],
        )
        .unwrap();

        assert_eq!(resolution.query_wrappers.len(), 1);
        let wrapper = &resolution.query_wrappers[0];
        assert_eq!(wrapper.name, "FindPetsQueryParams2");
        assert_eq!(wrapper.fields.len(), 2);

        for group in &resolution.groups {
            let parameters = &group.operations[0].parameters;
            assert_eq!(parameters.len(), 2);
            assert_eq!(parameters[1].name, "queryParams");
            assert!(parameters[1].required);
            assert_eq!(
                parameters[1].type_ref,
                TypeRef::named("FindPetsQueryParams2")
            );
        }
    }

    #[test]
    fn test_query_wrappers_are_per_operation_even_with_repeated_ids() {
        let mut first = operation("search", &[]);
        first.path = "/a".to_string();
        first.parameters = vec![
            parameter("a", ParameterLocation::Query, false),
            parameter("b", ParameterLocation::Query, false),
        ];
        let mut second = operation("search", &[]);
        second.path = "/b".to_string();
        second.parameters = vec![
            parameter("x", ParameterLocation::Query, false),
            parameter("y", ParameterLocation::Query, false),
            parameter("z", ParameterLocation::Query, false),
        ];
        let refs = vec![&first, &second];
        let signature = SignaturePolicy {
            dynamic_querystring: true,
            ..Default::default()
        };

        let resolution =
            resolve_groups(&refs, None, &NamingPolicy::default(), &signature, &[]).unwrap();

        let wrappers: Vec<(&str, Vec<&str>)> = resolution
            .query_wrappers
            .iter()
            .map(|w| {
                (
                    w.name.as_str(),
                    w.fields.iter().map(|f| f.name.as_str()).collect(),
                )
            })
            .collect();
        assert_eq!(
            wrappers,
            vec![
                ("SearchQueryParams", vec!["a", "b"]),
                ("SearchQueryParams2", vec!["x", "y", "z"]),
            ]
        );

        let operations = &resolution.groups[0].operations;
        assert_eq!(operations[0].name, "search");
        assert_eq!(operations[1].name, "search2");
        assert_eq!(
            operations[1].parameters[0].type_ref,
            TypeRef::named("SearchQueryParams2")
        );
    }

    #[test]
    fn test_iso_date_format_marks_date_query_parameters() {
        let mut op = operation("listPets", &[]);
        let mut born_after = parameter("bornAfter", ParameterLocation::Query, false);
        born_after.type_ref = TypeRef::Primitive(PrimitiveType::Date);
        op.parameters = vec![born_after, parameter("name", ParameterLocation::Query, false)];
        let refs = vec![&op];
        let signature = SignaturePolicy {
            use_iso_date_format: true,
            ..Default::default()
        };

        let resolution =
            resolve_groups(&refs, None, &NamingPolicy::default(), &signature, &[]).unwrap();
        let parameters = &resolution.groups[0].operations[0].parameters;
        assert!(parameters[0].iso_date_format);
        assert!(!parameters[1].iso_date_format);
    }
}
