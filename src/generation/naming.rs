//! Operation and interface naming
//!
//! Names come from an optional template with a fixed placeholder set, falling
//! back to the operation identifier. Substitution is pure and total: unknown
//! placeholders are removed along with their braces.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MultipleInterfaces;
use crate::generation::utils::{sanitize_identifier, to_proper_case, to_type_name};
use crate::generation::{GenerationError, Operation};

/// Method name used in `ByEndpoint` mode when no template is configured
pub const ENDPOINT_METHOD_NAME: &str = "Execute";
const FALLBACK_INTERFACE_NAME: &str = "ApiClient";

static UNKNOWN_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]*\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingPolicy {
    pub split: MultipleInterfaces,
    pub interface_name: String,
    pub use_document_title: bool,
    pub operation_name_template: Option<String>,
    /// Stable-partition required parameters before optional ones
    pub reorder_optional_parameters: bool,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            split: MultipleInterfaces::Unset,
            interface_name: FALLBACK_INTERFACE_NAME.to_string(),
            use_document_title: true,
            operation_name_template: None,
            reorder_optional_parameters: false,
        }
    }
}

impl NamingPolicy {
    /// Name of the single interface, or of the untagged group in `ByTag` mode
    pub fn base_interface_name(&self, document_title: Option<&str>) -> String {
        let from_title = document_title
            .filter(|_| self.use_document_title)
            .map(to_type_name)
            .filter(|name| !name.is_empty());

        from_title
            .or_else(|| Some(sanitize_identifier(&self.interface_name)))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_INTERFACE_NAME.to_string())
    }

    /// Resolve the base (pre-disambiguation) method name of an operation.
    ///
    /// `group_tag` is the tag of the interface the operation is placed in,
    /// when grouping by tag.
    pub fn method_name(
        &self,
        operation: &Operation,
        group_tag: Option<&str>,
        interface: &str,
    ) -> Result<String, GenerationError> {
        let templated = match (&self.operation_name_template, self.split) {
            (Some(template), _) => sanitize_identifier(&render_template(template, operation, group_tag)),
            (None, MultipleInterfaces::ByEndpoint) => ENDPOINT_METHOD_NAME.to_string(),
            (None, _) => String::new(),
        };

        if !templated.is_empty() {
            return Ok(templated);
        }

        let fallback = sanitize_identifier(&operation.id);
        if fallback.is_empty() {
            return Err(GenerationError::NamingCollisionUnresolvable {
                interface: interface.to_string(),
                name: fallback,
                operations: vec![operation.id.clone()],
            });
        }
        Ok(fallback)
    }
}

/// Substitute the fixed placeholder set of an operation name template.
///
/// | placeholder       | value                                              |
/// |-------------------|----------------------------------------------------|
/// | `{operationName}` | PascalCase operation identifier                    |
/// | `{verb}`          | PascalCase HTTP method                             |
/// | `{path}`          | PascalCase path segments, `{id}` becomes `ById`    |
/// | `{tag}`           | PascalCase group tag, else first tag, else empty   |
pub fn render_template(template: &str, operation: &Operation, group_tag: Option<&str>) -> String {
    let tag = group_tag
        .or_else(|| operation.tags.first().map(String::as_str))
        .map(to_proper_case)
        .unwrap_or_default();

    let rendered = template
        .replace("{operationName}", &to_proper_case(&operation.id))
        .replace("{verb}", &to_proper_case(operation.method.as_str()))
        .replace("{path}", &path_name(&operation.path))
        .replace("{tag}", &tag);

    UNKNOWN_PLACEHOLDER.replace_all(&rendered, "").into_owned()
}

/// `/pets/{petId}/photos` becomes `PetsByPetIdPhotos`
fn path_name(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(parameter) => format!("By{}", to_proper_case(parameter)),
            None => to_proper_case(segment),
        })
        .collect()
}

/// Hands out unique names: the first request for a name gets it unchanged,
/// later requests get the smallest free ordinal suffix starting at 2.
#[derive(Debug, Default)]
pub struct NameAllocator {
    taken: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator that treats `reserved` as already taken
    pub fn with_reserved<I, S>(reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            taken: reserved.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allocate(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }

        let mut ordinal = 2usize;
        loop {
            let candidate = format!("{base}{ordinal}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            ordinal += 1;
        }
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::HttpMethod;

    fn operation(id: &str, method: HttpMethod, path: &str, tags: &[&str]) -> Operation {
        Operation {
            id: id.to_string(),
            method,
            path: path.to_string(),
            summary: None,
            description: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            parameters: vec![],
            request_body: None,
            responses: vec![],
            deprecated: false,
        }
    }

    #[test]
    fn test_render_template_placeholders() {
        let op = operation("getPetById", HttpMethod::Get, "/pets/{petId}", &["pets"]);

        assert_eq!(render_template("{operationName}Async", &op, None), "GetPetByIdAsync");
        assert_eq!(render_template("{verb}{path}", &op, None), "GetPetsByPetId");
        assert_eq!(render_template("{tag}_{verb}", &op, Some("admin")), "Admin_Get");
        assert_eq!(render_template("{tag}_{verb}", &op, None), "Pets_Get");
        assert_eq!(render_template("{unknown}", &op, None), "");
    }

    #[test]
    fn test_unknown_placeholders_are_removed() {
        let op = operation("getPetById", HttpMethod::Get, "/pets/{petId}", &["pets"]);
        assert_eq!(render_template("{unknown}Async", &op, None), "Async");
        assert_eq!(render_template("{verb}{nope}{tag}", &op, None), "GetPets");

        let policy = NamingPolicy {
            operation_name_template: Some("{unknown}Async".to_string()),
            ..NamingPolicy::default()
        };
        assert_eq!(policy.method_name(&op, None, "ApiClient").unwrap(), "Async");

        let policy = NamingPolicy {
            operation_name_template: Some("{unknown}".to_string()),
            ..NamingPolicy::default()
        };
        assert_eq!(policy.method_name(&op, None, "ApiClient").unwrap(), "getPetById");
    }

    #[test]
    fn test_method_name_defaults_to_operation_id() {
        let policy = NamingPolicy::default();
        let op = operation("getItem", HttpMethod::Get, "/items", &[]);
        assert_eq!(policy.method_name(&op, None, "ApiClient").unwrap(), "getItem");

        let op = operation("list-items", HttpMethod::Get, "/items", &[]);
        assert_eq!(policy.method_name(&op, None, "ApiClient").unwrap(), "listItems");
    }

    #[test]
    fn test_method_name_for_endpoints() {
        let policy = NamingPolicy {
            split: MultipleInterfaces::ByEndpoint,
            ..Default::default()
        };
        let op = operation("getItem", HttpMethod::Get, "/items", &[]);
        assert_eq!(policy.method_name(&op, None, "GetItemEndpoint").unwrap(), "Execute");

        let templated = NamingPolicy {
            operation_name_template: Some("{operationName}Async".to_string()),
            ..policy
        };
        assert_eq!(
            templated.method_name(&op, None, "GetItemEndpoint").unwrap(),
            "GetItemAsync"
        );
    }

    #[test]
    fn test_empty_template_falls_back_to_operation_id() {
        let policy = NamingPolicy {
            operation_name_template: Some("{tag}".to_string()),
            ..Default::default()
        };
        let op = operation("getItem", HttpMethod::Get, "/items", &[]);
        assert_eq!(policy.method_name(&op, None, "ApiClient").unwrap(), "getItem");
    }

    #[test]
    fn test_unnameable_operation_is_reported() {
        let policy = NamingPolicy::default();
        let op = operation("---", HttpMethod::Get, "/items", &[]);
        let error = policy.method_name(&op, None, "ApiClient").unwrap_err();
        assert!(matches!(
            error,
            GenerationError::NamingCollisionUnresolvable { ref interface, .. } if interface == "ApiClient"
        ));
    }

    #[test]
    fn test_base_interface_name() {
        let policy = NamingPolicy::default();
        assert_eq!(
            policy.base_interface_name(Some("Swagger Petstore")),
            "SwaggerPetstore"
        );
        assert_eq!(policy.base_interface_name(None), "ApiClient");
        assert_eq!(policy.base_interface_name(Some("!!!")), "ApiClient");

        let named = NamingPolicy {
            use_document_title: false,
            interface_name: "PetClient".to_string(),
            ..Default::default()
        };
        assert_eq!(named.base_interface_name(Some("Swagger Petstore")), "PetClient");
    }

    #[test]
    fn test_allocator_suffixes_in_request_order() {
        let mut allocator = NameAllocator::new();
        assert_eq!(allocator.allocate("getItem"), "getItem");
        assert_eq!(allocator.allocate("getItem"), "getItem2");
        assert_eq!(allocator.allocate("getItem2"), "getItem22");
        assert_eq!(allocator.allocate("getItem"), "getItem3");
    }

    #[test]
    fn test_allocator_respects_reserved_names() {
        let mut allocator = NameAllocator::with_reserved(["Pet"]);
        assert!(allocator.is_taken("Pet"));
        assert_eq!(allocator.allocate("Pet"), "Pet2");
    }
}
