//! Document model produced by the OpenAPI parser
//!
//! Every value here is immutable once parsed. Operations and schemas keep the
//! order in which they appear in the source document, which is what the
//! generation pipeline relies on for deterministic output.

use serde::{Deserialize, Serialize};

/// HTTP methods supported by OpenAPI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Get all HTTP methods as an array
    pub fn all() -> &'static [HttpMethod] {
        &[
            HttpMethod::Get,
            HttpMethod::Put,
            HttpMethod::Post,
            HttpMethod::Delete,
            HttpMethod::Options,
            HttpMethod::Head,
            HttpMethod::Patch,
            HttpMethod::Trace,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }

    /// Parse a path-item key, ignoring keys that are not methods
    pub fn from_key(key: &str) -> Option<HttpMethod> {
        HttpMethod::all()
            .iter()
            .copied()
            .find(|method| method.as_str().eq_ignore_ascii_case(key))
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// API information extracted from the `info` object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// A parsed API description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub openapi_version: String,
    pub info: ApiInfo,
    pub operations: Vec<Operation>,
    pub schemas: Vec<Schema>,
}

impl Document {
    pub fn title(&self) -> Option<&str> {
        self.info.title.as_deref()
    }

    pub fn operation(&self, id: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.id == id)
    }

    pub fn schema(&self, id: &str) -> Option<&Schema> {
        self.schemas.iter().find(|schema| schema.id == id)
    }
}

/// One callable network action (verb + path)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    pub method: HttpMethod,
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    pub responses: Vec<Response>,
    pub deprecated: bool,
}

impl Operation {
    /// Every type reference used by the operation's signature, in declaration order
    pub fn type_refs(&self) -> impl Iterator<Item = &TypeRef> {
        self.parameters
            .iter()
            .map(|p| &p.type_ref)
            .chain(self.request_body.iter().map(|b| &b.type_ref))
            .chain(self.responses.iter().filter_map(|r| r.type_ref.as_ref()))
    }

    /// Identifiers of every named schema the operation refers to
    pub fn schema_refs(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        for type_ref in self.type_refs() {
            type_ref.collect_named(&mut refs);
        }
        refs
    }

    /// First 2xx response in document order, falling back to `default`
    pub fn success_response(&self) -> Option<&Response> {
        self.responses
            .iter()
            .find(|r| r.is_success())
            .or_else(|| self.responses.iter().find(|r| r.status_code == "default"))
    }
}

/// Parameter location in an HTTP request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
            ParameterLocation::Cookie => write!(f, "cookie"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub type_ref: TypeRef,
    pub required: bool,
    pub deprecated: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub type_ref: TypeRef,
    pub required: bool,
    pub content_type: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status_code: String,
    pub description: String,
    pub type_ref: Option<TypeRef>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.status_code.starts_with('2')
    }
}

/// Scalar types the parser recognises from `type` + `format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimitiveType {
    String,
    Int32,
    Int64,
    Float,
    Double,
    Boolean,
    Date,
    DateTime,
    Uuid,
    Binary,
}

/// A reference from a field, parameter or response to a type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "camelCase")]
pub enum TypeRef {
    Named(String),
    Primitive(PrimitiveType),
    Array(Box<TypeRef>),
    Map(Box<TypeRef>),
    Any,
}

impl TypeRef {
    pub fn named<S: Into<String>>(id: S) -> Self {
        TypeRef::Named(id.into())
    }

    pub fn array(item: TypeRef) -> Self {
        TypeRef::Array(Box::new(item))
    }

    pub fn map(value: TypeRef) -> Self {
        TypeRef::Map(Box::new(value))
    }

    /// Push every named schema identifier reachable through this reference
    pub fn collect_named<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TypeRef::Named(id) => out.push(id),
            TypeRef::Array(inner) | TypeRef::Map(inner) => inner.collect_named(out),
            TypeRef::Primitive(_) | TypeRef::Any => {}
        }
    }

    pub fn is_date(&self) -> bool {
        matches!(
            self,
            TypeRef::Primitive(PrimitiveType::Date) | TypeRef::Primitive(PrimitiveType::DateTime)
        )
    }
}

/// Shape of a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "camelCase")]
pub enum SchemaKind {
    Primitive(PrimitiveType),
    Object,
    Enum(PrimitiveType),
    Array(TypeRef),
    Union(Vec<TypeRef>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub type_ref: TypeRef,
    pub required: bool,
    pub nullable: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discriminator {
    pub property_name: String,
    /// Discriminator value to schema identifier, in document order
    pub mapping: Vec<(String, String)>,
}

/// One named data-shape definition from `components.schemas`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub id: String,
    pub kind: SchemaKind,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    pub base: Option<String>,
    pub derived: Vec<String>,
    pub enum_members: Vec<String>,
    pub discriminator: Option<Discriminator>,
    pub additional_properties: Option<TypeRef>,
    pub nullable: bool,
    pub deprecated: bool,
}

impl Schema {
    pub fn new<S: Into<String>>(id: S, kind: SchemaKind) -> Self {
        Self {
            id: id.into(),
            kind,
            description: None,
            fields: Vec::new(),
            base: None,
            derived: Vec::new(),
            enum_members: Vec::new(),
            discriminator: None,
            additional_properties: None,
            nullable: false,
            deprecated: false,
        }
    }

    /// Outgoing edges of the reference graph: field types, base type,
    /// derived types, array items, union members and map values.
    pub fn references(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        for field in &self.fields {
            field.type_ref.collect_named(&mut refs);
        }
        if let Some(base) = &self.base {
            refs.push(base.as_str());
        }
        refs.extend(self.derived.iter().map(String::as_str));
        match &self.kind {
            SchemaKind::Array(item) => item.collect_named(&mut refs),
            SchemaKind::Union(members) => {
                for member in members {
                    member.collect_named(&mut refs);
                }
            }
            SchemaKind::Primitive(_) | SchemaKind::Object | SchemaKind::Enum(_) => {}
        }
        if let Some(values) = &self.additional_properties {
            values.collect_named(&mut refs);
        }
        refs
    }
}
