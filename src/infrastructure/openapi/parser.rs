//! OpenAPI 3.x parser producing the document model
//!
//! The parser walks the raw `serde_json::Value` tree. Schema references
//! (`#/components/schemas/...`) are kept as named type references so the
//! generation pipeline can trim and validate them; every other `$ref`
//! (parameters, request bodies, responses) is resolved in place.

use serde_json::Value as JsonValue;

use super::errors::DocumentError;
use super::types::{
    ApiInfo, Discriminator, Document, Field, HttpMethod, Operation, Parameter, ParameterLocation,
    PrimitiveType, RequestBody, Response, Schema, SchemaKind, TypeRef,
};

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
const JSON_MEDIA_TYPE: &str = "application/json";

/// OpenAPI specification parser
pub struct OpenApiParser {
    /// The raw JSON value of the OpenAPI spec
    pub json: JsonValue,
}

impl OpenApiParser {
    /// Create a new parser from JSON content
    pub fn new(json: JsonValue) -> Self {
        Self { json }
    }

    /// Parse the complete specification into a [`Document`]
    pub fn parse(&self) -> Result<Document, DocumentError> {
        let openapi_version = self
            .json
            .get("openapi")
            .or_else(|| self.json.get("swagger"))
            .and_then(JsonValue::as_str)
            .ok_or_else(|| DocumentError::Invalid("Missing OpenAPI version".to_string()))?
            .to_string();

        let info = ApiInfo {
            title: self.title().map(String::from),
            version: self
                .json
                .get("info")
                .and_then(|info| info.get("version"))
                .and_then(JsonValue::as_str)
                .map(String::from),
            description: self
                .json
                .get("info")
                .and_then(|info| info.get("description"))
                .and_then(JsonValue::as_str)
                .map(String::from),
        };

        let operations = self.parse_operations()?;
        let schemas = self.parse_schemas()?;
        tracing::debug!(
            "OpenAPI parser found {} operations and {} schemas",
            operations.len(),
            schemas.len()
        );

        Ok(Document {
            openapi_version,
            info,
            operations,
            schemas,
        })
    }

    /// Get the title of the API
    pub fn title(&self) -> Option<&str> {
        self.json.get("info")?.get("title")?.as_str()
    }

    /// Parse every operation under `paths`, in document order
    pub fn parse_operations(&self) -> Result<Vec<Operation>, DocumentError> {
        let paths = self
            .json
            .get("paths")
            .and_then(JsonValue::as_object)
            .ok_or_else(|| DocumentError::Invalid("Missing 'paths' object".to_string()))?;

        let mut operations = Vec::new();
        for (path, path_item) in paths {
            let Some(item) = path_item.as_object() else {
                continue;
            };
            for (key, method_item) in item {
                let Some(method) = HttpMethod::from_key(key) else {
                    continue;
                };
                let method_item = method_item.as_object().ok_or_else(|| {
                    DocumentError::Invalid(format!("Operation {method} {path} is not an object"))
                })?;
                operations.push(self.build_operation(path, method, path_item, method_item)?);
            }
        }

        Ok(operations)
    }

    /// Build an Operation from path, method, and method item
    fn build_operation(
        &self,
        path: &str,
        method: HttpMethod,
        path_item: &JsonValue,
        method_item: &serde_json::Map<String, JsonValue>,
    ) -> Result<Operation, DocumentError> {
        let id = method_item
            .get("operationId")
            .and_then(JsonValue::as_str)
            .map(String::from)
            .unwrap_or_else(|| {
                format!(
                    "{}_{}",
                    method,
                    path.trim_start_matches('/')
                        .replace('/', "_")
                        .replace(['{', '}'], "")
                )
            });

        // Path-level parameters first, overridden by method-level ones with the same name and location
        let mut parameters = self.extract_parameters(path_item)?;
        let method_value = JsonValue::Object(method_item.clone());
        for parameter in self.extract_parameters(&method_value)? {
            match parameters
                .iter_mut()
                .find(|p| p.name == parameter.name && p.location == parameter.location)
            {
                Some(existing) => *existing = parameter,
                None => parameters.push(parameter),
            }
        }

        let request_body = match method_item.get("requestBody") {
            Some(body) => self.parse_request_body(body)?,
            None => None,
        };

        let tags = method_item
            .get("tags")
            .and_then(JsonValue::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(JsonValue::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Operation {
            id,
            method,
            path: path.to_string(),
            summary: string_field(&method_value, "summary"),
            description: string_field(&method_value, "description"),
            tags,
            parameters,
            request_body,
            responses: self.extract_responses(method_item)?,
            deprecated: bool_field(&method_value, "deprecated"),
        })
    }

    /// Extracts parameters from a path item or operation, resolving any $ref references
    fn extract_parameters(&self, item: &JsonValue) -> Result<Vec<Parameter>, DocumentError> {
        let Some(params) = item.get("parameters").and_then(JsonValue::as_array) else {
            return Ok(Vec::new());
        };

        params
            .iter()
            .map(|param| {
                let resolved = self.resolve(param)?;
                self.parse_parameter(resolved)
            })
            .collect()
    }

    /// Parse a single parameter
    fn parse_parameter(&self, param: &JsonValue) -> Result<Parameter, DocumentError> {
        let name = param
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| DocumentError::Invalid("Parameter missing name".to_string()))?
            .to_string();

        let location = match param.get("in").and_then(JsonValue::as_str) {
            Some("path") => ParameterLocation::Path,
            Some("query") => ParameterLocation::Query,
            Some("header") => ParameterLocation::Header,
            Some("cookie") => ParameterLocation::Cookie,
            other => {
                return Err(DocumentError::Invalid(format!(
                    "Invalid location {other:?} for parameter '{name}'"
                )));
            }
        };

        // Parameters without a schema carry their type inline
        let type_ref = match param.get("schema") {
            Some(schema) => self.parse_type_ref(schema)?,
            None => self.parse_type_ref(param)?,
        };

        Ok(Parameter {
            required: bool_field(param, "required") || location == ParameterLocation::Path,
            deprecated: bool_field(param, "deprecated"),
            description: string_field(param, "description"),
            name,
            location,
            type_ref,
        })
    }

    /// Parse a request body; bodies without content produce no parameter
    fn parse_request_body(&self, body: &JsonValue) -> Result<Option<RequestBody>, DocumentError> {
        let body = self.resolve(body)?;
        let Some((content_type, schema)) = body.get("content").and_then(preferred_media) else {
            return Ok(None);
        };

        let type_ref = match schema {
            Some(schema) => self.parse_type_ref(schema)?,
            None => TypeRef::Any,
        };

        Ok(Some(RequestBody {
            type_ref,
            required: bool_field(body, "required"),
            content_type,
            description: string_field(body, "description"),
        }))
    }

    /// Extracts response definitions from an operation, in document order
    fn extract_responses(
        &self,
        method_item: &serde_json::Map<String, JsonValue>,
    ) -> Result<Vec<Response>, DocumentError> {
        let Some(responses) = method_item.get("responses").and_then(JsonValue::as_object) else {
            return Ok(Vec::new());
        };

        responses
            .iter()
            .map(|(status_code, response)| self.parse_response(status_code, response))
            .collect()
    }

    /// Parse a single response
    fn parse_response(
        &self,
        status_code: &str,
        response: &JsonValue,
    ) -> Result<Response, DocumentError> {
        let response = self.resolve(response)?;

        let type_ref = match response.get("content").and_then(preferred_media) {
            Some((_, Some(schema))) => Some(self.parse_type_ref(schema)?),
            Some((_, None)) => Some(TypeRef::Any),
            None => None,
        };

        Ok(Response {
            status_code: status_code.to_string(),
            description: string_field(response, "description")
                .unwrap_or_else(|| "No description".to_string()),
            type_ref,
        })
    }

    /// Turn an inline schema into a type reference
    fn parse_type_ref(&self, schema: &JsonValue) -> Result<TypeRef, DocumentError> {
        if let Some(ref_str) = schema.get("$ref").and_then(JsonValue::as_str) {
            if let Some(id) = schema_ref_id(ref_str) {
                return Ok(TypeRef::named(id));
            }
            let resolved = self.resolve_ref(ref_str)?;
            return self.parse_type_ref(resolved);
        }

        // Composition wrapping a single schema is transparent
        for key in ["allOf", "oneOf", "anyOf"] {
            if let Some(parts) = schema.get(key).and_then(JsonValue::as_array) {
                return match parts.as_slice() {
                    [single] => self.parse_type_ref(single),
                    _ => Ok(TypeRef::Any),
                };
            }
        }

        let format = schema.get("format").and_then(JsonValue::as_str);
        match type_name(schema) {
            Some("array") => {
                let item = match schema.get("items") {
                    Some(items) => self.parse_type_ref(items)?,
                    None => TypeRef::Any,
                };
                Ok(TypeRef::array(item))
            }
            Some("object") | None if schema.get("properties").is_some() => Ok(TypeRef::Any),
            Some("object") | None => match schema.get("additionalProperties") {
                Some(JsonValue::Bool(true)) => Ok(TypeRef::map(TypeRef::Any)),
                Some(values @ JsonValue::Object(_)) => {
                    Ok(TypeRef::map(self.parse_type_ref(values)?))
                }
                _ => Ok(TypeRef::Any),
            },
            Some(name) => Ok(primitive_type(name, format)
                .map(TypeRef::Primitive)
                .unwrap_or(TypeRef::Any)),
        }
    }

    /// Parse every entry of `components.schemas` and link derived types to their bases
    fn parse_schemas(&self) -> Result<Vec<Schema>, DocumentError> {
        let Some(entries) = self
            .json
            .get("components")
            .and_then(|components| components.get("schemas"))
            .and_then(JsonValue::as_object)
        else {
            return Ok(Vec::new());
        };

        let mut schemas = entries
            .iter()
            .map(|(id, value)| self.parse_schema(id, value))
            .collect::<Result<Vec<_>, _>>()?;

        let bases: Vec<(String, Option<String>)> = schemas
            .iter()
            .map(|s| (s.id.clone(), s.base.clone()))
            .collect();
        for schema in &mut schemas {
            let mut derived: Vec<String> = bases
                .iter()
                .filter(|(_, base)| base.as_deref() == Some(schema.id.as_str()))
                .map(|(id, _)| id.clone())
                .collect();
            if let Some(discriminator) = &schema.discriminator {
                for (_, target) in &discriminator.mapping {
                    if *target != schema.id && !derived.contains(target) {
                        derived.push(target.clone());
                    }
                }
            }
            schema.derived = derived;
        }

        Ok(schemas)
    }

    /// Parse a named schema object
    fn parse_schema(&self, id: &str, value: &JsonValue) -> Result<Schema, DocumentError> {
        let mut schema = Schema::new(id, SchemaKind::Object);
        schema.description = string_field(value, "description");
        schema.nullable = is_nullable(value);
        schema.deprecated = bool_field(value, "deprecated");
        schema.discriminator = self.parse_discriminator(value)?;

        if let Some(base) = value
            .get("$ref")
            .and_then(JsonValue::as_str)
            .and_then(schema_ref_id)
        {
            schema.base = Some(base.to_string());
            return Ok(schema);
        }

        if let Some(parts) = value.get("allOf").and_then(JsonValue::as_array) {
            for part in parts {
                match part
                    .get("$ref")
                    .and_then(JsonValue::as_str)
                    .and_then(schema_ref_id)
                {
                    Some(base) if schema.base.is_none() => schema.base = Some(base.to_string()),
                    Some(base) => {
                        tracing::debug!("Schema '{id}' ignores additional base '{base}'");
                    }
                    None => {
                        self.collect_fields(part, &mut schema)?;
                        if schema.discriminator.is_none() {
                            schema.discriminator = self.parse_discriminator(part)?;
                        }
                    }
                }
            }
            self.collect_fields(value, &mut schema)?;
            return Ok(schema);
        }

        let members = value
            .get("oneOf")
            .or_else(|| value.get("anyOf"))
            .and_then(JsonValue::as_array);
        if let Some(members) = members {
            if value.get("properties").is_none() {
                let members = members
                    .iter()
                    .map(|member| self.parse_type_ref(member))
                    .collect::<Result<Vec<_>, _>>()?;
                schema.kind = SchemaKind::Union(members);
                return Ok(schema);
            }
        }

        let format = value.get("format").and_then(JsonValue::as_str);
        if let Some(values) = value.get("enum").and_then(JsonValue::as_array) {
            let primitive = type_name(value)
                .and_then(|name| primitive_type(name, format))
                .unwrap_or(PrimitiveType::String);
            schema.kind = SchemaKind::Enum(primitive);
            schema.enum_members = values
                .iter()
                .filter(|v| !v.is_null())
                .map(|v| match v {
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            return Ok(schema);
        }

        match type_name(value) {
            Some("array") => {
                let item = match value.get("items") {
                    Some(items) => self.parse_type_ref(items)?,
                    None => TypeRef::Any,
                };
                schema.kind = SchemaKind::Array(item);
            }
            Some("object") | None => self.collect_fields(value, &mut schema)?,
            Some(name) => {
                if let Some(primitive) = primitive_type(name, format) {
                    schema.kind = SchemaKind::Primitive(primitive);
                }
            }
        }

        Ok(schema)
    }

    /// Append `properties` and `additionalProperties` of a schema fragment
    fn collect_fields(&self, value: &JsonValue, schema: &mut Schema) -> Result<(), DocumentError> {
        let required: Vec<&str> = value
            .get("required")
            .and_then(JsonValue::as_array)
            .map(|arr| arr.iter().filter_map(JsonValue::as_str).collect())
            .unwrap_or_default();

        if let Some(properties) = value.get("properties").and_then(JsonValue::as_object) {
            for (name, property) in properties {
                schema.fields.push(Field {
                    name: name.clone(),
                    type_ref: self.parse_type_ref(property)?,
                    required: required.contains(&name.as_str()),
                    nullable: is_nullable(property),
                    description: string_field(property, "description"),
                });
            }
        }

        match value.get("additionalProperties") {
            Some(JsonValue::Bool(true)) => schema.additional_properties = Some(TypeRef::Any),
            Some(values @ JsonValue::Object(_)) => {
                schema.additional_properties = Some(self.parse_type_ref(values)?);
            }
            _ => {}
        }

        Ok(())
    }

    fn parse_discriminator(&self, value: &JsonValue) -> Result<Option<Discriminator>, DocumentError> {
        let Some(discriminator) = value.get("discriminator") else {
            return Ok(None);
        };

        // Swagger 2 declares the discriminator as a bare property name
        if let Some(property_name) = discriminator.as_str() {
            return Ok(Some(Discriminator {
                property_name: property_name.to_string(),
                mapping: Vec::new(),
            }));
        }

        let property_name = discriminator
            .get("propertyName")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| {
                DocumentError::Invalid("Discriminator missing propertyName".to_string())
            })?
            .to_string();

        let mapping = discriminator
            .get("mapping")
            .and_then(JsonValue::as_object)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|(key, target)| {
                        let target = target.as_str()?;
                        let id = schema_ref_id(target).unwrap_or(target);
                        Some((key.clone(), id.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Some(Discriminator {
            property_name,
            mapping,
        }))
    }

    /// Follow a non-schema `$ref` until a concrete object is reached
    fn resolve<'a>(&'a self, value: &'a JsonValue) -> Result<&'a JsonValue, DocumentError> {
        let mut current = value;
        // Bounded to break reference cycles
        for _ in 0..32 {
            match current.get("$ref").and_then(JsonValue::as_str) {
                Some(ref_str) => current = self.resolve_ref(ref_str)?,
                None => return Ok(current),
            }
        }
        Err(DocumentError::UnresolvedReference(
            "reference chain is too deep or cyclic".to_string(),
        ))
    }

    /// Resolve a $ref reference
    fn resolve_ref(&self, ref_str: &str) -> Result<&JsonValue, DocumentError> {
        // Handle JSON pointer references (e.g., "#/components/parameters/limit")
        if let Some(pointer) = ref_str.strip_prefix('#') {
            self.json
                .pointer(pointer)
                .ok_or_else(|| DocumentError::UnresolvedReference(ref_str.to_string()))
        } else {
            Err(DocumentError::UnresolvedReference(format!(
                "external references are not supported: {ref_str}"
            )))
        }
    }
}

/// Schema identifier of a `#/components/schemas/...` reference
fn schema_ref_id(ref_str: &str) -> Option<&str> {
    ref_str
        .strip_prefix(SCHEMA_REF_PREFIX)
        .filter(|id| !id.is_empty() && !id.contains('/'))
}

/// Pick the JSON media type when present, otherwise the first declared one
fn preferred_media(content: &JsonValue) -> Option<(String, Option<&JsonValue>)> {
    let content = content.as_object()?;
    let (media_type, media) = content
        .iter()
        .find(|(media_type, _)| media_type.starts_with(JSON_MEDIA_TYPE))
        .or_else(|| content.iter().next())?;
    Some((media_type.clone(), media.get("schema")))
}

/// The `type` keyword, tolerating 3.1 type arrays such as `["string", "null"]`
fn type_name(schema: &JsonValue) -> Option<&str> {
    match schema.get("type")? {
        JsonValue::String(name) => Some(name.as_str()),
        JsonValue::Array(names) => names
            .iter()
            .filter_map(JsonValue::as_str)
            .find(|name| *name != "null"),
        _ => None,
    }
}

fn is_nullable(schema: &JsonValue) -> bool {
    bool_field(schema, "nullable")
        || schema
            .get("type")
            .and_then(JsonValue::as_array)
            .is_some_and(|names| names.iter().any(|n| n.as_str() == Some("null")))
}

fn primitive_type(name: &str, format: Option<&str>) -> Option<PrimitiveType> {
    let primitive = match (name, format) {
        ("string", Some("date")) => PrimitiveType::Date,
        ("string", Some("date-time")) => PrimitiveType::DateTime,
        ("string", Some("uuid")) => PrimitiveType::Uuid,
        ("string", Some("binary" | "byte")) => PrimitiveType::Binary,
        ("string", _) => PrimitiveType::String,
        ("integer", Some("int64")) => PrimitiveType::Int64,
        ("integer", _) => PrimitiveType::Int32,
        ("number", Some("float")) => PrimitiveType::Float,
        ("number", _) => PrimitiveType::Double,
        ("boolean", _) => PrimitiveType::Boolean,
        ("file", _) => PrimitiveType::Binary,
        _ => return None,
    };
    Some(primitive)
}

fn string_field(value: &JsonValue, key: &str) -> Option<String> {
    value.get(key).and_then(JsonValue::as_str).map(String::from)
}

fn bool_field(value: &JsonValue, key: &str) -> bool {
    value.get(key).and_then(JsonValue::as_bool).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ref_resolution() {
        let spec_json = json!({
            "openapi": "3.0.0",
            "info": { "title": "Test API", "version": "1.0.0" },
            "paths": {
                "/pets/{petId}": {
                    "get": {
                        "operationId": "getPet",
                        "parameters": [{ "$ref": "#/components/parameters/PetId" }],
                        "requestBody": { "$ref": "#/components/requestBodies/PetRequest" },
                        "responses": {
                            "200": { "$ref": "#/components/responses/PetResponse" }
                        }
                    }
                }
            },
            "components": {
                "parameters": {
                    "PetId": {
                        "name": "petId",
                        "in": "path",
                        "schema": { "type": "integer", "format": "int64" }
                    }
                },
                "schemas": {
                    "Pet": {
                        "type": "object",
                        "properties": { "name": { "type": "string" } }
                    }
                },
                "requestBodies": {
                    "PetRequest": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/Pet" }
                            }
                        }
                    }
                },
                "responses": {
                    "PetResponse": {
                        "description": "A pet",
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/Pet" }
                            }
                        }
                    }
                }
            }
        });

        let document = OpenApiParser::new(spec_json).parse().unwrap();
        assert_eq!(document.operations.len(), 1);
        let operation = &document.operations[0];

        let param = &operation.parameters[0];
        assert_eq!(param.name, "petId");
        assert!(param.required);
        assert_eq!(param.type_ref, TypeRef::Primitive(PrimitiveType::Int64));

        let body = operation.request_body.as_ref().unwrap();
        assert!(body.required);
        assert_eq!(body.content_type, "application/json");
        assert_eq!(body.type_ref, TypeRef::named("Pet"));

        let response = &operation.responses[0];
        assert_eq!(response.description, "A pet");
        assert_eq!(response.type_ref, Some(TypeRef::named("Pet")));
    }

    #[test]
    fn test_operations_keep_document_order_and_fallback_ids() {
        let spec_json = json!({
            "openapi": "3.0.0",
            "info": { "title": "Ordered" },
            "paths": {
                "/zeta": { "post": { "operationId": "createZeta", "responses": {} } },
                "/alpha/{id}": {
                    "parameters": [
                        { "name": "id", "in": "path", "schema": { "type": "string" } },
                        { "name": "trace", "in": "header", "schema": { "type": "string" } }
                    ],
                    "delete": {
                        "parameters": [
                            { "name": "trace", "in": "header", "required": true, "schema": { "type": "string" } }
                        ],
                        "responses": { "204": { "description": "gone" } }
                    },
                    "get": { "operationId": "getAlpha", "responses": {} }
                }
            }
        });

        let document = OpenApiParser::new(spec_json).parse().unwrap();
        let ids: Vec<&str> = document.operations.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["createZeta", "delete_alpha_id", "getAlpha"]);

        let delete = &document.operations[1];
        assert_eq!(delete.method, HttpMethod::Delete);
        assert_eq!(delete.parameters.len(), 2);
        assert!(delete.parameters[1].required);
        assert_eq!(delete.responses[0].type_ref, None);
    }

    #[test]
    fn test_inheritance_and_discriminator_mapping() {
        let spec_json = json!({
            "openapi": "3.0.0",
            "info": { "title": "Zoo" },
            "paths": {},
            "components": {
                "schemas": {
                    "Animal": {
                        "type": "object",
                        "required": ["kind"],
                        "properties": { "kind": { "type": "string" } },
                        "discriminator": {
                            "propertyName": "kind",
                            "mapping": {
                                "cat": "#/components/schemas/Cat",
                                "bird": "#/components/schemas/Bird"
                            }
                        }
                    },
                    "Cat": {
                        "allOf": [
                            { "$ref": "#/components/schemas/Animal" },
                            { "type": "object", "properties": { "lives": { "type": "integer" } } }
                        ]
                    },
                    "Dog": {
                        "allOf": [{ "$ref": "#/components/schemas/Animal" }]
                    }
                }
            }
        });

        let document = OpenApiParser::new(spec_json).parse().unwrap();
        let animal = document.schema("Animal").unwrap();
        assert_eq!(animal.derived, vec!["Cat", "Dog", "Bird"]);
        let discriminator = animal.discriminator.as_ref().unwrap();
        assert_eq!(discriminator.property_name, "kind");
        assert_eq!(
            discriminator.mapping,
            vec![
                ("cat".to_string(), "Cat".to_string()),
                ("bird".to_string(), "Bird".to_string())
            ]
        );
        assert!(animal.fields[0].required);

        let cat = document.schema("Cat").unwrap();
        assert_eq!(cat.base.as_deref(), Some("Animal"));
        assert_eq!(cat.fields.len(), 1);
        assert_eq!(cat.fields[0].type_ref, TypeRef::Primitive(PrimitiveType::Int32));
    }

    #[test]
    fn test_schema_kinds() {
        let spec_json = json!({
            "openapi": "3.1.0",
            "info": {},
            "paths": {},
            "components": {
                "schemas": {
                    "Status": { "type": "string", "enum": ["available", "sold", null] },
                    "Names": { "type": "array", "items": { "type": "string" } },
                    "Shape": {
                        "oneOf": [
                            { "$ref": "#/components/schemas/Circle" },
                            { "type": "integer" }
                        ]
                    },
                    "Stamp": { "type": "string", "format": "date-time" },
                    "Labels": {
                        "type": "object",
                        "properties": { "note": { "type": ["string", "null"] } },
                        "additionalProperties": { "type": "integer", "format": "int64" }
                    }
                }
            }
        });

        let document = OpenApiParser::new(spec_json).parse().unwrap();
        assert_eq!(document.info.title, None);

        let status = document.schema("Status").unwrap();
        assert_eq!(status.kind, SchemaKind::Enum(PrimitiveType::String));
        assert_eq!(status.enum_members, vec!["available", "sold"]);

        let names = document.schema("Names").unwrap();
        assert_eq!(
            names.kind,
            SchemaKind::Array(TypeRef::Primitive(PrimitiveType::String))
        );

        let shape = document.schema("Shape").unwrap();
        assert_eq!(
            shape.kind,
            SchemaKind::Union(vec![
                TypeRef::named("Circle"),
                TypeRef::Primitive(PrimitiveType::Int32)
            ])
        );

        let stamp = document.schema("Stamp").unwrap();
        assert_eq!(stamp.kind, SchemaKind::Primitive(PrimitiveType::DateTime));

        let labels = document.schema("Labels").unwrap();
        assert!(labels.fields[0].nullable);
        assert_eq!(
            labels.additional_properties,
            Some(TypeRef::Primitive(PrimitiveType::Int64))
        );
    }

    #[test]
    fn test_missing_paths_is_invalid() {
        let result = OpenApiParser::new(json!({ "openapi": "3.0.0", "info": {} })).parse();
        assert!(matches!(result, Err(DocumentError::Invalid(msg)) if msg.contains("paths")));
    }

    #[test]
    fn test_dangling_parameter_reference_is_reported() {
        let spec_json = json!({
            "openapi": "3.0.0",
            "info": {},
            "paths": {
                "/pets": {
                    "get": {
                        "parameters": [{ "$ref": "#/components/parameters/Missing" }],
                        "responses": {}
                    }
                }
            }
        });

        let result = OpenApiParser::new(spec_json).parse();
        assert!(matches!(
            result,
            Err(DocumentError::UnresolvedReference(reference)) if reference.contains("Missing")
        ));
    }

    #[test]
    fn test_petstore_fixture() {
        let petstore_json = include_str!("../../../tests/fixtures/openapi/petstore.json");
        let spec_json: JsonValue = serde_json::from_str(petstore_json).unwrap();

        let document = OpenApiParser::new(spec_json).parse().unwrap();
        assert_eq!(document.title(), Some("Bindsmith Petstore"));
        assert_eq!(document.operations.len(), 8);
        assert_eq!(document.schemas.len(), 12);

        let health = document.operation("get_health").unwrap();
        assert!(health.tags.is_empty());

        let legacy = document.operation("getLegacyPet").unwrap();
        assert!(legacy.deprecated);

        let delete = document.operation("deletePet").unwrap();
        assert_eq!(delete.tags, vec!["pets", "admin"]);
        assert_eq!(delete.parameters[1].location, ParameterLocation::Header);
    }
}
