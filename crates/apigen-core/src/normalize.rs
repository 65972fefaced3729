//! Schema normalizer.
//!
//! Walks an OpenAPI document and produces the canonical [`ApiModel`]: the
//! ordered reference table extracted from `components.schemas`, and the
//! endpoint groups built from tagged operations.
//!
//! The success response is read from exactly one place,
//! `responses."200".content."*/*".schema`, which must be a `$ref` (or a
//! single-member `allOf`/`oneOf`/`anyOf` wrapping one). Documents
//! that declare responses elsewhere are rejected with a structural error.

use indexmap::IndexMap;
use openapiv3::{
    AnySchema, OpenAPI, Operation, Parameter, ParameterData, ParameterSchemaOrContent, PathItem,
    ReferenceOr, RequestBody, Schema, SchemaKind, StatusCode, Type,
};

use crate::error::{Error, Result};
use crate::model::{
    ApiModel, BodyData, Endpoint, EndpointGroup, Field, HttpMethod, ReferenceTable, RequestData,
};
use crate::utils::{path_segment, ref_name};

/// Suffix marking a record as a request-shaped body object
pub const REQUEST_SUFFIX: &str = "request";

/// Content type the success response schema is read from
pub const RESPONSE_CONTENT_TYPE: &str = "*/*";

/// Normalize a document into the canonical model
pub fn normalize(document: &OpenAPI) -> Result<ApiModel> {
    SchemaNormalizer::new(document).normalize()
}

/// Borrowed view over a schema or a `$ref` to one
#[derive(Clone, Copy, Debug)]
enum SchemaView<'a> {
    Ref(&'a str),
    Item(&'a Schema),
}

impl<'a> From<&'a ReferenceOr<Schema>> for SchemaView<'a> {
    fn from(schema: &'a ReferenceOr<Schema>) -> Self {
        match schema {
            ReferenceOr::Reference { reference } => SchemaView::Ref(reference),
            ReferenceOr::Item(item) => SchemaView::Item(item),
        }
    }
}

impl<'a> From<&'a ReferenceOr<Box<Schema>>> for SchemaView<'a> {
    fn from(schema: &'a ReferenceOr<Box<Schema>>) -> Self {
        match schema {
            ReferenceOr::Reference { reference } => SchemaView::Ref(reference),
            ReferenceOr::Item(item) => SchemaView::Item(item),
        }
    }
}

impl<'a> SchemaView<'a> {
    /// Name of the referenced record, looking through single-member compositions
    fn reference(self) -> Option<&'a str> {
        match self {
            SchemaView::Ref(reference) => ref_name(reference),
            SchemaView::Item(schema) => match &schema.schema_kind {
                SchemaKind::AllOf { all_of: members }
                | SchemaKind::OneOf { one_of: members }
                | SchemaKind::AnyOf { any_of: members } => match members.as_slice() {
                    [only] => SchemaView::from(only).reference(),
                    _ => None,
                },
                _ => None,
            },
        }
    }

    fn description(self) -> Option<String> {
        match self {
            SchemaView::Ref(_) => None,
            SchemaView::Item(schema) => schema.schema_data.description.clone(),
        }
    }

    /// Whether the schema declares a type of its own
    fn is_typed(self) -> bool {
        match self {
            SchemaView::Ref(_) => false,
            SchemaView::Item(schema) => match &schema.schema_kind {
                SchemaKind::Type(_) => true,
                SchemaKind::Any(any) => any.typ.is_some(),
                _ => false,
            },
        }
    }

    /// Declared type string: primitives, `object`, `any`, references and `[]` arrays of them
    fn type_string(self) -> String {
        if let Some(name) = self.reference() {
            return name.to_string();
        }
        match self {
            SchemaView::Ref(reference) => reference.to_string(),
            SchemaView::Item(schema) => match &schema.schema_kind {
                SchemaKind::Type(typ) => type_string(typ),
                SchemaKind::Any(any) => any_type_string(any),
                _ => "any".to_string(),
            },
        }
    }
}

fn type_string(typ: &Type) -> String {
    match typ {
        Type::String(_) => "string".to_string(),
        Type::Number(_) | Type::Integer(_) => "number".to_string(),
        Type::Boolean(_) => "boolean".to_string(),
        Type::Object(_) => "object".to_string(),
        Type::Array(array) => array_type_string(array.items.as_ref()),
    }
}

fn any_type_string(any: &AnySchema) -> String {
    match any.typ.as_deref() {
        Some("integer") | Some("number") => "number".to_string(),
        Some("array") => array_type_string(any.items.as_ref()),
        Some(other) => other.to_string(),
        None if !any.properties.is_empty() => "object".to_string(),
        None => "any".to_string(),
    }
}

fn array_type_string(items: Option<&ReferenceOr<Box<Schema>>>) -> String {
    let item = items
        .map(|items| SchemaView::from(items).type_string())
        .unwrap_or_else(|| "any".to_string());
    format!("{}[]", item)
}

/// Properties and required names of an object-like schema
fn object_parts(schema: &Schema) -> Option<(Vec<(&str, SchemaView<'_>)>, &[String])> {
    let (properties, required) = match &schema.schema_kind {
        SchemaKind::Type(Type::Object(object)) => (&object.properties, &object.required),
        SchemaKind::Any(any) => (&any.properties, &any.required),
        _ => return None,
    };
    let properties = properties
        .iter()
        .map(|(name, schema)| (name.as_str(), SchemaView::from(schema)))
        .collect();
    Some((properties, required.as_slice()))
}

fn path_operation(item: &PathItem, method: HttpMethod) -> Option<&Operation> {
    match method {
        HttpMethod::Get => item.get.as_ref(),
        HttpMethod::Put => item.put.as_ref(),
        HttpMethod::Post => item.post.as_ref(),
        HttpMethod::Delete => item.delete.as_ref(),
        HttpMethod::Patch => item.patch.as_ref(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
}

fn parameter_parts(parameter: &Parameter) -> (ParamLocation, &ParameterData) {
    match parameter {
        Parameter::Path { parameter_data, .. } => (ParamLocation::Path, parameter_data),
        Parameter::Query { parameter_data, .. } => (ParamLocation::Query, parameter_data),
        Parameter::Header { parameter_data, .. } => (ParamLocation::Header, parameter_data),
        Parameter::Cookie { parameter_data, .. } => (ParamLocation::Cookie, parameter_data),
    }
}

fn parameter_field(data: &ParameterData) -> Field {
    let field_type = match &data.format {
        ParameterSchemaOrContent::Schema(schema) => SchemaView::from(schema).type_string(),
        ParameterSchemaOrContent::Content(_) => "string".to_string(),
    };
    Field {
        name: data.name.clone(),
        field_type,
        required: data.required,
        description: data.description.clone(),
        reference: None,
    }
}

/// One tagged operation awaiting grouping
struct TaggedOperation<'a> {
    path: &'a str,
    method: HttpMethod,
    item: &'a PathItem,
    operation: &'a Operation,
}

/// Builds the canonical model from a document
pub struct SchemaNormalizer<'a> {
    document: &'a OpenAPI,
}

impl<'a> SchemaNormalizer<'a> {
    pub fn new(document: &'a OpenAPI) -> Self {
        Self { document }
    }

    /// Run the normalizer. Fails on the first structural problem.
    pub fn normalize(&self) -> Result<ApiModel> {
        let references = self.extract_references();
        let buckets = self.collect_operations()?;

        let mut groups = Vec::with_capacity(buckets.len());
        for (tag, operations) in buckets {
            groups.push(self.build_group(tag, &operations, &references)?);
        }

        log::info!(
            "Normalized {} references and {} endpoint groups",
            references.len(),
            groups.len()
        );
        Ok(ApiModel { references, groups })
    }

    /// Every component schema with properties becomes a record
    pub fn extract_references(&self) -> ReferenceTable {
        let mut table = ReferenceTable::new();
        let Some(components) = &self.document.components else {
            return table;
        };

        for (record, schema) in &components.schemas {
            let ReferenceOr::Item(schema) = schema else {
                log::debug!("Skipping aliased schema '{}'", record);
                continue;
            };
            let Some((properties, required)) = object_parts(schema) else {
                log::debug!("Skipping non-object schema '{}'", record);
                continue;
            };
            for (name, property) in properties {
                table.push_field(
                    record,
                    Field {
                        name: name.to_string(),
                        field_type: property.type_string(),
                        required: required.iter().any(|r| r == name),
                        description: property.description(),
                        reference: property.reference().map(str::to_string),
                    },
                );
            }
        }
        table
    }

    /// Bucket tagged operations by tag, in first-seen order
    fn collect_operations(&self) -> Result<IndexMap<&'a str, Vec<TaggedOperation<'a>>>> {
        let mut buckets: IndexMap<&'a str, Vec<TaggedOperation<'a>>> = IndexMap::new();

        let document = self.document;
        for (path, item) in document.paths.paths.iter() {
            let ReferenceOr::Item(item) = item else {
                log::warn!("Skipping path '{}': path item references are not supported", path);
                continue;
            };
            for method in HttpMethod::ALL {
                let Some(operation) = path_operation(item, method) else {
                    continue;
                };
                if operation.tags.is_empty() {
                    log::warn!("Dropping untagged operation {} {}", method, path);
                    continue;
                }
                if !path.starts_with('/') || path_segment(path, 1).is_none() {
                    return Err(Error::structural(
                        format!("{} {}", method, path),
                        "path must start with '/' and contain a group and an operation segment",
                    ));
                }
                for tag in &operation.tags {
                    buckets.entry(tag.as_str()).or_default().push(TaggedOperation {
                        path,
                        method,
                        item,
                        operation,
                    });
                }
            }
        }
        Ok(buckets)
    }

    fn build_group(
        &self,
        tag: &str,
        operations: &[TaggedOperation<'a>],
        references: &ReferenceTable,
    ) -> Result<EndpointGroup> {
        // Buckets are only created on push, so there is always a first operation
        let name = operations
            .first()
            .and_then(|op| path_segment(op.path, 0))
            .ok_or_else(|| Error::structural(tag, "tag has no operations"))?
            .to_string();

        let description = self
            .document
            .tags
            .iter()
            .find(|t| t.name == tag)
            .and_then(|t| t.description.clone());

        let mut endpoints = Vec::with_capacity(operations.len());
        for op in operations {
            endpoints.push(Endpoint {
                path: op.path.to_string(),
                method: op.method,
                description: op
                    .operation
                    .summary
                    .clone()
                    .or_else(|| op.operation.description.clone()),
                request: self.request_data(op.item, op.operation, references),
                response: self.response_field(op.path, op.method, op.operation)?,
            });
        }

        log::debug!(
            "Group '{}' (tag '{}') has {} endpoints",
            name,
            tag,
            endpoints.len()
        );
        Ok(EndpointGroup {
            name,
            tag: tag.to_string(),
            description,
            endpoints,
        })
    }

    fn request_data(
        &self,
        item: &PathItem,
        operation: &Operation,
        references: &ReferenceTable,
    ) -> RequestData {
        let mut request = RequestData::default();
        for (location, data) in self.parameters(item, operation) {
            match location {
                ParamLocation::Path => request.path_variables.push(parameter_field(data)),
                ParamLocation::Query => request.query_params.push(parameter_field(data)),
                ParamLocation::Header | ParamLocation::Cookie => {}
            }
        }
        request.body = self.body_data(operation, references);
        request
    }

    /// Path-level parameters overridden by operation-level ones of the same name and location
    fn parameters<'p>(
        &'p self,
        item: &'p PathItem,
        operation: &'p Operation,
    ) -> Vec<(ParamLocation, &'p ParameterData)> {
        let mut merged: Vec<(ParamLocation, &ParameterData)> = Vec::new();
        let declared = item.parameters.iter().chain(operation.parameters.iter());
        for parameter in declared.filter_map(|p| self.resolve_parameter(p)) {
            let (location, data) = parameter_parts(parameter);
            match merged
                .iter_mut()
                .find(|(l, d)| *l == location && d.name == data.name)
            {
                Some(existing) => *existing = (location, data),
                None => merged.push((location, data)),
            }
        }
        merged
    }

    fn resolve_parameter<'p>(&'p self, parameter: &'p ReferenceOr<Parameter>) -> Option<&'p Parameter> {
        match parameter {
            ReferenceOr::Item(parameter) => Some(parameter),
            ReferenceOr::Reference { reference } => {
                let name = ref_name(reference)?;
                match self.document.components.as_ref()?.parameters.get(name)? {
                    ReferenceOr::Item(parameter) => Some(parameter),
                    ReferenceOr::Reference { .. } => None,
                }
            }
        }
    }

    fn resolve_request_body<'p>(&'p self, body: &'p ReferenceOr<RequestBody>) -> Option<&'p RequestBody> {
        match body {
            ReferenceOr::Item(body) => Some(body),
            ReferenceOr::Reference { reference } => {
                let name = ref_name(reference)?;
                match self.document.components.as_ref()?.request_bodies.get(name)? {
                    ReferenceOr::Item(body) => Some(body),
                    ReferenceOr::Reference { .. } => None,
                }
            }
        }
    }

    /// Body data from the first declared content type
    fn body_data(&self, operation: &Operation, references: &ReferenceTable) -> Option<BodyData> {
        let body = self.resolve_request_body(operation.request_body.as_ref()?)?;
        let (content_type, media) = body.content.first()?;

        let content = media.schema.as_ref().and_then(|schema| match SchemaView::from(schema) {
            SchemaView::Ref(reference) => ref_name(reference)
                .filter(|name| references.contains(name) && name.ends_with(REQUEST_SUFFIX))
                .map(|name| Field::reference("body", name)),
            view if view.is_typed() => Some(Field {
                name: "body".to_string(),
                field_type: view.type_string(),
                required: true,
                description: None,
                reference: None,
            }),
            _ => None,
        });

        Some(BodyData {
            content_type: content_type.clone(),
            content,
        })
    }

    fn response_field(&self, path: &str, method: HttpMethod, operation: &Operation) -> Result<Field> {
        let location = format!("{} {}", method, path);
        let response = operation
            .responses
            .responses
            .get(&StatusCode::Code(200))
            .ok_or_else(|| Error::structural(&location, "no \"200\" response"))?;
        let ReferenceOr::Item(response) = response else {
            return Err(Error::structural(
                &location,
                "the \"200\" response must be declared inline",
            ));
        };
        let media = response.content.get(RESPONSE_CONTENT_TYPE).ok_or_else(|| {
            Error::structural(
                &location,
                format!("the \"200\" response has no \"{}\" content", RESPONSE_CONTENT_TYPE),
            )
        })?;
        let name = media
            .schema
            .as_ref()
            .and_then(|schema| SchemaView::from(schema).reference())
            .ok_or_else(|| {
                Error::structural(&location, "the \"200\" response schema is not a $ref")
            })?;

        Ok(Field::reference(name, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> OpenAPI {
        serde_json::from_value(value).unwrap()
    }

    fn ok_response(schema: &str) -> serde_json::Value {
        json!({
            "200": {
                "description": "OK",
                "content": { "*/*": { "schema": { "$ref": format!("#/components/schemas/{}", schema) } } }
            }
        })
    }

    fn role_document() -> OpenAPI {
        document(json!({
            "openapi": "3.0.1",
            "info": { "title": "t", "version": "1" },
            "tags": [ { "name": "RoleController", "description": "Role management" } ],
            "paths": {
                "/role/list": {
                    "get": {
                        "tags": ["RoleController"],
                        "summary": "List roles",
                        "parameters": [
                            { "name": "keyword", "in": "query", "schema": { "type": "string" } },
                            { "name": "pageSize", "in": "query", "required": true, "schema": { "type": "integer" } },
                            { "name": "X-Token", "in": "header", "schema": { "type": "string" } }
                        ],
                        "responses": ok_response("CommonResultCommonPageRole")
                    }
                },
                "/role/update/{id}": {
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }
                    ],
                    "post": {
                        "tags": ["RoleController"],
                        "requestBody": {
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Role_request" } } }
                        },
                        "responses": ok_response("CommonResult")
                    }
                },
                "/role/untagged": {
                    "get": { "responses": ok_response("CommonResult") }
                }
            },
            "components": {
                "schemas": {
                    "Role_request": {
                        "type": "object",
                        "required": ["name"],
                        "properties": {
                            "name": { "type": "string", "description": "Role name" },
                            "sort": { "type": "integer" },
                            "tags": { "type": "array", "items": { "type": "integer" } },
                            "admins": { "type": "array", "items": { "$ref": "#/components/schemas/Admin" } },
                            "owner": { "$ref": "#/components/schemas/Admin" }
                        }
                    },
                    "Admin": { "properties": { "username": { "type": "string" } } },
                    "CommonResult": { "type": "object", "properties": { "code": { "type": "integer" } } },
                    "CommonResultCommonPageRole": { "type": "object", "properties": { "data": { "$ref": "#/components/schemas/Admin" } } },
                    "Empty": { "type": "object" }
                }
            }
        }))
    }

    #[test]
    fn test_extract_references() {
        let model = normalize(&role_document()).unwrap();
        let names: Vec<_> = model.references.names().collect();
        assert_eq!(
            names,
            vec!["Role_request", "Admin", "CommonResult", "CommonResultCommonPageRole"]
        );

        let fields = model.references.get("Role_request").unwrap();
        let summary: Vec<_> = fields
            .iter()
            .map(|f| (f.name.as_str(), f.field_type.as_str(), f.required))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("name", "string", true),
                ("sort", "number", false),
                ("tags", "number[]", false),
                ("admins", "Admin[]", false),
                ("owner", "Admin", false),
            ]
        );
        assert_eq!(fields[0].description.as_deref(), Some("Role name"));
        assert_eq!(fields[4].reference.as_deref(), Some("Admin"));
        assert_eq!(fields[3].reference, None);
    }

    #[test]
    fn test_grouping_and_requests() {
        let model = normalize(&role_document()).unwrap();
        assert_eq!(model.groups.len(), 1);

        let group = &model.groups[0];
        assert_eq!(group.name, "role");
        assert_eq!(group.tag, "RoleController");
        assert_eq!(group.description.as_deref(), Some("Role management"));
        assert_eq!(group.endpoints.len(), 2);

        let list = &group.endpoints[0];
        assert_eq!(list.method, HttpMethod::Get);
        assert_eq!(list.description.as_deref(), Some("List roles"));
        let query: Vec<_> = list.request.query_params.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(query, vec!["keyword", "pageSize"]);
        assert_eq!(list.request.query_params[1].field_type, "number");
        assert!(list.request.body.is_none());
        assert_eq!(list.response.reference.as_deref(), Some("CommonResultCommonPageRole"));

        let update = &group.endpoints[1];
        assert_eq!(update.method, HttpMethod::Post);
        assert_eq!(update.request.path_variables[0].name, "id");
        assert_eq!(update.request.content_type(), Some("application/json"));
        assert_eq!(
            update.request.body_content().and_then(|f| f.reference.as_deref()),
            Some("Role_request")
        );
    }

    #[test]
    fn test_group_name_comes_from_path_not_tag() {
        let doc = document(json!({
            "openapi": "3.0.1",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/admin/login": { "post": { "tags": ["UmsAdminController"], "responses": ok_response("R") } },
                "/role/list": { "get": { "tags": ["UmsAdminController"], "responses": ok_response("R") } }
            }
        }));
        let model = normalize(&doc).unwrap();
        assert_eq!(model.groups[0].name, "admin");
        assert_eq!(model.groups[0].tag, "UmsAdminController");
        assert_eq!(model.groups[0].description, None);
        assert_eq!(model.groups[0].endpoints.len(), 2);
    }

    #[test]
    fn test_body_rules() {
        let doc = document(json!({
            "openapi": "3.0.1",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/a/plain": { "post": { "tags": ["a"], "responses": ok_response("R"),
                    "requestBody": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Role" } } } } } },
                "/a/scalar": { "post": { "tags": ["a"], "responses": ok_response("R"),
                    "requestBody": { "content": { "multipart/form-data": { "schema": { "type": "string" } } } } } },
                "/a/untyped": { "post": { "tags": ["a"], "responses": ok_response("R"),
                    "requestBody": { "content": { "application/json": { } } } } }
            },
            "components": { "schemas": { "Role": { "properties": { "name": { "type": "string" } } } } }
        }));
        let model = normalize(&doc).unwrap();
        let endpoints = &model.groups[0].endpoints;

        // a reference without the request suffix yields no body value
        assert_eq!(endpoints[0].request.content_type(), Some("application/json"));
        assert!(endpoints[0].request.body_content().is_none());

        let scalar = endpoints[1].request.body_content().unwrap();
        assert_eq!(scalar.field_type, "string");
        assert_eq!(scalar.reference, None);
        assert_eq!(endpoints[1].request.content_type(), Some("multipart/form-data"));

        assert!(endpoints[2].request.body_content().is_none());
    }

    #[test]
    fn test_missing_success_response_is_structural() {
        let doc = document(json!({
            "openapi": "3.0.1",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/role/list": { "get": { "tags": ["r"], "responses": {
                    "200": { "description": "OK", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/R" } } } }
                } } }
            }
        }));
        let err = normalize(&doc).unwrap_err();
        assert!(matches!(err, Error::Structural { ref location, .. } if location == "get /role/list"));
    }

    #[test]
    fn test_inline_response_schema_is_structural() {
        let doc = document(json!({
            "openapi": "3.0.1",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/role/list": { "get": { "tags": ["r"], "responses": {
                    "200": { "description": "OK", "content": { "*/*": { "schema": { "type": "string" } } } }
                } } }
            }
        }));
        assert!(matches!(normalize(&doc), Err(Error::Structural { .. })));
    }

    #[test]
    fn test_single_segment_path_is_structural() {
        let doc = document(json!({
            "openapi": "3.0.1",
            "info": { "title": "t", "version": "1" },
            "paths": { "/health": { "get": { "tags": ["h"], "responses": ok_response("R") } } }
        }));
        assert!(matches!(normalize(&doc), Err(Error::Structural { .. })));
    }

    #[test]
    fn test_operation_parameter_overrides_path_parameter() {
        let doc = document(json!({
            "openapi": "3.0.1",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/role/get/{id}": {
                    "parameters": [ { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } } ],
                    "get": {
                        "tags": ["r"],
                        "parameters": [ { "$ref": "#/components/parameters/RoleId" } ],
                        "responses": ok_response("R")
                    }
                }
            },
            "components": {
                "parameters": {
                    "RoleId": { "name": "id", "in": "path", "required": true, "description": "Role id", "schema": { "type": "integer" } }
                }
            }
        }));
        let model = normalize(&doc).unwrap();
        let vars = &model.groups[0].endpoints[0].request.path_variables;
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].field_type, "number");
        assert_eq!(vars[0].description.as_deref(), Some("Role id"));
    }

    #[test]
    fn test_operation_with_several_tags_joins_each_group() {
        let doc = document(json!({
            "openapi": "3.0.1",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/role/allocMenu": { "post": { "tags": ["RoleController", "MenuController"], "responses": ok_response("R") } },
                "/role/list": { "get": { "tags": ["RoleController"], "responses": ok_response("R") } }
            }
        }));
        let model = normalize(&doc).unwrap();
        let tags: Vec<_> = model.groups.iter().map(|g| g.tag.as_str()).collect();
        assert_eq!(tags, vec!["RoleController", "MenuController"]);

        let paths = |group: &EndpointGroup| -> Vec<String> {
            group.endpoints.iter().map(|e| e.path.clone()).collect()
        };
        assert_eq!(paths(&model.groups[0]), vec!["/role/allocMenu", "/role/list"]);
        assert_eq!(paths(&model.groups[1]), vec!["/role/allocMenu"]);
        assert_eq!(model.groups[1].name, "role");
    }

    #[test]
    fn test_single_member_composition_is_a_reference() {
        let doc = document(json!({
            "openapi": "3.0.1",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/role/owner": { "get": { "tags": ["r"], "responses": {
                    "200": { "description": "OK", "content": { "*/*": { "schema": {
                        "allOf": [ { "$ref": "#/components/schemas/CommonResult" } ]
                    } } } }
                } } }
            },
            "components": {
                "schemas": {
                    "Role": {
                        "properties": {
                            "owner": { "description": "Owner", "allOf": [ { "$ref": "#/components/schemas/Admin" } ] },
                            "either": { "oneOf": [
                                { "$ref": "#/components/schemas/Admin" },
                                { "$ref": "#/components/schemas/Role" }
                            ] }
                        }
                    },
                    "Admin": { "properties": { "username": { "type": "string" } } },
                    "CommonResult": { "properties": { "code": { "type": "integer" } } }
                }
            }
        }));
        let model = normalize(&doc).unwrap();

        let fields = model.references.get("Role").unwrap();
        let field = |name: &str| fields.iter().find(|f| f.name == name).unwrap();
        assert_eq!(field("owner").field_type, "Admin");
        assert_eq!(field("owner").reference.as_deref(), Some("Admin"));
        assert_eq!(field("owner").description.as_deref(), Some("Owner"));
        assert_eq!(field("either").field_type, "any");
        assert_eq!(field("either").reference, None);

        let response = &model.groups[0].endpoints[0].response;
        assert_eq!(response.reference.as_deref(), Some("CommonResult"));
    }

    #[test]
    fn test_request_body_reference_is_resolved() {
        let doc = document(json!({
            "openapi": "3.0.1",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/role/create": { "post": {
                    "tags": ["r"],
                    "requestBody": { "$ref": "#/components/requestBodies/RoleBody" },
                    "responses": ok_response("R")
                } },
                "/role/missing": { "post": {
                    "tags": ["r"],
                    "requestBody": { "$ref": "#/components/requestBodies/Missing" },
                    "responses": ok_response("R")
                } }
            },
            "components": {
                "schemas": {
                    "Role_request": { "properties": { "name": { "type": "string" } } }
                },
                "requestBodies": {
                    "RoleBody": {
                        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Role_request" } } }
                    }
                }
            }
        }));
        let model = normalize(&doc).unwrap();
        let endpoints = &model.groups[0].endpoints;

        assert_eq!(endpoints[0].request.content_type(), Some("application/json"));
        assert_eq!(
            endpoints[0].request.body_content().and_then(|f| f.reference.as_deref()),
            Some("Role_request")
        );
        assert!(endpoints[1].request.body.is_none());
    }
}
