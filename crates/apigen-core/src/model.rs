//! Canonical model produced by the schema normalizer.
//!
//! The model is built once per document. Everything downstream (type names,
//! function descriptors, declarations) is a derived view. The only mutation
//! after normalization is the registration of synthetic query records, which
//! goes through [`ReferenceTable::get_or_create`] and is idempotent.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The atomic unit of the model: a property, parameter, body or response value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Property or parameter name
    pub name: String,
    /// Declared type (`number`, `string[]`, `Role[]`, ...)
    pub field_type: String,
    /// Whether the value is mandatory
    pub required: bool,
    /// Documentation text from the document
    pub description: Option<String>,
    /// Name of the referenced record when the value is itself a reference
    pub reference: Option<String>,
}

impl Field {
    /// A required field that points at another record
    pub fn reference(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: "object".to_string(),
            required: true,
            description: None,
            reference: Some(reference.into()),
        }
    }
}

/// Handle returned by [`ReferenceTable::get_or_create`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordHandle {
    /// Position of the record in the table
    pub index: usize,
    /// Name of the record
    pub name: String,
    /// Whether this call inserted the record
    pub created: bool,
}

/// Ordered mapping from reference name to its field list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    records: IndexMap<String, Vec<Field>>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field to the named record, creating the record on first use
    pub fn push_field(&mut self, record: &str, field: Field) {
        self.records
            .entry(record.to_string())
            .or_default()
            .push(field);
    }

    /// Return the existing record or insert one built from `fields`.
    ///
    /// `fields` is only invoked when the record does not exist yet, so repeated
    /// calls for the same name never alter the table.
    pub fn get_or_create<F>(&mut self, name: &str, fields: F) -> RecordHandle
    where
        F: FnOnce() -> Vec<Field>,
    {
        if let Some(index) = self.records.get_index_of(name) {
            return RecordHandle {
                index,
                name: name.to_string(),
                created: false,
            };
        }
        let (index, _) = self.records.insert_full(name.to_string(), fields());
        RecordHandle {
            index,
            name: name.to_string(),
            created: true,
        }
    }

    pub fn get(&self, name: &str) -> Option<&[Field]> {
        self.records.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Record names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Field])> {
        self.records
            .iter()
            .map(|(name, fields)| (name.as_str(), fields.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// HTTP methods the normalizer reads from a path item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Methods in the order they are visited for each path
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body of an endpoint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BodyData {
    /// First content type declared by the request body
    pub content_type: String,
    /// Body value, absent when the schema is neither a request record nor typed
    pub content: Option<Field>,
}

/// Request shape of an endpoint
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestData {
    pub path_variables: Vec<Field>,
    pub query_params: Vec<Field>,
    pub body: Option<BodyData>,
}

impl RequestData {
    /// The body value, if the body resolved to one
    pub fn body_content(&self) -> Option<&Field> {
        self.body.as_ref().and_then(|body| body.content.as_ref())
    }

    /// The content type declared by the request body
    pub fn content_type(&self) -> Option<&str> {
        self.body.as_ref().map(|body| body.content_type.as_str())
    }
}

/// One (path, method) operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    /// Path as declared, with `{name}` placeholders
    pub path: String,
    pub method: HttpMethod,
    pub description: Option<String>,
    pub request: RequestData,
    /// The `200` response, always a reference field
    pub response: Field,
}

/// Operations sharing a tag
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointGroup {
    /// Group name taken from the first path segment of the first operation
    pub name: String,
    /// Tag the operations were declared under
    pub tag: String,
    /// Description of the tag
    pub description: Option<String>,
    pub endpoints: Vec<Endpoint>,
}

/// Output of the schema normalizer
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiModel {
    pub references: ReferenceTable,
    pub groups: Vec<EndpointGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Field {
        Field {
            name: name.to_string(),
            field_type: "string".to_string(),
            required: false,
            description: None,
            reference: None,
        }
    }

    #[test]
    fn test_push_field_preserves_order() {
        let mut table = ReferenceTable::new();
        table.push_field("Role", field("name"));
        table.push_field("Admin", field("username"));
        table.push_field("Role", field("description"));

        assert_eq!(table.names().collect::<Vec<_>>(), vec!["Role", "Admin"]);
        let names: Vec<_> = table
            .get("Role")
            .unwrap()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "description"]);
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut table = ReferenceTable::new();
        table.push_field("Role", field("name"));

        let first = table.get_or_create("RoleListParam", || vec![field("keyword")]);
        assert!(first.created);
        assert_eq!(first.index, 1);

        let second = table.get_or_create("RoleListParam", || vec![field("other")]);
        assert!(!second.created);
        assert_eq!(second.index, first.index);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("RoleListParam").unwrap()[0].name, "keyword");
    }

    #[test]
    fn test_request_data_accessors() {
        let request = RequestData {
            body: Some(BodyData {
                content_type: "application/json".to_string(),
                content: Some(Field::reference("refName", "Role_request")),
            }),
            ..Default::default()
        };
        assert_eq!(request.content_type(), Some("application/json"));
        assert_eq!(
            request.body_content().and_then(|f| f.reference.as_deref()),
            Some("Role_request")
        );
    }
}
