//! Template-specific types for code generation

use serde::Serialize;

use crate::config::TypeScope;
use crate::model::{Field, HttpMethod};

/// Scope flags handed to templates; exactly one is set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScopeFlags {
    pub module: bool,
    pub namespace: bool,
    pub global: bool,
}

impl From<TypeScope> for ScopeFlags {
    fn from(scope: TypeScope) -> Self {
        Self {
            module: scope == TypeScope::Module,
            namespace: scope == TypeScope::Namespace,
            global: scope == TypeScope::Global,
        }
    }
}

/// One parameter of a generated function
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionParam {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub required: bool,
    pub description: Option<String>,
    /// Whether the type names a declared record rather than a primitive
    pub is_ref_type: bool,
}

impl FunctionParam {
    /// A required parameter typed by a declared record
    pub fn reference(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            required: true,
            description: None,
            is_ref_type: true,
        }
    }
}

impl From<&Field> for FunctionParam {
    fn from(field: &Field) -> Self {
        Self {
            name: field.name.clone(),
            param_type: field.field_type.clone(),
            required: field.required,
            description: field.description.clone(),
            is_ref_type: false,
        }
    }
}

/// One generated function
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionData {
    pub name: String,
    pub description: Option<String>,
    pub params: Vec<FunctionParam>,
    pub return_type: String,
    /// Request URL as a template literal body (`/role/${id}`)
    pub url: String,
    pub method: HttpMethod,
    pub path_variables: Vec<FunctionParam>,
    /// Query-derived parameters sent as `params` (GET only)
    pub query_params: Vec<FunctionParam>,
    /// Parameters sent as `data`: the body value, or query-derived values off GET
    pub body_data: Vec<FunctionParam>,
    /// Content type written as a request header, when allowed
    pub content_type: Option<String>,
    /// Expression passed as `params`
    pub params_payload: Option<String>,
    /// Expression passed as `data`
    pub data_payload: Option<String>,
}

/// Data for one function file
#[derive(Clone, Debug, Serialize)]
pub struct FunctionFileData {
    pub file_name: String,
    pub group: String,
    pub tag: String,
    pub description: Option<String>,
    pub file_heads: Vec<String>,
    /// Type names the file imports from the declaration file
    pub imports: Vec<String>,
    pub functions: Vec<FunctionData>,
    pub scope: ScopeFlags,
    pub namespace_id: String,
    /// Whether signatures carry type annotations
    pub typed: bool,
    pub aggregated: bool,
}

/// One property of a declaration
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeProp {
    pub name: String,
    #[serde(rename = "type")]
    pub prop_type: String,
    pub required: bool,
    pub description: Option<String>,
}

/// One type declaration
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeData {
    pub name: String,
    /// Where the record is used, from the `_request`/`_response` suffix
    pub location: Option<String>,
    pub props: Vec<TypeProp>,
}

/// Data for the declaration file
#[derive(Clone, Debug, Serialize)]
pub struct TypeFileData {
    pub file_name: String,
    pub types: Vec<TypeData>,
    pub scope: ScopeFlags,
    pub namespace_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_flags() {
        let flags = ScopeFlags::from(TypeScope::Namespace);
        assert!(flags.namespace);
        assert!(!flags.module);
        assert!(!flags.global);
    }

    #[test]
    fn test_param_serializes_type_key() {
        let param = FunctionParam::reference("params", "RoleListParam");
        let value = serde_json::to_value(&param).unwrap();
        assert_eq!(value["type"], "RoleListParam");
        assert_eq!(value["is_ref_type"], true);
        assert!(value["description"].is_null());
    }
}
