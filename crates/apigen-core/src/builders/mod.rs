//! Builders turning the canonical model into template data.
//!
//! - [`functions`] assembles one function per endpoint and one file per group
//! - [`declarations`] builds the type declaration list
//! - [`imports`] collects the declared names each function file refers to

pub mod declarations;
pub mod functions;
pub mod imports;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub use declarations::DeclarationBuilder;
pub use functions::FunctionAssembler;
pub use imports::collect_imports;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z_$][A-Za-z0-9_$]*").expect("identifier pattern is valid")
});

/// Names that are never declared records
const BUILTIN_TYPES: [&str; 7] = ["number", "string", "boolean", "object", "any", "undefined", "Type"];

/// Prefix every declared name in a type expression with `namespace.`
///
/// `CommonResult<Role[]>` becomes `API.CommonResult<API.Role[]>`.
pub fn qualify_type_names(type_expr: &str, namespace: &str) -> String {
    IDENTIFIER
        .replace_all(type_expr, |caps: &Captures<'_>| {
            let name = &caps[0];
            if BUILTIN_TYPES.contains(&name) {
                name.to_string()
            } else {
                format!("{}.{}", namespace, name)
            }
        })
        .into_owned()
}
