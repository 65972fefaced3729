//! Cross-reference collection for function files.

use crate::resolver::TypeResolver;
use crate::templates::FunctionData;
use crate::utils::strip_array_marker;

/// Declared type names used by the functions of one file, deduplicated in
/// order of first appearance.
///
/// Parameter types are taken as they are. Return types are used directly in
/// plain mode; in generic mode every container prefix they contain is
/// collected, and the inner type left after peeling those prefixes is kept
/// when it is a known display name.
pub fn collect_imports(functions: &[FunctionData], resolver: &TypeResolver) -> Vec<String> {
    let prefixes = resolver.container_prefixes();
    let mut used: Vec<String> = Vec::new();

    for function in functions {
        used.extend(function.params.iter().map(|p| p.param_type.clone()));

        if prefixes.is_empty() {
            used.push(function.return_type.clone());
            continue;
        }

        let return_type = function.return_type.as_str();
        let mut remaining = return_type.to_string();
        for prefix in prefixes {
            if !return_type.contains(prefix.as_str()) {
                continue;
            }
            used.push(prefix.clone());
            let opener = format!("{}<", prefix);
            if remaining.contains(&opener) && remaining.ends_with('>') {
                remaining = remaining[..remaining.len() - 1].replacen(&opener, "", 1);
            }
        }
        used.push(remaining);
    }

    let mut imports: Vec<String> = Vec::new();
    for type_name in used {
        let stem = strip_array_marker(&type_name);
        let known = resolver.is_display_name(stem) || resolver.is_container_prefix(stem);
        if known && !imports.iter().any(|i| i == stem) {
            imports.push(stem.to_string());
        }
    }
    imports
}
