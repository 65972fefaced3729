//! String helpers shared by the normalizer, resolver and builders

/// Marker appended to a type string to denote an array of that type
pub const ARRAY_MARKER: &str = "[]";

/// Primitive type strings that never need an import or declaration
pub const PRIMITIVE_TYPES: [&str; 3] = ["number", "string", "boolean"];

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Extract the schema name from a `#/components/<kind>/<Name>` reference
pub fn ref_name(reference: &str) -> Option<&str> {
    reference.split('/').nth(3).filter(|name| !name.is_empty())
}

/// Strip every trailing array marker (`Role[][]` -> `Role`)
pub fn strip_array_marker(type_name: &str) -> &str {
    let mut stem = type_name;
    while let Some(inner) = stem.strip_suffix(ARRAY_MARKER) {
        stem = inner;
    }
    stem
}

/// Whether the type string is a primitive or an array of primitives
pub fn is_primitive(type_name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&strip_array_marker(type_name))
}

/// Return the non-empty `/`-separated segment at `index` (`0` is the group segment)
pub fn path_segment(path: &str, index: usize) -> Option<&str> {
    path.split('/')
        .nth(index + 1)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}
