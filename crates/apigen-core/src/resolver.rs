//! Type name resolution.
//!
//! Every reference name maps to the display name used in function
//! signatures and import lists. In generic mode, names that start with a
//! container type are folded into generic syntax before the naming-fix rules
//! run:
//!
//! ```
//! use apigen_core::resolver::fold_generics;
//!
//! let prefixes = vec!["CommonResult".to_string(), "CommonPage".to_string()];
//! assert_eq!(
//!     fold_generics("CommonResultCommonPageRole", &prefixes),
//!     "CommonResult<CommonPage<Role>>"
//! );
//! ```

use indexmap::IndexMap;

use crate::config::GeneratorConfig;
use crate::model::ReferenceTable;
use crate::rules::{fix_type_name, FixRule};

/// Type variable used by container declarations
pub const TYPE_VARIABLE: &str = "Type";

/// Fold container prefixes into generic syntax.
///
/// Each prefix the name starts with gets a `<` inserted after it and a `>`
/// appended. With several prefixes, a name that then starts with all of them
/// joined by `<` is folded once more after that join.
pub fn fold_generics(name: &str, prefixes: &[String]) -> String {
    let mut folded = name.to_string();
    for prefix in prefixes {
        if let Some(rest) = folded.strip_prefix(prefix.as_str()) {
            folded = format!("{}<{}>", prefix, rest);
        }
    }

    if prefixes.len() > 1 {
        let joined = prefixes.join("<");
        if let Some(rest) = folded.strip_prefix(joined.as_str()) {
            folded = format!("{}<{}>", joined, rest);
        }
    }
    folded
}

/// Reference name to display name mapping
#[derive(Clone, Debug)]
pub struct TypeResolver {
    /// Container prefixes, empty outside generic mode
    prefixes: Vec<String>,
    rules: Vec<FixRule>,
    names: IndexMap<String, String>,
}

impl TypeResolver {
    /// Resolve every record of the table up front
    pub fn new(config: &GeneratorConfig, references: &ReferenceTable) -> Self {
        let prefixes = if config.generics_enabled() {
            config.container_types.clone()
        } else {
            Vec::new()
        };
        let mut resolver = Self {
            prefixes,
            rules: config.type_name_rules.clone(),
            names: IndexMap::with_capacity(references.len()),
        };
        for name in references.names() {
            resolver.register(name);
        }
        resolver
    }

    /// Pure resolution: generic folding, then the naming-fix rules
    pub fn resolve_name(&self, reference: &str) -> String {
        fix_type_name(&self.rules, &fold_generics(reference, &self.prefixes))
    }

    /// Add a reference to the mapping; an existing entry is left untouched
    pub fn register(&mut self, reference: &str) -> &str {
        if !self.names.contains_key(reference) {
            let display = self.resolve_name(reference);
            log::debug!("Resolved type '{}' as '{}'", reference, display);
            self.names.insert(reference.to_string(), display);
        }
        // Present after the insert above
        self.names
            .get(reference)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Display name of a registered reference
    pub fn display_name(&self, reference: &str) -> Option<&str> {
        self.names.get(reference).map(String::as_str)
    }

    /// Display name of a reference, resolving unregistered ones on the fly
    pub fn type_name(&self, reference: &str) -> String {
        self.display_name(reference)
            .map(str::to_string)
            .unwrap_or_else(|| self.resolve_name(reference))
    }

    /// Whether `name` is the display name of a registered reference
    pub fn is_display_name(&self, name: &str) -> bool {
        self.names.values().any(|display| display == name)
    }

    /// Container prefixes in effect (empty outside generic mode)
    pub fn container_prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_container_prefix(&self, name: &str) -> bool {
        self.prefixes.iter().any(|prefix| prefix == name)
    }

    /// The last container prefix the reference starts with
    pub fn container_prefix(&self, reference: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .rev()
            .find(|prefix| reference.starts_with(prefix.as_str()))
            .map(String::as_str)
    }

    /// Name a record is declared under: `Prefix<Type>` for containers in
    /// generic mode, the reference name otherwise, then the naming-fix rules
    pub fn declaration_name(&self, reference: &str) -> String {
        let name = match self.container_prefix(reference) {
            Some(prefix) => format!("{}<{}>", prefix, TYPE_VARIABLE),
            None => reference.to_string(),
        };
        fix_type_name(&self.rules, &name)
    }

    /// Registered references and their display names, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(r, d)| (r.as_str(), d.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
