//! Type declaration building.

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::config::GeneratorConfig;
use crate::model::{Field, ReferenceTable};
use crate::resolver::{TypeResolver, TYPE_VARIABLE};
use crate::rules::order_by_rules;
use crate::templates::{ScopeFlags, TypeData, TypeFileData, TypeProp};
use crate::utils::{is_primitive, strip_array_marker, ARRAY_MARKER};

/// Name of the generated declaration file
pub const TYPES_FILE_NAME: &str = "typings.d.ts";

/// Builds the declaration list from the reference table
pub struct DeclarationBuilder<'a> {
    config: &'a GeneratorConfig,
    resolver: &'a TypeResolver,
}

impl<'a> DeclarationBuilder<'a> {
    pub fn new(config: &'a GeneratorConfig, resolver: &'a TypeResolver) -> Self {
        Self { config, resolver }
    }

    /// Declarations for every record, named, deduplicated and ordered
    pub fn build(&self, references: &ReferenceTable) -> TypeFileData {
        let mut declarations: IndexMap<String, TypeData> = IndexMap::with_capacity(references.len());

        for (reference, fields) in references.iter() {
            let declaration = self.declaration(reference, fields);
            match declarations.entry(declaration.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(declaration);
                }
                Entry::Occupied(kept) => {
                    if kept.get().props != declaration.props {
                        log::warn!(
                            "Record '{}' collapses into '{}' with different properties; keeping the first",
                            reference,
                            kept.key()
                        );
                    } else {
                        log::debug!("Record '{}' collapses into '{}'", reference, kept.key());
                    }
                }
            }
        }

        let types = order_by_rules(
            declarations.into_values().collect::<Vec<_>>(),
            &self.config.type_order_rules,
            |t| t.name.as_str(),
        );

        log::info!("Built {} type declarations", types.len());
        TypeFileData {
            file_name: TYPES_FILE_NAME.to_string(),
            types,
            scope: ScopeFlags::from(self.config.type_scope),
            namespace_id: self.config.namespace_id.clone(),
        }
    }

    fn declaration(&self, reference: &str, fields: &[Field]) -> TypeData {
        let container = self.resolver.container_prefix(reference).is_some();
        TypeData {
            name: self.resolver.declaration_name(reference),
            location: reference.split('_').nth(1).map(str::to_string),
            props: fields
                .iter()
                .map(|field| TypeProp {
                    name: field.name.clone(),
                    prop_type: self.prop_type(field, container),
                    required: field.required,
                    description: field.description.clone(),
                })
                .collect(),
        }
    }

    /// Property type: the type variable for non-primitive members of a
    /// container, otherwise the display name of whatever the field refers to
    fn prop_type(&self, field: &Field, container: bool) -> String {
        if container && !is_primitive(&field.field_type) {
            return TYPE_VARIABLE.to_string();
        }
        if let Some(reference) = &field.reference {
            return self.resolver.type_name(reference);
        }

        let stem = strip_array_marker(&field.field_type);
        match self.resolver.display_name(stem) {
            Some(display) => {
                let depth = (field.field_type.len() - stem.len()) / ARRAY_MARKER.len();
                format!("{}{}", display, ARRAY_MARKER.repeat(depth))
            }
            None => field.field_type.clone(),
        }
    }
}
