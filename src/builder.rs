//! Node tree -> recipe structs.
//!
//! One struct per mapping level. Nested mappings become `<Parent>_<Field>`,
//! sequences of mappings become `<Parent>_<Field>Item` built from the first
//! element only. Everything else is typed by `inference::infer_type`.
use std::collections::HashSet;
use heck::ToUpperCamelCase;

use crate::comments::extract_comments;
use crate::inference::infer_type;
use crate::node::{Node, NodeKind};
use crate::recipe::{FieldDef, FieldType, StructDef};

pub const MERGE_KEY: &str = "<<";

/// Accumulator for a single recipe. Owns the set of struct names handed out
/// so far; create one per input document and drop it with the recipe.
pub struct RecipeBuilder {
    advanced: bool,
    taken: HashSet<String>,
}

impl RecipeBuilder {
    pub fn new(advanced: bool) -> Self {
        Self { advanced, taken: HashSet::new() }
    }

    /// Builds the struct for `node` and every struct nested below it.
    ///
    /// The returned list starts with the struct itself, followed by nested
    /// structs in field order (pre-order). `name` is disambiguated with a
    /// numeric suffix if this builder already handed it out.
    pub fn build_struct(&mut self, name: &str, node: &Node, doc: Vec<String>, is_root: bool) -> Vec<StructDef> {
        let name = self.claim(name);
        let entries: &[(Node, Node)] = match &node.kind {
            NodeKind::Mapping(entries) => entries,
            _ => &[],
        };

        let mut fields = Vec::with_capacity(entries.len());
        let mut field_names = HashSet::new();
        let mut nested = Vec::new();

        for (key, value) in entries {
            let original_name = key.value().to_string();
            if original_name == MERGE_KEY {
                tracing::warn!("Skipping merge key in {}: merged content is not expanded", name);
                continue;
            }

            let field_name = unique(&mut field_names, identifier(&original_name));
            if !original_name.is_empty() && field_name != identifier(&original_name) {
                tracing::warn!("Field `{}` in {} renamed to {} to avoid a collision", original_name, name, field_name);
            }
            let doc = extract_comments(key, value);

            let ty = match &value.kind {
                NodeKind::Mapping(_) if is_structured(value) => {
                    let candidate = format!("{name}_{field_name}");
                    let built = self.build_struct(&candidate, value, doc.clone(), false);
                    let ty = FieldType::optional(FieldType::Struct(first_name(&built, candidate)));
                    nested.extend(built);
                    ty
                }
                NodeKind::Sequence(items) => match items.first() {
                    Some(first) if is_structured(first) => {
                        let candidate = format!("{name}_{field_name}Item");
                        let built = self.build_struct(&candidate, first, doc.clone(), false);
                        let ty = FieldType::optional(FieldType::list(FieldType::Struct(first_name(&built, candidate))));
                        nested.extend(built);
                        ty
                    }
                    _ => infer_type(value, self.advanced, false),
                },
                _ => infer_type(value, self.advanced, false),
            };

            tracing::trace!("{}.{} ({}) -> {:?}", name, field_name, original_name, ty);
            fields.push(FieldDef { name: field_name, original_name, doc, ty });
        }

        tracing::debug!("Built struct {} with {} fields", name, fields.len());
        let mut out = Vec::with_capacity(1 + nested.len());
        out.push(StructDef { name, is_root, doc, fields });
        out.extend(nested);
        out
    }

    fn claim(&mut self, name: &str) -> String {
        let claimed = unique(&mut self.taken, name.to_string());
        if claimed != name {
            tracing::warn!("Struct name {} already used, emitting {}", name, claimed);
        }
        claimed
    }
}

/// UpperCamelCase identifier for a key. Keys that would not start with a
/// letter are prefixed with `X`.
pub fn identifier(raw: &str) -> String {
    let cased = raw.to_upper_camel_case();
    match cased.chars().next() {
        None => "X".to_string(),
        Some(c) if !c.is_alphabetic() => format!("X{cased}"),
        Some(_) => cased,
    }
}

/// Inserts `base` into `taken`, suffixing 2, 3, ... until it is free.
fn unique(taken: &mut HashSet<String>, base: String) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{base}{n}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn is_structured(node: &Node) -> bool {
    matches!(&node.kind, NodeKind::Mapping(entries) if !entries.is_empty())
}

fn first_name(built: &[StructDef], fallback: String) -> String {
    built.first().map(|s| s.name.clone()).unwrap_or(fallback)
}

// ------------------------------- Tests ------------------------------------ //
