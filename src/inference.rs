//! Field type inference for a single document node.
//!
//! Two policies:
//! - permissive (default): everything is `Any`, collections become
//!   optional `[]Any` / `map[string]Any`. Never fails on odd shapes.
//! - advanced: scalars narrow by their resolved tag; sequences take the
//!   element type of their first item (homogeneity assumption).
//!
//! Structured mappings and sequences of mappings are not typed here; the
//! builder turns those into struct references before asking.
use crate::node::{Node, NodeKind, ScalarTag};
use crate::recipe::FieldType;

/// `nested` is true when the node is an element of a sequence. Elements
/// cannot be individually absent, so they are never wrapped in `Optional`.
pub fn infer_type(node: &Node, advanced: bool, nested: bool) -> FieldType {
    match &node.kind {
        NodeKind::Scalar(scalar) => {
            if !advanced || scalar.tag == ScalarTag::Null {
                return FieldType::Any;
            }
            let base = match scalar.tag {
                ScalarTag::Bool => FieldType::Bool,
                ScalarTag::Int => FieldType::Int,
                ScalarTag::Float => FieldType::Float,
                _ => FieldType::String,
            };
            if nested { base } else { FieldType::optional(base) }
        }
        NodeKind::Sequence(items) => match items.first() {
            Some(first) if advanced => {
                // element inference is always advanced, whatever the caller asked for
                FieldType::optional(FieldType::list(infer_type(first, true, true)))
            }
            _ => FieldType::optional(FieldType::list(FieldType::Any)),
        },
        NodeKind::Mapping(_) => FieldType::optional(FieldType::Map),
    }
}

// ------------------------------- Tests ------------------------------------ //
