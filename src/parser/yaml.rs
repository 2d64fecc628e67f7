//! YAML front-end: `serde_yaml_ng` for structure, [`scan`] for comments.
pub mod scan;

use std::path::Path;
use serde::Deserialize;
use serde_yaml_ng::Value;

use crate::error::{DecodeCause, ParseError, ParseResult};
use crate::node::{Node, ScalarTag};
use super::Parser;
use scan::{Layout, NodePath, Segment};

#[derive(Debug, Default, Clone, Copy)]
pub struct YamlParser;

impl Parser for YamlParser {
    fn name(&self) -> &'static str { "yaml" }

    fn decode(&self, path: &Path, source: &str) -> ParseResult<Option<Node>> {
        // first document only; later ones are ignored
        let Some(document) = serde_yaml_ng::Deserializer::from_str(source).next() else {
            return Ok(None);
        };
        let value = Value::deserialize(document).map_err(|e| ParseError::decode(path, e))?;
        if value.is_null() {
            return Ok(None);
        }
        let layout = scan::scan(source);
        let node = to_node(&value, &mut Vec::new(), &layout).map_err(|e| ParseError::decode(path, e))?;
        Ok(Some(node))
    }
}

fn to_node(value: &Value, path: &mut NodePath, layout: &Layout) -> Result<Node, DecodeCause> {
    let node = match value {
        Value::Null => Node::scalar(layout.raw(path).unwrap_or_default(), ScalarTag::Null),
        Value::Bool(b) => Node::scalar(literal(layout, path, b), ScalarTag::Bool),
        Value::Number(n) => {
            let tag = if n.is_f64() { ScalarTag::Float } else { ScalarTag::Int };
            Node::scalar(literal(layout, path, n), tag)
        }
        Value::String(s) => Node::scalar(s.clone(), ScalarTag::Str),
        Value::Sequence(items) => {
            let mut nodes = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                path.push(Segment::Index(index));
                let node = to_node(item, path, layout);
                path.pop();
                nodes.push(node?);
            }
            Node::sequence(nodes)
        }
        Value::Mapping(mapping) => {
            let mut entries = Vec::with_capacity(mapping.len());
            for (k, v) in mapping {
                let key = key_text(k)?;
                path.push(Segment::Key(key.clone()));
                let key_node = Node::key(key).with_comments(layout.comments(path));
                let value_node = to_node(v, path, layout);
                path.pop();
                entries.push((key_node, value_node?));
            }
            Node::mapping(entries)
        }
        Value::Tagged(tagged) => {
            let mut node = to_node(&tagged.value, path, layout)?;
            if let crate::node::NodeKind::Scalar(scalar) = &mut node.kind {
                scalar.tag = ScalarTag::Other(tagged.tag.to_string());
            }
            node
        }
    };
    Ok(node)
}

/// Literal as written when the scanner saw it, the decoded value otherwise.
fn literal(layout: &Layout, path: &[Segment], decoded: impl ToString) -> String {
    layout.raw(path).map(unquote).unwrap_or_else(|| decoded.to_string())
}

/// `!!int "3"` and friends: the literal without its quotes.
fn unquote(raw: &str) -> String {
    for quote in ['"', '\''] {
        if let Some(inner) = raw.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner.to_string();
        }
    }
    raw.to_string()
}

fn key_text(key: &Value) -> Result<String, DecodeCause> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Tagged(tagged) => key_text(&tagged.value),
        Value::Sequence(_) => Err(DecodeCause::UnsupportedKey { kind: "sequence" }),
        Value::Mapping(_) => Err(DecodeCause::UnsupportedKey { kind: "mapping" }),
    }
}

// ------------------------------- Tests ------------------------------------ //
