//! JSON front-end. Same tree as YAML, minus comments.
use std::path::Path;
use serde_json::Value;

use crate::error::{ParseError, ParseResult};
use crate::node::{Node, ScalarTag};
use super::Parser;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonParser;

impl Parser for JsonParser {
    fn name(&self) -> &'static str { "json" }

    fn decode(&self, path: &Path, source: &str) -> ParseResult<Option<Node>> {
        if source.trim().is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(source).map_err(|e| ParseError::decode(path, e))?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(to_node(&value)))
    }
}

fn to_node(value: &Value) -> Node {
    match value {
        Value::Null => Node::scalar("null", ScalarTag::Null),
        Value::Bool(b) => Node::scalar(b.to_string(), ScalarTag::Bool),
        Value::Number(n) if n.is_f64() => Node::scalar(n.to_string(), ScalarTag::Float),
        Value::Number(n) => Node::scalar(n.to_string(), ScalarTag::Int),
        Value::String(s) => Node::scalar(s.clone(), ScalarTag::Str),
        Value::Array(items) => Node::sequence(items.iter().map(to_node).collect()),
        Value::Object(map) => Node::mapping(
            map.iter().map(|(k, v)| (Node::key(k.clone()), to_node(v))).collect()
        ),
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeCause;
    use crate::node::NodeKind;

    fn decode(src: &str) -> Option<Node> {
        JsonParser.decode(Path::new("values.json"), src).unwrap()
    }

    #[test]
    fn keys_keep_document_order() {
        let root = decode(r#"{"zeta": 1, "alpha": 2.5, "mid": {"x": true}}"#).unwrap();
        let NodeKind::Mapping(entries) = &root.kind else { panic!("expected mapping") };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.value()).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert!(matches!(&entries[0].1.kind, NodeKind::Scalar(s) if s.tag == ScalarTag::Int));
        assert!(matches!(&entries[1].1.kind, NodeKind::Scalar(s) if s.tag == ScalarTag::Float));
        assert!(entries.iter().all(|(k, _)| k.comments.is_empty()));
    }

    #[test]
    fn null_is_tagged_null() {
        let root = decode(r#"{"a": null}"#).unwrap();
        let NodeKind::Mapping(entries) = &root.kind else { panic!("expected mapping") };
        assert!(entries[0].1.is_null());
    }

    #[test]
    fn blank_and_null_documents_have_no_content() {
        assert!(decode("").is_none());
        assert!(decode("  \n").is_none());
        assert!(decode("null").is_none());
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let err = JsonParser.decode(Path::new("bad.json"), "{\"a\": ").unwrap_err();
        assert!(matches!(err, ParseError::Decode { source: DecodeCause::Json(_), .. }), "{err}");
    }
}
