//! Document tree shared by every input front-end.
//!
//! Mirrors the shape of a decoded YAML/JSON document closely enough for
//! inference: scalars keep their raw literal and resolved tag, collections
//! keep source order, and comments ride on the nodes they annotate (in
//! practice the key nodes of a mapping).

/// Resolved scalar type, as the decoder saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarTag {
    Null,
    Bool,
    Int,
    Float,
    Str,
    /// Any non-core tag (`!foo`, `!!binary`, ...).
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    /// Literal text as written in the source (quotes removed for strings).
    pub value: String,
    pub tag: ScalarTag,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(Vec<(Node, Node)>),
}

/// Comment text attached to a node. Empty strings mean "no comment".
/// Multi-line comments are joined with `\n` and keep their `#` markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    pub head: String,
    pub line: String,
    pub foot: String,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.line.is_empty() && self.foot.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub comments: Comments,
}

impl Node {
    pub fn scalar(value: impl Into<String>, tag: ScalarTag) -> Self {
        Self::from_kind(NodeKind::Scalar(Scalar { value: value.into(), tag }))
    }
    pub fn sequence(items: Vec<Node>) -> Self { Self::from_kind(NodeKind::Sequence(items)) }
    pub fn mapping(entries: Vec<(Node, Node)>) -> Self { Self::from_kind(NodeKind::Mapping(entries)) }

    /// Plain string key, the common case when building trees by hand.
    pub fn key(name: impl Into<String>) -> Self { Self::scalar(name, ScalarTag::Str) }

    fn from_kind(kind: NodeKind) -> Self {
        Self { kind, comments: Comments::default() }
    }

    pub fn with_comments(mut self, comments: Comments) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_head_comment(mut self, text: impl Into<String>) -> Self {
        self.comments.head = text.into();
        self
    }

    pub fn with_line_comment(mut self, text: impl Into<String>) -> Self {
        self.comments.line = text.into();
        self
    }

    pub fn with_foot_comment(mut self, text: impl Into<String>) -> Self {
        self.comments.foot = text.into();
        self
    }

    /// Raw literal of a scalar; collections have none.
    pub fn value(&self) -> &str {
        match &self.kind {
            NodeKind::Scalar(s) => &s.value,
            _ => "",
        }
    }

    /// True when the node has children. Scalars and empty collections are leaves.
    pub fn has_content(&self) -> bool {
        match &self.kind {
            NodeKind::Scalar(_) => false,
            NodeKind::Sequence(items) => !items.is_empty(),
            NodeKind::Mapping(entries) => !entries.is_empty(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(&self.kind, NodeKind::Scalar(Scalar { tag: ScalarTag::Null, .. }))
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Scalar(_) => "scalar",
            NodeKind::Sequence(_) => "sequence",
            NodeKind::Mapping(_) => "mapping",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_have_no_content() {
        assert!(!Node::scalar("3", ScalarTag::Int).has_content());
        assert!(!Node::sequence(vec![]).has_content());
        assert!(!Node::mapping(vec![]).has_content());
        assert!(Node::sequence(vec![Node::scalar("a", ScalarTag::Str)]).has_content());
    }

    #[test]
    fn collections_have_empty_value() {
        let seq = Node::sequence(vec![Node::scalar("a", ScalarTag::Str)]);
        assert_eq!(seq.value(), "");
        assert_eq!(Node::scalar("~", ScalarTag::Null).value(), "~");
    }
}
