//! Turns the comments around a mapping entry into documentation lines.
use crate::node::{Node, NodeKind};

const DEFAULT_VALUE_HEADER: &str = "Default value in yaml:";

/// Documentation for the field produced by `key: value`.
///
/// Head, line and foot comments of the key come first, in that order. Leaf
/// values then get their literal default appended, separated by a blank
/// line when comments precede it. Structured values only get the comments.
pub fn extract_comments(key: &Node, value: &Node) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for text in [&key.comments.head, &key.comments.line, &key.comments.foot] {
        push_comment_lines(&mut lines, text);
    }

    match &value.kind {
        NodeKind::Scalar(scalar) if !scalar.value.is_empty() => {
            push_separator(&mut lines);
            lines.push(format!("{DEFAULT_VALUE_HEADER} {}", scalar.value));
        }
        NodeKind::Sequence(items) if items.first().is_some_and(|first| !first.has_content()) => {
            push_separator(&mut lines);
            lines.push(DEFAULT_VALUE_HEADER.to_string());
            lines.extend(items.iter().map(|item| format!("- {}", item.value())));
        }
        _ => {}
    }

    lines
}

fn push_comment_lines(lines: &mut Vec<String>, text: &str) {
    if text.is_empty() {
        return;
    }
    for line in text.lines() {
        lines.push(line.trim().trim_start_matches('#').trim().to_string());
    }
}

fn push_separator(lines: &mut Vec<String>) {
    if !lines.is_empty() {
        lines.push(String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ScalarTag;

    #[test]
    fn head_comment_then_default_value() {
        let key = Node::key("replicas").with_head_comment("# replica count");
        let value = Node::scalar("3", ScalarTag::Int);
        assert_eq!(extract_comments(&key, &value), ["replica count", "", "Default value in yaml: 3"]);
    }

    #[test]
    fn default_value_without_comments_has_no_separator() {
        let key = Node::key("name");
        let value = Node::scalar("app", ScalarTag::Str);
        assert_eq!(extract_comments(&key, &value), ["Default value in yaml: app"]);
    }

    #[test]
    fn comments_keep_head_line_foot_order() {
        let key = Node::key("image")
            .with_head_comment("# one\n#   two  ")
            .with_line_comment("# inline")
            .with_foot_comment("## foot");
        let value = Node::mapping(vec![(Node::key("tag"), Node::scalar("v1", ScalarTag::Str))]);
        assert_eq!(extract_comments(&key, &value), ["one", "two", "inline", "foot"]);
    }

    #[test]
    fn empty_scalar_gets_no_default_line() {
        let key = Node::key("host").with_line_comment("# optional");
        let value = Node::scalar("", ScalarTag::Null);
        assert_eq!(extract_comments(&key, &value), ["optional"]);
    }

    #[test]
    fn leaf_sequence_lists_every_element() {
        let key = Node::key("ports").with_head_comment("# exposed ports");
        let value = Node::sequence(vec![Node::scalar("80", ScalarTag::Int), Node::scalar("443", ScalarTag::Int)]);
        assert_eq!(
            extract_comments(&key, &value),
            ["exposed ports", "", "Default value in yaml:", "- 80", "- 443"]
        );
    }

    #[test]
    fn structured_sequence_has_only_comments() {
        let key = Node::key("hosts").with_head_comment("# virtual hosts");
        let item = Node::mapping(vec![(Node::key("host"), Node::scalar("a.local", ScalarTag::Str))]);
        let value = Node::sequence(vec![item]);
        assert_eq!(extract_comments(&key, &value), ["virtual hosts"]);
    }

    #[test]
    fn empty_sequence_has_no_defaults() {
        let key = Node::key("args");
        assert!(extract_comments(&key, &Node::sequence(vec![])).is_empty());
    }
}
