//! Line scanner for the parts of a YAML document the decoder drops.
//!
//! `serde_yaml_ng` resolves structure, tags and anchors but forgets
//! comments and the literal spelling of scalars. This pass re-reads the
//! source line by line, tracks the block structure through indentation,
//! and records per node path:
//! - head comment: the comment block directly above a key;
//! - line comment: a trailing `# ...` on the key's line;
//! - foot comment: a comment block followed by a blank line, given to the
//!   nearest enclosing key at or left of the block's column;
//! - raw: the literal text of an inline scalar value.
//!
//! Block scalars, multi-line plain scalars and multi-line flow collections
//! are skipped over rather than interpreted. Only the first document of a
//! stream is scanned.
use std::collections::HashMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::Comments;

static PLAIN_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^([^\s#'"\[\]{}&*!|>%@`?,].*?)\s*:(?:\s|$)"#).expect("valid plain key regex")
});
static DOUBLE_QUOTED_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^"((?:[^"\\]|\\.)*)"\s*:(?:\s|$)"#).expect("valid double quoted key regex")
});
static SINGLE_QUOTED_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^'((?:[^']|'')*)'\s*:(?:\s|$)").expect("valid single quoted key regex")
});
static BLOCK_SCALAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[|>][0-9+-]*$").expect("valid block scalar regex"));
static DOC_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:---|\.\.\.)(?:\s|$)").expect("valid document marker regex"));

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
}

pub type NodePath = Vec<Segment>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub head: Vec<String>,
    pub line: Option<String>,
    pub foot: Vec<String>,
    pub raw: Option<String>,
}

impl Annotation {
    pub fn comments(&self) -> Comments {
        Comments {
            head: self.head.join("\n"),
            line: self.line.clone().unwrap_or_default(),
            foot: self.foot.join("\n"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Layout {
    entries: HashMap<NodePath, Annotation>,
}

impl Layout {
    pub fn get(&self, path: &[Segment]) -> Option<&Annotation> {
        self.entries.get(path)
    }

    pub fn comments(&self, path: &[Segment]) -> Comments {
        self.get(path).map(Annotation::comments).unwrap_or_default()
    }

    pub fn raw(&self, path: &[Segment]) -> Option<&str> {
        self.get(path).and_then(|a| a.raw.as_deref())
    }
}

pub fn scan(source: &str) -> Layout {
    let mut scanner = Scanner::default();
    for line in source.lines() {
        if !scanner.feed(line) {
            break;
        }
    }
    Layout { entries: scanner.entries }
}

// ------------------------------- Scanner --------------------------------- //

#[derive(Debug)]
struct Frame {
    indent: usize,
    segment: Segment,
}

#[derive(Debug, Default)]
enum Skip {
    #[default]
    Nothing,
    /// `|` / `>` body: everything indented past `owner`.
    Block { owner: usize },
    /// Plain or quoted scalar folded over several lines.
    Continuation { owner: usize, path: NodePath },
    /// `[` / `{` left open at the end of a line.
    Flow { depth: i32 },
}

#[derive(Debug, Default)]
struct Scanner {
    stack: Vec<Frame>,
    entries: HashMap<NodePath, Annotation>,
    block: Vec<String>,
    block_indent: usize,
    skip: Skip,
    seen_content: bool,
}

impl Scanner {
    /// Returns false once the first document has ended.
    fn feed(&mut self, line: &str) -> bool {
        let line = line.trim_end();
        let body = line.trim_start();
        let indent = line.len() - body.len();

        match &mut self.skip {
            Skip::Nothing => {}
            Skip::Block { owner } => {
                if body.is_empty() || indent > *owner {
                    return true;
                }
                self.skip = Skip::Nothing;
            }
            Skip::Continuation { owner, path } => {
                if !body.is_empty() && !body.starts_with('#') && indent > *owner {
                    // the literal we kept is only the first line of it
                    if let Some(annotation) = self.entries.get_mut(path.as_slice()) {
                        annotation.raw = None;
                    }
                    return true;
                }
                self.skip = Skip::Nothing;
            }
            Skip::Flow { depth } => {
                *depth += flow_depth(body);
                if *depth <= 0 {
                    self.skip = Skip::Nothing;
                }
                return true;
            }
        }

        if body.is_empty() {
            self.close_block();
        } else if body.starts_with('#') {
            if self.block.is_empty() {
                self.block_indent = indent;
            }
            self.block.push(body.to_string());
        } else if DOC_MARKER.is_match(body) {
            if self.seen_content {
                return false;
            }
            self.block.clear();
        } else if body.starts_with('%') {
            // directive
        } else {
            self.content(indent, body);
        }
        true
    }

    fn content(&mut self, indent: usize, body: &str) {
        self.seen_content = true;
        // a block indented past this line closes the deeper entry above it
        if self.block_indent > indent {
            self.close_block();
        }
        let head = std::mem::take(&mut self.block);

        let mut col = indent;
        let mut rest = body;
        let mut item: Option<(usize, NodePath)> = None;
        while rest == "-" || rest.starts_with("- ") || rest.starts_with("-\t") {
            let index = self.pop_for_item(col);
            self.stack.push(Frame { indent: col, segment: Segment::Index(index) });
            item = Some((col, self.path()));
            let after = &rest[1..];
            let trimmed = after.trim_start();
            col += 1 + after.len() - trimmed.len();
            rest = trimmed;
        }

        if rest.is_empty() || rest.starts_with('#') {
            return;
        }

        // comments first: a `#` left in the key is part of it
        let (code, comment) = split_comment(rest);
        if let Some((key, value)) = split_key(code) {
            self.pop_for_key(col);
            self.stack.push(Frame { indent: col, segment: Segment::Key(key) });
            let path = self.path();
            let annotation = self.entries.entry(path.clone()).or_default();
            if !head.is_empty() {
                annotation.head = head;
            }
            if let Some(comment) = comment {
                annotation.line = Some(comment.to_string());
            }
            self.value(col, path, value.trim());
        } else if let Some((dash_col, path)) = item {
            self.value(dash_col, path, code.trim());
        } else {
            // unrecognised line; nothing below it may inherit the open frames
            self.pop_for_key(col);
        }
    }

    fn value(&mut self, owner: usize, path: NodePath, value: &str) {
        let value = strip_properties(value);
        if value.is_empty() || value.starts_with('*') {
            return;
        }
        if BLOCK_SCALAR.is_match(value) {
            self.skip = Skip::Block { owner };
            return;
        }
        if value.starts_with('[') || value.starts_with('{') {
            let depth = flow_depth(value);
            if depth > 0 {
                self.skip = Skip::Flow { depth };
            }
            return;
        }
        self.entries.entry(path.clone()).or_default().raw = Some(value.to_string());
        self.skip = Skip::Continuation { owner, path };
    }

    /// A comment block ended by a blank line documents the key above it.
    fn close_block(&mut self) {
        if self.block.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.block);
        let owner = self.stack.iter().rposition(|frame| {
            matches!(frame.segment, Segment::Key(_)) && frame.indent <= self.block_indent
        });
        if let Some(end) = owner {
            let path: NodePath = self.stack[..=end].iter().map(|f| f.segment.clone()).collect();
            self.entries.entry(path).or_default().foot.extend(lines);
        }
    }

    /// Pops frames closed by a `- ` at `col`, returning the new item's index.
    fn pop_for_item(&mut self, col: usize) -> usize {
        while let Some(top) = self.stack.last() {
            if top.indent > col {
                self.stack.pop();
                continue;
            }
            if top.indent == col {
                if let Segment::Index(index) = top.segment {
                    self.stack.pop();
                    return index + 1;
                }
            }
            break;
        }
        0
    }

    fn pop_for_key(&mut self, col: usize) {
        while self.stack.last().is_some_and(|top| top.indent >= col) {
            self.stack.pop();
        }
    }

    fn path(&self) -> NodePath {
        self.stack.iter().map(|f| f.segment.clone()).collect()
    }
}

// ------------------------------- Helpers --------------------------------- //

/// Splits `key: rest` into the key text and everything after the colon.
fn split_key(text: &str) -> Option<(String, &str)> {
    if let Some(caps) = DOUBLE_QUOTED_KEY.captures(text) {
        let end = caps.get(0)?.end();
        return Some((unescape_double(&caps[1]), &text[end..]));
    }
    if let Some(caps) = SINGLE_QUOTED_KEY.captures(text) {
        let end = caps.get(0)?.end();
        return Some((caps[1].replace("''", "'"), &text[end..]));
    }
    let caps = PLAIN_KEY.captures(text)?;
    let end = caps.get(0)?.end();
    Some((caps[1].trim_end().to_string(), &text[end..]))
}

fn unescape_double(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Splits off a trailing comment, ignoring `#` inside quotes or glued to a word.
fn split_comment(text: &str) -> (&str, Option<&str>) {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match quote {
            Some('"') => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    quote = None;
                }
            }
            Some(_) => {
                if c == '\'' {
                    if chars.peek().is_some_and(|&(_, next)| next == '\'') {
                        chars.next();
                    } else {
                        quote = None;
                    }
                }
            }
            None => match c {
                '"' | '\'' if starts_token(prev) => quote = Some(c),
                '#' if prev.is_none_or(char::is_whitespace) => {
                    return (&text[..i], Some(text[i..].trim_end()));
                }
                _ => {}
            },
        }
        prev = Some(c);
    }
    (text, None)
}

fn starts_token(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '[' | '{' | ',' | ':'),
    }
}

/// Net bracket depth of a flow collection fragment.
fn flow_depth(text: &str) -> i32 {
    let (code, _) = split_comment(text);
    let mut depth = 0;
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;
    for c in code.chars() {
        match quote {
            Some(q) => {
                if c == q && prev != Some('\\') {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '[' | '{' => depth += 1,
                ']' | '}' => depth -= 1,
                _ => {}
            },
        }
        prev = Some(c);
    }
    depth
}

/// Drops leading anchors (`&a`) and tags (`!!str`, `!local`).
fn strip_properties(mut value: &str) -> &str {
    while value.starts_with('&') || value.starts_with('!') {
        value = match value.find(char::is_whitespace) {
            Some(end) => value[end..].trim_start(),
            None => "",
        };
    }
    value
}

// ------------------------------- Tests ------------------------------------ //
