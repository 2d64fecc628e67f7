//! Input front-ends: file -> node tree -> recipe.
//!
//! A [`Parser`] only has to decode source text into a [`Node`]; reading the
//! file, naming the root struct and filling in recipe metadata is shared.
pub mod json;
pub mod yaml;

use std::io::{ErrorKind, Read};
use std::path::Path;
use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::builder::{RecipeBuilder, identifier};
use crate::config::GeneratorConfig;
use crate::error::{DecodeCause, ParseError, ParseResult};
use crate::node::{Node, NodeKind};
use crate::recipe::{Metadata, Recipe, TOOL_NAME, default_imports};

pub const SOURCE_EXTENSION: &str = "go";

pub trait Parser: Send + Sync {
    /// Registry identifier, e.g. `yaml`.
    fn name(&self) -> &'static str;

    /// Decodes the first document of `source`. `None` means the input holds
    /// no document content.
    fn decode(&self, path: &Path, source: &str) -> ParseResult<Option<Node>>;

    fn parse(&self, path: &Path, config: &GeneratorConfig) -> ParseResult<Recipe> {
        let source = read_source(path)?;
        let root = self.decode(path, &source)?
            .ok_or_else(|| ParseError::EmptyInput { path: path.to_path_buf() })?;
        tracing::debug!("Decoded {} as {}", path.display(), self.name());
        assemble(path, &root, config)
    }
}

fn read_source(path: &Path) -> ParseResult<String> {
    let mut file = std::fs::File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ParseError::NotFound { path: path.to_path_buf() },
        _ => ParseError::decode(path, e),
    })?;
    let mut source = String::new();
    file.read_to_string(&mut source).map_err(|e| ParseError::decode(path, e))?;
    Ok(source)
}

/// Builds the recipe for a decoded top-level node.
pub fn assemble(path: &Path, root: &Node, config: &GeneratorConfig) -> ParseResult<Recipe> {
    if !matches!(root.kind, NodeKind::Mapping(_)) {
        return Err(ParseError::decode(path, DecodeCause::RootNotMapping { kind: root.kind_name() }));
    }

    let base = base_name(path);
    let root_struct_name = root_struct_name(&base);
    let doc = vec![format!("{} represents the values of the {} chart", root_struct_name, path.display())];

    let mut builder = RecipeBuilder::new(config.advanced_types);
    let structs = builder.build_struct(&root_struct_name, root, doc, true);
    // the root claims its name first, so it never gets a suffix
    let root_struct_name = structs.first().map(|s| s.name.clone()).unwrap_or(root_struct_name);

    Ok(Recipe {
        output_file_path: config.output_dir.join(format!("{base}.{SOURCE_EXTENSION}")),
        root_struct_name,
        metadata: Metadata {
            tool_name: TOOL_NAME.to_string(),
            generate_command: config.generate_command.clone(),
            generate_date: chrono::Local::now().format("%Y-%m-%d").to_string(),
        },
        package_name: config.package_name.clone(),
        imports: default_imports(),
        structs,
    })
}

/// File name without its last extension.
fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn root_struct_name(base: &str) -> String {
    identifier(&base.replace(['.', '-'], "_"))
}

// ————————————————————————————————————————————————————————————————————————————
// REGISTRY
// ————————————————————————————————————————————————————————————————————————————

type Factory = fn() -> Box<dyn Parser>;

fn yaml_factory() -> Box<dyn Parser> { Box::new(yaml::YamlParser) }
fn json_factory() -> Box<dyn Parser> { Box::new(json::JsonParser) }

static REGISTRY: Lazy<IndexMap<&'static str, Factory>> = Lazy::new(|| {
    let mut registry = IndexMap::<&'static str, Factory>::new();
    registry.insert("yaml", yaml_factory);
    registry.insert("json", json_factory);
    registry
});

/// Registered identifiers, comma separated, in registration order.
pub fn valid_types() -> String {
    REGISTRY.keys().copied().collect::<Vec<_>>().join(", ")
}

pub fn new_parser(file_type: &str) -> ParseResult<Box<dyn Parser>> {
    REGISTRY
        .get(file_type)
        .map(|factory| factory())
        .ok_or_else(|| ParseError::UnsupportedType {
            file_type: file_type.to_string(),
            valid: valid_types(),
        })
}

/// Parser identifier implied by the file extension, if any.
pub fn detect_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "yaml" | "yml" => Some("yaml"),
        "json" => Some("json"),
        _ => None,
    }
}

/// Explicit type wins; otherwise the extension decides, falling back to yaml.
pub fn parser_for(path: &Path, explicit: Option<&str>) -> ParseResult<Box<dyn Parser>> {
    let file_type = explicit.or_else(|| detect_type(path)).unwrap_or("yaml");
    new_parser(file_type)
}

/// Picks the parser for `path` and runs it.
pub fn parse_file(path: &Path, explicit: Option<&str>, config: &GeneratorConfig) -> ParseResult<Recipe> {
    parser_for(path, explicit)?.parse(path, config)
}

// ------------------------------- Tests ------------------------------------ //
