// Strongly-typed recipe for codegen. No decoder types here.
use std::path::PathBuf;
use serde::Serialize;

pub const TOOL_NAME: &str = "CHART_VALUES_STRUCT_GENERATOR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldType {
    Any,                     // universal fallback
    Bool,
    Int,
    Float,
    String,
    Map,                     // string-keyed map of Any
    Struct(String),          // reference to a struct in the same recipe
    List(Box<FieldType>),
    Optional(Box<FieldType>), // absent is distinguishable from zero
}

impl FieldType {
    pub fn optional(inner: FieldType) -> Self { FieldType::Optional(Box::new(inner)) }
    pub fn list(item: FieldType) -> Self { FieldType::List(Box::new(item)) }

    /// Name of the struct this type points at, looking through wrappers.
    pub fn struct_ref(&self) -> Option<&str> {
        match self {
            FieldType::Struct(name) => Some(name),
            FieldType::List(inner) | FieldType::Optional(inner) => inner.struct_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDef {
    pub name: String,          // generated identifier
    pub original_name: String, // key as written in the input
    pub doc: Vec<String>,      // one entry per line, no comment marker
    pub ty: FieldType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructDef {
    pub name: String,
    pub is_root: bool,
    pub doc: Vec<String>,
    pub fields: Vec<FieldDef>, // input key order
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    pub alias: Option<String>,
    pub path: String,
}

impl Import {
    pub fn new(path: impl Into<String>) -> Self { Self { alias: None, path: path.into() } }
}

/// Imports every structured-data recipe carries.
pub fn default_imports() -> Vec<Import> {
    ["fmt", "encoding/json", "reflect", "strings"].into_iter().map(Import::new).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub tool_name: String,
    pub generate_command: String,
    pub generate_date: String, // YYYY-MM-DD
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub output_file_path: PathBuf,
    pub root_struct_name: String,
    pub metadata: Metadata,
    pub package_name: String,
    pub imports: Vec<Import>,
    pub structs: Vec<StructDef>, // root first, then nested in discovery order
}

impl Recipe {
    pub fn root(&self) -> Option<&StructDef> {
        self.structs.iter().find(|s| s.is_root)
    }

    pub fn find_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.iter().find(|s| s.name == name)
    }

    /// Struct names referenced by a field but missing from `structs`.
    pub fn dangling_refs(&self) -> Vec<&str> {
        self.structs
            .iter()
            .flat_map(|s| s.fields.iter())
            .filter_map(|f| f.ty.struct_ref())
            .filter(|name| self.find_struct(name).is_none())
            .collect()
    }
}
