// Go emitter for recipes. One file per recipe, structs in recipe order.
use std::fmt::Write;
use crate::recipe::{FieldType, Import, Recipe, StructDef};

pub struct Codegen {
    out: String,
}

impl Codegen {
    pub fn new() -> Self { Self { out: String::new() } }

    pub fn into_string(self) -> String { self.out }

    pub fn emit(&mut self, recipe: &Recipe) {
        self.emit_header(recipe);
        self.emit_imports(&recipe.imports);
        for def in &recipe.structs {
            self.emit_struct(def);
        }
    }

    fn emit_header(&mut self, recipe: &Recipe) {
        let meta = &recipe.metadata;
        let _ = writeln!(self.out, "// Code generated by {} on {}. DO NOT EDIT.", meta.tool_name, meta.generate_date);
        if !meta.generate_command.is_empty() {
            let _ = writeln!(self.out, "// Command: {}", meta.generate_command);
        }
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "package {}", recipe.package_name);
        let _ = writeln!(self.out);
    }

    fn emit_imports(&mut self, imports: &[Import]) {
        if imports.is_empty() {
            return;
        }
        self.out.push_str("import (\n");
        for import in imports {
            match &import.alias {
                Some(alias) => { let _ = writeln!(self.out, "\t{} \"{}\"", alias, import.path); }
                None => { let _ = writeln!(self.out, "\t\"{}\"", import.path); }
            }
        }
        self.out.push_str(")\n\n");

        // keep imports referenced; the generated file declares types only
        let anchors: Vec<String> = imports.iter().filter_map(anchor).collect();
        if !anchors.is_empty() {
            self.out.push_str("var (\n");
            for line in anchors {
                let _ = writeln!(self.out, "\t_ = {line}");
            }
            self.out.push_str(")\n\n");
        }
    }

    fn emit_struct(&mut self, def: &StructDef) {
        emit_doc(&mut self.out, &def.doc, "");
        let _ = writeln!(self.out, "type {} struct {{", def.name);
        for field in &def.fields {
            emit_doc(&mut self.out, &field.doc, "\t");
            let _ = writeln!(
                self.out,
                "\t{} {} {}",
                field.name,
                go_type(&field.ty),
                struct_tag(&field.original_name),
            );
        }
        self.out.push_str("}\n\n");
    }
}

impl Default for Codegen {
    fn default() -> Self { Self::new() }
}

fn emit_doc(out: &mut String, doc: &[String], indent: &str) {
    for line in doc {
        if line.is_empty() {
            let _ = writeln!(out, "{indent}//");
        } else {
            let _ = writeln!(out, "{indent}// {line}");
        }
    }
}

/// Package-level reference for a known import, named by its local identifier.
fn anchor(import: &Import) -> Option<String> {
    let member = match import.path.as_str() {
        "fmt" => "Sprint",
        "encoding/json" => "Marshal",
        "reflect" => "TypeOf",
        "strings" => "TrimSpace",
        _ => return None,
    };
    let local = import.alias.clone().unwrap_or_else(|| {
        import.path.rsplit('/').next().unwrap_or(&import.path).to_string()
    });
    if local == "_" || local == "." {
        return None;
    }
    Some(format!("{local}.{member}"))
}

pub fn go_type(ty: &FieldType) -> String {
    match ty {
        FieldType::Any => "any".to_string(),
        FieldType::Bool => "bool".to_string(),
        FieldType::Int => "int".to_string(),
        FieldType::Float => "float64".to_string(),
        FieldType::String => "string".to_string(),
        FieldType::Map => "map[string]any".to_string(),
        FieldType::Struct(name) => name.clone(),
        FieldType::List(item) => format!("[]{}", go_type(item)),
        FieldType::Optional(inner) => format!("*{}", go_type(inner)),
    }
}

/// `json`/`yaml` struct tag for the original key.
///
/// Go tags live in a raw string literal, so a key holding a backtick forces an
/// interpreted literal with escaped quotes instead.
pub fn struct_tag(key: &str) -> String {
    let quoted = serde_json::to_string(key).unwrap_or_else(|_| format!("\"{key}\""));
    let quoted = &quoted[1..quoted.len() - 1];
    let tag = format!("json:\"{quoted},omitempty\" yaml:\"{quoted},omitempty\"");
    if tag.contains('`') {
        let escaped = tag.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        format!("`{tag}`")
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{FieldDef, Metadata, TOOL_NAME, default_imports};
    use std::path::PathBuf;

    fn recipe() -> Recipe {
        Recipe {
            output_file_path: PathBuf::from("values.go"),
            root_struct_name: "Values".into(),
            metadata: Metadata {
                tool_name: TOOL_NAME.into(),
                generate_command: "./CHART_VALUES_STRUCT_GENERATOR -f values.yaml".into(),
                generate_date: "2024-01-02".into(),
            },
            package_name: "charts".into(),
            imports: default_imports(),
            structs: vec![
                StructDef {
                    name: "Values".into(),
                    is_root: true,
                    doc: vec!["Values represents the values of the values.yaml chart".into()],
                    fields: vec![
                        FieldDef {
                            name: "Replicas".into(),
                            original_name: "replicas".into(),
                            doc: vec!["replica count".into(), "".into(), "Default value in yaml: 3".into()],
                            ty: FieldType::optional(FieldType::Int),
                        },
                        FieldDef {
                            name: "Controller".into(),
                            original_name: "controller".into(),
                            doc: vec![],
                            ty: FieldType::optional(FieldType::Struct("Values_Controller".into())),
                        },
                    ],
                },
                StructDef {
                    name: "Values_Controller".into(),
                    is_root: false,
                    doc: vec![],
                    fields: vec![FieldDef {
                        name: "Ports".into(),
                        original_name: "ports".into(),
                        doc: vec![],
                        ty: FieldType::optional(FieldType::list(FieldType::Any)),
                    }],
                },
            ],
        }
    }

    #[test]
    fn emits_header_package_and_imports() {
        let mut cg = Codegen::new();
        cg.emit(&recipe());
        let src = cg.into_string();
        assert!(src.starts_with(
            "// Code generated by CHART_VALUES_STRUCT_GENERATOR on 2024-01-02. DO NOT EDIT.\n\
             // Command: ./CHART_VALUES_STRUCT_GENERATOR -f values.yaml\n\npackage charts\n\n"
        ), "{src}");
        assert!(src.contains("import (\n\t\"fmt\"\n\t\"encoding/json\"\n\t\"reflect\"\n\t\"strings\"\n)\n"));
        assert!(src.contains("\t_ = json.Marshal\n"));
    }

    #[test]
    fn emits_structs_with_docs_and_tags() {
        let mut cg = Codegen::new();
        cg.emit(&recipe());
        let src = cg.into_string();
        let expected = "\
// Values represents the values of the values.yaml chart
type Values struct {
\t// replica count
\t//
\t// Default value in yaml: 3
\tReplicas *int `json:\"replicas,omitempty\" yaml:\"replicas,omitempty\"`
\tController *Values_Controller `json:\"controller,omitempty\" yaml:\"controller,omitempty\"`
}

type Values_Controller struct {
\tPorts *[]any `json:\"ports,omitempty\" yaml:\"ports,omitempty\"`
}
";
        assert!(src.contains(expected), "{src}");
        assert!(src.find("type Values struct").unwrap() < src.find("type Values_Controller struct").unwrap());
    }

    #[test]
    fn go_types() {
        assert_eq!(go_type(&FieldType::optional(FieldType::Float)), "*float64");
        assert_eq!(go_type(&FieldType::optional(FieldType::Map)), "*map[string]any");
        assert_eq!(go_type(&FieldType::list(FieldType::String)), "[]string");
    }

    #[test]
    fn tags_escape_odd_keys() {
        assert_eq!(struct_tag("a\"b"), "`json:\"a\\\"b,omitempty\" yaml:\"a\\\"b,omitempty\"`");
        assert_eq!(struct_tag("a`b"), "\"json:\\\"a`b,omitempty\\\" yaml:\\\"a`b,omitempty\\\"\"");
    }

    #[test]
    fn aliased_imports_anchor_on_the_alias() {
        let imports = vec![Import { alias: Some("yaml".into()), path: "encoding/json".into() }, Import::new("os")];
        assert_eq!(anchor(&imports[0]).as_deref(), Some("yaml.Marshal"));
        assert_eq!(anchor(&imports[1]), None);
    }
}
