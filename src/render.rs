//! Writes generated Go files and runs the formatter over them.
use std::path::{Path, PathBuf};
use std::process::Command;
use serde::{Deserialize, Serialize};

use crate::codegen::Codegen;
use crate::error::{RenderError, RenderResult};
use crate::recipe::Recipe;

pub const DEFAULT_FORMATTER: &str = "gofmt -w";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Command run on every written file, path appended. `None` skips formatting.
    pub formatter: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { formatter: Some(DEFAULT_FORMATTER.to_string()) }
    }
}

pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self { Self { options } }

    /// Writes `recipe` to its output path and returns that path.
    pub fn render(&self, recipe: &Recipe) -> RenderResult<PathBuf> {
        let path = recipe.output_file_path.clone();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| RenderError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut cg = Codegen::new();
        cg.emit(recipe);
        std::fs::write(&path, cg.into_string()).map_err(|source| RenderError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!("Wrote {} ({} structs)", path.display(), recipe.structs.len());

        if let Some(formatter) = self.options.formatter.as_deref() {
            format_file(formatter, &path)?;
        }
        Ok(path)
    }
}

fn format_file(formatter: &str, path: &Path) -> RenderResult<()> {
    let mut parts = formatter.split_whitespace();
    let Some(program) = parts.next() else {
        return Ok(());
    };
    tracing::debug!("Running {} on {}", formatter, path.display());
    let output = Command::new(program)
        .args(parts)
        .arg(path)
        .output()
        .map_err(|source| RenderError::FormatterUnavailable {
            command: formatter.to_string(),
            path: path.to_path_buf(),
            source,
        })?;
    if !output.status.success() {
        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        captured.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(RenderError::Format {
            command: formatter.to_string(),
            path: path.to_path_buf(),
            output: captured.trim_end().to_string(),
        });
    }
    Ok(())
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{FieldDef, FieldType, Metadata, StructDef, TOOL_NAME, default_imports};

    fn recipe(out: PathBuf) -> Recipe {
        Recipe {
            output_file_path: out,
            root_struct_name: "Values".into(),
            metadata: Metadata {
                tool_name: TOOL_NAME.into(),
                generate_command: String::new(),
                generate_date: "2024-01-02".into(),
            },
            package_name: "main".into(),
            imports: default_imports(),
            structs: vec![StructDef {
                name: "Values".into(),
                is_root: true,
                doc: vec![],
                fields: vec![FieldDef {
                    name: "Name".into(),
                    original_name: "name".into(),
                    doc: vec![],
                    ty: FieldType::Any,
                }],
            }],
        }
    }

    #[test]
    fn writes_file_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/gen/values.go");
        let renderer = Renderer::new(RenderOptions { formatter: None });
        let written = renderer.render(&recipe(out.clone())).unwrap();
        assert_eq!(written, out);
        let src = std::fs::read_to_string(&out).unwrap();
        assert!(src.contains("package main"));
        assert!(src.contains("type Values struct {"));
    }

    #[cfg(unix)]
    #[test]
    fn formatter_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new(RenderOptions { formatter: Some("false".into()) });
        let err = renderer.render(&recipe(dir.path().join("values.go"))).unwrap_err();
        assert!(matches!(err, RenderError::Format { .. }), "{err}");
    }

    #[test]
    fn missing_formatter_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new(RenderOptions { formatter: Some("structgen-no-such-formatter -w".into()) });
        let err = renderer.render(&recipe(dir.path().join("values.go"))).unwrap_err();
        assert!(matches!(err, RenderError::FormatterUnavailable { .. }), "{err}");
        // the file is still written before formatting
        assert!(dir.path().join("values.go").exists());
    }

    #[test]
    fn default_formats_with_gofmt() {
        assert_eq!(RenderOptions::default().formatter.as_deref(), Some("gofmt -w"));
    }
}
