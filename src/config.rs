//! Generation settings handed to the core as plain values.
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Narrow scalar types (bool/int/float/string) instead of `any`.
    pub advanced_types: bool,
    /// Package the generated file declares.
    pub package_name: String,
    /// Directory generated files are written to.
    pub output_dir: PathBuf,
    /// Command line recorded in the generated header, free text.
    pub generate_command: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            advanced_types: false,
            package_name: "main".to_string(),
            output_dir: PathBuf::from("."),
            generate_command: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: GeneratorConfig = serde_json::from_str(r#"{"advanced_types": true}"#).unwrap();
        assert!(config.advanced_types);
        assert_eq!(config.package_name, "main");
        assert_eq!(config.output_dir, PathBuf::from("."));
    }
}
