//! Error types for parsing inputs and rendering recipes.
//!
//! Every variant carries the path of the file it concerns; nothing here is
//! retried or recovered from.

use std::path::PathBuf;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;
pub type RenderResult<T> = Result<T, RenderError>;

/// Failure turning an input file into a recipe.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input file is missing.
    #[error("file {} does not exist", path.display())]
    NotFound { path: PathBuf },

    /// Input could not be read or is not valid structured data.
    #[error("error decoding {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeCause,
    },

    /// Input decoded fine but holds no document content.
    #[error("empty file {}", path.display())]
    EmptyInput { path: PathBuf },

    /// No parser is registered for the requested input type.
    #[error("invalid input type '{file_type}', valid types: {valid}")]
    UnsupportedType { file_type: String, valid: String },
}

/// Underlying reason for a [`ParseError::Decode`].
#[derive(Debug, Error)]
pub enum DecodeCause {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// Mapping keys must be scalars.
    #[error("unsupported {kind} used as a mapping key")]
    UnsupportedKey { kind: &'static str },

    /// The top-level node must be a mapping to produce a root struct.
    #[error("top-level {kind} found, expected a mapping")]
    RootNotMapping { kind: &'static str },
}

impl ParseError {
    pub fn decode(path: impl Into<PathBuf>, source: impl Into<DecodeCause>) -> Self {
        Self::Decode { path: path.into(), source: source.into() }
    }
}

/// Failure writing or formatting a generated source file.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The formatter binary could not be started.
    #[error("failed to run formatter '{command}' on {}: {source}", path.display())]
    FormatterUnavailable {
        command: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The formatter ran and rejected the file.
    #[error("failed to format {} with '{command}'\nOutput: {output}", path.display())]
    Format {
        command: String,
        path: PathBuf,
        output: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_path() {
        let err = ParseError::NotFound { path: PathBuf::from("charts/values.yaml") };
        assert_eq!(err.to_string(), "file charts/values.yaml does not exist");

        let err = ParseError::decode("values.yaml", DecodeCause::RootNotMapping { kind: "sequence" });
        assert_eq!(err.to_string(), "error decoding values.yaml: top-level sequence found, expected a mapping");
    }
}
