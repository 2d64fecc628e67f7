//! Generate Go struct definitions from chart values files.
//!
//! The pipeline is `parser` (file -> [`node::Node`] tree) -> `builder`
//! (tree -> [`recipe::Recipe`]) -> `render` (recipe -> Go source on disk).
pub mod builder;
pub mod cli;
pub mod codegen;
pub mod comments;
pub mod config;
pub mod error;
pub mod inference;
pub mod node;
pub mod parser;
pub mod recipe;
pub mod render;
