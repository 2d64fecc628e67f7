//! CLI: files -> recipes -> (Go sources | recipe JSON)
use std::path::{Path, PathBuf};
use anyhow::{Context, bail};
use clap::{Parser, Subcommand, Args};
use colored::Colorize;
use rayon::prelude::*;

use crate::config::GeneratorConfig;
use crate::recipe::{Recipe, TOOL_NAME};
use crate::render::{DEFAULT_FORMATTER, RenderOptions, Renderer};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate Go structs mirroring chart values files (YAML or JSON)
#[derive(Parser, Debug)]
#[command(name = "structgen", version)]
pub struct CommandLineInterface {
    /// increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer structs and write one Go file per input
    Generate(GenerateOut),
    /// infer structs and print the intermediate recipes as JSON
    Recipe(RecipeOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs, comma separated or repeated. May be literal paths or quoted glob patterns
    #[arg(long, short, value_delimiter = ',', num_args = 1.., required = true)]
    files: Vec<String>,

    /// input type (yaml, json); picked from the file extension if omitted
    #[arg(long = "type")]
    input_type: Option<String>,

    /// infer bool/int/float/string instead of `any` for scalar fields
    #[arg(long, env = "STRUCTGEN_ADVANCED_TYPES", default_value_t = false)]
    advanced_types: bool,

    /// Go package name of the generated files
    #[arg(long, env = "STRUCTGEN_PKG", default_value = "main")]
    pkg: String,

    /// directory generated files are written to
    #[arg(long, env = "STRUCTGEN_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// formatter run on each generated file, path appended
    #[arg(long, default_value = DEFAULT_FORMATTER)]
    formatter: String,

    /// skip the formatter
    #[arg(long)]
    no_format: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct RecipeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn config(&self) -> GeneratorConfig {
        let args: Vec<String> = std::env::args().skip(1).collect();
        GeneratorConfig {
            advanced_types: self.advanced_types,
            package_name: self.pkg.clone(),
            output_dir: self.out_dir.clone(),
            generate_command: format!("./{} {}", TOOL_NAME, args.join(" ")).trim_end().to_string(),
        }
    }

    /// Parses every input in parallel. Results keep input order; the first
    /// failure in that order is returned.
    fn load_recipes(&self) -> anyhow::Result<Vec<Recipe>> {
        let source_paths = resolve_file_path_patterns(&self.files)
            .context("failed to resolve input file paths")?;
        let config = self.config();
        let explicit = self.input_type.as_deref();

        let results: Vec<anyhow::Result<Recipe>> = source_paths
            .par_iter()
            .map(|path| {
                crate::parser::parse_file(path, explicit, &config)
                    .with_context(|| format!("failed to parse file {}", path.display()))
            })
            .collect();
        results.into_iter().collect()
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        setup_logging(self.verbose);
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(())
                }

                let recipes = target.input_settings.load_recipes()?;
                let formatter = (!target.no_format).then(|| target.formatter.clone());
                let renderer = Renderer::new(RenderOptions { formatter });
                for recipe in &recipes {
                    let written = renderer.render(recipe)
                        .with_context(|| format!("failed to generate {}", recipe.output_file_path.display()))?;
                    println!("{} {} ({})", "generated".green().bold(), written.display(), recipe.root_struct_name);
                }
                Ok(())
            }
            Command::Recipe(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(())
                }

                let recipes = target.input_settings.load_recipes()?;
                let recipe_src = serde_json::to_string_pretty(&recipes)?;
                if let Some(out) = target.out.as_ref() {
                    write_output(out, &recipe_src)?;
                } else {
                    println!("{recipe_src}");
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// `RUST_LOG` wins; otherwise the `-v` count picks the level.
fn setup_logging(verbose: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            match verbose {
                0 => tracing_subscriber::EnvFilter::new("warn"),
                1 => tracing_subscriber::EnvFilter::new("info"),
                2 => tracing_subscriber::EnvFilter::new("debug"),
                _ => tracing_subscriber::EnvFilter::new("trace"),
            }
        });

    // a second init (tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn write_output(out: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref().trim();
        if pattern.is_empty() {
            continue;
        }

        if has_glob_chars(pattern) {
            // Treat as a glob pattern
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    if out.is_empty() {
        bail!("no input files given");
    }
    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        CommandLineInterface::command().debug_assert();
    }

    #[test]
    fn files_split_on_commas() {
        let cli = CommandLineInterface::try_parse_from([
            "structgen", "generate", "-f", "a.yaml,b.yaml", "--files", "c.json", "--pkg", "charts",
        ]).unwrap();
        let Command::Generate(target) = cli.cmd else { panic!("expected generate") };
        assert_eq!(target.input_settings.files, ["a.yaml", "b.yaml", "c.json"]);
        assert_eq!(target.input_settings.pkg, "charts");
        assert_eq!(target.formatter, "gofmt -w");
    }

    #[test]
    fn globs_expand_and_literals_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.yaml", "b.yaml", "c.json"] {
            std::fs::write(dir.path().join(name), "a: 1\n").unwrap();
        }
        let pattern = format!("{}/*.yaml", dir.path().display());
        let mut paths = resolve_file_path_patterns([pattern.as_str(), "missing.yaml"]).unwrap();
        let literal = paths.pop().unwrap();
        assert_eq!(literal, PathBuf::from("missing.yaml"));
        paths.sort();
        assert_eq!(paths, [dir.path().join("a.yaml"), dir.path().join("b.yaml")]);
    }

    #[test]
    fn unmatched_glob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.yaml", dir.path().display());
        assert!(resolve_file_path_patterns([pattern]).is_err());
    }

    #[test]
    fn first_failure_in_input_order_wins() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.yaml");
        std::fs::write(&good, "a: 1\n").unwrap();
        let settings = InputSettings {
            files: vec![
                good.display().to_string(),
                dir.path().join("first-missing.yaml").display().to_string(),
                dir.path().join("second-missing.yaml").display().to_string(),
            ],
            input_type: None,
            advanced_types: false,
            pkg: "main".into(),
            out_dir: dir.path().to_path_buf(),
        };
        let err = settings.load_recipes().unwrap_err();
        assert!(format!("{err:#}").contains("first-missing.yaml"), "{err:#}");
    }
}
