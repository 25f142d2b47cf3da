//! CLI: discover → (generate | schema)
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use genfig::codegen::{Newline, Style};
use genfig::generator::{DEFAULT_DIR, DEFAULT_ENV, Generator, Params, write};
use genfig::inference::{DEFAULT_MAX_DEPTH, DEFAULT_ROOT_NAME};
use genfig::plugins;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate typed, per-environment Rust config modules from YAML/JSON/TOML/dotenv files
#[derive(Parser, Debug)]
#[command(name = "genfig", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// more output (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// no log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate the config module for every environment
    Generate(GenerateOut),
    /// infer and print the schema unit of the default environment
    Schema(SchemaOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// config files; literal paths or quoted glob patterns
    #[arg(default_value = "*")]
    input: Vec<String>,

    /// environment whose file defines the schema
    #[arg(long, env = "GENFIG_DEFAULT_ENV", default_value = DEFAULT_ENV)]
    default_env: String,

    /// maximum nesting level below the root
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// name of the root struct
    #[arg(long, default_value = DEFAULT_ROOT_NAME)]
    root_name: String,

    /// indentation of generated code
    #[arg(long, default_value = "    ")]
    indent: String,

    /// newline style of generated code
    #[arg(long, value_enum, default_value_t = NewlineArg::Lf)]
    newline: NewlineArg,
}

#[derive(Args, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output directory
    #[arg(short, long, env = "GENFIG_DIR", default_value = DEFAULT_DIR)]
    dir: PathBuf,

    /// inline every unit into mod.rs
    #[arg(long)]
    merge_files: bool,

    /// stamp file headers with the generation time
    #[arg(long)]
    timestamp: bool,

    /// enable only these plugins, in this order (default: all)
    #[arg(long = "plugin", value_name = "NAME", value_parser = clap::builder::PossibleValuesParser::new(plugins::BUILTIN))]
    plugins: Vec<String>,

    /// disable every plugin
    #[arg(long, conflicts_with = "plugins")]
    no_plugins: bool,

    /// print the generated files instead of writing them
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .rs file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum NewlineArg {
    Lf,
    Crlf,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn params(&self) -> Params {
        Params {
            default_env: self.default_env.clone(),
            max_depth: self.max_depth,
            root_name: self.root_name.clone(),
            style: Style {
                indent: self.indent.clone(),
                newline: match self.newline {
                    NewlineArg::Lf => Newline::Lf,
                    NewlineArg::Crlf => Newline::Crlf,
                },
            },
            ..Params::default()
        }
    }

    fn files(&self) -> anyhow::Result<Vec<PathBuf>> {
        resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn setup_logging(&self) {
        if self.quiet {
            return;
        }
        let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            match self.verbose {
                0 => tracing_subscriber::EnvFilter::new("warn"),
                1 => tracing_subscriber::EnvFilter::new("info"),
                2 => tracing_subscriber::EnvFilter::new("debug"),
                _ => tracing_subscriber::EnvFilter::new("trace"),
            }
        });
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                let mut params = target.input_settings.params();
                params.dir = target.dir.clone();
                params.merge_files = target.merge_files;
                params.timestamp = target.timestamp;
                if target.no_plugins {
                    params.plugins.clear();
                } else if !target.plugins.is_empty() {
                    params.plugins = target.plugins.clone();
                }

                let files = target.input_settings.files()?;
                let generator = Generator::new(params)?;
                let output = generator.render(&files)?;

                if target.dry_run {
                    for file in &output.files {
                        println!("// ==> {} <==", file.path.display());
                        print!("{}", file.contents);
                    }
                    return Ok(());
                }
                let written = write(&output.files)?;
                tracing::info!(
                    files = written.len(),
                    environments = output.environments.len(),
                    dir = %generator.params().dir.display(),
                    "generated config module"
                );
            }
            Command::Schema(target) => {
                let files = target.input_settings.files()?;
                let generator = Generator::new(target.input_settings.params())?;
                let schema_src = generator.render_schema(&files)?;
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create '{}'", parent.display()))?;
                    }
                    std::fs::write(out, &schema_src)
                        .with_context(|| format!("failed to write '{}'", out.display()))?;
                } else {
                    print!("{schema_src}");
                }
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Expand glob patterns, keep literal paths as given. Directories are dropped
/// and repeated matches kept once, in first-seen order.
fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();
    let mut push = |p: PathBuf| {
        if !p.is_dir() && !out.contains(&p) {
            out.push(p);
        }
    };

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                matched_any = true;
                push(entry?);
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_defaults() {
        let cli = CommandLineInterface::try_parse_from(["genfig", "generate"]).unwrap();
        let Command::Generate(target) = cli.cmd else { panic!("expected generate") };
        assert_eq!(target.input_settings.input, ["*"]);
        assert_eq!(target.dir, PathBuf::from("config"));
        let params = target.input_settings.params();
        assert_eq!(params.max_depth, 5);
        assert_eq!(params.style, Style::default());
    }

    #[test]
    fn plugin_flags() {
        let cli = CommandLineInterface::try_parse_from(["genfig", "generate", "--plugin", "map", "--plugin", "substitutor", "a.yml"])
            .unwrap();
        let Command::Generate(target) = cli.cmd else { panic!("expected generate") };
        assert_eq!(target.plugins, ["map", "substitutor"]);
        assert!(CommandLineInterface::try_parse_from(["genfig", "generate", "--plugin", "nope"]).is_err());
        assert!(CommandLineInterface::try_parse_from(["genfig", "generate", "--plugin", "map", "--no-plugins"]).is_err());
    }

    #[test]
    fn globs_include_dotfiles_and_skip_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.yml"), "a: 1\n").unwrap();
        std::fs::write(dir.path().join(".env.local"), "A=2\n").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        let pattern = format!("{}/*", dir.path().display());
        let mut files = resolve_file_path_patterns([pattern.as_str(), pattern.as_str()]).unwrap();
        files.sort();
        assert_eq!(files, [dir.path().join(".env.local"), dir.path().join("default.yml")]);
    }

    #[test]
    fn empty_glob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.yml", dir.path().display());
        assert!(resolve_file_path_patterns([pattern]).is_err());
    }
}
