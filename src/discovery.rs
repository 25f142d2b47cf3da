//! Input files → environments.
//!
//! The environment name and format come from the file name alone:
//! `.env.<name>` is dotenv, `<name>.yml|.yaml|.json|.toml` select the
//! matching structured format. Other files are skipped.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::names;
use crate::parsers::Format;
use crate::value::Value;

static DOTENV_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.env\.([\w.]+)$").expect("regex for dotenv file names"));
static STRUCTURED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\w.]+)\.(yml|yaml|json|toml)$").expect("regex for structured file names"));

/// One input file resolved to an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    pub path: PathBuf,
    pub name: String,
    pub format: Format,
    /// Field identifier on the generated registry.
    pub ident: String,
    /// Module holding the environment's literal.
    pub module: String,
}

impl EnvFile {
    /// Read and parse the file.
    pub fn load(&self) -> Result<Value> {
        let data = std::fs::read(&self.path)
            .map_err(|source| Error::Io { path: self.path.clone(), source })?;
        self.format.strategy().parse(&data).map_err(|e| e.in_file(&self.path))
    }
}

/// Environment name and format of a file name, `None` when the name maps to no format.
pub fn classify(file_name: &str) -> Result<Option<(String, Format)>> {
    if file_name == ".env" {
        return Err(Error::AmbiguousFilename {
            name: file_name.to_owned(),
            reason: "a bare '.env' names no environment",
        });
    }
    if let Some(caps) = DOTENV_NAME.captures(file_name) {
        let name = &caps[1];
        let ext = name.rsplit('.').next().unwrap_or_default();
        if name.contains('.') && Format::from_extension(ext).is_some() {
            return Err(Error::AmbiguousFilename {
                name: file_name.to_owned(),
                reason: "dotenv prefix combined with a structured extension",
            });
        }
        return Ok(Some((name.to_owned(), Format::Dotenv)));
    }
    if let Some(caps) = STRUCTURED_NAME.captures(file_name) {
        return Ok(Format::from_extension(&caps[2]).map(|format| (caps[1].to_owned(), format)));
    }
    Ok(None)
}

/// Resolve every usable input file to an environment, sorted by environment name.
pub fn discover(paths: &[PathBuf]) -> Result<Vec<EnvFile>> {
    if paths.is_empty() {
        return Err(Error::NoInputFiles);
    }
    let mut out: Vec<EnvFile> = Vec::with_capacity(paths.len());
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut by_ident: HashMap<String, usize> = HashMap::new();

    for path in paths {
        let file_name = file_name(path);
        let Some((name, format)) = classify(&file_name).map_err(|e| e.in_file(path))? else {
            tracing::warn!(file = %path.display(), "skipping file: name maps to no config format");
            continue;
        };
        let ident = names::rust_ident(&name);
        let module = format!("env_{}", names::snake_case(&name));
        let clash = by_name.get(&name).or_else(|| by_ident.get(&ident)).copied();
        if let Some(first) = clash {
            return Err(Error::DuplicateEnvironment {
                name,
                first: out[first].path.clone(),
                second: path.clone(),
            });
        }
        tracing::debug!(file = %path.display(), env = %name, format = %format, "discovered environment");
        by_name.insert(name.clone(), out.len());
        by_ident.insert(ident.clone(), out.len());
        out.push(EnvFile { path: path.clone(), name, format, ident, module });
    }

    if out.is_empty() {
        return Err(Error::NoSuitableFiles);
    }
    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("default.yml", "default", Format::Yaml)]
    #[case("test.yaml", "test", Format::Yaml)]
    #[case("prod.eu.json", "prod.eu", Format::Json)]
    #[case("local.toml", "local", Format::Toml)]
    #[case(".env.staging", "staging", Format::Dotenv)]
    fn recognised_names(#[case] file: &str, #[case] name: &str, #[case] format: Format) {
        assert_eq!(classify(file).unwrap(), Some((name.to_owned(), format)));
    }

    #[rstest]
    #[case("README.md")]
    #[case("notes.txt")]
    #[case("default.yml.bak")]
    fn unrelated_names_are_skipped(#[case] file: &str) {
        assert_eq!(classify(file).unwrap(), None);
    }

    #[rstest]
    #[case(".env")]
    #[case(".env.test.yml")]
    fn ambiguous_names_are_errors(#[case] file: &str) {
        assert!(matches!(classify(file), Err(Error::AmbiguousFilename { .. })));
    }

    #[test]
    fn discovery_sorts_and_skips() {
        let paths: Vec<PathBuf> = ["cfg/test.yml", "cfg/README.md", "cfg/default.yml", "cfg/.env.local"]
            .into_iter()
            .map(PathBuf::from)
            .collect();
        let files = discover(&paths).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["default", "local", "test"]);
        assert_eq!(files[2].module, "env_test");
    }

    #[test]
    fn one_environment_from_two_files_is_a_duplicate() {
        let paths = vec![PathBuf::from("default.yml"), PathBuf::from("default.json")];
        match discover(&paths).unwrap_err() {
            Error::DuplicateEnvironment { name, first, second } => {
                assert_eq!(name, "default");
                assert_eq!(first, PathBuf::from("default.yml"));
                assert_eq!(second, PathBuf::from("default.json"));
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn names_folding_to_one_identifier_are_duplicates() {
        let paths = vec![PathBuf::from("prod.eu.yml"), PathBuf::from("prod_eu.yml")];
        assert!(matches!(discover(&paths), Err(Error::DuplicateEnvironment { .. })));
    }

    #[test]
    fn nothing_usable() {
        assert!(matches!(discover(&[]), Err(Error::NoInputFiles)));
        assert!(matches!(discover(&[PathBuf::from("a.txt")]), Err(Error::NoSuitableFiles)));
    }
}
