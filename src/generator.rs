//! Generation run: discovery → default schema → conformance → merge → emission.
//!
//! Everything is rendered into memory first. Files are written only after
//! every unit of the run rendered, so a failing environment never leaves a
//! half-generated module behind.
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::codegen::config::EnvUnit;
use crate::codegen::registry::{self, EnvEntry};
use crate::codegen::{self, Codegen, Style, Unit};
use crate::conformance::check_conformance;
use crate::discovery::{self, EnvFile};
use crate::error::{Error, Result};
use crate::inference::{DEFAULT_MAX_DEPTH, DEFAULT_ROOT_NAME, InferOptions, infer};
use crate::ir::Schema;
use crate::merge::merge;
use crate::plugins::{self, Plugin, PluginList};
use crate::value::Value;

pub const DEFAULT_DIR: &str = "config";
pub const DEFAULT_ENV: &str = "default";
pub const MOD_FILE: &str = "mod.rs";

// ------------------------------- Params ----------------------------------- //

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    /// Output directory of the generated module.
    pub dir: PathBuf,
    /// Environment whose document defines the schema.
    pub default_env: String,
    pub max_depth: usize,
    /// Name of the root struct; nested structs are prefixed with it.
    pub root_name: String,
    pub style: Style,
    /// Inline every unit into `mod.rs`.
    pub merge_files: bool,
    /// Stamp headers with the generation time.
    pub timestamp: bool,
    /// Plugin names in registration order.
    pub plugins: Vec<String>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DIR),
            default_env: DEFAULT_ENV.to_owned(),
            max_depth: DEFAULT_MAX_DEPTH,
            root_name: DEFAULT_ROOT_NAME.to_owned(),
            style: Style::default(),
            merge_files: false,
            timestamp: false,
            plugins: plugins::BUILTIN.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Params {
    fn infer_options(&self) -> InferOptions {
        InferOptions { max_depth: self.max_depth, root_name: self.root_name.clone() }
    }
}

// ------------------------------- Output ----------------------------------- //

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// One environment after merging.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedEnv {
    pub name: String,
    pub file: PathBuf,
    pub merged: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub schema: Schema,
    /// Sorted by environment name.
    pub environments: Vec<MergedEnv>,
    pub files: Vec<GeneratedFile>,
}

// ------------------------------ Generator --------------------------------- //

pub struct Generator {
    params: Params,
    plugins: PluginList,
}

enum Job<'a> {
    Schema,
    Envs,
    Init,
    Env(&'a EnvFile, &'a Value),
    Plugin(&'a dyn Plugin),
}

struct Prepared {
    files: Vec<EnvFile>,
    default: usize,
    schema: Schema,
    merged: Vec<Value>,
}

impl Generator {
    pub fn new(params: Params) -> Result<Self> {
        let plugins = plugins::resolve(&params.plugins)?;
        Ok(Self { params, plugins })
    }

    pub fn params(&self) -> &Params { &self.params }

    /// Render every output file in memory.
    pub fn render(&self, files: &[PathBuf]) -> Result<Output> {
        let prepared = self.prepare(files)?;
        let units = self.render_units(&prepared)?;

        let default_file = &prepared.files[prepared.default];
        let timestamp = self.params.timestamp.then(Utc::now);
        let schema_source = format!("schema built from '{}'", display_name(&default_file.path));
        let style = &self.params.style;

        let mut out = Vec::with_capacity(units.len() + 1);
        let mut cg = Codegen::new(style);
        registry::render_mod(&units, self.params.merge_files, &mut cg);
        if !self.params.merge_files {
            for unit in &units {
                let source = unit.source.as_deref().unwrap_or(&schema_source);
                out.push(GeneratedFile {
                    path: self.params.dir.join(unit.file_name()),
                    contents: with_header(Some(source), timestamp, style, &unit.body),
                });
            }
        }
        out.push(GeneratedFile {
            path: self.params.dir.join(MOD_FILE),
            contents: with_header(Some(&schema_source), timestamp, style, &cg.into_string()),
        });

        let environments = prepared
            .files
            .iter()
            .zip(prepared.merged)
            .map(|(f, merged)| MergedEnv { name: f.name.clone(), file: f.path.clone(), merged })
            .collect();
        Ok(Output { schema: prepared.schema, environments, files: out })
    }

    /// Render, then write every file under the output directory.
    pub fn generate(&self, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let output = self.render(files)?;
        write(&output.files)
    }

    /// The schema unit alone, built from the default environment.
    pub fn render_schema(&self, files: &[PathBuf]) -> Result<String> {
        let discovered = discovery::discover(files)?;
        let default = self.default_file(&discovered)?;
        let doc = default.load()?;
        let schema = infer(&doc, &self.params.infer_options()).map_err(|e| e.in_file(&default.path))?;
        let mut cg = Codegen::new(&self.params.style);
        codegen::schema::render_schema(&schema, &mut cg);
        let source = format!("schema built from '{}'", display_name(&default.path));
        Ok(with_header(Some(&source), None, &self.params.style, &cg.into_string()))
    }

    fn default_file<'a>(&self, files: &'a [EnvFile]) -> Result<&'a EnvFile> {
        files
            .iter()
            .find(|f| f.name == self.params.default_env)
            .ok_or_else(|| Error::MissingDefault { name: self.params.default_env.clone() })
    }

    fn prepare(&self, paths: &[PathBuf]) -> Result<Prepared> {
        let files = discovery::discover(paths)?;
        let default = files
            .iter()
            .position(|f| f.name == self.params.default_env)
            .ok_or_else(|| Error::MissingDefault { name: self.params.default_env.clone() })?;

        let docs = files.iter().map(EnvFile::load).collect::<Result<Vec<_>>>()?;

        let options = self.params.infer_options();
        let default_doc = &docs[default];
        let schema = infer(default_doc, &options).map_err(|e| e.in_file(&files[default].path))?;
        tracing::debug!(entries = schema.entries().count(), "inferred default schema");

        let mut merged = Vec::with_capacity(docs.len());
        for (i, (file, doc)) in files.iter().zip(&docs).enumerate() {
            if i == default {
                merged.push(default_doc.clone());
                continue;
            }
            check_conformance(&schema, doc, &options).map_err(|e| e.in_file(&file.path))?;
            merged.push(merge(default_doc, doc));
            tracing::debug!(env = %file.name, "environment conforms to default schema");
        }
        Ok(Prepared { files, default, schema, merged })
    }

    fn render_units(&self, prepared: &Prepared) -> Result<Vec<Unit>> {
        let mut jobs = vec![Job::Schema, Job::Envs, Job::Init];
        jobs.extend(prepared.files.iter().zip(&prepared.merged).map(|(f, m)| Job::Env(f, m)));
        jobs.extend(self.plugins.iter().map(|p| Job::Plugin(p.as_ref())));

        // first error in unit order, independent of scheduling
        let rendered: Vec<Result<Unit>> = jobs.par_iter().map(|job| self.render_unit(prepared, job)).collect();
        rendered.into_iter().collect()
    }

    fn render_unit(&self, prepared: &Prepared, job: &Job<'_>) -> Result<Unit> {
        let root_name = prepared.schema.root_name();
        let mut cg = Codegen::new(&self.params.style);
        let (module, reexport, source) = match job {
            Job::Schema => {
                codegen::schema::render_schema(&prepared.schema, &mut cg);
                ("schema".to_owned(), true, None)
            }
            Job::Envs => {
                let entries = self.env_entries(&prepared.files);
                registry::render_envs(root_name, &entries, &entries[prepared.default], &mut cg);
                ("envs".to_owned(), true, None)
            }
            Job::Init => {
                let calls: Vec<String> = self.plugins.iter().filter_map(|p| p.init_call()).collect();
                registry::render_init(root_name, &calls, &mut cg);
                ("init".to_owned(), false, None)
            }
            Job::Env(file, merged) => {
                let unit = EnvUnit { name: &file.name, schema: &prepared.schema, merged, max_depth: self.params.max_depth };
                unit.render(&mut cg).map_err(|e| e.in_file(&file.path))?;
                let default_file = &prepared.files[prepared.default];
                let source = if file.path == default_file.path {
                    format!("environment '{}' from '{}'", file.name, display_name(&file.path))
                } else {
                    format!(
                        "environment '{}' from '{}' over '{}'",
                        file.name,
                        display_name(&file.path),
                        display_name(&default_file.path)
                    )
                };
                tracing::info!(env = %file.name, module = %file.module, "rendered environment");
                (file.module.clone(), false, Some(source))
            }
            Job::Plugin(plugin) => {
                plugin.render(&prepared.schema, &mut cg)?;
                (plugin.module(), false, None)
            }
        };
        Ok(Unit { module, reexport, source, body: cg.into_string() })
    }

    fn env_entries(&self, files: &[EnvFile]) -> Vec<EnvEntry> {
        files
            .iter()
            .map(|f| EnvEntry { name: f.name.clone(), ident: f.ident.clone(), module: f.module.clone() })
            .collect()
    }
}

// ------------------------------ Utilities --------------------------------- //

fn with_header(source: Option<&str>, timestamp: Option<DateTime<Utc>>, style: &Style, body: &str) -> String {
    let mut out = codegen::header(source, timestamp, style);
    out.push_str(style.newline.as_str());
    out.push_str(body);
    out
}

fn display_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| path.display().to_string())
}

/// Create parent directories and write every file.
pub fn write(files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        if let Some(parent) = file.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| Error::Write { path: parent.to_path_buf(), source })?;
        }
        std::fs::write(&file.path, &file.contents).map_err(|source| Error::Write { path: file.path.clone(), source })?;
        tracing::info!(file = %file.path.display(), "wrote");
        written.push(file.path.clone());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = Params::default();
        assert_eq!(p.dir, PathBuf::from("config"));
        assert_eq!(p.default_env, "default");
        assert_eq!(p.max_depth, 5);
        assert_eq!(p.root_name, "Config");
        assert_eq!(p.style.indent, "    ");
        assert_eq!(p.plugins, ["update_from_env", "substitutor", "write_to_env", "map"]);
    }

    #[test]
    fn unknown_plugin_fails_construction() {
        let params = Params { plugins: vec!["nope".into()], ..Params::default() };
        assert!(matches!(Generator::new(params), Err(Error::UnknownPlugin { .. })));
    }
}
