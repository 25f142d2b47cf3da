//! Error taxonomy for the generator.
//!
//! Input and structural errors abort the whole run, conformance errors abort
//! before anything is written for the offending environment, and emission
//! errors carry the field path that could not be rendered.
use std::path::PathBuf;
use thiserror::Error;

use crate::ir::FieldPath;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    // ---- input ----
    #[error("no files to generate from")]
    NoInputFiles,

    #[error("no suitable config files found")]
    NoSuitableFiles,

    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot derive an environment from file name '{name}': {reason}")]
    AmbiguousFilename { name: String, reason: &'static str },

    #[error("document is empty")]
    EmptyDocument,

    #[error("malformed {format} document: {message}")]
    Parse { format: &'static str, message: String },

    #[error("document root must be a mapping, found {found}")]
    RootNotMapping { found: &'static str },

    // ---- structural ----
    #[error("environment '{name}' does already exist (defined by '{first}' and '{second}')")]
    DuplicateEnvironment {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("missing default config '{name}'")]
    MissingDefault { name: String },

    #[error("maximum of {max} levels exceeded at '{path}'")]
    DepthExceeded { path: FieldPath, max: usize },

    #[error("key '{key}' has no letter or digit to derive a name from")]
    UnnamedKey { key: String },

    #[error("keys '{first}' and '{second}' both resolve to '{path}'")]
    KeyCollision {
        path: FieldPath,
        first: String,
        second: String,
    },

    // ---- conformance ----
    #[error("config property '{path}' is not defined in the default config (found `{found}`)")]
    UnknownField { path: FieldPath, found: String },

    #[error("config property '{found}' is spelled '{expected}' in the default config")]
    KeySpelling {
        path: FieldPath,
        found: String,
        expected: String,
    },

    #[error("non-conformant field '{path}': found `{found}`, default declares `{expected}`")]
    NonConformant {
        path: FieldPath,
        found: String,
        expected: String,
    },

    // ---- emission ----
    #[error("config property '{path}' is not defined in the default config")]
    UndefinedProperty { path: FieldPath },

    #[error("config property '{path}' is declared in the schema but missing from the merged config")]
    MissingProperty { path: FieldPath },

    #[error("cannot render '{path}': expected `{expected}`, found {found}")]
    KindMismatch {
        path: FieldPath,
        expected: String,
        found: &'static str,
    },

    #[error("unknown plugin '{name}'")]
    UnknownPlugin { name: String },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Attaches the originating file to any error raised while handling it.
    #[error("{}: {source}", file.display())]
    Document {
        file: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn in_file(self, file: impl Into<PathBuf>) -> Self {
        match self {
            already @ Self::Document { .. } => already,
            other => Self::Document { file: file.into(), source: Box::new(other) },
        }
    }

    /// The error with any file context stripped.
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Document { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
