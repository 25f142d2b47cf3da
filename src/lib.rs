//! Typed, per-environment Rust configuration modules generated from
//! YAML/JSON/TOML/dotenv files.
//!
//! A default document defines the schema; every other environment may only
//! re-specify its leaves. The output is a Rust module tree with one struct per
//! nested mapping, one literal per environment and a registry selecting the
//! active environment at runtime.
pub mod codegen;
pub mod conformance;
pub mod discovery;
pub mod error;
pub mod generator;
pub mod inference;
pub mod ir;
pub mod merge;
pub mod names;
pub mod parsers;
pub mod plugins;
pub mod value;

pub use error::{Error, Result};
pub use generator::{GeneratedFile, Generator, MergedEnv, Output, Params};
pub use value::Value;
