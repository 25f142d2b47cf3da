//! Generates the config module for `samples/` into `OUT_DIR`.
use std::env;
use std::path::PathBuf;

use genfig::{Generator, Params};

fn main() -> anyhow::Result<()> {
    let samples = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?).join("samples");
    println!("cargo:rerun-if-changed={}", samples.display());

    let mut files = Vec::new();
    for entry in std::fs::read_dir(&samples)? {
        files.push(entry?.path());
    }
    files.sort();

    let params = Params {
        dir: PathBuf::from(env::var("OUT_DIR")?).join("config"),
        merge_files: true,
        ..Params::default()
    };
    Generator::new(params)?.generate(&files)?;
    Ok(())
}
