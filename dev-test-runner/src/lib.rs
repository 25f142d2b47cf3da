//! Builds the config module genfig generates from `samples/` (see `build.rs`)
//! and reads it back against the documents the generator merged.
pub mod config {
    include!(concat!(env!("OUT_DIR"), "/config/mod.rs"));
}
