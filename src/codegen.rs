//! Rust source emission.
//!
//! Everything renders into an in-memory [`Codegen`] buffer; nothing touches the
//! filesystem until every unit of a run rendered successfully.
pub mod config;
pub mod literal;
pub mod registry;
pub mod schema;

use chrono::{DateTime, SecondsFormat, Utc};

pub const GENERATOR: &str = "genfig";

// ————————————————————————————————————————————————————————————————————————————
// STYLE
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Newline {
    #[default]
    Lf,
    Crlf,
}

impl Newline {
    pub fn as_str(self) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::Crlf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub indent: String,
    pub newline: Newline,
}

impl Default for Style {
    fn default() -> Self { Self { indent: "    ".to_owned(), newline: Newline::Lf } }
}

// ————————————————————————————————————————————————————————————————————————————
// BUFFER
// ————————————————————————————————————————————————————————————————————————————

/// Line-oriented source buffer honouring the configured indentation and newline.
pub struct Codegen {
    out: String,
    style: Style,
    level: usize,
}

impl Codegen {
    pub fn new(style: &Style) -> Self { Self { out: String::new(), style: style.clone(), level: 0 } }

    pub fn style(&self) -> &Style { &self.style }

    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.out.push_str(&self.style.indent);
            }
            self.out.push_str(text);
        }
        self.out.push_str(self.style.newline.as_str());
    }

    pub fn blank(&mut self) { self.out.push_str(self.style.newline.as_str()); }

    /// Emit `text` and indent everything up to the matching [`Codegen::close`].
    pub fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.level += 1;
    }

    pub fn close(&mut self, text: impl AsRef<str>) {
        self.level = self.level.saturating_sub(1);
        self.line(text);
    }

    /// Emit a multi-line template. Each leading group of four spaces in the
    /// template is one indentation step.
    pub fn block(&mut self, template: &str) {
        for raw in template.trim_matches('\n').lines() {
            let trimmed = raw.trim_start_matches(' ');
            let steps = (raw.len() - trimmed.len()) / 4;
            self.level += steps;
            self.line(trimmed);
            self.level -= steps;
        }
    }

    pub fn into_string(self) -> String { self.out }
}

// ————————————————————————————————————————————————————————————————————————————
// UNITS
// ————————————————————————————————————————————————————————————————————————————

/// One generated module, later written as `<module>.rs` or inlined into `mod.rs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub module: String,
    /// `pub use <module>::*;` from `mod.rs`.
    pub reexport: bool,
    /// Provenance shown in the file header, e.g. `schema built from 'default.yml'`.
    pub source: Option<String>,
    pub body: String,
}

impl Unit {
    pub fn file_name(&self) -> String { format!("{}.rs", self.module) }
}

pub fn header(source: Option<&str>, timestamp: Option<DateTime<Utc>>, style: &Style) -> String {
    let mut line = format!("// Code generated by {GENERATOR}");
    if let Some(source) = source {
        line.push_str(&format!(" ({source})"));
    }
    if let Some(ts) = timestamp {
        line.push_str(&format!(" on {}", ts.to_rfc3339_opts(SecondsFormat::Secs, true)));
    }
    line.push_str("; DO NOT EDIT.");
    line.push_str(style.newline.as_str());
    line
}
