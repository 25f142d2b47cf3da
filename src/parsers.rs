//! Parsing strategies: raw bytes → [`Value`] mapping.
//!
//! Every strategy rejects empty input, malformed input and a root that is not
//! a mapping with the same error kinds, whatever the format.
pub mod dotenv;

use std::fmt;

use crate::error::{Error, Result};
use crate::value::Value;

pub trait ParsingStrategy: Send + Sync {
    fn parse(&self, data: &[u8]) -> Result<Value>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Yaml,
    Json,
    Toml,
    Dotenv,
}

impl Format {
    /// Format selected by a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "yml" | "yaml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Yaml => "YAML",
            Format::Json => "JSON",
            Format::Toml => "TOML",
            Format::Dotenv => "dotenv",
        }
    }

    pub fn strategy(self) -> &'static dyn ParsingStrategy {
        match self {
            Format::Yaml => &YamlStrategy,
            Format::Json => &JsonStrategy,
            Format::Toml => &TomlStrategy,
            Format::Dotenv => &dotenv::DotenvStrategy,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

// ---- shared checks ----

pub(crate) fn text(data: &[u8], format: Format) -> Result<&str> {
    let text = std::str::from_utf8(data)
        .map_err(|e| Error::Parse { format: format.name(), message: e.to_string() })?;
    if text.trim().is_empty() {
        return Err(Error::EmptyDocument);
    }
    Ok(text)
}

pub(crate) fn mapping_root(v: Value) -> Result<Value> {
    match v {
        Value::Mapping(_) => Ok(v),
        other => Err(Error::RootNotMapping { found: other.kind_name() }),
    }
}

fn parse_error(format: Format, e: impl fmt::Display) -> Error {
    Error::Parse { format: format.name(), message: e.to_string() }
}

// ---- strategies ----

pub struct YamlStrategy;

impl ParsingStrategy for YamlStrategy {
    fn parse(&self, data: &[u8]) -> Result<Value> {
        let text = text(data, Format::Yaml)?;
        let v: Value = serde_yml::from_str(text).map_err(|e| parse_error(Format::Yaml, e))?;
        // comments alone parse as a null document
        if v == Value::Null {
            return Err(Error::EmptyDocument);
        }
        mapping_root(v)
    }
}

pub struct JsonStrategy;

impl ParsingStrategy for JsonStrategy {
    fn parse(&self, data: &[u8]) -> Result<Value> {
        let text = text(data, Format::Json)?;
        let v: Value = serde_json::from_str(text).map_err(|e| parse_error(Format::Json, e))?;
        mapping_root(v)
    }
}

pub struct TomlStrategy;

impl ParsingStrategy for TomlStrategy {
    fn parse(&self, data: &[u8]) -> Result<Value> {
        let text = text(data, Format::Toml)?;
        let v: Value = toml::from_str(text).map_err(|e| parse_error(Format::Toml, e))?;
        if v.as_mapping().is_some_and(|m| m.is_empty()) {
            return Err(Error::EmptyDocument);
        }
        mapping_root(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Format::Yaml, "db:\n  user: chuck\n  port: 5432\n")]
    #[case(Format::Json, r#"{"db": {"user": "chuck", "port": 5432}}"#)]
    #[case(Format::Toml, "[db]\nuser = \"chuck\"\nport = 5432\n")]
    #[case(Format::Dotenv, "DB_USER=chuck\nDB_PORT=5432\n")]
    fn formats_agree(#[case] format: Format, #[case] src: &str) {
        let v = format.strategy().parse(src.as_bytes()).unwrap();
        assert_eq!(v, Value::from(json!({"db": {"user": "chuck", "port": 5432}})));
    }

    #[rstest]
    #[case(Format::Yaml)]
    #[case(Format::Json)]
    #[case(Format::Toml)]
    #[case(Format::Dotenv)]
    fn empty_input_is_rejected(#[case] format: Format) {
        assert!(matches!(format.strategy().parse(b""), Err(Error::EmptyDocument)));
        assert!(matches!(format.strategy().parse(b"  \n\t\n"), Err(Error::EmptyDocument)));
    }

    #[rstest]
    #[case(Format::Yaml, "# nothing here\n")]
    #[case(Format::Yaml, "---\n# nothing here\n")]
    #[case(Format::Toml, "# nothing here\n")]
    #[case(Format::Dotenv, "# nothing here\n\n# or here\n")]
    fn comment_only_input_is_empty(#[case] format: Format, #[case] src: &str) {
        let err = format.strategy().parse(src.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::EmptyDocument), "{err}");
    }

    #[test]
    fn explicit_empty_mapping_is_a_document() {
        assert_eq!(Format::Yaml.strategy().parse(b"{}\n").unwrap(), Value::empty_mapping());
        assert_eq!(Format::Json.strategy().parse(b"{}").unwrap(), Value::empty_mapping());
    }

    #[rstest]
    #[case(Format::Yaml, "a: [1, 2")]
    #[case(Format::Json, "{\"a\": ")]
    #[case(Format::Toml, "a = ")]
    fn malformed_input_is_a_parse_error(#[case] format: Format, #[case] src: &str) {
        let err = format.strategy().parse(src.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }), "{err}");
    }

    #[rstest]
    #[case(Format::Yaml, "- 1\n- 2\n", "sequence")]
    #[case(Format::Json, "[1, 2]", "sequence")]
    #[case(Format::Json, "\"x\"", "string")]
    fn root_must_be_a_mapping(#[case] format: Format, #[case] src: &str, #[case] found: &str) {
        match format.strategy().parse(src.as_bytes()) {
            Err(Error::RootNotMapping { found: f }) => assert_eq!(f, found),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn extensions() {
        assert_eq!(Format::from_extension("yaml"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("yml"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("env"), None);
    }
}
