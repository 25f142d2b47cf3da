//! Line-oriented dotenv parser.
//!
//! `DB_USER=chuck` nests as `{db: {user: "chuck"}}`. Keys split on `_`, or on
//! `-` when they hold no `_`. Comments take a line of their own.
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Format, ParsingStrategy, mapping_root, text};
use crate::error::{Error, Result};
use crate::value::{Mapping, Value};

static SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*$").expect("valid regex"));

const KV_SEPARATORS: [char; 2] = ['=', ':'];
const NEST_SEPARATORS: [char; 2] = ['_', '-'];

pub struct DotenvStrategy;

impl ParsingStrategy for DotenvStrategy {
    fn parse(&self, data: &[u8]) -> Result<Value> {
        let text = text(data, Format::Dotenv)?;
        let mut root = Mapping::new();
        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fail = |message: String| Error::Parse { format: Format::Dotenv.name(), message: format!("line {}: {message}", i + 1) };
            let (key, value) = split_line(line).ok_or_else(|| fail(format!("expected KEY=value, found '{line}'")))?;
            let chain = key_chain(key).map_err(fail)?;
            insert(&mut root, &chain, parse_value(value)).map_err(fail)?;
        }
        if root.is_empty() {
            return Err(Error::EmptyDocument);
        }
        mapping_root(Value::Mapping(root))
    }
}

fn split_line(line: &str) -> Option<(&str, &str)> {
    KV_SEPARATORS
        .iter()
        .find_map(|sep| line.split_once(*sep))
        .map(|(k, v)| (k.trim(), v.trim()))
}

fn key_chain(key: &str) -> std::result::Result<Vec<String>, String> {
    let lower = key.to_lowercase();
    let sep = NEST_SEPARATORS.iter().copied().find(|s| lower.contains(*s)).unwrap_or('_');
    let chain: Vec<String> = lower.split(sep).map(str::to_owned).collect();
    match chain.iter().find(|segment| !SEGMENT.is_match(segment)) {
        Some(bad) => Err(format!("key segment '{bad}' of '{key}' is not valid")),
        None => Ok(chain),
    }
}

fn insert(root: &mut Mapping, chain: &[String], value: Value) -> std::result::Result<(), String> {
    let dotted = || chain.join(".");
    let Some((last, parents)) = chain.split_last() else {
        return Err("empty key".to_owned());
    };
    let mut map = root;
    for segment in parents {
        let slot = map.entry(segment.clone()).or_insert_with(Value::empty_mapping);
        map = match slot {
            Value::Mapping(m) => m,
            _ => return Err(format!("key '{}' is already present as a value, cannot nest under it", dotted())),
        };
    }
    match map.get(last) {
        Some(Value::Mapping(_)) => Err(format!("key '{}' is already present as a parent of other keys", dotted())),
        Some(_) => Err(format!("key '{}' is already present", dotted())),
        None => {
            map.insert(last.clone(), value);
            Ok(())
        }
    }
}

/// i64, then f64, then bool, then a JSON array, else a string with matching
/// surrounding quotes removed.
fn parse_value(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::Float(f);
    }
    match raw {
        "true" | "TRUE" | "True" => return Value::Bool(true),
        "false" | "FALSE" | "False" => return Value::Bool(false),
        _ => {}
    }
    if raw.starts_with('[') {
        if let Ok(seq @ Value::Sequence(_)) = serde_json::from_str::<Value>(raw) {
            return seq;
        }
    }
    Value::String(unquote(raw).to_owned())
}

fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner;
        }
    }
    raw
}
