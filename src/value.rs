//! Generic value tree produced by every parsing strategy.
//!
//! One `Deserialize` visitor backs JSON, YAML and TOML alike, so numeric width
//! and key normalization are identical regardless of the source format.
use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

/// Mapping keys are normalized to strings; order is kept for the raw map but
/// never relied upon by inference or rendering.
pub type Mapping = IndexMap<String, Value>;

// toml hands datetimes to `deserialize_any` as a single-entry map under this key
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn empty_mapping() -> Self { Value::Mapping(Mapping::new()) }

    /// Follow a chain of raw keys through nested mappings.
    pub fn lookup<'a, I>(&self, keys: I) -> Option<&Value>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut node = self;
        for key in keys {
            node = node.as_mapping()?.get(key)?;
        }
        Some(node)
    }

    /// Normalize a scalar into a mapping key.
    fn into_key(self) -> Result<String, &'static str> {
        match self {
            Value::String(s) => Ok(s),
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Err("null"),
            Value::Sequence(_) => Err("sequence"),
            Value::Mapping(_) => Err("mapping"),
        }
    }
}

fn from_u64(u: u64) -> Value {
    match i64::try_from(u) {
        Ok(i) => Value::Int(i),
        Err(_) => Value::Float(u as f64),
    }
}

// ------------------------------ Deserialize ------------------------------- //

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a configuration value")
    }

    fn visit_bool<E>(self, b: bool) -> Result<Value, E> { Ok(Value::Bool(b)) }
    fn visit_i64<E>(self, i: i64) -> Result<Value, E> { Ok(Value::Int(i)) }
    fn visit_u64<E>(self, u: u64) -> Result<Value, E> { Ok(from_u64(u)) }
    fn visit_f64<E>(self, f: f64) -> Result<Value, E> { Ok(Value::Float(f)) }
    fn visit_str<E>(self, s: &str) -> Result<Value, E> { Ok(Value::String(s.to_owned())) }
    fn visit_string<E>(self, s: String) -> Result<Value, E> { Ok(Value::String(s)) }
    fn visit_unit<E>(self) -> Result<Value, E> { Ok(Value::Null) }
    fn visit_none<E>(self) -> Result<Value, E> { Ok(Value::Null) }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Value, D::Error> {
        Deserialize::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = Mapping::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(raw_key) = access.next_key::<Value>()? {
            let key = raw_key
                .into_key()
                .map_err(|kind| de::Error::custom(format!("{kind} is not a valid mapping key")))?;
            let value = access.next_value::<Value>()?;
            if map.contains_key(&key) {
                return Err(de::Error::custom(format!("duplicate key '{key}'")));
            }
            map.insert(key, value);
        }
        if map.len() == 1 {
            if let Some(Value::String(stamp)) = map.get(TOML_DATETIME_KEY) {
                return Ok(Value::String(stamp.clone()));
            }
        }
        Ok(Value::Mapping(map))
    }
}

// ------------------------------- Conversion ------------------------------- //

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    from_u64(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(xs) => Value::Sequence(xs.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(m) => {
                Value::Mapping(m.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::String(s.to_owned()) }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Int(i) }
}

// ------------------------------- Tests ------------------------------------ //
