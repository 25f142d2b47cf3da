//! Rust expression syntax for leaf values.
//!
//! Typed leaves render against their schema descriptor and fail when the merged
//! value disagrees with it; untyped values render as `Dynamic` trees.
use crate::error::{Error, Result};
use crate::ir::{ElementKind, FieldPath, ScalarKind, TypeDescriptor};
use crate::value::{Mapping, Value};

pub fn string(s: &str) -> String { format!("String::from({s:?})") }

pub fn float(f: f64) -> String {
    if f.is_nan() {
        "f64::NAN".to_owned()
    } else if f.is_infinite() {
        if f > 0.0 { "f64::INFINITY".to_owned() } else { "f64::NEG_INFINITY".to_owned() }
    } else {
        // Debug keeps a trailing `.0` on whole numbers
        format!("{f:?}")
    }
}

fn mismatch(path: &FieldPath, expected: impl ToString, found: &Value) -> Error {
    Error::KindMismatch { path: path.clone(), expected: expected.to_string(), found: found.kind_name() }
}

fn scalar(path: &FieldPath, kind: ScalarKind, v: &Value) -> Result<String> {
    match (kind, v) {
        (ScalarKind::Bool, Value::Bool(b)) => Ok(b.to_string()),
        (ScalarKind::Int, Value::Int(n)) => Ok(n.to_string()),
        (ScalarKind::Float, Value::Float(f)) => Ok(float(*f)),
        (ScalarKind::String, Value::String(s)) => Ok(string(s)),
        _ => Err(mismatch(path, kind, v)),
    }
}

fn element(path: &FieldPath, kind: ElementKind, v: &Value) -> Result<String> {
    match (kind, v) {
        (ElementKind::Scalar(k), _) => scalar(path, k, v),
        (ElementKind::Map, Value::Mapping(m)) => Ok(map(m)),
        (ElementKind::Seq, Value::Sequence(xs)) => Ok(dynamic_vec(xs)),
        _ => Err(mismatch(path, kind, v)),
    }
}

fn vec_of(items: Vec<String>) -> String {
    if items.is_empty() { "Vec::new()".to_owned() } else { format!("vec![{}]", items.join(", ")) }
}

fn dynamic_vec(xs: &[Value]) -> String { vec_of(xs.iter().map(dynamic).collect()) }

/// Expression for a non-struct schema leaf.
pub fn leaf(path: &FieldPath, ty: &TypeDescriptor, v: &Value) -> Result<String> {
    match (ty, v) {
        (TypeDescriptor::Scalar(k), _) => scalar(path, *k, v),
        (TypeDescriptor::Array(k), Value::Sequence(xs)) => {
            let items = xs.iter().map(|x| element(path, *k, x)).collect::<Result<Vec<_>>>()?;
            Ok(vec_of(items))
        }
        (TypeDescriptor::DynamicArray, Value::Sequence(xs)) => Ok(dynamic_vec(xs)),
        (TypeDescriptor::Dynamic, _) => Ok(dynamic(v)),
        _ => Err(mismatch(path, ty, v)),
    }
}

/// `Dynamic` expression for any value.
pub fn dynamic(v: &Value) -> String {
    match v {
        Value::Null => "Dynamic::Null".to_owned(),
        Value::Bool(b) => format!("Dynamic::Bool({b})"),
        Value::Int(n) => format!("Dynamic::Int({n})"),
        Value::Float(f) => format!("Dynamic::Float({})", float(*f)),
        Value::String(s) => format!("Dynamic::String({})", string(s)),
        Value::Sequence(xs) => format!("Dynamic::Seq({})", dynamic_vec(xs)),
        Value::Mapping(m) => format!("Dynamic::Map({})", map(m)),
    }
}

/// `BTreeMap<String, Dynamic>` expression, entries in key order.
pub fn map(m: &Mapping) -> String {
    if m.is_empty() {
        return "BTreeMap::new()".to_owned();
    }
    let mut entries: Vec<(&String, &Value)> = m.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    let body = entries.iter().map(|(k, v)| format!("({}, {})", string(k), dynamic(v))).collect::<Vec<_>>();
    format!("BTreeMap::from([{}])", body.join(", "))
}
