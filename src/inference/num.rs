use crate::ir::ScalarKind;
use crate::value::Value;

/// Scalar kind with fixed-width numerics: every integer is `i64` and every
/// float `f64`, whatever width the source format used. `None` for null and
/// composite values.
pub fn scalar_kind(v: &Value) -> Option<ScalarKind> {
    match v {
        Value::Bool(_) => Some(ScalarKind::Bool),
        Value::Int(_) => Some(ScalarKind::Int),
        Value::Float(_) => Some(ScalarKind::Float),
        Value::String(_) => Some(ScalarKind::String),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
