use crate::error::Result;
use crate::ir::{ElementKind, FieldPath, TypeDescriptor};
use crate::value::Value;

use super::{check_level, num};

fn element_kind(v: &Value) -> Option<ElementKind> {
    match v {
        Value::Null => None,
        Value::Sequence(_) => Some(ElementKind::Seq),
        Value::Mapping(_) => Some(ElementKind::Map),
        scalar => num::scalar_kind(scalar).map(ElementKind::Scalar),
    }
}

/// Homogeneous if every element has the same kind; empty sequences, nulls and
/// mixed kinds fall back to a dynamic array.
pub fn classify(xs: &[Value]) -> TypeDescriptor {
    let mut kinds = xs.iter().map(element_kind);
    let Some(Some(first)) = kinds.next() else {
        return TypeDescriptor::DynamicArray;
    };
    if kinds.all(|k| k == Some(first)) {
        TypeDescriptor::Array(first)
    } else {
        TypeDescriptor::DynamicArray
    }
}

/// Sequence elements sit at `level`; their own nesting counts toward the limit.
pub fn check_depth(path: &FieldPath, xs: &[Value], level: usize, max: usize) -> Result<()> {
    for x in xs {
        check_nested(path, x, level, max)?;
    }
    Ok(())
}

fn check_nested(path: &FieldPath, v: &Value, level: usize, max: usize) -> Result<()> {
    check_level(path, level, max)?;
    match v {
        Value::Sequence(xs) => check_depth(path, xs, level + 1, max),
        Value::Mapping(m) => {
            for child in m.values() {
                check_nested(path, child, level + 1, max)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ScalarKind;

    #[test]
    fn detection_ignores_element_order() {
        let a = [Value::from(1), Value::from("x")];
        let b = [Value::from("x"), Value::from(1)];
        assert_eq!(classify(&a), classify(&b));

        let strings = [Value::from("a"), Value::from("b")];
        assert_eq!(classify(&strings), TypeDescriptor::Array(ElementKind::Scalar(ScalarKind::String)));
    }

    #[test]
    fn nested_sequences_are_uniform_by_outer_kind() {
        let xs = [Value::Sequence(vec![Value::from(1)]), Value::Sequence(vec![Value::from("a")])];
        assert_eq!(classify(&xs), TypeDescriptor::Array(ElementKind::Seq));
    }
}
