//! Deep overlay of an environment document onto the default document.
use crate::value::{Mapping, Value};

/// Recurse into mappings present on both sides; anywhere else the override
/// replaces the default wholesale. Keys the override omits keep the default.
pub fn merge(default: &Value, overlay: &Value) -> Value {
    match (default, overlay) {
        (Value::Mapping(d), Value::Mapping(o)) => Value::Mapping(merge_mappings(d, o)),
        (_, o) => o.clone(),
    }
}

fn merge_mappings(d: &Mapping, o: &Mapping) -> Mapping {
    let mut out = Mapping::with_capacity(d.len().max(o.len()));
    // keys from the default, overlaid where the override has them
    for (k, dv) in d {
        let merged = match o.get(k) {
            Some(ov) => merge(dv, ov),
            None => dv.clone(),
        };
        out.insert(k.clone(), merged);
    }
    // keys only in the override
    for (k, ov) in o {
        if !out.contains_key(k) {
            out.insert(k.clone(), ov.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(j: serde_json::Value) -> Value { Value::from(j) }

    #[test]
    fn empty_override_is_identity() {
        let d = v(json!({"db": {"user": "", "pass": ""}, "port": 1234, "list": [1, 2]}));
        assert_eq!(merge(&d, &Value::empty_mapping()), d);
    }

    #[test]
    fn override_wins_at_leaves_and_default_fills_gaps() {
        let d = v(json!({"db": {"user": "", "pass": "", "uri": "localhost"}, "port": 1234}));
        let e = v(json!({"db": {"user": "chuck", "pass": "norris"}}));
        let m = merge(&d, &e);
        assert_eq!(m, v(json!({"db": {"user": "chuck", "pass": "norris", "uri": "localhost"}, "port": 1234})));
    }

    #[test]
    fn sequences_are_replaced_not_concatenated() {
        let d = v(json!({"list": [1, 2, 3]}));
        let e = v(json!({"list": [9]}));
        assert_eq!(merge(&d, &e), v(json!({"list": [9]})));
    }

    #[test]
    fn merged_tree_agrees_with_both_sides() {
        let d = v(json!({"a": {"b": 1, "c": {"d": "x", "e": false}}, "f": 0.5}));
        let e = v(json!({"a": {"c": {"e": true}}}));
        let m = merge(&d, &e);
        assert_eq!(m.lookup(["a", "c", "e"]), e.lookup(["a", "c", "e"]));
        assert_eq!(m.lookup(["a", "c", "d"]), d.lookup(["a", "c", "d"]));
        assert_eq!(m.lookup(["a", "b"]), d.lookup(["a", "b"]));
        assert_eq!(m.lookup(["f"]), d.lookup(["f"]));
    }
}
