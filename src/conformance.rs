//! Structural conformance of an environment document against the default schema.
//!
//! Overrides may re-specify existing leaves but never add new paths, change a
//! leaf's shape or spell a key differently from the default. Every entry of
//! the override is checked, struct entries included.
use crate::error::{Error, Result};
use crate::inference::{InferOptions, infer};
use crate::ir::Schema;
use crate::value::Value;

pub fn check_conformance(schema: &Schema, env: &Value, options: &InferOptions) -> Result<()> {
    let env_schema = infer(env, options)?;
    // a parent path sorts before its children, so a bad parent is reported first
    for (path, entry) in env_schema.entries() {
        let found = entry.descriptor();
        let Some(reference) = schema.get(path) else {
            return Err(Error::UnknownField { path: path.clone(), found: found.to_string() });
        };
        // the merge joins on raw keys
        if entry.keys != reference.keys {
            return Err(Error::KeySpelling {
                path: path.clone(),
                found: entry.dotted(),
                expected: reference.dotted(),
            });
        }
        let expected = reference.descriptor();
        let conforms = match (entry.is_struct(), reference.is_struct()) {
            (true, true) => true,
            (false, false) => found == expected,
            _ => false,
        };
        if !conforms {
            return Err(Error::NonConformant {
                path: path.clone(),
                found: found.to_string(),
                expected: expected.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(default: serde_json::Value, env: serde_json::Value) -> Result<()> {
        let opts = InferOptions::default();
        let schema = infer(&Value::from(default), &opts).unwrap();
        check_conformance(&schema, &Value::from(env), &opts)
    }

    #[test]
    fn same_shape_conforms() {
        let d = json!({"db": {"user": "", "pass": ""}, "port": 1234, "tags": ["a"]});
        assert!(check(d.clone(), d).is_ok());
    }

    #[test]
    fn partial_override_conforms() {
        let d = json!({"db": {"user": "", "pass": ""}, "port": 1234});
        assert!(check(d, json!({"db": {"user": "chuck", "pass": "norris"}})).is_ok());
    }

    #[test]
    fn new_field_is_named_by_path() {
        let d = json!({"db": {"user": "", "pass": ""}});
        let err = check(d, json!({"db": {"extra_field": 1}})).unwrap_err();
        match err {
            Error::UnknownField { path, found } => {
                assert_eq!(path.as_str(), "DbExtraField");
                assert_eq!(found, "i64");
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn changed_leaf_kind_reports_both_descriptors() {
        let err = check(json!({"port": 1234}), json!({"port": "1234"})).unwrap_err();
        match err {
            Error::NonConformant { path, found, expected } => {
                assert_eq!(path.as_str(), "Port");
                assert_eq!(found, "String");
                assert_eq!(expected, "i64");
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn leaf_replaced_by_struct_is_rejected() {
        let err = check(json!({"db": "uri"}), json!({"db": {"user": "x"}})).unwrap_err();
        match err {
            Error::NonConformant { path, found, expected } => {
                assert_eq!(path.as_str(), "Db");
                assert_eq!(found, "ConfigDb");
                assert_eq!(expected, "String");
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn empty_mapping_over_a_leaf_is_rejected() {
        let d = json!({"db": "uri", "port": 1});
        let err = check(d.clone(), json!({"db": {}})).unwrap_err();
        assert!(matches!(err, Error::NonConformant { ref path, ref found, .. } if path.as_str() == "Db" && found == "ConfigDb"), "{err}");
        let err = check(d, json!({"port": {}})).unwrap_err();
        assert!(matches!(err, Error::NonConformant { ref path, ref expected, .. } if path.as_str() == "Port" && expected == "i64"), "{err}");
    }

    #[test]
    fn new_empty_mapping_is_an_unknown_field() {
        let err = check(json!({"db": "uri"}), json!({"newkey": {}})).unwrap_err();
        match err {
            Error::UnknownField { path, found } => {
                assert_eq!(path.as_str(), "Newkey");
                assert_eq!(found, "ConfigNewkey");
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn key_spelled_differently_is_rejected() {
        let err = check(json!({"Port": 1}), json!({"port": 2})).unwrap_err();
        match err {
            Error::KeySpelling { path, found, expected } => {
                assert_eq!(path.as_str(), "Port");
                assert_eq!(found, "port");
                assert_eq!(expected, "Port");
            }
            other => panic!("unexpected {other}"),
        }
        let err = check(json!({"db": {"longDesc": ""}}), json!({"db": {"long_desc": "x"}})).unwrap_err();
        assert!(matches!(err, Error::KeySpelling { ref found, .. } if found == "db.long_desc"), "{err}");
    }

    #[test]
    fn parent_spelled_differently_is_reported_at_the_parent() {
        let err = check(json!({"db": {"user": ""}}), json!({"Db": {"user": "x"}})).unwrap_err();
        assert!(matches!(err, Error::KeySpelling { ref path, .. } if path.as_str() == "Db"), "{err}");
    }

    #[test]
    fn struct_replaced_by_leaf_is_rejected() {
        let err = check(json!({"db": {"user": "x"}}), json!({"db": "uri"})).unwrap_err();
        assert!(matches!(err, Error::NonConformant { ref expected, .. } if expected == "ConfigDb"), "{err}");
    }

    #[test]
    fn empty_default_array_accepts_mixed_override() {
        assert!(check(json!({"list": []}), json!({"list": [1, "x"]})).is_ok());
    }

    #[test]
    fn empty_default_array_rejects_typed_override() {
        let err = check(json!({"list": []}), json!({"list": [1, 2, 3]})).unwrap_err();
        match err {
            Error::NonConformant { found, expected, .. } => {
                assert_eq!(found, "Vec<i64>");
                assert_eq!(expected, "Vec<Dynamic>");
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn mixed_override_of_typed_array_is_rejected() {
        let err = check(json!({"list": [1, 2]}), json!({"list": [1, "x"]})).unwrap_err();
        assert!(matches!(err, Error::NonConformant { .. }), "{err}");
    }

    #[test]
    fn override_depth_is_bounded_too() {
        let opts = InferOptions { max_depth: 1, ..InferOptions::default() };
        let schema = infer(&Value::from(json!({"a": 1})), &opts).unwrap();
        let err = check_conformance(&schema, &Value::from(json!({"a": {"b": 1}})), &opts).unwrap_err();
        assert!(matches!(err, Error::DepthExceeded { .. }));
    }
}
