use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::ir::FieldPath;
use crate::names;
use crate::value::{Mapping, Value};

pub struct Member<'a> {
    pub key: &'a str,
    pub component: String, // PascalCase Field Path component
    pub ident: String,     // Rust field identifier
    pub value: &'a Value,
}

/// Members of a mapping in key order, rejecting keys with nothing to name a
/// field after and siblings whose keys fold to the same path component or
/// field identifier.
pub fn members<'a>(path: &FieldPath, keys: &[String], map: &'a Mapping) -> Result<Vec<Member<'a>>> {
    let mut out: Vec<Member<'a>> = map
        .iter()
        .map(|(k, v)| Member {
            key: k.as_str(),
            component: names::pascal_case(k),
            ident: names::rust_ident(k),
            value: v,
        })
        .collect();
    out.sort_by(|a, b| a.key.cmp(b.key));

    if let Some(unnamed) = out.iter().find(|m| m.component.is_empty()) {
        return Err(Error::UnnamedKey { key: dotted(keys, unnamed.key) });
    }

    let mut by_component: HashMap<&str, &str> = HashMap::new();
    let mut by_ident: HashMap<&str, &str> = HashMap::new();
    for m in &out {
        let clash = by_component
            .insert(m.component.as_str(), m.key)
            .or_else(|| by_ident.insert(m.ident.as_str(), m.key));
        if let Some(first) = clash {
            return Err(Error::KeyCollision {
                path: path.join(&m.component),
                first: dotted(keys, first),
                second: dotted(keys, m.key),
            });
        }
    }
    Ok(out)
}

fn dotted(keys: &[String], last: &str) -> String {
    keys.iter().map(String::as_str).chain([last]).collect::<Vec<_>>().join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn mapping(v: serde_json::Value) -> Mapping {
        match Value::from(v) {
            Value::Mapping(m) => m,
            other => panic!("not a mapping: {other:?}"),
        }
    }

    #[rstest]
    #[case("-")]
    #[case("🚀")]
    #[case("")]
    #[case("__")]
    fn keys_without_alphanumerics_are_rejected(#[case] key: &str) {
        let map = mapping(json!({ "ok": 1, key: 2 }));
        let parent = vec!["db".to_owned()];
        match members(&FieldPath::from("Db"), &parent, &map) {
            Err(Error::UnnamedKey { key: dotted }) => assert_eq!(dotted, format!("db.{key}")),
            Err(other) => panic!("unexpected {other}"),
            Ok(_) => panic!("accepted key {key:?}"),
        }
    }

    #[test]
    fn members_are_sorted_by_raw_key() {
        let map = mapping(json!({"b": 1, "a-b": 2, "A": 3}));
        let got: Vec<_> = members(&FieldPath::root(), &[], &map).unwrap().into_iter().map(|m| m.component).collect();
        assert_eq!(got, ["A", "AB", "B"]);
    }
}
