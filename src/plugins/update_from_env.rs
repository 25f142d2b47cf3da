use super::{Plugin, scalar_array_leaves, scalar_leaves};
use crate::codegen::Codegen;
use crate::error::Result;
use crate::ir::{ScalarKind, Schema};

pub const NAME: &str = "update_from_env";

const HELPERS: &str = r#"
#[allow(dead_code)]
fn lookup_env(dotted: &str, upper: &str) -> Option<(String, String)> {
    for key in [dotted, upper] {
        if let Ok(raw) = std::env::var(key) {
            return Some((key.to_string(), raw));
        }
    }
    None
}

#[allow(dead_code)]
fn parse_into<T: std::str::FromStr>(raw: &str, slot: &mut T) -> bool {
    match raw.trim().parse() {
        Ok(value) => {
            *slot = value;
            true
        }
        Err(_) => false,
    }
}

/// Accepts `[a, b]` or `a,b`; a leading `+` appends instead of replacing.
#[allow(dead_code)]
fn parse_list_into<T: std::str::FromStr>(raw: &str, slot: &mut Vec<T>) -> bool {
    let raw = raw.trim();
    let (append, body) = match raw.strip_prefix('+') {
        Some(rest) => (true, rest.trim()),
        None => (false, raw),
    };
    let body = body.strip_prefix('[').and_then(|b| b.strip_suffix(']')).unwrap_or(body);
    let mut items = Vec::new();
    for part in body.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.trim_matches(|c: char| c == '"' || c == '\'').parse() {
            Ok(item) => items.push(item),
            Err(_) => return false,
        }
    }
    if append {
        slot.extend(items);
    } else {
        *slot = items;
    }
    true
}
"#;

/// Overrides scalar and scalar-array leaves from environment variables.
pub struct UpdateFromEnv;

impl Plugin for UpdateFromEnv {
    fn name(&self) -> &'static str { NAME }

    fn render(&self, schema: &Schema, cg: &mut Codegen) -> Result<()> {
        cg.line("use super::*;");
        cg.blank();
        cg.open(format!("impl {} {{", schema.root_name()));
        cg.line("/// Overrides leaves from environment variables, looked up by dotted path");
        cg.line("/// (`db.user`) and then by upper-case name (`DB_USER`). Returns the names");
        cg.line("/// of the variables that were applied.");
        cg.open("pub fn update_from_env(&mut self) -> Vec<String> {");
        cg.line("#[allow(unused_mut)]");
        cg.line("let mut applied: Vec<String> = Vec::new();");
        for (entry, kind) in scalar_leaves(schema) {
            cg.open(format!("if let Some((key, raw)) = lookup_env({:?}, {:?}) {{", entry.dotted(), entry.env_var()));
            if kind == ScalarKind::String {
                cg.line(format!("self.{} = raw;", entry.accessor()));
                cg.line("applied.push(key);");
            } else {
                cg.open(format!("if parse_into(&raw, &mut self.{}) {{", entry.accessor()));
                cg.line("applied.push(key);");
                cg.close("}");
            }
            cg.close("}");
        }
        for (entry, _) in scalar_array_leaves(schema) {
            cg.open(format!("if let Some((key, raw)) = lookup_env({:?}, {:?}) {{", entry.dotted(), entry.env_var()));
            cg.open(format!("if parse_list_into(&raw, &mut self.{}) {{", entry.accessor()));
            cg.line("applied.push(key);");
            cg.close("}");
            cg.close("}");
        }
        cg.line("applied");
        cg.close("}");
        cg.close("}");
        cg.blank();
        cg.block(HELPERS);
        Ok(())
    }

    fn init_call(&self) -> Option<String> { Some("config.update_from_env();".to_owned()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Style;
    use crate::inference::{InferOptions, infer};
    use crate::value::Value;
    use serde_json::json;

    #[test]
    fn covers_scalars_and_scalar_arrays_only() {
        let v = Value::from(json!({
            "db": {"user": "", "port": 5432},
            "tags": ["a"],
            "extra": [],
            "nothing": null,
        }));
        let schema = infer(&v, &InferOptions::default()).unwrap();
        let mut cg = Codegen::new(&Style::default());
        UpdateFromEnv.render(&schema, &mut cg).unwrap();
        let out = cg.into_string();
        assert!(out.contains("if let Some((key, raw)) = lookup_env(\"db.user\", \"DB_USER\") {"));
        assert!(out.contains("self.db.user = raw;"));
        assert!(out.contains("if parse_into(&raw, &mut self.db.port) {"));
        assert!(out.contains("if parse_list_into(&raw, &mut self.tags) {"));
        assert!(!out.contains("\"EXTRA\""));
        assert!(!out.contains("\"NOTHING\""));
        // blank template lines stay free of trailing whitespace
        assert!(!out.contains(" \n"));
    }
}
