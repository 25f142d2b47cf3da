use super::{Plugin, scalar_leaves};
use crate::codegen::Codegen;
use crate::error::Result;
use crate::ir::{ScalarKind, Schema};

pub const NAME: &str = "substitutor";

/// Upper bound on substitution passes, so self-referencing leaves terminate.
pub const MAX_PASSES: usize = 5;

/// Resolves `${dotted.path}` placeholders between string leaves.
pub struct Substitutor;

impl Plugin for Substitutor {
    fn name(&self) -> &'static str { NAME }

    fn render(&self, schema: &Schema, cg: &mut Codegen) -> Result<()> {
        let strings: Vec<_> = scalar_leaves(schema)
            .filter(|(_, k)| *k == ScalarKind::String)
            .map(|(e, _)| (e.dotted(), format!("self.{}", e.accessor())))
            .collect();

        cg.line("use super::*;");
        cg.blank();
        cg.open(format!("impl {} {{", schema.root_name()));
        cg.line("/// Replaces `${dotted.path}` placeholders in string leaves with the value");
        cg.line(format!("/// of the named string leaf, for at most {MAX_PASSES} passes. Returns `true`"));
        cg.line("/// once no placeholder is left.");
        if strings.is_empty() {
            cg.line("pub fn substitute(&mut self) -> bool { true }");
            cg.close("}");
            return Ok(());
        }
        cg.open("pub fn substitute(&mut self) -> bool {");
        cg.open(format!("for _ in 0..{MAX_PASSES} {{"));
        cg.open("let values = [");
        for (dotted, field) in &strings {
            cg.line(format!("({:?}, {field}.clone()),", format!("${{{dotted}}}")));
        }
        cg.close("];");
        cg.line("let mut changed = false;");
        let slots = strings.iter().map(|(_, f)| format!("&mut {f}")).collect::<Vec<_>>().join(", ");
        cg.open(format!("for slot in [{slots}] {{"));
        cg.open("for (placeholder, value) in &values {");
        cg.open("if slot.contains(placeholder) {");
        cg.line("*slot = slot.replace(placeholder, value);");
        cg.line("changed = true;");
        cg.close("}");
        cg.close("}");
        cg.close("}");
        cg.open("if !changed {");
        cg.line("break;");
        cg.close("}");
        cg.close("}");
        let reads = strings.iter().map(|(_, f)| format!("&{f}")).collect::<Vec<_>>().join(", ");
        cg.line(format!("![{reads}].iter().any(|s| s.contains(\"${{\"))"));
        cg.close("}");
        cg.close("}");
        Ok(())
    }

    fn init_call(&self) -> Option<String> { Some("config.substitute();".to_owned()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Style;
    use crate::inference::{InferOptions, infer};
    use crate::value::Value;
    use serde_json::json;

    fn render(v: serde_json::Value) -> String {
        let schema = infer(&Value::from(v), &InferOptions::default()).unwrap();
        let mut cg = Codegen::new(&Style::default());
        Substitutor.render(&schema, &mut cg).unwrap();
        cg.into_string()
    }

    #[test]
    fn every_string_leaf_is_a_source_and_a_target() {
        let out = render(json!({"db": {"user": "u", "uri": "pg://${db.user}"}, "port": 1}));
        assert!(out.contains("(\"${db.user}\", self.db.user.clone()),"));
        assert!(out.contains("(\"${db.uri}\", self.db.uri.clone()),"));
        assert!(out.contains("for slot in [&mut self.db.user, &mut self.db.uri] {"));
        assert!(out.contains("for _ in 0..5 {"));
        assert!(!out.contains("self.port"));
    }

    #[test]
    fn no_string_leaves_is_trivially_resolved() {
        let out = render(json!({"port": 1}));
        assert!(out.contains("pub fn substitute(&mut self) -> bool { true }"));
    }
}
