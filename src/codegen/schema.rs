//! The `schema` unit: the `Dynamic` value type plus one struct per schema struct entry.
use super::Codegen;
use crate::ir::{Schema, StructDecl};

const DYNAMIC: &str = r#"
/// Untyped value used by dynamic arrays, null leaves and raw environment maps.
#[derive(Debug, Clone, PartialEq)]
pub enum Dynamic {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Seq(Vec<Dynamic>),
    Map(BTreeMap<String, Dynamic>),
}
"#;

pub fn render_schema(schema: &Schema, cg: &mut Codegen) {
    cg.line("#![allow(dead_code)]");
    cg.blank();
    cg.line("use std::collections::BTreeMap;");
    cg.blank();
    cg.block(DYNAMIC);
    for decl in schema.structs() {
        cg.blank();
        render_struct(decl, cg);
    }
}

fn render_struct(decl: &StructDecl, cg: &mut Codegen) {
    cg.line("#[derive(Debug, Clone, PartialEq)]");
    cg.open(format!("pub struct {} {{", decl.name));
    for field in &decl.fields {
        cg.line(format!("pub {}: {},", field.ident, field.ty));
    }
    cg.close("}");
}
