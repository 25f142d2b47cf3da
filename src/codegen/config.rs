//! Per-environment units: the merged configuration as a typed literal.
//!
//! The literal is guided by the default schema: every struct field declared
//! there must be present in the merged tree and agree with its descriptor, and
//! every key of the merged tree must be declared.
use super::{Codegen, literal};
use crate::error::{Error, Result};
use crate::inference::check_level;
use crate::ir::{FieldPath, Schema, TypeDescriptor};
use crate::names;
use crate::value::{Mapping, Value};

pub struct EnvUnit<'a> {
    pub name: &'a str,
    pub schema: &'a Schema,
    pub merged: &'a Value,
    pub max_depth: usize,
}

impl EnvUnit<'_> {
    pub fn render(&self, cg: &mut Codegen) -> Result<()> {
        let root_name = self.schema.root_name();
        let Value::Mapping(root) = self.merged else {
            return Err(Error::KindMismatch {
                path: FieldPath::root(),
                expected: root_name.to_owned(),
                found: self.merged.kind_name(),
            });
        };

        cg.line("use super::*;");
        cg.line("use std::collections::BTreeMap;");
        cg.blank();

        cg.line(format!("/// Typed configuration of the `{}` environment.", self.name));
        cg.open(format!("pub fn config() -> {root_name} {{"));
        self.render_struct(cg, &FieldPath::root(), root, 0, "", "")?;
        cg.close("}");
        cg.blank();

        cg.line(format!("/// Merged values of the `{}` environment.", self.name));
        cg.open("pub fn raw() -> BTreeMap<String, Dynamic> {");
        cg.line(literal::map(root));
        cg.close("}");
        cg.blank();

        cg.open("pub(super) fn environment() -> Environment {");
        cg.open("Environment {");
        cg.line(format!("name: {:?},", self.name));
        cg.line("config: config(),");
        cg.line("raw: raw(),");
        cg.close("}");
        cg.close("}");
        Ok(())
    }

    fn render_struct(
        &self,
        cg: &mut Codegen,
        path: &FieldPath,
        map: &Mapping,
        level: usize,
        lead: &str,
        trail: &str,
    ) -> Result<()> {
        let Some(decl) = self.schema.struct_decl(path) else {
            return Err(Error::UndefinedProperty { path: path.clone() });
        };

        let mut keys: Vec<&String> = map.keys().collect();
        keys.sort();
        for key in keys {
            let child = path.join(&names::pascal_case(key));
            if self.schema.get(&child).is_none() || !decl.fields.iter().any(|f| f.key == *key) {
                return Err(Error::UndefinedProperty { path: child });
            }
        }

        cg.open(format!("{lead}{} {{", decl.name));
        for field in &decl.fields {
            let child = path.join(&names::pascal_case(&field.key));
            check_level(&child, level + 1, self.max_depth)?;
            let Some(value) = map.get(&field.key) else {
                return Err(Error::MissingProperty { path: child });
            };
            match (&field.ty, value) {
                (TypeDescriptor::Struct(_), Value::Mapping(m)) => {
                    self.render_struct(cg, &child, m, level + 1, &format!("{}: ", field.ident), ",")?;
                }
                (TypeDescriptor::Struct(name), other) => {
                    return Err(Error::KindMismatch {
                        path: child,
                        expected: name.clone(),
                        found: other.kind_name(),
                    });
                }
                (ty, v) => cg.line(format!("{}: {},", field.ident, literal::leaf(&child, ty, v)?)),
            }
        }
        cg.close(format!("}}{trail}"));
        Ok(())
    }
}
