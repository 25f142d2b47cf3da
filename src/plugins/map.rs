use super::Plugin;
use crate::codegen::Codegen;
use crate::error::Result;
use crate::ir::Schema;

pub const NAME: &str = "map";

const BODY: &str = r#"
use super::*;
use std::collections::BTreeMap;

impl Environment {
    /// Merged values as an untyped map.
    pub fn map(&self) -> &BTreeMap<String, Dynamic> {
        &self.raw
    }

    /// Value at a dotted path (`db.user`).
    pub fn lookup(&self, path: &str) -> Option<&Dynamic> {
        let mut keys = path.split('.');
        let mut current = self.raw.get(keys.next()?)?;
        for key in keys {
            match current {
                Dynamic::Map(map) => current = map.get(key)?,
                _ => return None,
            }
        }
        Some(current)
    }
}
"#;

/// Untyped access to an environment's merged values.
pub struct MapAccess;

impl Plugin for MapAccess {
    fn name(&self) -> &'static str { NAME }

    fn render(&self, _schema: &Schema, cg: &mut Codegen) -> Result<()> {
        cg.block(BODY);
        Ok(())
    }
}
