use super::{Plugin, scalar_array_leaves, scalar_leaves};
use crate::codegen::Codegen;
use crate::error::Result;
use crate::ir::Schema;

pub const NAME: &str = "write_to_env";

/// Exports leaves to upper-case environment variables.
pub struct WriteToEnv;

impl Plugin for WriteToEnv {
    fn name(&self) -> &'static str { NAME }

    fn render(&self, schema: &Schema, cg: &mut Codegen) -> Result<()> {
        cg.line("use super::*;");
        cg.blank();
        cg.open(format!("impl {} {{", schema.root_name()));
        cg.line("/// Exports every scalar leaf to its upper-case variable (`DB_USER`) and");
        cg.line("/// every scalar array in debug form.");
        cg.line("///");
        cg.line("/// # Safety");
        cg.line("///");
        cg.line("/// Mutates the process environment, see [`std::env::set_var`].");
        cg.line("#[allow(unused_unsafe)]");
        cg.open("pub unsafe fn write_to_env(&self) {");
        cg.open("unsafe {");
        for (entry, _) in scalar_leaves(schema) {
            cg.line(format!("std::env::set_var({:?}, self.{}.to_string());", entry.env_var(), entry.accessor()));
        }
        for (entry, _) in scalar_array_leaves(schema) {
            cg.line(format!("std::env::set_var({:?}, format!(\"{{:?}}\", self.{}));", entry.env_var(), entry.accessor()));
        }
        cg.close("}");
        cg.close("}");
        cg.close("}");
        Ok(())
    }
}
