//! Post-generation plugins.
//!
//! A plugin contributes one extra unit (`plugin_<name>.rs`) rendered from the
//! default schema, and optionally a statement that `Envs::current()` runs on
//! the selected configuration. Plugins run in registration order.
pub mod map;
pub mod substitutor;
pub mod update_from_env;
pub mod write_to_env;

use crate::codegen::Codegen;
use crate::error::{Error, Result};
use crate::ir::{ElementKind, Schema, SchemaEntry, ScalarKind, TypeDescriptor};

pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn render(&self, schema: &Schema, out: &mut Codegen) -> Result<()>;

    /// Statement run on `config` by `Envs::current()`.
    fn init_call(&self) -> Option<String> { None }

    fn module(&self) -> String { format!("plugin_{}", self.name()) }
}

pub type PluginList = Vec<Box<dyn Plugin>>;

/// Names of the built-in plugins in their default registration order.
pub const BUILTIN: [&str; 4] = [
    update_from_env::NAME,
    substitutor::NAME,
    write_to_env::NAME,
    map::NAME,
];

pub fn by_name(name: &str) -> Result<Box<dyn Plugin>> {
    match name {
        update_from_env::NAME => Ok(Box::new(update_from_env::UpdateFromEnv)),
        substitutor::NAME => Ok(Box::new(substitutor::Substitutor)),
        write_to_env::NAME => Ok(Box::new(write_to_env::WriteToEnv)),
        map::NAME => Ok(Box::new(map::MapAccess)),
        other => Err(Error::UnknownPlugin { name: other.to_owned() }),
    }
}

/// Resolve plugin names in the given order, dropping repeats.
pub fn resolve<S: AsRef<str>>(names: &[S]) -> Result<PluginList> {
    let mut out: PluginList = Vec::with_capacity(names.len());
    for name in names {
        let plugin = by_name(name.as_ref())?;
        if !out.iter().any(|p| p.name() == plugin.name()) {
            out.push(plugin);
        }
    }
    Ok(out)
}

pub fn builtin() -> PluginList { BUILTIN.iter().filter_map(|n| by_name(n).ok()).collect() }

// ---- helpers shared by the plugin renderers ----

pub(crate) fn scalar_leaves(schema: &Schema) -> impl Iterator<Item = (&SchemaEntry, ScalarKind)> {
    schema.leaves().filter_map(|(_, e)| match e.descriptor() {
        TypeDescriptor::Scalar(k) => Some((e, k)),
        _ => None,
    })
}

pub(crate) fn scalar_array_leaves(schema: &Schema) -> impl Iterator<Item = (&SchemaEntry, ScalarKind)> {
    schema.leaves().filter_map(|(_, e)| match e.descriptor() {
        TypeDescriptor::Array(ElementKind::Scalar(k)) => Some((e, k)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order_is_stable() {
        let names: Vec<_> = builtin().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["update_from_env", "substitutor", "write_to_env", "map"]);
    }

    #[test]
    fn resolve_keeps_order_and_drops_repeats() {
        let plugins = resolve(&["map", "substitutor", "map"]).unwrap();
        let names: Vec<_> = plugins.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["map", "substitutor"]);
        assert_eq!(plugins[0].module(), "plugin_map");
    }

    #[test]
    fn unknown_plugin_is_an_error() {
        assert!(matches!(resolve(&["nope"]), Err(Error::UnknownPlugin { .. })));
    }
}
