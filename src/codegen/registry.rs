//! The wiring units: the environment registry, the `current()` selector and `mod.rs`.
use super::{Codegen, Unit};

/// One generated environment as seen by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub name: String,
    /// Field identifier on `Envs`.
    pub ident: String,
    /// Module holding the environment's literal.
    pub module: String,
}

pub fn render_envs(root_name: &str, envs: &[EnvEntry], default: &EnvEntry, cg: &mut Codegen) {
    cg.line("use super::*;");
    cg.line("use std::collections::BTreeMap;");
    cg.blank();

    cg.line("/// A generated environment: its name, typed configuration and merged values.");
    cg.line("#[derive(Debug, Clone, PartialEq)]");
    cg.open("pub struct Environment {");
    cg.line("pub name: &'static str,");
    cg.line(format!("pub config: {root_name},"));
    cg.line("pub raw: BTreeMap<String, Dynamic>,");
    cg.close("}");
    cg.blank();

    cg.line("/// Every generated environment.");
    cg.line("#[derive(Debug, Clone, PartialEq)]");
    cg.open("pub struct Envs {");
    for env in envs {
        cg.line(format!("pub {}: Environment,", env.ident));
    }
    cg.close("}");
    cg.blank();

    cg.open("impl Envs {");
    let names = envs.iter().map(|e| format!("{:?}", e.name)).collect::<Vec<_>>().join(", ");
    cg.line(format!("pub const DEFAULT: &str = {:?};", default.name));
    cg.line(format!("pub const NAMES: &[&str] = &[{names}];"));
    cg.blank();
    cg.line("/// Names of every environment, sorted.");
    cg.line("pub fn names() -> &'static [&'static str] { Self::NAMES }");
    cg.blank();
    cg.open("pub fn load() -> Self {");
    cg.open("Self {");
    for env in envs {
        cg.line(format!("{}: super::{}::environment(),", env.ident, env.module));
    }
    cg.close("}");
    cg.close("}");
    cg.blank();
    cg.line("/// The environment called `name` and `true`, or the default environment");
    cg.line("/// and `false` when no environment has that name.");
    cg.open("pub fn get(&self, name: &str) -> (&Environment, bool) {");
    cg.open("match name {");
    for env in envs {
        cg.line(format!("{:?} => (&self.{}, true),", env.name, env.ident));
    }
    cg.line(format!("_ => (&self.{}, false),", default.ident));
    cg.close("}");
    cg.close("}");
    cg.close("}");
}

/// `current()` picks an environment by the `ENV` variable and runs every
/// plugin initialisation call on a copy of its configuration.
pub fn render_init(root_name: &str, calls: &[String], cg: &mut Codegen) {
    cg.line("use super::*;");
    cg.blank();
    cg.open("impl Envs {");
    cg.line("/// Configuration of the environment named by `ENV` (the default environment");
    cg.line("/// when unset or unknown) with every plugin initialisation applied.");
    cg.open(format!("pub fn current(&self) -> {root_name} {{"));
    cg.line("let name = std::env::var(\"ENV\").unwrap_or_default();");
    cg.line("let (environment, _) = self.get(&name);");
    cg.line("#[allow(unused_mut)]");
    cg.line("let mut config = environment.config.clone();");
    for call in calls {
        cg.line(call);
    }
    cg.line("config");
    cg.close("}");
    cg.close("}");
}

/// `mod.rs`: declarations for split output, or every unit inlined.
pub fn render_mod(units: &[Unit], merge_files: bool, cg: &mut Codegen) {
    for (i, unit) in units.iter().enumerate() {
        if merge_files {
            if i > 0 {
                cg.blank();
            }
            cg.open(format!("mod {} {{", unit.module));
            for line in unit.body.lines() {
                cg.line(line.strip_suffix('\r').unwrap_or(line));
            }
            cg.close("}");
        } else {
            cg.line(format!("mod {};", unit.module));
        }
    }
    let reexports: Vec<&Unit> = units.iter().filter(|u| u.reexport).collect();
    if !reexports.is_empty() {
        cg.blank();
    }
    for unit in reexports {
        cg.line(format!("pub use {}::*;", unit.module));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Style;

    fn entry(name: &str) -> EnvEntry {
        EnvEntry { name: name.into(), ident: name.into(), module: format!("env_{name}") }
    }

    #[test]
    fn envs_match_every_name_and_fall_back_to_default() {
        let envs = [entry("default"), entry("test")];
        let mut cg = Codegen::new(&Style::default());
        render_envs("Config", &envs, &envs[0], &mut cg);
        let out = cg.into_string();
        assert!(out.contains("    pub config: Config,\n"));
        assert!(out.contains("            test: super::env_test::environment(),\n"));
        assert!(out.contains("            \"test\" => (&self.test, true),\n"));
        assert!(out.contains("            _ => (&self.default, false),\n"));
        assert!(out.contains("pub const NAMES: &[&str] = &[\"default\", \"test\"];"));
    }

    #[test]
    fn init_runs_calls_in_order() {
        let mut cg = Codegen::new(&Style::default());
        render_init("Config", &["config.a();".into(), "config.b();".into()], &mut cg);
        let out = cg.into_string();
        let a = out.find("config.a();").unwrap();
        let b = out.find("config.b();").unwrap();
        assert!(a < b);
        assert!(out.contains("pub fn current(&self) -> Config {"));
    }

    #[test]
    fn merged_mod_inlines_units() {
        let units = [
            Unit { module: "schema".into(), reexport: true, source: None, body: "pub struct A;\n".into() },
            Unit { module: "env_x".into(), reexport: false, source: None, body: "fn f() {\n    g();\n}\n".into() },
        ];
        let mut cg = Codegen::new(&Style::default());
        render_mod(&units, true, &mut cg);
        assert_eq!(
            cg.into_string(),
            "mod schema {\n    pub struct A;\n}\n\nmod env_x {\n    fn f() {\n        g();\n    }\n}\n\npub use schema::*;\n"
        );

        let mut cg = Codegen::new(&Style::default());
        render_mod(&units, false, &mut cg);
        assert_eq!(cg.into_string(), "mod schema;\nmod env_x;\n\npub use schema::*;\n");
    }
}
