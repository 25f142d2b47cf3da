//! Schema inference over one parsed document.
//!
//! Walks a [`Value`] tree and derives the Field Path → type table: every
//! mapping becomes a named struct registered under its path and referenced by
//! name from its parent, every other node is an inline leaf descriptor.
//!
//! Properties:
//! - Deterministic: members are visited in key order, so the table and every
//!   struct's field list are independent of source map order.
//! - Bounded: nesting deeper than `max_depth` fails instead of truncating.
//! - No silent overwrites: two keys landing on one Field Path is an error.
pub mod arr;
pub mod num;
pub mod obj;

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::ir::{Field, FieldPath, Schema, SchemaEntry, Shape, StructDecl, TypeDescriptor};
use crate::value::{Mapping, Value};

// ------------------------------- Policy ---------------------------------- //

pub const DEFAULT_MAX_DEPTH: usize = 5;
pub const DEFAULT_ROOT_NAME: &str = "Config";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferOptions {
    pub max_depth: usize,
    pub root_name: String,
}

impl Default for InferOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, root_name: DEFAULT_ROOT_NAME.to_owned() }
    }
}

pub(crate) fn check_level(path: &FieldPath, level: usize, max: usize) -> Result<()> {
    if level > max {
        return Err(Error::DepthExceeded { path: path.clone(), max });
    }
    Ok(())
}

pub fn struct_name(root_name: &str, path: &FieldPath) -> String { format!("{root_name}{path}") }

// ------------------------------- Front API -------------------------------- //

/// Infer the schema of `root`, which must be a mapping.
pub fn infer(root: &Value, options: &InferOptions) -> Result<Schema> {
    if !matches!(root, Value::Mapping(_)) {
        return Err(Error::RootNotMapping { found: root.kind_name() });
    }
    let mut inf = Inference { options, entries: BTreeMap::new() };
    inf.observe_value(FieldPath::root(), Vec::new(), root, 0)?;
    Ok(Schema { root_name: options.root_name.clone(), entries: inf.entries })
}

struct Inference<'a> {
    options: &'a InferOptions,
    entries: BTreeMap<FieldPath, SchemaEntry>,
}

impl Inference<'_> {
    fn observe_value(
        &mut self,
        path: FieldPath,
        keys: Vec<String>,
        v: &Value,
        level: usize,
    ) -> Result<TypeDescriptor> {
        check_level(&path, level, self.options.max_depth)?;
        let shape = match v {
            Value::Mapping(m) => Shape::Struct(self.observe_mapping(&path, &keys, m, level)?),
            Value::Sequence(xs) => {
                arr::check_depth(&path, xs, level + 1, self.options.max_depth)?;
                Shape::Leaf(arr::classify(xs))
            }
            Value::Null => Shape::Leaf(TypeDescriptor::Dynamic),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => {
                match num::scalar_kind(v) {
                    Some(kind) => Shape::Leaf(TypeDescriptor::Scalar(kind)),
                    None => Shape::Leaf(TypeDescriptor::Dynamic),
                }
            }
        };
        let entry = SchemaEntry { keys, shape };
        let ty = entry.descriptor();
        self.register(path, entry)?;
        Ok(ty)
    }

    fn observe_mapping(
        &mut self,
        path: &FieldPath,
        keys: &[String],
        map: &Mapping,
        level: usize,
    ) -> Result<StructDecl> {
        let members = obj::members(path, keys, map)?;
        let mut fields = Vec::with_capacity(members.len());
        for member in members {
            let mut child_keys = keys.to_vec();
            child_keys.push(member.key.to_owned());
            let ty = self.observe_value(path.join(&member.component), child_keys, member.value, level + 1)?;
            fields.push(Field { key: member.key.to_owned(), ident: member.ident, ty });
        }
        Ok(StructDecl { name: struct_name(&self.options.root_name, path), fields })
    }

    fn register(&mut self, path: FieldPath, entry: SchemaEntry) -> Result<()> {
        if let Some(existing) = self.entries.get(&path) {
            return Err(Error::KeyCollision {
                path,
                first: existing.dotted(),
                second: entry.dotted(),
            });
        }
        self.entries.insert(path, entry);
        Ok(())
    }
}

// ------------------------------- Tests ------------------------------------ //
