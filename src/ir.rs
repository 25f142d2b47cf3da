// Strongly-typed schema IR shared by inference, conformance and codegen.
use std::collections::BTreeMap;
use std::fmt;

/// Concatenated PascalCase key chain from the schema root (`db.user` → `DbUser`).
/// The root itself is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn root() -> Self { Self::default() }
    pub fn is_root(&self) -> bool { self.0.is_empty() }
    pub fn join(&self, component: &str) -> Self { Self(format!("{}{component}", self.0)) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self { Self(s.to_owned()) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,   // always i64
    Float, // always f64
    String,
}

/// Element kind of a homogeneous sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Scalar(ScalarKind),
    Map,
    Seq,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Scalar(ScalarKind),
    Array(ElementKind),
    /// Empty or mixed-kind sequence.
    DynamicArray,
    /// Null leaf.
    Dynamic,
    /// Reference to a registered struct by type name.
    Struct(String),
}

impl TypeDescriptor {
    pub fn is_struct(&self) -> bool { matches!(self, TypeDescriptor::Struct(_)) }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "i64",
            ScalarKind::Float => "f64",
            ScalarKind::String => "String",
        })
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Scalar(k) => write!(f, "{k}"),
            ElementKind::Map => f.write_str("BTreeMap<String, Dynamic>"),
            ElementKind::Seq => f.write_str("Vec<Dynamic>"),
        }
    }
}

/// Rendered as the Rust type spelled in generated code.
impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Scalar(k) => write!(f, "{k}"),
            TypeDescriptor::Array(k) => write!(f, "Vec<{k}>"),
            TypeDescriptor::DynamicArray => f.write_str("Vec<Dynamic>"),
            TypeDescriptor::Dynamic => f.write_str("Dynamic"),
            TypeDescriptor::Struct(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,   // raw key as written in the source document
    pub ident: String, // Rust field identifier
    pub ty: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<Field>, // sorted by key
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Leaf(TypeDescriptor),
    Struct(StructDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    /// Raw key chain from the root.
    pub keys: Vec<String>,
    pub shape: Shape,
}

impl SchemaEntry {
    pub fn descriptor(&self) -> TypeDescriptor {
        match &self.shape {
            Shape::Leaf(ty) => ty.clone(),
            Shape::Struct(decl) => TypeDescriptor::Struct(decl.name.clone()),
        }
    }

    pub fn is_struct(&self) -> bool { matches!(self.shape, Shape::Struct(_)) }

    /// `db.user` as written in the source.
    pub fn dotted(&self) -> String { self.keys.join(".") }

    /// `db.user` as Rust field access.
    pub fn accessor(&self) -> String {
        self.keys.iter().map(|k| crate::names::rust_ident(k)).collect::<Vec<_>>().join(".")
    }

    /// `DB_USER`.
    pub fn env_var(&self) -> String {
        self.keys.iter().map(|k| crate::names::env_var_segment(k)).collect::<Vec<_>>().join("_")
    }
}

/// Field Path → entry table inferred from one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub(crate) root_name: String,
    pub(crate) entries: BTreeMap<FieldPath, SchemaEntry>,
}

impl Schema {
    pub fn root_name(&self) -> &str { &self.root_name }

    pub fn get(&self, path: &FieldPath) -> Option<&SchemaEntry> { self.entries.get(path) }

    pub fn root(&self) -> Option<&StructDecl> { self.struct_decl(&FieldPath::root()) }

    pub fn struct_decl(&self, path: &FieldPath) -> Option<&StructDecl> {
        match self.entries.get(path).map(|e| &e.shape) {
            Some(Shape::Struct(decl)) => Some(decl),
            _ => None,
        }
    }

    /// All entries, ordered by Field Path.
    pub fn entries(&self) -> impl Iterator<Item = (&FieldPath, &SchemaEntry)> { self.entries.iter() }

    /// Non-struct entries, ordered by Field Path.
    pub fn leaves(&self) -> impl Iterator<Item = (&FieldPath, &SchemaEntry)> {
        self.entries.iter().filter(|(_, e)| !e.is_struct())
    }

    /// Struct declarations: root first, then by Field Path.
    pub fn structs(&self) -> Vec<&StructDecl> {
        let mut out: Vec<&StructDecl> = self.root().into_iter().collect();
        out.extend(self.entries.iter().filter(|(p, _)| !p.is_root()).filter_map(|(_, e)| match &e.shape {
            Shape::Struct(decl) => Some(decl),
            Shape::Leaf(_) => None,
        }));
        out
    }
}
