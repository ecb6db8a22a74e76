//! Schema type model
//!
//! Built-in scalars:
//! - Int, Float, String, Boolean
//!
//! Custom scalars (declared in the document when used):
//! - Int64, UInt, UInt64, Timestamp, Void
//!
//! Nullability belongs to each reference occurrence, never to a type.

use std::fmt;

use serde::{Serialize, Serializer};

/// Default integer scalar
pub const INT: &str = "Int";
/// Default float scalar
pub const FLOAT: &str = "Float";
/// String scalar
pub const STRING: &str = "String";
/// Boolean scalar
pub const BOOLEAN: &str = "Boolean";

/// Signed 64-bit integers
pub const INT64: &str = "Int64";
/// Unsigned 32-bit integers
pub const UINT: &str = "UInt";
/// Unsigned 64-bit integers
pub const UINT64: &str = "UInt64";
/// Timestamps
pub const TIMESTAMP: &str = "Timestamp";
/// Result of functions that return nothing
pub const VOID: &str = "Void";

/// Suffix of input-position object names
pub const INPUT_SUFFIX: &str = "Input";
/// Suffix of synthesized map pair names
pub const PAIR_SUFFIX: &str = "Pair";

/// Returns true for scalars every schema provides without a declaration
pub fn is_builtin_scalar(name: &str) -> bool {
    matches!(name, INT | FLOAT | STRING | BOOLEAN)
}

/// What a reference points at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRefKind {
    /// Scalar or object type, by name
    Named(String),
    /// List of another reference
    List(Box<TypeRef>),
}

/// A resolved schema type expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Referenced type
    pub kind: TypeRefKind,
    /// Whether this occurrence is marked `!`
    pub non_null: bool,
}

impl TypeRef {
    /// Non-null reference to a named type
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            kind: TypeRefKind::Named(name.into()),
            non_null: true,
        }
    }

    /// Non-null list of `element`
    pub fn list(element: TypeRef) -> Self {
        Self {
            kind: TypeRefKind::List(Box::new(element)),
            non_null: true,
        }
    }

    /// Same reference, nullable at this level only
    pub fn nullable(mut self) -> Self {
        self.non_null = false;
        self
    }

    /// Same reference with the given nullability at this level
    pub fn with_non_null(mut self, non_null: bool) -> Self {
        self.non_null = non_null;
        self
    }

    /// Name of the referenced type, `None` for lists
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            TypeRefKind::Named(name) => Some(name),
            TypeRefKind::List(_) => None,
        }
    }

    /// List element, `None` for named types
    pub fn element(&self) -> Option<&TypeRef> {
        match &self.kind {
            TypeRefKind::Named(_) => None,
            TypeRefKind::List(element) => Some(element),
        }
    }

    /// Returns true if this is a list reference
    pub fn is_list(&self) -> bool {
        matches!(self.kind, TypeRefKind::List(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeRefKind::Named(name) => write!(f, "{}", name)?,
            TypeRefKind::List(element) => write!(f, "[{}]", element)?,
        }
        if self.non_null {
            write!(f, "!")?;
        }
        Ok(())
    }
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A named, typed field of an object or pair type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Kind of a pooled type definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    /// Custom scalar
    Scalar,
    /// Object built from a catalog type
    Object,
    /// Object synthesized for a map
    Pair,
}

/// A schema type definition, as collected during one generation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDefinition {
    /// Schema-facing name
    pub name: String,

    /// Scalar, object or pair
    pub kind: DefinitionKind,

    /// Emitted as an `input` block rather than a `type` block
    pub input: bool,

    /// Fields in source declaration order
    pub fields: Vec<Field>,

    /// Catalog type the object was built from
    #[serde(skip)]
    pub source: Option<String>,
}

impl TypeDefinition {
    /// Create a custom scalar definition
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DefinitionKind::Scalar,
            input: false,
            fields: Vec::new(),
            source: None,
        }
    }

    /// Create a map pair definition
    pub fn pair(name: impl Into<String>, key: TypeRef, value: TypeRef, input: bool) -> Self {
        Self {
            name: name.into(),
            kind: DefinitionKind::Pair,
            input,
            fields: vec![Field::new("key", key), Field::new("value", value)],
            source: None,
        }
    }

    /// Create an object definition built from a catalog type
    pub fn object(name: impl Into<String>, source: impl Into<String>, input: bool) -> Self {
        Self {
            name: name.into(),
            kind: DefinitionKind::Object,
            input,
            fields: Vec::new(),
            source: Some(source.into()),
        }
    }

    /// Returns true if this definition was synthesized for a map
    pub fn is_map_type(&self) -> bool {
        self.kind == DefinitionKind::Pair
    }

    /// Structural identity: same fields, same pair flag
    pub fn same_structure(&self, other: &TypeDefinition) -> bool {
        self.fields == other.fields && self.is_map_type() == other.is_map_type()
    }

    /// Short description for error messages
    pub fn describe(&self) -> String {
        match (&self.kind, &self.source) {
            (DefinitionKind::Object, Some(source)) => format!("object from '{}'", source),
            (DefinitionKind::Object, None) => "object".to_string(),
            (DefinitionKind::Pair, _) => {
                let fields: Vec<String> = self
                    .fields
                    .iter()
                    .map(|f| format!("{}: {}", f.name, f.ty))
                    .collect();
                format!("pair {{{}}}", fields.join(", "))
            }
            (DefinitionKind::Scalar, _) => "scalar".to_string(),
        }
    }
}
