//! # Source Languages
//!
//! Each SDK writes type signatures in its own language. A [`TypeSyntax`]
//! parses those strings into a language-neutral [`SourceType`] tree that the
//! schema translator walks; it never touches the schema type model itself.

pub mod assemblyscript;
pub mod golang;

use crate::plugins::Sdk;
use crate::schema::{SchemaError, SchemaResult};

pub use assemblyscript::AssemblyScriptSyntax;
pub use golang::GoSyntax;

/// Primitive source types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Bool,
    String,
    Int { bits: u8, signed: bool },
    Float { bits: u8 },
    Timestamp,
}

/// Parsed source type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceType {
    Primitive(Primitive),

    /// Pointer or optional wrapper
    Nullable(Box<SourceType>),

    /// Slice or array; `nilable` when the list value itself may be absent
    List { element: Box<SourceType>, nilable: bool },

    /// Map; `nilable` when the map value itself may be absent
    Map {
        key: Box<SourceType>,
        value: Box<SourceType>,
        nilable: bool,
    },

    /// User type, by its source name
    Named(String),
}

impl SourceType {
    pub(crate) fn nullable(inner: SourceType) -> Self {
        SourceType::Nullable(Box::new(inner))
    }

    pub(crate) fn list(element: SourceType, nilable: bool) -> Self {
        SourceType::List {
            element: Box::new(element),
            nilable,
        }
    }

    pub(crate) fn map(key: SourceType, value: SourceType, nilable: bool) -> Self {
        SourceType::Map {
            key: Box::new(key),
            value: Box::new(value),
            nilable,
        }
    }

    /// Returns true for a user type reference
    pub fn is_named(&self) -> bool {
        matches!(self, SourceType::Named(_))
    }
}

/// Type syntax of one source SDK
pub trait TypeSyntax: Send + Sync {
    /// The SDK this syntax belongs to
    fn sdk(&self) -> Sdk;

    /// Parse a type string
    fn parse(&self, ty: &str) -> SchemaResult<SourceType>;

    /// Schema-facing short name of a user type
    fn object_name<'a>(&self, ty: &'a str) -> &'a str;
}

/// Select the syntax for an SDK
pub fn syntax_for(sdk: Sdk) -> &'static dyn TypeSyntax {
    match sdk {
        Sdk::Go => &GoSyntax,
        Sdk::AssemblyScript => &AssemblyScriptSyntax,
    }
}

/// Index of the bracket closing the one at `open_idx`
pub(crate) fn matching_close(s: &str, open_idx: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s[open_idx..].char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(open_idx + i);
            }
        }
    }
    None
}

/// Split on `sep` outside of any `<>`, `()`, `[]` or `{}` nesting
pub(crate) fn split_top_level(s: &str, sep: char) -> SchemaResult<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err(SchemaError::invalid_type(s, format!("unbalanced '{}'", c)));
                }
            }
            c if c == sep && depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(SchemaError::invalid_type(s, "unbalanced brackets"));
    }
    parts.push(s[start..].trim());
    Ok(parts)
}

/// Check a plain identifier
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
