//! # Go type syntax
//!
//! - `*T` pointer, nullable
//! - `[]T` slice, nil-able list
//! - `[N]T` array, non-null list
//! - `map[K]V` map, nil-able
//! - `pkg.Name` user type, short name after the last `.`
//!
//! `int`, `uint` and `uintptr` are 32 bits wide under the WebAssembly target.

use super::{is_identifier, matching_close, Primitive, SourceType, TypeSyntax};
use crate::plugins::Sdk;
use crate::schema::{SchemaError, SchemaResult};

/// Go (TinyGo) syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct GoSyntax;

impl TypeSyntax for GoSyntax {
    fn sdk(&self) -> Sdk {
        Sdk::Go
    }

    fn parse(&self, ty: &str) -> SchemaResult<SourceType> {
        parse(ty, ty)
    }

    fn object_name<'a>(&self, ty: &'a str) -> &'a str {
        ty.rsplit_once('.').map_or(ty, |(_, name)| name)
    }
}

fn parse(s: &str, full: &str) -> SchemaResult<SourceType> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SchemaError::invalid_type(full, "empty type"));
    }

    if let Some(rest) = s.strip_prefix('*') {
        return Ok(SourceType::nullable(parse(rest, full)?));
    }

    if let Some(rest) = s.strip_prefix("[]") {
        return Ok(SourceType::list(parse(rest, full)?, true));
    }

    if s.starts_with('[') {
        let close = matching_close(s, 0, '[', ']')
            .ok_or_else(|| SchemaError::invalid_type(full, "unclosed '['"))?;
        let len = s[1..close].trim();
        if !len.chars().all(|c| c.is_ascii_digit()) {
            return Err(SchemaError::invalid_type(full, "array length must be a constant"));
        }
        return Ok(SourceType::list(parse(&s[close + 1..], full)?, false));
    }

    if s.starts_with("map[") {
        let close = matching_close(s, 3, '[', ']')
            .ok_or_else(|| SchemaError::invalid_type(full, "unclosed map key"))?;
        let key = parse(&s[4..close], full)?;
        let value = parse(&s[close + 1..], full)?;
        return Ok(SourceType::map(key, value, true));
    }

    if is_unsupported(s) {
        return Err(SchemaError::UnsupportedType(full.to_string()));
    }

    if let Some(p) = primitive(s) {
        return Ok(SourceType::Primitive(p));
    }

    if is_type_name(s) {
        return Ok(SourceType::Named(s.to_string()));
    }

    Err(SchemaError::invalid_type(full, format!("'{}' is not a type name", s)))
}

fn is_unsupported(s: &str) -> bool {
    const PREFIXES: &[&str] = &["chan ", "chan<-", "<-chan", "func(", "func (", "interface{", "interface {", "struct{", "struct {"];

    PREFIXES.iter().any(|p| s.starts_with(p))
        || matches!(s, "any" | "error" | "complex64" | "complex128" | "unsafe.Pointer")
}

fn primitive(s: &str) -> Option<Primitive> {
    let p = match s {
        "bool" => Primitive::Bool,
        "string" => Primitive::String,
        "int8" => Primitive::Int { bits: 8, signed: true },
        "int16" => Primitive::Int { bits: 16, signed: true },
        "int32" | "rune" | "int" => Primitive::Int { bits: 32, signed: true },
        "int64" => Primitive::Int { bits: 64, signed: true },
        "uint8" | "byte" => Primitive::Int { bits: 8, signed: false },
        "uint16" => Primitive::Int { bits: 16, signed: false },
        "uint32" | "uint" | "uintptr" => Primitive::Int { bits: 32, signed: false },
        "uint64" => Primitive::Int { bits: 64, signed: false },
        "float32" => Primitive::Float { bits: 32 },
        "float64" => Primitive::Float { bits: 64 },
        "time.Time" => Primitive::Timestamp,
        _ => return None,
    };
    Some(p)
}

// `Name` or `path/to/pkg.Name`
fn is_type_name(s: &str) -> bool {
    match s.rsplit_once('.') {
        Some((pkg, name)) => {
            !pkg.is_empty()
                && pkg.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/' | '-'))
                && is_identifier(name)
        }
        None => is_identifier(s),
    }
}
