//! # AssemblyScript type syntax
//!
//! - `T | null` nullable; parentheses group
//! - `Array<T>`, `StaticArray<T>`, `T[]` lists, never null unless unioned
//! - `Map<K, V>` map, never null unless unioned
//! - `path/to/Name` user type, short name after the last `/`

use super::{is_identifier, matching_close, split_top_level, Primitive, SourceType, TypeSyntax};
use crate::plugins::Sdk;
use crate::schema::{SchemaError, SchemaResult};

/// AssemblyScript syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct AssemblyScriptSyntax;

impl TypeSyntax for AssemblyScriptSyntax {
    fn sdk(&self) -> Sdk {
        Sdk::AssemblyScript
    }

    fn parse(&self, ty: &str) -> SchemaResult<SourceType> {
        parse(ty, ty)
    }

    fn object_name<'a>(&self, ty: &'a str) -> &'a str {
        ty.rsplit_once('/').map_or(ty, |(_, name)| name)
    }
}

fn parse(s: &str, full: &str) -> SchemaResult<SourceType> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SchemaError::invalid_type(full, "empty type"));
    }

    if s.contains("=>") {
        return Err(SchemaError::UnsupportedType(full.to_string()));
    }

    let members = split_top_level(s, '|')?;
    if members.len() > 1 {
        if members.iter().any(|m| m.is_empty()) {
            return Err(SchemaError::invalid_type(full, "empty union member"));
        }
        let non_null: Vec<&str> = members.iter().copied().filter(|m| *m != "null").collect();
        if non_null.len() != 1 {
            return Err(SchemaError::UnsupportedType(full.to_string()));
        }
        return Ok(SourceType::nullable(parse(non_null[0], full)?));
    }

    if s.starts_with('(') && matching_close(s, 0, '(', ')') == Some(s.len() - 1) {
        return parse(&s[1..s.len() - 1], full);
    }

    if let Some(element) = s.strip_suffix("[]") {
        return Ok(SourceType::list(parse(element, full)?, false));
    }

    if s.ends_with('>') {
        return parse_generic(s, full);
    }

    if matches!(s, "null" | "void" | "any" | "unknown" | "never" | "Function") {
        return Err(SchemaError::UnsupportedType(full.to_string()));
    }

    if let Some(p) = primitive(s) {
        return Ok(SourceType::Primitive(p));
    }

    if is_type_path(s) {
        return Ok(SourceType::Named(s.to_string()));
    }

    Err(SchemaError::invalid_type(full, format!("'{}' is not a type name", s)))
}

fn parse_generic(s: &str, full: &str) -> SchemaResult<SourceType> {
    let open = s
        .find('<')
        .ok_or_else(|| SchemaError::invalid_type(full, "unbalanced '>'"))?;
    if matching_close(s, open, '<', '>') != Some(s.len() - 1) {
        return Err(SchemaError::invalid_type(full, "unbalanced '<'"));
    }

    let name = s[..open].trim();
    let args = split_top_level(&s[open + 1..s.len() - 1], ',')?;

    match (name, args.as_slice()) {
        ("Array" | "StaticArray", [element]) => Ok(SourceType::list(parse(element, full)?, false)),
        ("Map", [key, value]) => Ok(SourceType::map(parse(key, full)?, parse(value, full)?, false)),
        ("Array" | "StaticArray" | "Map", _) => Err(SchemaError::invalid_type(
            full,
            format!("wrong number of type arguments for {}", name),
        )),
        _ => Err(SchemaError::UnsupportedType(full.to_string())),
    }
}

fn primitive(s: &str) -> Option<Primitive> {
    let p = match s {
        "bool" => Primitive::Bool,
        "string" => Primitive::String,
        "i8" => Primitive::Int { bits: 8, signed: true },
        "i16" => Primitive::Int { bits: 16, signed: true },
        "i32" | "isize" => Primitive::Int { bits: 32, signed: true },
        "i64" => Primitive::Int { bits: 64, signed: true },
        "u8" => Primitive::Int { bits: 8, signed: false },
        "u16" => Primitive::Int { bits: 16, signed: false },
        "u32" | "usize" => Primitive::Int { bits: 32, signed: false },
        "u64" => Primitive::Int { bits: 64, signed: false },
        "f32" => Primitive::Float { bits: 32 },
        "f64" => Primitive::Float { bits: 64 },
        "Date" => Primitive::Timestamp,
        _ => return None,
    };
    Some(p)
}

// `Name`, `assembly/models/Name` or `~lib/pkg/Name`
fn is_type_path(s: &str) -> bool {
    match s.rsplit_once('/') {
        Some((path, name)) => {
            !path.is_empty()
                && path.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/' | '-' | '~' | '@'))
                && is_identifier(name)
        }
        None => is_identifier(s),
    }
}
