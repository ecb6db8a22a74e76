//! # Type Translation
//!
//! Turns a source type string into a schema type reference, registering any
//! custom scalar, pair or object definition it needs in the pool.
//!
//! Map pairs are named from their structure:
//! `<Key><Value>Pair`, where a nullable occurrence adds a `Nullable` prefix,
//! a list adds a `List` suffix, and input-position pairs end in `Input`
//! (nested input names do not repeat it). `map[string]map[string]float32`
//! becomes `StringNullableStringFloatPairListPair`.

use super::errors::{SchemaError, SchemaResult};
use super::pool::TypePool;
use super::types::{
    is_builtin_scalar, DefinitionKind, Field, TypeDefinition, TypeRef, TypeRefKind, BOOLEAN, FLOAT, INPUT_SUFFIX,
    INT, INT64, PAIR_SUFFIX, STRING, TIMESTAMP, UINT, UINT64,
};
use crate::languages::{Primitive, SourceType, TypeSyntax};
use crate::plugins::{SourceTypeDefinition, TypeCatalog};

/// Translator for one plugin: its SDK syntax and its type catalog
pub struct Translator<'a> {
    syntax: &'a dyn TypeSyntax,
    catalog: &'a TypeCatalog,
}

impl<'a> Translator<'a> {
    pub fn new(syntax: &'a dyn TypeSyntax, catalog: &'a TypeCatalog) -> Self {
        Self { syntax, catalog }
    }

    /// Translate a source type string in input or output position
    pub fn translate(&self, ty: &str, for_input: bool, pool: &mut TypePool) -> SchemaResult<TypeRef> {
        let parsed = self.syntax.parse(ty)?;
        self.convert(ty, &parsed, for_input, pool)
    }

    fn convert(&self, ty: &str, source: &SourceType, for_input: bool, pool: &mut TypePool) -> SchemaResult<TypeRef> {
        match source {
            SourceType::Primitive(p) => scalar(*p, pool),
            SourceType::Nullable(inner) => Ok(self.convert(ty, inner, for_input, pool)?.nullable()),
            SourceType::List { element, nilable } => {
                let element = self.convert(ty, element, for_input, pool)?;
                Ok(TypeRef::list(element).with_non_null(!nilable))
            }
            SourceType::Map { key, value, nilable } => {
                let name = self.pair(ty, key, value, for_input, pool)?;
                Ok(TypeRef::list(TypeRef::named(name)).with_non_null(!nilable))
            }
            SourceType::Named(name) => self.object(name, for_input, pool),
        }
    }

    fn pair(
        &self,
        ty: &str,
        key: &SourceType,
        value: &SourceType,
        for_input: bool,
        pool: &mut TypePool,
    ) -> SchemaResult<String> {
        let key = self.convert(ty, key, for_input, pool)?;
        let is_scalar_key = match key.name() {
            Some(name) => {
                is_builtin_scalar(name) || pool.get(name).is_some_and(|d| d.kind == DefinitionKind::Scalar)
            }
            None => false,
        };
        if !is_scalar_key {
            return Err(SchemaError::UnsupportedMapKey(ty.to_string()));
        }

        let value = self.convert(ty, value, for_input, pool)?;

        let mut name = format!(
            "{}{}{}",
            name_fragment(&key, for_input),
            name_fragment(&value, for_input),
            PAIR_SUFFIX
        );
        if for_input {
            name.push_str(INPUT_SUFFIX);
        }

        pool.register(TypeDefinition::pair(name.as_str(), key, value, for_input))?;
        Ok(name)
    }

    fn object(&self, ty: &str, for_input: bool, pool: &mut TypePool) -> SchemaResult<TypeRef> {
        let (source, def) = self.lookup(ty, for_input)?;
        let short = self.syntax.object_name(source);

        if def.fields.is_empty() {
            pool.add_scalar(short)?;
            return Ok(TypeRef::named(short));
        }

        let name = if for_input && !short.ends_with(INPUT_SUFFIX) {
            format!("{}{}", short, INPUT_SUFFIX)
        } else {
            short.to_string()
        };

        if pool.reserve_object(&name, source, for_input)? {
            return Ok(TypeRef::named(name));
        }

        let mut fields = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            let field_ty = self.translate(&field.type_name, for_input, pool)?;
            fields.push(Field::new(field.name.as_str(), field_ty));
        }
        pool.complete_object(&name, fields);

        Ok(TypeRef::named(name))
    }

    /// Find the catalog entry for a user type
    ///
    /// The exact source name wins, then any named entry with the same short
    /// name. Input position prefers an explicit `<Type>Input` entry next to
    /// whichever entry was found.
    fn lookup(&self, ty: &str, for_input: bool) -> SchemaResult<(&'a str, &'a SourceTypeDefinition)> {
        if for_input {
            if let Some(found) = self.find_input_variant(ty) {
                return Ok(found);
            }
        }

        let found = match self.find_exact(ty) {
            Some(found) => found,
            None => self.find_by_short_name(ty)?,
        };

        if for_input {
            if let Some(variant) = self.find_input_variant(found.0) {
                return Ok(variant);
            }
        }
        Ok(found)
    }

    fn find_input_variant(&self, ty: &str) -> Option<(&'a str, &'a SourceTypeDefinition)> {
        if ty.ends_with(INPUT_SUFFIX) {
            return None;
        }
        self.find_exact(&format!("{}{}", ty, INPUT_SUFFIX))
    }

    fn find_by_short_name(&self, ty: &str) -> SchemaResult<(&'a str, &'a SourceTypeDefinition)> {
        let short = self.syntax.object_name(ty);
        self.catalog
            .iter()
            .find(|(key, _)| {
                self.syntax.object_name(key) == short
                    && self.syntax.parse(key).is_ok_and(|parsed| parsed.is_named())
            })
            .ok_or_else(|| SchemaError::UnknownType(ty.to_string()))
    }

    fn find_exact(&self, name: &str) -> Option<(&'a str, &'a SourceTypeDefinition)> {
        self.catalog.get_entry(name)
    }
}

fn scalar(p: Primitive, pool: &mut TypePool) -> SchemaResult<TypeRef> {
    let name = match p {
        Primitive::Bool => BOOLEAN,
        Primitive::String => STRING,
        Primitive::Float { .. } => FLOAT,
        Primitive::Int { bits, .. } if bits <= 16 => INT,
        Primitive::Int { bits: 32, signed: true } => INT,
        Primitive::Int { bits: 32, signed: false } => UINT,
        Primitive::Int { signed: true, .. } => INT64,
        Primitive::Int { signed: false, .. } => UINT64,
        Primitive::Timestamp => TIMESTAMP,
    };

    if !is_builtin_scalar(name) {
        pool.add_scalar(name)?;
    }
    Ok(TypeRef::named(name))
}

fn name_fragment(ty: &TypeRef, for_input: bool) -> String {
    let mut fragment = String::new();
    if !ty.non_null {
        fragment.push_str("Nullable");
    }
    match &ty.kind {
        TypeRefKind::Named(name) => {
            let name: &str = if for_input {
                name.strip_suffix(INPUT_SUFFIX).unwrap_or(name)
            } else {
                name
            };
            fragment.push_str(name);
        }
        TypeRefKind::List(element) => {
            fragment.push_str(&name_fragment(element, for_input));
            fragment.push_str("List");
        }
    }
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::{AssemblyScriptSyntax, GoSyntax};

    fn go(ty: &str, for_input: bool, catalog: &TypeCatalog) -> (String, TypePool) {
        let mut pool = TypePool::new();
        let result = Translator::new(&GoSyntax, catalog)
            .translate(ty, for_input, &mut pool)
            .unwrap();
        (result.to_string(), pool)
    }

    fn fields(pool: &TypePool, name: &str) -> Vec<(String, String)> {
        pool.get(name)
            .unwrap_or_else(|| panic!("missing {}", name))
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.ty.to_string()))
            .collect()
    }

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect()
    }

    #[test]
    fn test_plain_types_need_no_definitions() {
        let catalog = TypeCatalog::new();
        let cases = [
            ("string", "String!"),
            ("bool", "Boolean!"),
            ("int8", "Int!"),
            ("int16", "Int!"),
            ("int32", "Int!"),
            ("uint8", "Int!"),
            ("uint16", "Int!"),
            ("float32", "Float!"),
            ("float64", "Float!"),
            ("[]string", "[String!]"),
            ("[][]string", "[[String!]]"),
            ("[]*string", "[String]"),
            ("*bool", "Boolean"),
            ("*int", "Int"),
            ("*float64", "Float"),
            ("*string", "String"),
            ("*[]int32", "[Int!]"),
            ("[3]int32", "[Int!]!"),
        ];

        for for_input in [false, true] {
            for (ty, expected) in cases {
                let (result, pool) = go(ty, for_input, &catalog);
                assert_eq!(result, expected, "{} (input: {})", ty, for_input);
                assert!(pool.is_empty(), "{}", ty);
            }
        }
    }

    #[test]
    fn test_custom_scalars_registered() {
        let catalog = TypeCatalog::new();
        let cases = [
            ("time.Time", "Timestamp!", "Timestamp"),
            ("int64", "Int64!", "Int64"),
            ("uint32", "UInt!", "UInt"),
            ("uint64", "UInt64!", "UInt64"),
        ];

        for for_input in [false, true] {
            for (ty, expected, scalar) in cases {
                let (result, pool) = go(ty, for_input, &catalog);
                assert_eq!(result, expected);
                assert_eq!(pool.len(), 1);
                assert_eq!(pool.get(scalar).unwrap().kind, DefinitionKind::Scalar);
            }
        }
    }

    #[test]
    fn test_user_type_output_and_input() {
        let mut catalog = TypeCatalog::new();
        catalog
            .add_type("testdata.User")
            .with_field("firstName", "string")
            .with_field("lastName", "string")
            .with_field("age", "uint8");
        let expected = pairs(&[("firstName", "String!"), ("lastName", "String!"), ("age", "Int!")]);

        let (result, pool) = go("testdata.User", false, &catalog);
        assert_eq!(result, "User!");
        assert_eq!(pool.len(), 1);
        assert_eq!(fields(&pool, "User"), expected);

        let (result, pool) = go("testdata.User", true, &catalog);
        assert_eq!(result, "UserInput!");
        assert_eq!(pool.len(), 1);
        assert_eq!(fields(&pool, "UserInput"), expected);
        assert!(pool.get("UserInput").unwrap().input);
    }

    #[test]
    fn test_user_type_found_by_short_name() {
        let mut catalog = TypeCatalog::new();
        catalog.add_type("User").with_field("id", "int32");

        let (result, pool) = go("testdata.User", false, &catalog);
        assert_eq!(result, "User!");
        assert_eq!(fields(&pool, "User"), pairs(&[("id", "Int!")]));
    }

    #[test]
    fn test_fieldless_type_is_scalar() {
        let mut catalog = TypeCatalog::new();
        catalog.add_type("testdata.Foo");

        for for_input in [false, true] {
            let (result, pool) = go("*testdata.Foo", for_input, &catalog);
            assert_eq!(result, "Foo");
            assert_eq!(pool.len(), 1);
            assert_eq!(pool.get("Foo").unwrap().kind, DefinitionKind::Scalar);
        }
    }

    #[test]
    fn test_explicit_input_variant_honored() {
        let mut catalog = TypeCatalog::new();
        catalog.add_type("testdata.Obj").with_field("id", "int32").with_field("name", "string");
        catalog.add_type("testdata.ObjInput").with_field("name", "string");

        let (result, pool) = go("testdata.Obj", true, &catalog);
        assert_eq!(result, "ObjInput!");
        assert_eq!(fields(&pool, "ObjInput"), pairs(&[("name", "String!")]));

        let (result, pool) = go("testdata.ObjInput", true, &catalog);
        assert_eq!(result, "ObjInput!");
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_explicit_input_variant_found_through_short_name() {
        let mut catalog = TypeCatalog::new();
        catalog.add_type("testdata.Obj").with_field("id", "int32").with_field("name", "string");
        catalog.add_type("testdata.ObjInput").with_field("name", "string");

        let (result, pool) = go("Obj", true, &catalog);
        assert_eq!(result, "ObjInput!");
        assert_eq!(fields(&pool, "ObjInput"), pairs(&[("name", "String!")]));
        assert_eq!(pool.get("ObjInput").unwrap().source.as_deref(), Some("testdata.ObjInput"));

        let (result, pool) = go("Obj", false, &catalog);
        assert_eq!(result, "Obj!");
        assert_eq!(fields(&pool, "Obj"), pairs(&[("id", "Int!"), ("name", "String!")]));
    }

    #[test]
    fn test_maps() {
        let catalog = TypeCatalog::new();
        let cases = [
            ("map[string]string", false, "[StringStringPair!]", "StringStringPair", ("String!", "String!")),
            ("map[string]string", true, "[StringStringPairInput!]", "StringStringPairInput", ("String!", "String!")),
            ("map[string]*string", false, "[StringNullableStringPair!]", "StringNullableStringPair", ("String!", "String")),
            ("map[string]*string", true, "[StringNullableStringPairInput!]", "StringNullableStringPairInput", ("String!", "String")),
            ("map[int32]string", false, "[IntStringPair!]", "IntStringPair", ("Int!", "String!")),
            ("map[int32]string", true, "[IntStringPairInput!]", "IntStringPairInput", ("Int!", "String!")),
        ];

        for (ty, for_input, expected, pair, (key, value)) in cases {
            let (result, pool) = go(ty, for_input, &catalog);
            assert_eq!(result, expected);
            assert_eq!(pool.len(), 1);
            assert!(pool.get(pair).unwrap().is_map_type());
            assert_eq!(fields(&pool, pair), pairs(&[("key", key), ("value", value)]));
        }
    }

    #[test]
    fn test_nested_map_names() {
        let catalog = TypeCatalog::new();

        let (result, pool) = go("map[string]map[string]float32", false, &catalog);
        assert_eq!(result, "[StringNullableStringFloatPairListPair!]");
        assert_eq!(pool.len(), 2);
        assert_eq!(
            fields(&pool, "StringNullableStringFloatPairListPair"),
            pairs(&[("key", "String!"), ("value", "[StringFloatPair!]")])
        );
        assert_eq!(
            fields(&pool, "StringFloatPair"),
            pairs(&[("key", "String!"), ("value", "Float!")])
        );

        let (result, pool) = go("map[string]map[string]float32", true, &catalog);
        assert_eq!(result, "[StringNullableStringFloatPairListPairInput!]");
        assert_eq!(
            fields(&pool, "StringNullableStringFloatPairListPairInput"),
            pairs(&[("key", "String!"), ("value", "[StringFloatPairInput!]")])
        );
        assert!(pool.contains("StringFloatPairInput"));
    }

    #[test]
    fn test_map_key_must_be_scalar() {
        let mut catalog = TypeCatalog::new();
        catalog.add_type("testdata.K").with_field("id", "int32");
        let mut pool = TypePool::new();
        let translator = Translator::new(&GoSyntax, &catalog);

        for ty in ["map[[2]int32]string", "map[testdata.K]string"] {
            let err = translator.translate(ty, false, &mut pool).unwrap_err();
            assert_eq!(err, SchemaError::UnsupportedMapKey(ty.to_string()));
        }
    }

    #[test]
    fn test_unknown_type() {
        let catalog = TypeCatalog::new();
        let mut pool = TypePool::new();
        let err = Translator::new(&GoSyntax, &catalog)
            .translate("[]testdata.Missing", false, &mut pool)
            .unwrap_err();
        assert_eq!(err, SchemaError::UnknownType("testdata.Missing".into()));
    }

    #[test]
    fn test_self_reference_terminates() {
        let mut catalog = TypeCatalog::new();
        catalog
            .add_type("testdata.Node")
            .with_field("value", "string")
            .with_field("next", "*testdata.Node")
            .with_field("children", "[]testdata.Node");

        let (result, pool) = go("testdata.Node", false, &catalog);
        assert_eq!(result, "Node!");
        assert_eq!(
            fields(&pool, "Node"),
            pairs(&[("value", "String!"), ("next", "Node"), ("children", "[Node!]")])
        );
    }

    #[test]
    fn test_same_short_name_from_different_sources_collides() {
        let mut catalog = TypeCatalog::new();
        catalog.add_type("a.Person").with_field("name", "string");
        catalog.add_type("b.Person").with_field("id", "int32");
        let translator = Translator::new(&GoSyntax, &catalog);
        let mut pool = TypePool::new();

        translator.translate("a.Person", false, &mut pool).unwrap();
        let err = translator.translate("b.Person", false, &mut pool).unwrap_err();
        assert!(matches!(err, SchemaError::NameCollision { ref name, .. } if name == "Person"));
    }

    #[test]
    fn test_assemblyscript_lists_and_maps_are_non_null() {
        let mut catalog = TypeCatalog::new();
        catalog.add_type("assembly/models/Person").with_field("name", "string");
        let translator = Translator::new(&AssemblyScriptSyntax, &catalog);
        let mut pool = TypePool::new();

        let mut t = |ty: &str, input: bool| translator.translate(ty, input, &mut pool).unwrap().to_string();
        assert_eq!(t("Array<i32>", false), "[Int!]!");
        assert_eq!(t("(i32 | null)[]", false), "[Int]!");
        assert_eq!(t("i32[] | null", false), "[Int!]");
        assert_eq!(t("Map<string, string>", false), "[StringStringPair!]!");
        assert_eq!(t("Map<string, i64> | null", true), "[StringInt64PairInput!]");
        assert_eq!(t("assembly/models/Person | null", false), "Person");
        assert_eq!(t("Array<assembly/models/Person>", true), "[PersonInput!]!");
        assert_eq!(t("Date", false), "Timestamp!");
    }
}
