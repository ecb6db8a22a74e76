//! # Schema Generator
//!
//! Builds the schema document for one plugin.
//!
//! Each export is translated against a scratch copy of the type pool; the copy
//! replaces the pool only when the whole function translated, so a failing
//! function contributes neither fields nor types. Errors are collected and
//! returned alongside the document.
//!
//! Document layout, blocks separated by a blank line:
//! 1. Banner comment
//! 2. `type Query`, fields sorted by resolver name; left out when empty
//! 3. Custom scalars in use, sorted
//! 4. Input types, sorted
//! 5. Output types, sorted

use std::collections::HashSet;

use serde::{Serialize, Serializer};

use super::defaults::render_default;
use super::errors::{SchemaError, SchemaResult};
use super::pool::TypePool;
use super::translate::Translator;
use super::types::{Field, TypeDefinition, TypeRef, VOID};
use crate::languages::syntax_for;
use crate::plugins::{FunctionExport, PluginMetadata};

/// First line of every generated document
pub const SCHEMA_BANNER: &str = "# HostFn GraphQL Schema (auto-generated)";

/// A translated parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,

    /// Rendered default literal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// A function as exposed in the schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSchema {
    /// Public field name in `Query`
    pub resolver: String,

    /// The export as declared by the plugin
    #[serde(serialize_with = "serialize_export_name")]
    pub function: FunctionExport,

    pub parameters: Vec<ParameterSchema>,
    pub result: TypeRef,
}

impl FunctionSchema {
    /// Declared function name
    pub fn function_name(&self) -> &str {
        &self.function.name
    }

    /// Public field name
    pub fn resolver(&self) -> &str {
        &self.resolver
    }

    /// The `Query` field line, without indentation
    pub fn field_definition(&self) -> String {
        let mut line = self.resolver.clone();
        if !self.parameters.is_empty() {
            let params: Vec<String> = self
                .parameters
                .iter()
                .map(|p| match &p.default {
                    Some(default) => format!("{}: {} = {}", p.name, p.ty, default),
                    None => format!("{}: {}", p.name, p.ty),
                })
                .collect();
            line.push('(');
            line.push_str(&params.join(", "));
            line.push(')');
        }
        line.push_str(": ");
        line.push_str(&self.result.to_string());
        line
    }
}

fn serialize_export_name<S: Serializer>(export: &FunctionExport, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&export.name)
}

/// Result of generating one plugin's schema
#[derive(Debug, Clone)]
pub struct GeneratedSchema {
    /// The schema document
    pub document: String,

    /// Function schemas, sorted by resolver name
    pub functions: Vec<FunctionSchema>,

    /// Definitions referenced by the document
    pub types: TypePool,

    /// Per-function errors, in export order
    pub errors: Vec<SchemaError>,
}

impl GeneratedSchema {
    /// Check if every non-excluded export made it into the schema
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Find a function schema by resolver name
    pub fn function(&self, resolver: &str) -> Option<&FunctionSchema> {
        self.functions.iter().find(|f| f.resolver == resolver)
    }
}

/// Public field name for a declared function name
pub fn resolver_name(function: &str) -> String {
    let mut chars = function.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Generate the schema for a plugin
///
/// Exports for which `excluded` returns true are skipped. Fails only when the
/// plugin's SDK is not supported; everything else is reported per function.
pub fn generate(metadata: &PluginMetadata, excluded: impl Fn(&str) -> bool) -> SchemaResult<GeneratedSchema> {
    let syntax = syntax_for(metadata.sdk()?);
    let translator = Translator::new(syntax, &metadata.types);

    let mut pool = TypePool::new();
    let mut functions = Vec::new();
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for export in &metadata.functions {
        if excluded(&export.name) {
            continue;
        }

        let resolver = resolver_name(&export.name);
        if !seen.insert(resolver.clone()) {
            errors.push(SchemaError::DuplicateResolver {
                resolver,
                function: export.name.clone(),
            });
            continue;
        }

        let mut scratch = pool.clone();
        match translate_function(&translator, export, resolver, &mut scratch) {
            Ok(schema) => {
                pool = scratch;
                functions.push(schema);
            }
            Err(e) => errors.push(SchemaError::in_function(export.name.as_str(), e)),
        }
    }

    functions.sort_by(|a, b| a.resolver.cmp(&b.resolver));
    let document = render_document(&functions, &pool);

    Ok(GeneratedSchema {
        document,
        functions,
        types: pool,
        errors,
    })
}

fn translate_function(
    translator: &Translator<'_>,
    export: &FunctionExport,
    resolver: String,
    pool: &mut TypePool,
) -> SchemaResult<FunctionSchema> {
    let mut parameters = Vec::with_capacity(export.parameters.len());
    for param in &export.parameters {
        let ty = translator.translate(&param.type_name, true, pool)?;
        let default = match &param.default {
            Some(value) => Some(render_default(&param.name, value, &ty)?),
            None => None,
        };
        parameters.push(ParameterSchema {
            name: param.name.clone(),
            ty,
            default,
        });
    }

    let result = match &export.result {
        Some(ty) => translator.translate(ty, false, pool)?,
        None => {
            pool.add_scalar(VOID)?;
            TypeRef::named(VOID).nullable()
        }
    };

    Ok(FunctionSchema {
        resolver,
        function: export.clone(),
        parameters,
        result,
    })
}

fn render_document(functions: &[FunctionSchema], pool: &TypePool) -> String {
    let mut blocks = vec![SCHEMA_BANNER.to_string()];

    // Empty object types are not valid GraphQL
    if !functions.is_empty() {
        let query: Vec<String> = functions.iter().map(|f| format!("  {}", f.field_definition())).collect();
        blocks.push(render_block("type Query", query));
    }

    let scalars: Vec<String> = pool.scalars().map(|d| format!("scalar {}", d.name)).collect();
    if !scalars.is_empty() {
        blocks.push(scalars.join("\n"));
    }

    blocks.extend(pool.inputs().map(|d| render_object("input", d)));
    blocks.extend(pool.outputs().map(|d| render_object("type", d)));

    let mut document = blocks.join("\n\n");
    document.push('\n');
    document
}

fn render_object(keyword: &str, def: &TypeDefinition) -> String {
    let fields = def.fields.iter().map(render_field).collect();
    render_block(&format!("{} {}", keyword, def.name), fields)
}

fn render_field(field: &Field) -> String {
    format!("  {}: {}", field.name, field.ty)
}

fn render_block(header: &str, lines: Vec<String>) -> String {
    let mut block = format!("{} {{\n", header);
    for line in lines {
        block.push_str(&line);
        block.push('\n');
    }
    block.push('}');
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::Sdk;
    use serde_json::json;

    fn no_exclusions(_: &str) -> bool {
        false
    }

    #[test]
    fn test_resolver_name() {
        assert_eq!(resolver_name("SayHello"), "sayHello");
        assert_eq!(resolver_name("add"), "add");
        assert_eq!(resolver_name("X"), "x");
        assert_eq!(resolver_name(""), "");
    }

    #[test]
    fn test_minimal_document() {
        let mut md = PluginMetadata::new("math", Sdk::Go);
        md.add_function("add")
            .with_parameter("a", "int32")
            .with_parameter("b", "int32")
            .with_result("int32");

        let schema = generate(&md, no_exclusions).unwrap();
        assert_eq!(
            schema.document,
            "# HostFn GraphQL Schema (auto-generated)\n\ntype Query {\n  add(a: Int!, b: Int!): Int!\n}\n"
        );
        assert!(schema.is_complete());
        assert_eq!(schema.functions.len(), 1);
        assert_eq!(schema.function("add").unwrap().function_name(), "add");
    }

    #[test]
    fn test_void_result() {
        let mut md = PluginMetadata::new("p", Sdk::Go);
        md.add_function("doNothing");

        let schema = generate(&md, no_exclusions).unwrap();
        assert!(schema.document.contains("  doNothing: Void\n"));
        assert!(schema.document.contains("\nscalar Void\n"));
        assert_eq!(schema.functions[0].result, TypeRef::named(VOID).nullable());
    }

    #[test]
    fn test_failed_function_contributes_nothing() {
        let mut md = PluginMetadata::new("p", Sdk::Go);
        md.add_function("good").with_result("int64");
        md.add_function("bad")
            .with_parameter("when", "time.Time")
            .with_parameter("ch", "chan int");
        md.add_function("alsoBad").with_result("testdata.Missing");

        let schema = generate(&md, no_exclusions).unwrap();

        assert_eq!(schema.functions.len(), 1);
        assert_eq!(schema.errors.len(), 2);
        assert_eq!(schema.errors[0].function_name(), Some("bad"));
        assert_eq!(schema.errors[0].root(), &SchemaError::UnsupportedType("chan int".into()));
        assert_eq!(schema.errors[1].root(), &SchemaError::UnknownType("testdata.Missing".into()));

        // `bad` got as far as registering Timestamp before failing
        assert!(!schema.types.contains("Timestamp"));
        assert!(!schema.document.contains("Timestamp"));
        assert!(schema.types.contains("Int64"));
    }

    #[test]
    fn test_null_default_on_non_null_parameter() {
        let mut md = PluginMetadata::new("p", Sdk::Go);
        md.add_function("f").with_default_parameter("a", "string", json!(null));

        let schema = generate(&md, no_exclusions).unwrap();
        assert!(schema.functions.is_empty());
        assert_eq!(schema.errors[0].code(), "HOSTFN_INVALID_DEFAULT");
    }

    #[test]
    fn test_duplicate_resolver_reports_later_export() {
        let mut md = PluginMetadata::new("p", Sdk::Go);
        md.add_function("SayHello").with_result("string");
        md.add_function("sayHello").with_result("string");

        let schema = generate(&md, no_exclusions).unwrap();
        assert_eq!(schema.functions.len(), 1);
        assert_eq!(schema.functions[0].function_name(), "SayHello");
        assert_eq!(
            schema.errors,
            vec![SchemaError::DuplicateResolver {
                resolver: "sayHello".into(),
                function: "sayHello".into(),
            }]
        );
    }

    #[test]
    fn test_no_functions_leaves_out_query() {
        let mut md = PluginMetadata::new("p", Sdk::Go);
        md.add_function("embed").with_parameter("text", "string").with_result("[]float64");
        md.add_function("listen").with_parameter("c", "chan int");

        let schema = generate(&md, |name| name == "embed").unwrap();

        assert!(schema.functions.is_empty());
        assert_eq!(schema.document, "# HostFn GraphQL Schema (auto-generated)\n");
    }

    #[test]
    fn test_unsupported_sdk_fails() {
        let mut md = PluginMetadata::new("p", Sdk::Go);
        md.sdk = "functions-py@1.0.0".into();

        let err = generate(&md, no_exclusions).unwrap_err();
        assert_eq!(err.code(), "HOSTFN_UNSUPPORTED_SDK");
    }

    #[test]
    fn test_excluded_functions_skipped() {
        let mut md = PluginMetadata::new("p", Sdk::Go);
        md.add_function("embed").with_parameter("text", "string").with_result("[]float64");
        md.add_function("hello").with_result("string");

        let schema = generate(&md, |name| name == "embed").unwrap();
        assert_eq!(schema.functions.len(), 1);
        assert!(!schema.document.contains("embed"));
    }

    #[test]
    fn test_function_schema_serializes_types_as_strings() {
        let mut md = PluginMetadata::new("p", Sdk::Go);
        md.add_function("f").with_default_parameter("n", "*int32", 3).with_result("[]string");

        let schema = generate(&md, no_exclusions).unwrap();
        let json = serde_json::to_value(&schema.functions[0]).unwrap();
        assert_eq!(
            json,
            json!({
                "resolver": "f",
                "function": "f",
                "parameters": [{"name": "n", "type": "Int", "default": "3"}],
                "result": "[String!]"
            })
        );
    }
}
