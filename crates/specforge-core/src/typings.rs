//! TypeScript typings generation from a parsed specification.
//!
//! The orchestrator is only coupled to the `TypeGenerator` trait; the built-in
//! `TsTypingsGenerator` walks the document's schema map and emits
//! `export interface` / `export type` declarations. Output depends only on
//! the document, so re-running on unchanged input is byte-identical.

// Internal imports (std, crate)
use std::collections::HashSet;

use crate::document::SpecDocument;
use crate::utils::to_upper_camel_case;

// External imports (alphabetized)
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;

/// Property names that can be written without quoting
static TS_IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// Produces generated source text from a structured document.
///
/// Implementations must be safe to call concurrently; the orchestrator shares
/// one generator across all in-flight conversions.
#[async_trait]
pub trait TypeGenerator: Send + Sync {
    async fn generate(&self, doc: &SpecDocument) -> crate::Result<String>;
}

/// Built-in generator emitting TypeScript declaration text
#[derive(Debug, Default)]
pub struct TsTypingsGenerator;

impl TsTypingsGenerator {
    pub fn new() -> Self {
        Self
    }

    fn render(&self, doc: &SpecDocument) -> crate::Result<String> {
        if !doc.as_json().is_object() {
            return Err(crate::Error::generate(
                "specification root is not an object",
            ));
        }

        let mut out = String::new();
        out.push_str("// Generated by specforge. Do not edit by hand.\n");
        if let Some(title) = doc.title() {
            let version = doc
                .version()
                .map(|v| format!(" v{v}"))
                .unwrap_or_default();
            out.push_str(&format!("// Source: {title}{version}\n"));
        }
        out.push('\n');

        if let Some(schemas) = doc.schemas() {
            for (name, schema) in schemas {
                self.emit_declaration(&mut out, name, schema);
            }
        }

        Ok(out)
    }

    fn emit_declaration(&self, out: &mut String, name: &str, schema: &JsonValue) {
        let type_name = to_upper_camel_case(name);
        if let Some(description) = schema.get("description").and_then(JsonValue::as_str) {
            out.push_str(&format!("/** {} */\n", description.trim()));
        }

        if let Some(properties) = schema.get("properties").and_then(JsonValue::as_object) {
            let required = required_set(schema);
            out.push_str(&format!("export interface {type_name} {{\n"));
            for (prop, prop_schema) in properties {
                let marker = if required.contains(prop.as_str()) {
                    ""
                } else {
                    "?"
                };
                out.push_str(&format!(
                    "  {}{}: {};\n",
                    property_key(prop),
                    marker,
                    ts_type(prop_schema)
                ));
            }
            out.push_str("}\n\n");
        } else {
            out.push_str(&format!(
                "export type {type_name} = {};\n\n",
                ts_type(schema)
            ));
        }
    }
}

#[async_trait]
impl TypeGenerator for TsTypingsGenerator {
    async fn generate(&self, doc: &SpecDocument) -> crate::Result<String> {
        self.render(doc)
    }
}

fn required_set(schema: &JsonValue) -> HashSet<&str> {
    schema
        .get("required")
        .and_then(JsonValue::as_array)
        .map(|values| values.iter().filter_map(JsonValue::as_str).collect())
        .unwrap_or_default()
}

fn property_key(name: &str) -> String {
    if TS_IDENT_RE.is_match(name) {
        name.to_string()
    } else {
        // JSON string quoting covers the TS quoting rules we need
        serde_json::to_string(name).unwrap_or_else(|_| format!("\"{name}\""))
    }
}

/// Map one schema to a TypeScript type expression
fn ts_type(schema: &JsonValue) -> String {
    let Some(obj) = schema.as_object() else {
        return "unknown".to_string();
    };

    if let Some(reference) = obj.get("$ref").and_then(JsonValue::as_str) {
        return ref_type_name(reference);
    }
    if let Some(values) = obj.get("enum").and_then(JsonValue::as_array) {
        return join_variants(values.iter().map(literal), " | ");
    }
    if let Some(variants) = obj
        .get("oneOf")
        .or_else(|| obj.get("anyOf"))
        .and_then(JsonValue::as_array)
    {
        return join_variants(variants.iter().map(ts_type), " | ");
    }
    if let Some(parts) = obj.get("allOf").and_then(JsonValue::as_array) {
        return join_variants(parts.iter().map(ts_type), " & ");
    }

    let base = match obj.get("type").and_then(JsonValue::as_str) {
        Some("string") => "string".to_string(),
        Some("integer") | Some("number") => "number".to_string(),
        Some("boolean") => "boolean".to_string(),
        Some("array") => {
            let inner = obj.get("items").map(ts_type).unwrap_or_else(|| "unknown".to_string());
            if inner.contains(' ') {
                format!("({inner})[]")
            } else {
                format!("{inner}[]")
            }
        }
        Some("object") | None => object_type(obj),
        Some(_) => "unknown".to_string(),
    };

    if obj.get("nullable").and_then(JsonValue::as_bool) == Some(true) {
        format!("{base} | null")
    } else {
        base
    }
}

fn object_type(obj: &serde_json::Map<String, JsonValue>) -> String {
    if let Some(properties) = obj.get("properties").and_then(JsonValue::as_object) {
        let required: HashSet<&str> = obj
            .get("required")
            .and_then(JsonValue::as_array)
            .map(|values| values.iter().filter_map(JsonValue::as_str).collect())
            .unwrap_or_default();
        let fields: Vec<String> = properties
            .iter()
            .map(|(prop, prop_schema)| {
                let marker = if required.contains(prop.as_str()) {
                    ""
                } else {
                    "?"
                };
                format!("{}{}: {}", property_key(prop), marker, ts_type(prop_schema))
            })
            .collect();
        return format!("{{ {} }}", fields.join("; "));
    }
    match obj.get("additionalProperties") {
        Some(ap @ JsonValue::Object(_)) => format!("Record<string, {}>", ts_type(ap)),
        Some(JsonValue::Bool(true)) => "Record<string, unknown>".to_string(),
        _ => "unknown".to_string(),
    }
}

fn ref_type_name(reference: &str) -> String {
    // "#/components/schemas/Pet" and "#/definitions/Pet" both end in the name
    let name = reference.rsplit('/').next().unwrap_or(reference);
    to_upper_camel_case(name)
}

fn literal(value: &JsonValue) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "unknown".to_string())
}

fn join_variants(parts: impl Iterator<Item = String>, separator: &str) -> String {
    let collected: Vec<String> = parts.collect();
    if collected.is_empty() {
        "unknown".to_string()
    } else {
        collected.join(separator)
    }
}
