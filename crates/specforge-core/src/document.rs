//! OpenAPI document loading and accessors.
//!
//! A `SpecDocument` is the in-memory parsed representation of a specification
//! file, independent of whether it was written as YAML or JSON. YAML input is
//! funneled through `serde_yaml` into a `serde_json::Value`, so downstream
//! code only ever deals with one representation.

// Internal imports (std, crate)
use std::path::Path;

// External imports (alphabetized)
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// Text encoding of a specification file, determined by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Yaml,
    Json,
}

impl SpecFormat {
    /// Determine the format from a file extension.
    ///
    /// Returns `None` for anything other than `.yaml`, `.yml` or `.json`;
    /// callers treat that as an unsupported format.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parsed OpenAPI specification
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct SpecDocument {
    /// The raw JSON value of the spec
    pub json: JsonValue,
}

impl SpecDocument {
    /// Parse raw text in the given format into a structured document
    pub fn parse(content: &str, format: SpecFormat) -> crate::Result<Self> {
        let json = match format {
            SpecFormat::Json => serde_json::from_str(content)?,
            SpecFormat::Yaml => serde_yaml::from_str(content)?,
        };
        Ok(Self { json })
    }

    /// Get a reference to the raw JSON value
    pub fn as_json(&self) -> &JsonValue {
        &self.json
    }

    /// Get the title of the API
    pub fn title(&self) -> Option<&str> {
        self.json.get("info")?.get("title")?.as_str()
    }

    /// Get the version of the API
    pub fn version(&self) -> Option<&str> {
        self.json.get("info")?.get("version")?.as_str()
    }

    /// Schema map of the document.
    ///
    /// Tries the OpenAPI 3.x `components.schemas` location first and falls
    /// back to the Swagger 2.0 `definitions` section.
    pub fn schemas(&self) -> Option<&Map<String, JsonValue>> {
        if let Some(schemas) = self
            .json
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(JsonValue::as_object)
        {
            return Some(schemas);
        }
        self.json.get("definitions").and_then(JsonValue::as_object)
    }
}
