//! Configuration management for Specforge.
//!
//! Two options objects exist, one per build operation: `TypegenConfig` for the
//! typings orchestrator and `ClientToolConfig` for the external client-code
//! generator. Both use the camelCase key names the build pipeline exposes to
//! its users, reject unknown keys, and are validated with `validate()` before
//! any entry processing starts (configuration errors fail the whole run fast).
//!
//! # Examples
//!
//! ```
//! use specforge_core::config::TypegenConfig;
//! use specforge_core::entry::SpecEntry;
//!
//! let config = TypegenConfig {
//!     entries: vec![SpecEntry::new("api/openapi.yaml", "src/types/api.d.ts")],
//! };
//! assert!(config.validate().is_ok());
//! ```

// Internal imports (std, crate)
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::entry::SpecEntry;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Supported spec versions for the external client generator
const SUPPORTED_OPENAPI_VERSIONS: &[&str] = &["2.0", "3.0", "3.1"];

/// Configuration for the typings orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TypegenConfig {
    /// Source/output path pairs, relative to the build root
    pub entries: Vec<SpecEntry>,
}

impl TypegenConfig {
    /// Load configuration from a YAML or JSON file (keyed on extension)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let config = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else {
            serde_yaml::to_string(self)?
        };
        fs::write(path, content).await?;
        Ok(())
    }

    /// Check the options object before any entry is processed.
    ///
    /// Paths must be non-empty and relative so that resolution against the
    /// build root is meaningful.
    pub fn validate(&self) -> crate::Result<()> {
        for entry in &self.entries {
            validate_relative_path("sourcePath", &entry.source_path)?;
            validate_relative_path("outputPath", &entry.output_path)?;
        }
        Ok(())
    }
}

/// Configuration for the external client-code generator invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientToolConfig {
    /// Spec file handed to the generator, relative to the build root
    pub source_file: PathBuf,

    /// Directory the generator writes into, relative to the build root
    pub output_folder_path: PathBuf,

    /// Spec version of the source file ("2.0", "3.0" or "3.1")
    pub openapi_version: String,

    /// Generator name passed to the tool via `-g`
    #[serde(default = "default_generator")]
    pub generator: String,

    /// Extra `--additional-properties` key/value pairs
    #[serde(default)]
    pub additional_options: BTreeMap<String, String>,
}

impl ClientToolConfig {
    /// Load configuration from a YAML or JSON file (keyed on extension)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let config = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }

    /// Check the options object before the tool is invoked
    pub fn validate(&self) -> crate::Result<()> {
        validate_relative_path("sourceFile", &self.source_file)?;
        validate_relative_path("outputFolderPath", &self.output_folder_path)?;
        if !SUPPORTED_OPENAPI_VERSIONS.contains(&self.openapi_version.as_str()) {
            return Err(crate::Error::config(format!(
                "openapiVersion '{}' is not supported (expected one of {})",
                self.openapi_version,
                SUPPORTED_OPENAPI_VERSIONS.join(", ")
            )));
        }
        if self.generator.is_empty() {
            return Err(crate::Error::config("generator must not be empty"));
        }
        for (key, value) in &self.additional_options {
            // The pairs are joined into a single comma-separated argument, so
            // separators inside them would corrupt the tool invocation.
            if key.is_empty() || key.contains(',') || key.contains('=') {
                return Err(crate::Error::config(format!(
                    "invalid additionalOptions key '{key}'"
                )));
            }
            if value.contains(',') || value.contains('=') {
                return Err(crate::Error::config(format!(
                    "invalid additionalOptions value '{value}' for key '{key}'"
                )));
            }
        }
        Ok(())
    }
}

fn default_generator() -> String {
    "typescript-fetch".to_string()
}

fn validate_relative_path(field: &str, path: &Path) -> crate::Result<()> {
    if path.as_os_str().is_empty() {
        return Err(crate::Error::config(format!("{field} must not be empty")));
    }
    if path.is_absolute() {
        return Err(crate::Error::config(format!(
            "{field} must be relative to the build root: {}",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_typegen_config_roundtrip() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("specforge.yaml");

        let config = TypegenConfig {
            entries: vec![SpecEntry::new("api/pets.yaml", "src/types/pets.d.ts")],
        };
        config.save(&file_path).await?;

        let loaded = TypegenConfig::from_file(&file_path).await?;
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(
            loaded.entries[0].source_path,
            PathBuf::from("api/pets.yaml")
        );
        assert_eq!(
            loaded.entries[0].output_path,
            PathBuf::from("src/types/pets.d.ts")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_typegen_config_camel_case_keys() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("specforge.json");
        fs::write(
            &file_path,
            r#"{"entries":[{"sourcePath":"a.json","outputPath":"a.d.ts"}]}"#,
        )
        .await?;

        let loaded = TypegenConfig::from_file(&file_path).await?;
        assert_eq!(loaded.entries[0].source_path, PathBuf::from("a.json"));
        Ok(())
    }

    #[tokio::test]
    async fn test_typegen_config_rejects_unknown_keys() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("specforge.json");
        fs::write(&file_path, r#"{"entries":[],"bogus":true}"#).await?;

        assert!(TypegenConfig::from_file(&file_path).await.is_err());
        Ok(())
    }

    #[test]
    fn test_typegen_config_rejects_absolute_paths() {
        let config = TypegenConfig {
            entries: vec![SpecEntry::new("/abs/openapi.yaml", "out.d.ts")],
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sourcePath"));
    }

    #[test]
    fn test_typegen_config_rejects_empty_paths() {
        let config = TypegenConfig {
            entries: vec![SpecEntry::new("openapi.yaml", "")],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_client_config_validates_version() {
        let mut config = ClientToolConfig {
            source_file: PathBuf::from("openapi.yaml"),
            output_folder_path: PathBuf::from("client"),
            openapi_version: "3.0".to_string(),
            generator: default_generator(),
            additional_options: BTreeMap::new(),
        };
        assert!(config.validate().is_ok());

        config.openapi_version = "1.2".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_client_config_rejects_separator_in_options() {
        let mut options = BTreeMap::new();
        options.insert("npmName".to_string(), "a,b".to_string());
        let config = ClientToolConfig {
            source_file: PathBuf::from("openapi.yaml"),
            output_folder_path: PathBuf::from("client"),
            openapi_version: "3.0".to_string(),
            generator: default_generator(),
            additional_options: options,
        };
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_client_config_from_yaml() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("client.yaml");
        fs::write(
            &file_path,
            "sourceFile: api/openapi.yaml\noutputFolderPath: generated/client\nopenapiVersion: \"3.0\"\nadditionalOptions:\n  npmName: pets-client\n",
        )
        .await?;

        let loaded = ClientToolConfig::from_file(&file_path).await?;
        assert_eq!(loaded.generator, "typescript-fetch");
        assert_eq!(
            loaded.additional_options.get("npmName"),
            Some(&"pets-client".to_string())
        );
        loaded.validate()?;
        Ok(())
    }
}
