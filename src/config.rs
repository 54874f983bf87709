//! Configuration management for form rendering
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-forms.toml)
//! - Environment variables (SCHEMA_FORMS__*)
//!
//! ## Example config file (schema-forms.toml):
//! ```toml
//! [mapping]
//! bundled = "simple"
//! # path = "./mappings/bootstrap_mapping.json"
//!
//! [output]
//! tag = "<!-- j2f -->"
//! insert = false
//!
//! [render]
//! ids = "counter"
//! id_length = 6
//! max_depth = 64
//! unresolved = "keep"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ids::IdStrategy;
use crate::interpolate::UnresolvedPolicy;
use crate::output::DEFAULT_TAG;
use crate::walker::DEFAULT_MAX_DEPTH;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormConfig {
    /// Which mapping renders the schema
    #[serde(default)]
    pub mapping: MappingConfig,

    /// Where the form goes
    #[serde(default)]
    pub output: OutputConfig,

    /// Rendering behaviour
    #[serde(default)]
    pub render: RenderConfig,
}

/// Mapping selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Mapping file on disk; takes precedence over `bundled`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Name of a mapping shipped with the binary
    #[serde(default = "default_bundled")]
    pub bundled: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Marker comment for insert mode
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Insert between markers instead of overwriting
    #[serde(default)]
    pub insert: bool,
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Identifier source for element ids
    #[serde(default)]
    pub ids: IdStrategy,

    /// Length of random identifiers
    #[serde(default = "default_id_length")]
    pub id_length: usize,

    /// Deepest schema nesting accepted
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Handling of `{{name}}` placeholders with no matching variable
    #[serde(default)]
    pub unresolved: UnresolvedPolicy,
}

// Default value functions
fn default_bundled() -> String {
    "simple".to_string()
}

fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

fn default_id_length() -> usize {
    6
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            path: None,
            bundled: default_bundled(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            insert: false,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ids: IdStrategy::default(),
            id_length: default_id_length(),
            max_depth: default_max_depth(),
            unresolved: UnresolvedPolicy::default(),
        }
    }
}

impl FormConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-forms.toml",
            ".schema-forms.toml",
            "config/schema-forms.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "schema-forms", "schema-forms") {
            let xdg_config = config_dir.config_dir().join("schema-forms.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SCHEMA_FORMS__RENDER__IDS=counter
        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_FORMS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FormConfig::default();
        assert_eq!(config.mapping.bundled, "simple");
        assert_eq!(config.output.tag, "<!-- j2f -->");
        assert_eq!(config.render.ids, IdStrategy::Random);
        assert_eq!(config.render.id_length, 6);
        assert_eq!(config.render.unresolved, UnresolvedPolicy::Keep);
    }

    #[test]
    fn test_serialize_config() {
        let config = FormConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[mapping]"));
        assert!(toml_str.contains("[render]"));
        assert!(toml_str.contains("ids = \"random\""));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: FormConfig = toml::from_str("[render]\nids = \"counter\"\n").unwrap();
        assert_eq!(config.render.ids, IdStrategy::Counter);
        assert_eq!(config.render.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.mapping.bundled, "simple");
        assert!(!config.output.insert);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forms.toml");
        std::fs::write(&path, "[output]\ninsert = true\ntag = \"<!-- form -->\"\n").unwrap();

        let config = FormConfig::load_from(path.to_str()).unwrap();
        assert!(config.output.insert);
        assert_eq!(config.output.tag, "<!-- form -->");
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(FormConfig::load_from(Some("/nonexistent/schema-forms-config.toml")).is_err());
    }
}
