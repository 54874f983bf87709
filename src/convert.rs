//! Conversion runs
//!
//! Ties the pieces together for one schema: load it, walk it through the
//! mapping, and write the result. Nothing is written unless the whole schema
//! rendered.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::config::{FormConfig, RenderConfig};
use crate::diagnostics::Diagnostics;
use crate::error::{FormError, Result};
use crate::ids::IdSource;
use crate::interpolate::PlaceholderInterpolator;
use crate::mapping::MappingRepository;
use crate::output::OutputTarget;
use crate::render::TemplateRenderer;
use crate::walker::SchemaWalker;

/// A successfully rendered schema
#[derive(Debug, Clone)]
pub struct Conversion {
    pub html: String,
    pub diagnostics: Diagnostics,
}

/// Renders schemas with one mapping and one set of render settings
#[derive(Debug, Clone)]
pub struct FormConverter {
    mapping: MappingRepository,
    settings: RenderConfig,
}

impl FormConverter {
    pub fn new(mapping: MappingRepository, settings: RenderConfig) -> Self {
        Self { mapping, settings }
    }

    /// Load the configured mapping (file path first, then bundled name)
    pub fn from_config(config: &FormConfig) -> Result<Self> {
        let mapping = match &config.mapping.path {
            Some(path) => MappingRepository::load(path)?,
            None => MappingRepository::bundled(&config.mapping.bundled)?,
        };
        Ok(Self::new(mapping, config.render.clone()))
    }

    pub fn mapping(&self) -> &MappingRepository {
        &self.mapping
    }

    /// Render `schema` using the configured identifier source
    pub fn render(&self, schema: &Value) -> Result<Conversion> {
        let ids = self.settings.ids.build(self.settings.id_length);
        self.render_with_ids(schema, ids)
    }

    /// Render `schema` with an explicit identifier source
    pub fn render_with_ids<'a>(&'a self, schema: &'a Value, ids: Box<dyn IdSource + 'a>) -> Result<Conversion> {
        let interpolator = PlaceholderInterpolator::new(self.settings.unresolved);
        let renderer = TemplateRenderer::new(&self.mapping, interpolator);
        let mut walker = SchemaWalker::new(schema, renderer, ids, Diagnostics::new())
            .with_max_depth(self.settings.max_depth);

        let result = walker.render();
        let mut diagnostics = walker.into_diagnostics();
        match result {
            Ok(html) => Ok(Conversion { html, diagnostics }),
            Err(err) => {
                diagnostics.failure(&err);
                Err(err)
            }
        }
    }

    /// Load the schema at `schema_path`, render it and write it to `target`
    pub fn convert_file(&self, schema_path: &Path, target: &OutputTarget) -> Result<Conversion> {
        let schema = load_schema(schema_path)?;
        let mut conversion = self.render(&schema)?;
        if let Err(err) = target.write(&conversion.html) {
            conversion.diagnostics.failure(&err);
            return Err(err);
        }
        Ok(conversion)
    }
}

/// Read and decode a JSON schema document
pub fn load_schema(path: &Path) -> Result<Value> {
    let source = fs::read_to_string(path).map_err(|e| FormError::io(path, e))?;
    let schema = serde_json::from_str(&source).map_err(|e| FormError::json(path, e))?;
    tracing::debug!(path = %path.display(), "loaded schema");
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{CounterIds, IdStrategy};
    use serde_json::json;

    fn counter_settings() -> RenderConfig {
        RenderConfig {
            ids: IdStrategy::Counter,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_from_default_config_uses_bundled_mapping() {
        let converter = FormConverter::from_config(&FormConfig::default()).unwrap();
        assert!(converter.mapping().contains("string_enum"));
    }

    #[test]
    fn test_render_is_repeatable_with_counter_ids() {
        let converter = FormConverter::from_config(&FormConfig::default()).unwrap();
        let converter = FormConverter::new(converter.mapping().clone(), counter_settings());
        let schema = json!({
            "type": "object",
            "title": "Survey",
            "properties": {
                "color": {"type": "string", "enum": ["red", "green"], "default": "green"},
                "tags": {"type": "array", "items": {"type": "string"}},
                "subscribe": {"type": "boolean", "default": true}
            }
        });
        let first = converter.render(&schema).unwrap().html;
        let second = converter.render(&schema).unwrap().html;
        assert_eq!(first, second);
        assert!(first.contains("<option value=\"green\" selected>green</option>"));
    }

    #[test]
    fn test_failure_is_recorded_and_returned() {
        let converter = FormConverter::new(MappingRepository::default(), counter_settings());
        let err = converter
            .render_with_ids(&json!({"title": "untyped"}), Box::new(CounterIds::default()))
            .unwrap_err();
        assert!(matches!(err, FormError::Parse(_)));
    }

    #[test]
    fn test_load_schema_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        match load_schema(&path) {
            Err(FormError::Json { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected JSON error, got {:?}", other),
        }
    }
}
