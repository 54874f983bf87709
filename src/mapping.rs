//! Mapping Repository
//!
//! A mapping document has the shape
//!
//! ```json
//! { "mapping": { "string": ["<input id=\"{{id}}\">"], "object": [ ... ] } }
//! ```
//!
//! Each entry is a list of template lines. A line is either a literal string
//! or a directive object:
//!
//! - conditional: `{"if": "{{a}}", "cond": "=", "cmp": "{{b}}", "html": [...], "else": [...]}`
//! - loop: `{"for": "values", "as": "v", "html": [...]}`
//!
//! Directives are parsed into [`TemplateLine`] when the mapping is loaded, so
//! a structurally malformed mapping fails before any schema is walked. The
//! `cond` operator is only checked when its line is rendered.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use include_dir::{include_dir, Dir};
use serde_json::{Map, Value};

use crate::error::{FormError, MappingError};

/// Mapping files shipped with the crate, named `<name>_mapping.json`
static BUNDLED_MAPPINGS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/mappings");

/// Loop binding used when a `for` directive has no `as`
pub const DEFAULT_LOOP_BINDING: &str = "f-elt";

// =============================================================================
// Template lines
// =============================================================================

/// One entry of a mapping's line sequence
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateLine {
    /// Interpolated as-is
    Literal(String),
    /// `if` / `cmp` comparison choosing between two bodies
    Conditional(Conditional),
    /// `for` iteration over a sequence variable
    Loop(Loop),
}

/// Supported comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `"="`: operands equal after interpolation
    Equal,
}

impl Comparison {
    pub fn parse(cond: &str) -> Option<Self> {
        match cond {
            "=" => Some(Self::Equal),
            _ => None,
        }
    }

    pub fn holds(&self, left: &str, right: &str) -> bool {
        match self {
            Self::Equal => left == right,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    /// The `cond` operator as written; checked when the line is rendered
    pub cond: String,
    /// The `if` operand template
    pub left: String,
    /// The `cmp` operand template
    pub right: String,
    /// Rendered when the comparison holds
    pub then: Vec<TemplateLine>,
    /// Rendered otherwise, when present
    pub otherwise: Option<Vec<TemplateLine>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    /// Name of the sequence variable to iterate
    pub variable: String,
    /// Name bound to the current element
    pub binding: String,
    pub body: Vec<TemplateLine>,
}

impl TemplateLine {
    /// Parse one line of the mapping entry `type_name`
    pub fn parse(type_name: &str, value: &Value) -> Result<Self, MappingError> {
        match value {
            Value::String(text) => Ok(Self::Literal(text.clone())),
            Value::Object(fields) if fields.contains_key("if") => {
                parse_conditional(type_name, fields).map(Self::Conditional)
            }
            Value::Object(fields) if fields.contains_key("for") => {
                parse_loop(type_name, fields).map(Self::Loop)
            }
            other => Err(MappingError::InvalidLine {
                type_name: type_name.to_string(),
                line: other.to_string(),
            }),
        }
    }

    /// Parse a JSON list of lines
    pub fn parse_all(type_name: &str, value: &Value) -> Result<Vec<Self>, MappingError> {
        let lines = value.as_array().ok_or_else(|| MappingError::InvalidLines {
            type_name: type_name.to_string(),
        })?;
        lines.iter().map(|line| Self::parse(type_name, line)).collect()
    }
}

fn parse_conditional(type_name: &str, fields: &Map<String, Value>) -> Result<Conditional, MappingError> {
    const DIRECTIVE: &str = "if";

    let then = body(type_name, DIRECTIVE, fields, "html")?;
    let cond = string_field(type_name, DIRECTIVE, fields, "cond")?;
    let right = string_field(type_name, DIRECTIVE, fields, "cmp")?;
    let left = string_field(type_name, DIRECTIVE, fields, "if")?;

    let otherwise = match fields.get("else") {
        Some(_) => Some(body(type_name, DIRECTIVE, fields, "else")?),
        None => None,
    };

    Ok(Conditional {
        cond,
        left,
        right,
        then,
        otherwise,
    })
}

fn parse_loop(type_name: &str, fields: &Map<String, Value>) -> Result<Loop, MappingError> {
    const DIRECTIVE: &str = "for";

    let body = body(type_name, DIRECTIVE, fields, "html")?;
    let variable = string_field(type_name, DIRECTIVE, fields, "for")?;
    let binding = match fields.get("as") {
        Some(_) => string_field(type_name, DIRECTIVE, fields, "as")?,
        None => DEFAULT_LOOP_BINDING.to_string(),
    };

    Ok(Loop { variable, binding, body })
}

fn string_field(
    type_name: &str,
    directive: &'static str,
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<String, MappingError> {
    let value = fields.get(field).ok_or_else(|| MappingError::MissingDirectiveField {
        type_name: type_name.to_string(),
        directive,
        field,
    })?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| MappingError::InvalidDirectiveField {
            type_name: type_name.to_string(),
            directive,
            field,
            expected: "a string",
        })
}

fn body(
    type_name: &str,
    directive: &'static str,
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<TemplateLine>, MappingError> {
    let value = fields.get(field).ok_or_else(|| MappingError::MissingDirectiveField {
        type_name: type_name.to_string(),
        directive,
        field,
    })?;
    if !value.is_array() {
        return Err(MappingError::InvalidDirectiveField {
            type_name: type_name.to_string(),
            directive,
            field,
            expected: "a list of lines",
        });
    }
    TemplateLine::parse_all(type_name, value)
}

// =============================================================================
// Repository
// =============================================================================

/// Per-type template lines, loaded once and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct MappingRepository {
    entries: HashMap<String, Vec<TemplateLine>>,
}

impl MappingRepository {
    /// Build from a decoded `{ "mapping": { ... } }` document
    pub fn from_value(document: &Value) -> Result<Self, MappingError> {
        let mapping = document
            .get("mapping")
            .ok_or_else(|| MappingError::InvalidDocument {
                reason: "missing \"mapping\" key".to_string(),
            })?
            .as_object()
            .ok_or_else(|| MappingError::InvalidDocument {
                reason: "\"mapping\" must be an object".to_string(),
            })?;

        let mut entries = HashMap::with_capacity(mapping.len());
        for (type_name, lines) in mapping {
            entries.insert(type_name.clone(), TemplateLine::parse_all(type_name, lines)?);
        }
        Ok(Self { entries })
    }

    /// Parse a mapping document from JSON text
    pub fn from_json_str(source: &str, origin: &Path) -> Result<Self, FormError> {
        let document: Value =
            serde_json::from_str(source).map_err(|e| FormError::json(origin, e))?;
        Ok(Self::from_value(&document)?)
    }

    /// Load a mapping document from disk
    pub fn load(path: &Path) -> Result<Self, FormError> {
        let source = fs::read_to_string(path).map_err(|e| FormError::io(path, e))?;
        let repository = Self::from_json_str(&source, path)?;
        tracing::debug!(path = %path.display(), types = repository.len(), "loaded mapping");
        Ok(repository)
    }

    /// Load one of the mappings embedded in the binary (e.g. `simple`)
    pub fn bundled(name: &str) -> Result<Self, FormError> {
        let file_name = format!("{name}_mapping.json");
        let source = BUNDLED_MAPPINGS
            .get_file(&file_name)
            .and_then(|file| file.contents_utf8())
            .ok_or_else(|| MappingError::UnknownBundledMapping { name: name.to_string() })?;
        Self::from_json_str(source, Path::new(&file_name))
    }

    /// Names of the bundled mappings
    pub fn bundled_names() -> Vec<String> {
        let mut names: Vec<String> = BUNDLED_MAPPINGS
            .files()
            .filter_map(|file| file.path().file_name()?.to_str())
            .filter_map(|name| name.strip_suffix("_mapping.json"))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }

    /// Template lines for `type_name`
    pub fn lookup(&self, type_name: &str) -> Result<&[TemplateLine], MappingError> {
        self.entries
            .get(type_name)
            .map(Vec::as_slice)
            .ok_or_else(|| MappingError::UnknownMapping {
                type_name: type_name.to_string(),
            })
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
