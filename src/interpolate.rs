//! Placeholder interpolation
//!
//! Substitutes `{{name}}` placeholders in a single template string from a
//! [`Scope`]. The renderer only depends on the [`Interpolator`] trait.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MappingError;
use crate::scope::Scope;

/// Substitutes variables into one template string
pub trait Interpolator {
    fn interpolate(&self, template: &str, scope: &Scope) -> Result<String, MappingError>;
}

/// What to do with a placeholder whose name is not in scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Leave `{{name}}` in the output untouched
    #[default]
    Keep,
    /// Replace it with nothing
    Empty,
    /// Fail with [`MappingError::UnresolvedPlaceholder`]
    Error,
}

/// `{{name}}` / `{{ name.path }}` placeholder substitution
#[derive(Debug, Clone)]
pub struct PlaceholderInterpolator {
    pattern: Regex,
    unresolved: UnresolvedPolicy,
}

impl Default for PlaceholderInterpolator {
    fn default() -> Self {
        Self::new(UnresolvedPolicy::default())
    }
}

impl PlaceholderInterpolator {
    pub fn new(unresolved: UnresolvedPolicy) -> Self {
        Self {
            pattern: Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("placeholder pattern is valid"),
            unresolved,
        }
    }
}

impl Interpolator for PlaceholderInterpolator {
    fn interpolate(&self, template: &str, scope: &Scope) -> Result<String, MappingError> {
        let mut out = String::with_capacity(template.len());
        let mut last = 0;

        for caps in self.pattern.captures_iter(template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push_str(&template[last..whole.start()]);
            match scope.lookup(name.as_str()) {
                Some(value) => out.push_str(&stringify(value)),
                None => match self.unresolved {
                    UnresolvedPolicy::Keep => out.push_str(whole.as_str()),
                    UnresolvedPolicy::Empty => {}
                    UnresolvedPolicy::Error => {
                        return Err(MappingError::UnresolvedPlaceholder {
                            name: name.as_str().to_string(),
                        })
                    }
                },
            }
            last = whole.end();
        }

        out.push_str(&template[last..]);
        Ok(out)
    }
}

/// Text form of a scope value.
///
/// Sequences are joined with newlines, matching how rendered lines join.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scope() -> Scope {
        Scope::new()
            .with("title", "Name")
            .with("new-elt", "<input>")
            .with("default", 42)
            .with("checked", json!(null))
            .with("properties", json!(["<a>", "<b>"]))
            .with("f-elt", json!({"label": "First"}))
    }

    #[test]
    fn test_substitutes_known_names() {
        let interp = PlaceholderInterpolator::default();
        let out = interp
            .interpolate("<h1>{{title}}</h1>{{ new-elt }}{{default}}[{{checked}}]", &scope())
            .unwrap();
        assert_eq!(out, "<h1>Name</h1><input>42[]");
    }

    #[test]
    fn test_sequences_join_with_newlines() {
        let interp = PlaceholderInterpolator::default();
        let out = interp.interpolate("{{properties}}", &scope()).unwrap();
        assert_eq!(out, "<a>\n<b>");
    }

    #[test]
    fn test_dotted_placeholder() {
        let interp = PlaceholderInterpolator::default();
        assert_eq!(interp.interpolate("{{f-elt.label}}", &scope()).unwrap(), "First");
    }

    #[test]
    fn test_unresolved_policies() {
        let template = "a{{nope}}b";
        let keep = PlaceholderInterpolator::new(UnresolvedPolicy::Keep);
        assert_eq!(keep.interpolate(template, &scope()).unwrap(), "a{{nope}}b");

        let empty = PlaceholderInterpolator::new(UnresolvedPolicy::Empty);
        assert_eq!(empty.interpolate(template, &scope()).unwrap(), "ab");

        let strict = PlaceholderInterpolator::new(UnresolvedPolicy::Error);
        assert_eq!(
            strict.interpolate(template, &scope()).unwrap_err(),
            MappingError::UnresolvedPlaceholder { name: "nope".into() }
        );
    }

    #[test]
    fn test_text_without_placeholders_is_unchanged() {
        let interp = PlaceholderInterpolator::default();
        assert_eq!(
            interp.interpolate("<p>{ not } a {placeholder}</p>", &scope()).unwrap(),
            "<p>{ not } a {placeholder}</p>"
        );
    }
}
