//! Variable scopes for template rendering

use serde_json::{Map, Value};

/// Variables visible while rendering one line sequence.
///
/// Child scopes are a copy of the parent with new bindings written over it,
/// so the latest binding of a name wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    vars: Map<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style binding
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Look up a dotted path such as `f-elt.label` or `values.0`.
    ///
    /// A name bound verbatim (dots included) takes precedence over descent.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.vars.get(path) {
            return Some(value);
        }
        let mut parts = path.split('.');
        let mut current = self.vars.get(parts.next()?)?;
        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// A copy of this scope with `name` bound to `value`
    pub fn child(&self, name: impl Into<String>, value: Value) -> Self {
        let mut child = self.clone();
        child.insert(name, value);
        child
    }

    /// A copy of this scope with every binding of `overlay` written over it
    pub fn overlay(&self, overlay: Scope) -> Self {
        let mut merged = self.clone();
        merged.vars.extend(overlay.vars);
        merged
    }
}
