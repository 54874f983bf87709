//! Internal reference resolution
//!
//! Resolves `#/a/b/c` style references against the root schema document.
//! Only same-document references are supported.

use serde_json::Value;

use crate::error::ParseErrorKind;

/// Resolves `$ref` strings against one root document
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    root: &'a Value,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &'a Value {
        self.root
    }

    /// Follow `reference` one step from the root.
    ///
    /// Each `/`-separated segment after the leading `#` must name an existing
    /// key (or an array index) at the current position. `~1` and `~0` decode
    /// to `/` and `~`.
    pub fn resolve(&self, reference: &str) -> Result<&'a Value, ParseErrorKind> {
        let mut segments = reference.split('/');
        if segments.next() != Some("#") {
            return Err(ParseErrorKind::ReferenceScope {
                reference: reference.to_string(),
            });
        }

        let mut current = self.root;
        for raw in segments {
            let segment = decode_segment(raw);
            let next = match current {
                Value::Object(map) => map.get(segment.as_str()),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            current = next.ok_or_else(|| ParseErrorKind::UnresolvedReference {
                reference: reference.to_string(),
                segment: segment.clone(),
            })?;
        }
        Ok(current)
    }
}

fn decode_segment(raw: &str) -> String {
    raw.replace("~1", "/").replace("~0", "~")
}
