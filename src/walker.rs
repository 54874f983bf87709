//! Schema Walker
//!
//! Recursive descent over the schema tree. Each node is resolved (`$ref`),
//! classified by `type`, its children are rendered first, then the node's own
//! mapping entry is rendered with the collected variables.
//!
//! Variables available to templates:
//!
//! | variable      | kinds                       |
//! |---------------|-----------------------------|
//! | `id`          | all                         |
//! | `title`       | all                         |
//! | `description` | all                         |
//! | `properties`  | object (list of fragments)  |
//! | `new-elt`     | array (one item fragment)   |
//! | `default`     | string, integer, boolean    |
//! | `values`      | string with `enum`          |
//! | `checked`     | boolean                     |

use serde_json::Value;

use crate::diagnostics::Diagnostics;
use crate::error::{FormError, ParseError, ParseErrorKind};
use crate::ids::IdSource;
use crate::interpolate::{Interpolator, PlaceholderInterpolator};
use crate::render::TemplateRenderer;
use crate::resolver::ReferenceResolver;
use crate::schema::{is_truthy, SchemaKind, SchemaNode};
use crate::scope::Scope;

/// Fragment emitted for objects described only by `patternProperties`
pub const PATTERN_PROPERTIES_FRAGMENT: &str = "<p><b>PATTERN PROPERTIES</b></p>";

/// Title used when a node has neither title nor description
pub const MISSING_TITLE: &str = "Missing title";

/// Nesting limit applied unless configured otherwise
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// What the type-specific step produced for a node
enum Extracted {
    /// Render mapping entry `type_name` with these variables
    Render { type_name: &'static str, vars: Scope },
    /// Use this text as the node's fragment directly
    Fragment(String),
}

/// Walks one schema document and renders it through a mapping
pub struct SchemaWalker<'a, I = PlaceholderInterpolator> {
    resolver: ReferenceResolver<'a>,
    renderer: TemplateRenderer<'a, I>,
    ids: Box<dyn IdSource + 'a>,
    diagnostics: Diagnostics,
    depth: usize,
    max_depth: usize,
    /// `$ref` strings currently being expanded
    active_refs: Vec<String>,
}

impl<'a, I: Interpolator> SchemaWalker<'a, I> {
    pub fn new(
        root: &'a Value,
        renderer: TemplateRenderer<'a, I>,
        ids: Box<dyn IdSource + 'a>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            resolver: ReferenceResolver::new(root),
            renderer,
            ids,
            diagnostics,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            active_refs: Vec::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Render the whole document from its root
    pub fn render(&mut self) -> Result<String, FormError> {
        let root = self.resolver.root();
        self.classify_and_render(root)
    }

    /// Render one schema node (and everything below it)
    pub fn classify_and_render(&mut self, node: &'a Value) -> Result<String, FormError> {
        let refs_before = self.active_refs.len();
        let result = self
            .follow_references(node)
            .and_then(|target| self.dispatch(target));
        self.active_refs.truncate(refs_before);
        result
    }

    /// Replace `$ref` nodes by their targets until a plain node is reached
    fn follow_references(&mut self, mut node: &'a Value) -> Result<&'a Value, FormError> {
        loop {
            let schema = SchemaNode::new(node).map_err(|kind| self.error(kind))?;
            let Some(reference) = schema.reference().map_err(|kind| self.error(kind))? else {
                return Ok(node);
            };
            if self.active_refs.iter().any(|active| active == reference) {
                return Err(self.error(ParseErrorKind::ReferenceCycle {
                    reference: reference.to_string(),
                }));
            }
            node = self
                .resolver
                .resolve(reference)
                .map_err(|kind| self.error(kind))?;
            self.diagnostics.reference_followed(self.depth, reference);
            self.active_refs.push(reference.to_string());
        }
    }

    fn dispatch(&mut self, node: &'a Value) -> Result<String, FormError> {
        let schema = SchemaNode::new(node).map_err(|kind| self.error(kind))?;
        let kind = schema.kind().map_err(|kind| self.error(kind))?;
        if self.depth >= self.max_depth {
            return Err(self.error(ParseErrorKind::DepthLimitExceeded { limit: self.max_depth }));
        }

        self.depth += 1;
        let extracted = self.extract(kind, schema, node);
        self.depth -= 1;

        match extracted? {
            Extracted::Fragment(fragment) => Ok(fragment),
            Extracted::Render { type_name, vars } => {
                let scope = self.presentation_vars(&schema)?.overlay(vars);
                let html = self.renderer.render(type_name, &scope)?;
                self.diagnostics.node_rendered(self.depth, type_name);
                Ok(html)
            }
        }
    }

    /// Type-specific variables; children are rendered here
    fn extract(&mut self, kind: SchemaKind, schema: SchemaNode<'a>, node: &'a Value) -> Result<Extracted, FormError> {
        let extracted = match kind {
            SchemaKind::Object => return self.extract_object(schema, node),
            SchemaKind::Array => {
                let items = schema
                    .items()
                    .ok_or_else(|| self.error(ParseErrorKind::MissingItems))?;
                let new_elt = self.classify_and_render(items)?;
                Extracted::Render {
                    type_name: kind.mapping_name(),
                    vars: Scope::new().with("new-elt", new_elt),
                }
            }
            SchemaKind::String => {
                let vars = Scope::new().with("default", default_or_empty(&schema));
                match schema.enum_values().map_err(|kind| self.error(kind))? {
                    Some(values) => Extracted::Render {
                        type_name: "string_enum",
                        vars: vars.with("values", values.clone()),
                    },
                    None => Extracted::Render {
                        type_name: kind.mapping_name(),
                        vars,
                    },
                }
            }
            SchemaKind::Boolean => {
                let checked = match schema.default_value() {
                    Some(value) if is_truthy(value) => "checked",
                    _ => "",
                };
                Extracted::Render {
                    type_name: kind.mapping_name(),
                    vars: Scope::new()
                        .with("checked", checked)
                        .with("default", default_or_empty(&schema)),
                }
            }
            SchemaKind::Integer | SchemaKind::Number => Extracted::Render {
                type_name: kind.mapping_name(),
                vars: Scope::new().with("default", default_or_empty(&schema)),
            },
            SchemaKind::Null => Extracted::Render {
                type_name: kind.mapping_name(),
                vars: Scope::new(),
            },
        };
        Ok(extracted)
    }

    fn extract_object(&mut self, schema: SchemaNode<'a>, node: &'a Value) -> Result<Extracted, FormError> {
        if let Some(properties) = schema.properties().map_err(|kind| self.error(kind))? {
            let mut fragments = Vec::with_capacity(properties.len());
            for property in properties.values() {
                fragments.push(Value::String(self.classify_and_render(property)?));
            }
            return Ok(Extracted::Render {
                type_name: SchemaKind::Object.mapping_name(),
                vars: Scope::new().with("properties", fragments),
            });
        }

        if schema.has("patternProperties") {
            self.diagnostics.pattern_properties(self.depth);
            return Ok(Extracted::Fragment(PATTERN_PROPERTIES_FRAGMENT.to_string()));
        }

        self.diagnostics.object_without_properties(self.depth, node);
        Ok(Extracted::Fragment(String::new()))
    }

    /// `id`, `title` and `description` for one node
    fn presentation_vars(&mut self, schema: &SchemaNode<'a>) -> Result<Scope, FormError> {
        let description = schema
            .description()
            .map_err(|kind| self.error(kind))?
            .map(escape)
            .unwrap_or_default();
        let title = match schema.title().map_err(|kind| self.error(kind))? {
            Some(title) => escape(title),
            None if !description.is_empty() => description.clone(),
            None => MISSING_TITLE.to_string(),
        };
        Ok(Scope::new()
            .with("id", self.ids.next_id())
            .with("title", title)
            .with("description", description))
    }

    fn error(&self, kind: ParseErrorKind) -> FormError {
        ParseError::new(self.depth, kind).into()
    }
}

fn default_or_empty(schema: &SchemaNode<'_>) -> Value {
    schema
        .default_value()
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()))
}

fn escape(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}
