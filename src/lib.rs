//! Schema Forms
//!
//! Renders a JSON Schema document into an HTML form. Each schema type is
//! rendered through a user-supplied mapping: a JSON file giving, per type, a
//! list of template lines in a small line-based language (literal lines,
//! conditionals and loops over `{{name}}` placeholders).
//!
//! ## Pipeline
//!
//! ```text
//! schema.json ──► SchemaWalker ──► TemplateRenderer ──► OutputTarget
//!                   │  $ref via        │  lines from        (file, stdout,
//!                   │  ReferenceResolver  MappingRepository   or between markers)
//!                   └─ ids, diagnostics
//! ```
//!
//! Children are rendered before their parent, so a parent's template sees
//! finished child fragments through `{{properties}}` or `{{new-elt}}`.

pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod interpolate;
pub mod mapping;
pub mod output;
pub mod render;
pub mod resolver;
pub mod schema;
pub mod scope;
pub mod walker;

pub use config::FormConfig;
pub use convert::{load_schema, Conversion, FormConverter};
pub use diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics, Severity};
pub use error::{ErrorFamily, FormError, MappingError, OutputError, ParseError, ParseErrorKind, Result};
pub use ids::{CounterIds, IdSource, IdStrategy, RandomIds};
pub use interpolate::{Interpolator, PlaceholderInterpolator, UnresolvedPolicy};
pub use mapping::{MappingRepository, TemplateLine};
pub use output::OutputTarget;
pub use render::TemplateRenderer;
pub use resolver::ReferenceResolver;
pub use schema::{SchemaKind, SchemaNode};
pub use scope::Scope;
pub use walker::SchemaWalker;
