//! Error types for schema form rendering
//!
//! Two families matter to callers: [`ParseError`] means the schema is broken,
//! [`MappingError`] means the template mapping is broken. Both abort the
//! current conversion.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;

/// Top-level error for a conversion run
#[derive(Error, Debug)]
pub enum FormError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

/// Which part of the input a failure points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFamily {
    /// The schema document is malformed
    Schema,
    /// The mapping (template) document is malformed
    Mapping,
    /// The output target could not be updated
    Output,
    /// Filesystem, decoding or configuration trouble
    Environment,
}

impl fmt::Display for ErrorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema => write!(f, "schema"),
            Self::Mapping => write!(f, "mapping"),
            Self::Output => write!(f, "output"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

impl FormError {
    pub fn family(&self) -> ErrorFamily {
        match self {
            Self::Parse(_) => ErrorFamily::Schema,
            Self::Mapping(_) => ErrorFamily::Mapping,
            Self::Output(_) => ErrorFamily::Output,
            Self::Io { .. } | Self::Json { .. } | Self::Config(_) => ErrorFamily::Environment,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }
}

// =============================================================================
// Schema errors
// =============================================================================

/// A schema could not be turned into a form.
///
/// Carries the walker depth at which the failure happened.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Depth: {depth}\t{kind}")]
pub struct ParseError {
    pub depth: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(depth: usize, kind: ParseErrorKind) -> Self {
        Self { depth, kind }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("Cannot resolve references outside document: {reference}")]
    ReferenceScope { reference: String },

    #[error("Bad reference: {reference}\tUnknown element: {segment}")]
    UnresolvedReference { reference: String, segment: String },

    #[error("Reference cycle through {reference}")]
    ReferenceCycle { reference: String },

    #[error("Schema nesting exceeds the depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("Missing type information")]
    MissingType,

    #[error("Type must be a string, got {found}")]
    InvalidType { found: String },

    #[error("Unknown type: {ty}")]
    UnknownSchemaType { ty: String },

    #[error("Missing items in array")]
    MissingItems,

    #[error("Schema node is not an object: {found}")]
    NotAnObject { found: String },

    #[error("Properties must be an object")]
    InvalidProperties,

    #[error("Field \"{field}\" must be a string, got {found}")]
    InvalidField { field: &'static str, found: String },

    #[error("Enum must be an array, got {found}")]
    InvalidEnum { found: String },
}

// =============================================================================
// Mapping errors
// =============================================================================

/// The mapping document is structurally broken.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    #[error("No mapping for type: {type_name}")]
    UnknownMapping { type_name: String },

    #[error("Invalid mapping document: {reason}")]
    InvalidDocument { reason: String },

    #[error("Mapping for type \"{type_name}\" must be a list of lines")]
    InvalidLines { type_name: String },

    #[error("Invalid template line in type \"{type_name}\": {line}")]
    InvalidLine { type_name: String, line: String },

    #[error("Missing \"{field}\" for {directive} directive in type \"{type_name}\"")]
    MissingDirectiveField {
        type_name: String,
        directive: &'static str,
        field: &'static str,
    },

    #[error("Field \"{field}\" of {directive} directive in type \"{type_name}\" must be {expected}")]
    InvalidDirectiveField {
        type_name: String,
        directive: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("Unknown condition: {cond}")]
    UnsupportedCondition { cond: String },

    #[error("Unknown variable: {name}")]
    UnknownLoopVariable { name: String },

    #[error("Not a iterable variable: {name}")]
    NotIterable { name: String },

    #[error("Unresolved placeholder: {{{{{name}}}}}")]
    UnresolvedPlaceholder { name: String },

    #[error("No bundled mapping named \"{name}\"")]
    UnknownBundledMapping { name: String },
}

// =============================================================================
// Output errors
// =============================================================================

/// Insert mode could not locate the marker comments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OutputError {
    #[error("No start tag in output file (looking for {tag})")]
    MissingStartTag { tag: String },

    #[error("No end tag in output file (looking for {tag})")]
    MissingEndTag { tag: String },
}
