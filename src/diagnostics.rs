//! Diagnostics
//!
//! Collects leveled messages raised while walking a schema. Items are also
//! emitted as `tracing` events at the matching level, except the final
//! failure record, which the caller reports.

use std::fmt;

use crate::error::FormError;

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Diagnostic code for categorizing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// Object node with neither `properties` nor `patternProperties`
    ObjectWithoutProperties,
    /// `patternProperties` rendered as a placeholder
    PatternProperties,
    /// `$ref` replaced by its target
    ReferenceFollowed,
    /// A node fragment was produced
    NodeRendered,
    /// The schema could not be converted
    SchemaFailure,
    /// The mapping could not render the schema
    MappingFailure,
    /// The output could not be written
    OutputFailure,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectWithoutProperties => "W001",
            Self::PatternProperties => "W002",
            Self::ReferenceFollowed => "D001",
            Self::NodeRendered => "D002",
            Self::SchemaFailure => "E001",
            Self::MappingFailure => "E002",
            Self::OutputFailure => "E003",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::SchemaFailure | Self::MappingFailure | Self::OutputFailure => Severity::Error,
            Self::ObjectWithoutProperties | Self::PatternProperties => Severity::Warning,
            Self::ReferenceFollowed | Self::NodeRendered => Severity::Debug,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

// =============================================================================
// Diagnostic Item
// =============================================================================

/// A single diagnostic item
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticItem {
    pub code: DiagnosticCode,
    /// Walker depth when the item was raised
    pub depth: usize,
    pub message: String,
    /// Extra lines, e.g. the offending node
    pub context: Vec<String>,
}

impl DiagnosticItem {
    pub fn new(code: DiagnosticCode, depth: usize, message: impl Into<String>) -> Self {
        Self {
            code,
            depth,
            message: message.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for DiagnosticItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} (depth {})",
            self.code,
            self.code.severity(),
            self.message,
            self.depth
        )?;
        for ctx in &self.context {
            write!(f, "\n  - {}", ctx)?;
        }
        Ok(())
    }
}

// =============================================================================
// Diagnostics Collection
// =============================================================================

/// Diagnostics sink for one conversion run
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<DiagnosticItem>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an item and emit it through `tracing`
    pub fn push(&mut self, item: DiagnosticItem) {
        match item.severity() {
            Severity::Error => tracing::error!(code = %item.code, depth = item.depth, "{}", item.message),
            Severity::Warning => tracing::warn!(code = %item.code, depth = item.depth, "{}", item.message),
            Severity::Info => tracing::info!(code = %item.code, depth = item.depth, "{}", item.message),
            Severity::Debug => tracing::debug!(code = %item.code, depth = item.depth, "{}", item.message),
        }
        self.items.push(item);
    }

    /// Object node that renders to nothing
    pub fn object_without_properties(&mut self, depth: usize, node: &serde_json::Value) {
        self.push(
            DiagnosticItem::new(
                DiagnosticCode::ObjectWithoutProperties,
                depth,
                "Missing properties in object",
            )
            .with_context(node.to_string()),
        );
    }

    pub fn pattern_properties(&mut self, depth: usize) {
        self.push(DiagnosticItem::new(
            DiagnosticCode::PatternProperties,
            depth,
            "patternProperties rendered as placeholder",
        ));
    }

    pub fn reference_followed(&mut self, depth: usize, reference: &str) {
        self.push(DiagnosticItem::new(
            DiagnosticCode::ReferenceFollowed,
            depth,
            format!("Resolved {}", reference),
        ));
    }

    pub fn node_rendered(&mut self, depth: usize, type_name: &str) {
        self.push(DiagnosticItem::new(
            DiagnosticCode::NodeRendered,
            depth,
            format!("Rendered {} node", type_name),
        ));
    }

    /// Record a fatal conversion error under the code of its family.
    ///
    /// Not mirrored to `tracing`: the error itself propagates to the caller,
    /// which reports it.
    pub fn failure(&mut self, error: &FormError) {
        let code = match error {
            FormError::Mapping(_) => DiagnosticCode::MappingFailure,
            FormError::Output(_) => DiagnosticCode::OutputFailure,
            _ => DiagnosticCode::SchemaFailure,
        };
        let depth = match error {
            FormError::Parse(parse) => parse.depth,
            _ => 0,
        };
        self.items.push(DiagnosticItem::new(code, depth, error.to_string()));
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|i| i.severity() == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(|i| i.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(|i| i.severity() == Severity::Warning)
    }

    /// Items at or above `level`
    pub fn at_least(&self, level: Severity) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(move |i| i.severity() >= level)
    }

    pub fn all(&self) -> &[DiagnosticItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }
}
