//! Diagnostics, the per-pass sink, and analysis results.

use crate::fix::{Fix, FixError};
use crate::tree::{NodeId, NodeRef, Tree};
use miette::SourceSpan;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{self, Write as _};
use std::path::PathBuf;
use std::sync::Arc;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail a check.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path.
    pub file: PathBuf,
    /// Line number (1-indexed, 0 when unknown).
    pub line: usize,
    /// Column number (1-indexed, 0 when unknown).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// A problem reported by an inspection.
///
/// Once appended to a [`DiagnosticSink`] a diagnostic is only handed out by
/// shared reference.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Short name of the reporting inspection.
    pub rule: &'static str,
    /// Stable id of the reporting inspection.
    pub id: &'static str,
    /// Severity after configuration overrides.
    pub severity: Severity,
    /// Node the problem is anchored at.
    pub anchor: NodeId,
    /// Resolved source location of the anchor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Rendered message.
    pub message: String,
    /// Optional automatic fix.
    #[serde(serialize_with = "serialize_fix", skip_serializing_if = "Option::is_none")]
    pub fix: Option<Arc<dyn Fix>>,
    /// The fix is only offered in interactive sessions.
    pub fix_only_interactive: bool,
}

#[allow(clippy::ref_option)]
fn serialize_fix<S: Serializer>(fix: &Option<Arc<dyn Fix>>, serializer: S) -> Result<S::Ok, S::Error> {
    match fix {
        Some(fix) => serializer.serialize_some(&fix.name()),
        None => serializer.serialize_none(),
    }
}

impl PartialEq for Diagnostic {
    fn eq(&self, other: &Self) -> bool {
        self.rule == other.rule
            && self.id == other.id
            && self.severity == other.severity
            && self.anchor == other.anchor
            && self.location == other.location
            && self.message == other.message
            && self.fix_only_interactive == other.fix_only_interactive
            && self.fix_name() == other.fix_name()
    }
}

impl Diagnostic {
    /// Name of the attached fix, if any.
    #[must_use]
    pub fn fix_name(&self) -> Option<String> {
        self.fix.as_ref().map(|f| f.name())
    }

    /// Applies the attached fix to `tree`.
    ///
    /// # Errors
    ///
    /// Returns [`FixError::NoFix`] when nothing is attached, or whatever the
    /// fix itself reports.
    pub fn apply_fix(&self, tree: &mut Tree) -> Result<(), FixError> {
        let fix = self.fix.as_ref().ok_or(FixError::NoFix)?;
        fix.apply(tree, self.anchor)
    }

    /// Formats the diagnostic for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        let mut output = match &self.location {
            Some(location) => format!("{} {} at {location}\n", self.id, self.rule),
            None => format!("{} {} at node {}\n", self.id, self.rule, self.anchor),
        };
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(name) = self.fix_name() {
            let _ = writeln!(output, "  = fix: {name}");
        }
        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{location}: ")?,
            None => write!(f, "{}: ", self.anchor)?,
        }
        write!(f, "{} [{}] {}", self.severity, self.rule, self.message)
    }
}

/// Expands a message template for `anchor`.
///
/// `#ref` becomes the anchor's reference text. `#loc` is dropped because the
/// location travels with the diagnostic.
#[must_use]
pub fn render_template(template: &str, anchor: NodeRef<'_>) -> String {
    let message = if template.contains("#ref") {
        template.replace("#ref", &anchor.ref_text())
    } else {
        template.to_string()
    };
    message.replace("#loc", "").trim_end().to_string()
}

/// Append-only collector for one pass.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic. No deduplication, no reordering.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::trace!("{} reported at {}", diagnostic.rule, diagnostic.anchor);
        self.diagnostics.push(diagnostic);
    }

    /// Diagnostics in report order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Consumes the sink.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// A (rule, scope) pass that panicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassFailure {
    /// Short name of the failing inspection.
    pub rule: &'static str,
    /// Root node of the scope.
    pub scope: NodeId,
    /// Panic payload, when it was a string.
    pub message: String,
}

/// Result of analyzing one or more trees.
#[derive(Debug, Default, Serialize)]
pub struct AnalysisResult {
    /// All diagnostics, pass by pass.
    pub diagnostics: Vec<Diagnostic>,
    /// Isolated pass failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<PassFailure>,
    /// Number of (rule, scope) passes run.
    pub passes: usize,
    /// Number of trees analyzed.
    pub files_checked: usize,
    /// Analysis stopped early on request.
    pub cancelled: bool,
}

impl AnalysisResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Checks if any diagnostic meets or exceeds the given severity.
    #[must_use]
    pub fn has_diagnostics_at(&self, severity: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= severity)
    }

    /// Counts diagnostics by severity as (errors, warnings, infos).
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| {
            self.diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Diagnostics reported by one inspection.
    pub fn by_rule<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.rule == rule)
    }

    /// Merges another result into this one.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        self.failures.extend(other.failures);
        self.passes += other.passes;
        self.files_checked += other.files_checked;
        self.cancelled |= other.cancelled;
    }
}

/// Converts a [`Diagnostic`] to a miette diagnostic for rich error display.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
pub struct DiagnosticReport {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: Option<SourceSpan>,
    label_message: String,
}

impl From<&Diagnostic> for DiagnosticReport {
    fn from(d: &Diagnostic) -> Self {
        let location = d
            .location
            .as_ref()
            .map_or_else(|| d.anchor.to_string(), ToString::to_string);
        Self {
            message: format!("[{}] {} ({location})", d.rule, d.message),
            help: d.fix_name().map(|name| format!("fix available: {name}")),
            span: d
                .location
                .as_ref()
                .map(|l| SourceSpan::from((l.offset, l.length))),
            label_message: d.rule.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NodeKind, NodeSpec};
    use insta::assert_snapshot;

    #[derive(Debug)]
    struct Noop;

    impl Fix for Noop {
        fn name(&self) -> String {
            "Do nothing".into()
        }

        fn apply(&self, _tree: &mut Tree, _anchor: NodeId) -> Result<(), FixError> {
            Ok(())
        }
    }

    fn make(severity: Severity, fix: Option<Arc<dyn Fix>>) -> Diagnostic {
        Diagnostic {
            rule: "InfiniteLoopStatement",
            id: "InfiniteLoopStatement",
            severity,
            anchor: Tree::new(NodeSpec::file()).root().id(),
            location: Some(Location::new(PathBuf::from("A.java"), 3, 9)),
            message: "for statement cannot complete without throwing an exception".into(),
            fix,
            fix_only_interactive: false,
        }
    }

    #[test]
    fn template_expands_ref_and_drops_loc() {
        let tree = Tree::new(NodeSpec::file().child(NodeSpec::new(NodeKind::ForStatement)));
        let anchor = tree.root().children().next().unwrap();
        let message = render_template(
            "#ref statement cannot complete without throwing an exception #loc",
            anchor,
        );
        assert_snapshot!(message, @"for statement cannot complete without throwing an exception");
    }

    #[test]
    fn display_is_one_line() {
        let d = make(Severity::Warning, None);
        assert_snapshot!(d.to_string(), @"A.java:3:9: warning [InfiniteLoopStatement] for statement cannot complete without throwing an exception");
    }

    #[test]
    fn format_mentions_fix() {
        let d = make(Severity::Error, Some(Arc::new(Noop)));
        assert!(d.format().contains("= fix: Do nothing"));
        assert!(!make(Severity::Error, None).format().contains("fix"));
    }

    #[test]
    fn apply_fix_without_fix_fails() {
        let mut tree = Tree::new(NodeSpec::file());
        let d = make(Severity::Info, None);
        assert!(matches!(d.apply_fix(&mut tree), Err(FixError::NoFix)));
    }

    #[test]
    fn equality_compares_fix_names() {
        let a = make(Severity::Warning, Some(Arc::new(Noop)));
        let b = make(Severity::Warning, Some(Arc::new(Noop)));
        assert_eq!(a, b);
        assert_ne!(a, make(Severity::Warning, None));
    }

    #[test]
    fn json_carries_fix_name() {
        let d = make(Severity::Warning, Some(Arc::new(Noop)));
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["fix"], "Do nothing");
        assert_eq!(json["severity"], "warning");
    }

    #[test]
    fn counts_by_severity() {
        let mut result = AnalysisResult::new();
        result.diagnostics.push(make(Severity::Warning, None));
        result.diagnostics.push(make(Severity::Error, None));
        result.diagnostics.push(make(Severity::Error, None));
        assert_eq!(result.count_by_severity(), (2, 1, 0));
        assert!(result.has_errors());
        assert!(result.has_diagnostics_at(Severity::Warning));

        let mut other = AnalysisResult::new();
        other.cancelled = true;
        other.files_checked = 1;
        result.extend(other);
        assert!(result.cancelled);
        assert_eq!(result.files_checked, 1);
    }
}
