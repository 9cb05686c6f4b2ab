//! Reference scheduler: runs enabled inspections over every scope of a tree.

use crate::config::{Config, ConfigError, RuleConfig};
use crate::diagnostic::{AnalysisResult, DiagnosticSink, PassFailure, Severity};
use crate::instrument::Instrumented;
use crate::rule::{CancelFlag, Inspection, InspectionBox, PassOptions, Scope};
use crate::telemetry::{ProcessTelemetry, TelemetrySettings};
use crate::tree::Tree;

use std::any::Any;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that can occur while setting up an analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Two inspections share a short name.
    #[error("Duplicate inspection short name: {0}")]
    DuplicateShortName(String),

    /// A requested inspection is not registered.
    #[error("Unknown inspection: {0}")]
    UnknownInspection(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    inspections: Vec<InspectionBox>,
    config: Option<Config>,
    interactive: Option<bool>,
    cancel: Option<CancelFlag>,
    telemetry: Option<Arc<dyn TelemetrySettings>>,
    enable_all: bool,
    only: Option<Vec<String>>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an inspection.
    #[must_use]
    pub fn inspection<I: Inspection + 'static>(mut self, inspection: I) -> Self {
        self.inspections.push(Box::new(inspection));
        self
    }

    /// Adds a boxed inspection.
    #[must_use]
    pub fn inspection_box(mut self, inspection: InspectionBox) -> Self {
        self.inspections.push(inspection);
        self
    }

    /// Adds several boxed inspections.
    #[must_use]
    pub fn inspections(mut self, inspections: impl IntoIterator<Item = InspectionBox>) -> Self {
        self.inspections.extend(inspections);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the interactive flag from the configuration.
    #[must_use]
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = Some(interactive);
        self
    }

    /// Shares a cancellation flag with the caller.
    #[must_use]
    pub fn cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Sets the telemetry settings (default: [`ProcessTelemetry`]).
    #[must_use]
    pub fn telemetry_settings(mut self, settings: Arc<dyn TelemetrySettings>) -> Self {
        self.telemetry = Some(settings);
        self
    }

    /// Enables every inspection not explicitly disabled by configuration.
    #[must_use]
    pub fn enable_all(mut self, enable: bool) -> Self {
        self.enable_all = enable;
        self
    }

    /// Runs only the named inspections (short names or ids).
    #[must_use]
    pub fn only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if two inspections share a short name, or if
    /// [`AnalyzerBuilder::only`] names an unknown inspection.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let mut seen = HashSet::new();
        for inspection in &self.inspections {
            if !seen.insert(inspection.short_name()) {
                return Err(AnalyzerError::DuplicateShortName(
                    inspection.short_name().to_string(),
                ));
            }
        }
        if let Some(only) = &self.only {
            for name in only {
                let known = self
                    .inspections
                    .iter()
                    .any(|i| i.short_name() == name || i.id() == name);
                if !known {
                    return Err(AnalyzerError::UnknownInspection(name.clone()));
                }
            }
        }

        let config = self.config.unwrap_or_default();
        let settings = self
            .telemetry
            .unwrap_or_else(|| Arc::new(ProcessTelemetry));
        let entries = self
            .inspections
            .into_iter()
            .map(|inspection| Entry {
                wrapper: Instrumented::new(inspection, Arc::clone(&settings)),
                enabled: false,
                severity: None,
            })
            .collect();

        let mut analyzer = Analyzer {
            entries,
            interactive: self.interactive.unwrap_or(config.analyzer.interactive),
            cancel: self.cancel.unwrap_or_default(),
            settings,
            enable_all: self.enable_all,
            only: self.only,
        };
        analyzer.reconfigure(&config);
        Ok(analyzer)
    }
}

struct Entry {
    wrapper: Instrumented,
    enabled: bool,
    severity: Option<Severity>,
}

/// Runs inspections over trees.
///
/// Every (inspection, scope) pass gets its own sink and runs through an
/// [`Instrumented`] wrapper. A pass that panics is isolated: its partial
/// diagnostics are kept, a [`PassFailure`] is recorded and analysis goes on.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    entries: Vec<Entry>,
    interactive: bool,
    cancel: CancelFlag,
    settings: Arc<dyn TelemetrySettings>,
    enable_all: bool,
    only: Option<Vec<String>>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("rules", &self.rule_count())
            .field("enabled", &self.enabled_count())
            .field("interactive", &self.interactive)
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Re-applies configuration: options, enabled flags and severities.
    pub fn reconfigure(&mut self, config: &Config) {
        let default_section = RuleConfig::default();
        for entry in &mut self.entries {
            let inspection = entry.wrapper.inspection_mut();
            let (short_name, id) = (inspection.short_name(), inspection.id());
            inspection.configure(config.rule_config(short_name, id).unwrap_or(&default_section));

            entry.enabled = match &self.only {
                Some(only) => only.iter().any(|n| n == short_name || n == id),
                None => config
                    .rule_enabled(short_name, id)
                    .unwrap_or(self.enable_all || inspection.is_enabled_by_default()),
            };
            entry.severity = config.rule_severity(short_name, id);
            debug!(
                "{}: {}",
                short_name,
                if entry.enabled { "enabled" } else { "disabled" }
            );
        }
    }

    /// Returns the number of registered inspections.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of enabled inspections.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.entries.iter().filter(|e| e.enabled).count()
    }

    /// All registered inspections.
    pub fn inspections(&self) -> impl Iterator<Item = &dyn Inspection> {
        self.entries.iter().map(|e| e.wrapper.inspection())
    }

    /// Enabled inspections.
    pub fn enabled_inspections(&self) -> impl Iterator<Item = &dyn Inspection> {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.wrapper.inspection())
    }

    /// Whether passes run as an interactive session.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Cancellation flag checked between passes and node visits.
    #[must_use]
    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    /// Telemetry settings shared by every wrapper.
    #[must_use]
    pub fn telemetry_settings(&self) -> &Arc<dyn TelemetrySettings> {
        &self.settings
    }

    /// Analyzes one tree.
    #[must_use]
    pub fn analyze(&self, tree: &Tree) -> AnalysisResult {
        let mut result = AnalysisResult::new();
        let file = tree
            .path()
            .map_or_else(|| "<memory>".to_string(), |p| p.display().to_string());

        'rules: for entry in self.entries.iter().filter(|e| e.enabled) {
            let inspection = entry.wrapper.inspection();
            let options = PassOptions {
                interactive: self.interactive,
                severity: entry.severity,
                cancel: Some(self.cancel.clone()),
            };
            for scope in Scope::collect(tree, inspection.scope_kinds()) {
                if self.cancel.is_cancelled() {
                    info!("Analysis of {} cancelled", file);
                    result.cancelled = true;
                    break 'rules;
                }
                let mut sink = DiagnosticSink::new();
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    entry.wrapper.run(tree, scope, &mut sink, &options);
                }));
                result.passes += 1;
                result.diagnostics.extend(sink.into_diagnostics());
                if let Err(payload) = outcome {
                    let message = panic_message(payload.as_ref());
                    error!(
                        "{} failed on {} at {}: {}",
                        inspection.short_name(),
                        file,
                        scope.root,
                        message
                    );
                    result.failures.push(PassFailure {
                        rule: inspection.short_name(),
                        scope: scope.root,
                        message,
                    });
                }
            }
        }
        // a pass may have stopped its walk early after the last between-pass check
        if !result.cancelled && self.cancel.is_cancelled() {
            info!("Analysis of {} cancelled", file);
            result.cancelled = true;
        }

        result.files_checked = 1;
        info!(
            "Analyzed {}: {} diagnostic(s) from {} pass(es)",
            file,
            result.diagnostics.len(),
            result.passes
        );
        result
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "pass panicked".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Reporter, ScopeKind};
    use crate::telemetry::LocalTelemetry;
    use crate::tree::{NodeRef, NodeSpec};
    use crate::visit::{walk, Visit};

    /// Reports every method; panics on methods named `boom` after reporting.
    #[derive(Default)]
    struct EveryMethodInspection;

    struct EveryMethodVisitor<'a> {
        reporter: Reporter<'a>,
    }

    impl<'a> Visit<'a> for EveryMethodVisitor<'a> {
        fn visit_class(&mut self, _class: NodeRef<'a>) {}

        fn visit_method(&mut self, method: NodeRef<'a>) {
            self.reporter.register_error(method);
            assert!(method.name() != Some("boom"), "cannot handle boom");
            walk(self, method);
        }
    }

    impl Inspection for EveryMethodInspection {
        fn display_name(&self) -> &'static str {
            "Every method"
        }

        fn group_display_name(&self) -> &'static str {
            "Test"
        }

        fn is_enabled_by_default(&self) -> bool {
            true
        }

        fn scope_kinds(&self) -> &'static [ScopeKind] {
            &[ScopeKind::Method]
        }

        fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
            Box::new(EveryMethodVisitor { reporter })
        }

        fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
            "Method #ref".into()
        }
    }

    #[derive(Default)]
    struct OffByDefaultInspection;

    impl Inspection for OffByDefaultInspection {
        fn display_name(&self) -> &'static str {
            "Off"
        }

        fn group_display_name(&self) -> &'static str {
            "Test"
        }

        fn scope_kinds(&self) -> &'static [ScopeKind] {
            &[ScopeKind::Class]
        }

        fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
            Box::new(EveryMethodVisitor { reporter })
        }

        fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
            String::new()
        }
    }

    fn tree() -> Tree {
        Tree::new(
            NodeSpec::file().child(
                NodeSpec::class("A")
                    .child(NodeSpec::method("first").child(NodeSpec::code_block()))
                    .child(NodeSpec::method("boom").child(NodeSpec::code_block()))
                    .child(NodeSpec::method("last").child(NodeSpec::code_block())),
            ),
        )
    }

    fn analyzer() -> Analyzer {
        Analyzer::builder()
            .inspection(EveryMethodInspection)
            .inspection(OffByDefaultInspection)
            .telemetry_settings(Arc::new(LocalTelemetry::new()))
            .build()
            .unwrap()
    }

    #[test]
    fn duplicate_short_names_are_rejected() {
        let err = Analyzer::builder()
            .inspection(EveryMethodInspection)
            .inspection(EveryMethodInspection)
            .build()
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::DuplicateShortName(name) if name == "EveryMethod"));
    }

    #[test]
    fn unknown_only_names_are_rejected() {
        let err = Analyzer::builder()
            .inspection(EveryMethodInspection)
            .only(["Missing"])
            .build()
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::UnknownInspection(_)));
    }

    #[test]
    fn default_enablement_follows_inspection() {
        let analyzer = analyzer();
        assert_eq!(analyzer.rule_count(), 2);
        let enabled: Vec<&str> = analyzer.enabled_inspections().map(|i| i.short_name()).collect();
        assert_eq!(enabled, vec!["EveryMethod"]);
    }

    #[test]
    fn config_overrides_enablement_and_severity() {
        let config = Config::parse(
            r#"
[rules.EveryMethod]
enabled = false

[rules.OffByDefault]
enabled = true
severity = "error"
"#,
        )
        .unwrap();
        let mut analyzer = analyzer();
        analyzer.reconfigure(&config);
        let enabled: Vec<&str> = analyzer.enabled_inspections().map(|i| i.short_name()).collect();
        assert_eq!(enabled, vec!["OffByDefault"]);
    }

    #[test]
    fn panicking_pass_is_isolated() {
        let tree = tree();
        let result = analyzer().analyze(&tree);
        assert_eq!(result.passes, 3);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].message, "cannot handle boom");
        // the failing pass keeps what it reported before panicking
        let names: Vec<&str> = result.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(names, vec!["Method first", "Method boom", "Method last"]);
    }

    #[test]
    fn cancellation_stops_between_passes() {
        let cancel = CancelFlag::new();
        let analyzer = Analyzer::builder()
            .inspection(EveryMethodInspection)
            .cancel_flag(cancel.clone())
            .telemetry_settings(Arc::new(LocalTelemetry::new()))
            .build()
            .unwrap();
        cancel.cancel();
        let result = analyzer.analyze(&tree());
        assert!(result.cancelled);
        assert_eq!(result.passes, 0);
        assert!(result.diagnostics.is_empty());
    }

    /// Reports every `return` and cancels the run at the first one.
    struct CancelOnReturnInspection {
        cancel: CancelFlag,
    }

    struct CancelOnReturnVisitor<'a> {
        reporter: Reporter<'a>,
        cancel: &'a CancelFlag,
    }

    impl<'a> Visit<'a> for CancelOnReturnVisitor<'a> {
        fn should_continue(&self) -> bool {
            self.reporter.should_continue()
        }

        fn visit_return_statement(&mut self, statement: NodeRef<'a>) {
            self.reporter.register_error(statement);
            self.cancel.cancel();
        }
    }

    impl Inspection for CancelOnReturnInspection {
        fn display_name(&self) -> &'static str {
            "Cancel on return"
        }

        fn group_display_name(&self) -> &'static str {
            "Test"
        }

        fn is_enabled_by_default(&self) -> bool {
            true
        }

        fn scope_kinds(&self) -> &'static [ScopeKind] {
            &[ScopeKind::Method]
        }

        fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
            Box::new(CancelOnReturnVisitor {
                reporter,
                cancel: &self.cancel,
            })
        }

        fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
            "Return".into()
        }
    }

    #[test]
    fn cancellation_inside_the_last_pass_is_reported() {
        let cancel = CancelFlag::new();
        let analyzer = Analyzer::builder()
            .inspection(CancelOnReturnInspection {
                cancel: cancel.clone(),
            })
            .cancel_flag(cancel)
            .telemetry_settings(Arc::new(LocalTelemetry::new()))
            .build()
            .unwrap();
        let tree = Tree::new(
            NodeSpec::file().child(
                NodeSpec::class("A").child(
                    NodeSpec::method("m").child(
                        NodeSpec::code_block()
                            .child(NodeSpec::return_statement())
                            .child(NodeSpec::return_statement())
                            .child(NodeSpec::return_statement()),
                    ),
                ),
            ),
        );

        let result = analyzer.analyze(&tree);
        assert_eq!(result.passes, 1);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.cancelled);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let tree = tree();
        let analyzer = analyzer();
        let first = analyzer.analyze(&tree);
        let second = analyzer.analyze(&tree);
        assert_eq!(first.diagnostics, second.diagnostics);
    }
}
