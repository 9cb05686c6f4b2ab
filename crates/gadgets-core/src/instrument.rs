//! Execution wrapper adding timing telemetry around passes.

use crate::diagnostic::DiagnosticSink;
use crate::rule::{check_scope, Inspection, PassOptions, Scope};
use crate::telemetry::{Telemetry, TelemetrySettings};
use crate::tree::Tree;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Runs an inspection and records one telemetry sample per run when timing
/// is enabled.
///
/// The settings are consulted once per wrapper, on its first run. Every later
/// run reuses that answer, whatever the scope kind.
pub struct Instrumented {
    inspection: Box<dyn Inspection>,
    settings: Arc<dyn TelemetrySettings>,
    resolved: OnceLock<Option<Arc<Telemetry>>>,
}

impl fmt::Debug for Instrumented {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumented")
            .field("inspection", &self.inspection.short_name())
            .field("resolved", &self.resolved.get().map(Option::is_some))
            .finish_non_exhaustive()
    }
}

impl Instrumented {
    /// Wraps an inspection.
    #[must_use]
    pub fn new(inspection: Box<dyn Inspection>, settings: Arc<dyn TelemetrySettings>) -> Self {
        Self {
            inspection,
            settings,
            resolved: OnceLock::new(),
        }
    }

    /// The wrapped inspection.
    #[must_use]
    pub fn inspection(&self) -> &dyn Inspection {
        self.inspection.as_ref()
    }

    /// Exclusive access for configuration. Forgets the resolved telemetry so
    /// the next run consults the settings again.
    pub fn inspection_mut(&mut self) -> &mut dyn Inspection {
        self.resolved = OnceLock::new();
        self.inspection.as_mut()
    }

    fn telemetry(&self) -> Option<&Arc<Telemetry>> {
        self.resolved
            .get_or_init(|| {
                let enabled = self.settings.telemetry_enabled();
                tracing::debug!(
                    "{}: telemetry {}",
                    self.inspection.short_name(),
                    if enabled { "enabled" } else { "disabled" }
                );
                enabled.then(|| self.settings.telemetry())
            })
            .as_ref()
    }

    /// Runs one pass. A panicking pass still records its sample and the
    /// panic continues to the caller.
    pub fn run(&self, tree: &Tree, scope: Scope, sink: &mut DiagnosticSink, options: &PassOptions) {
        match self.telemetry() {
            Some(telemetry) => {
                let _guard = telemetry.start(self.inspection.display_name());
                check_scope(self.inspection.as_ref(), tree, scope, sink, options);
            }
            None => check_scope(self.inspection.as_ref(), tree, scope, sink, options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Reporter, ScopeKind};
    use crate::telemetry::{LocalTelemetry, NoTelemetry, ProcessTelemetry};
    use crate::tree::{NodeRef, NodeSpec};
    use crate::visit::Visit;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct Exploding;

    struct ExplodingVisitor;

    impl<'a> Visit<'a> for ExplodingVisitor {
        fn visit_method(&mut self, _method: NodeRef<'a>) {
            panic!("visitor failed");
        }
    }

    impl Inspection for Exploding {
        fn display_name(&self) -> &'static str {
            "Exploding"
        }

        fn group_display_name(&self) -> &'static str {
            "Test"
        }

        fn scope_kinds(&self) -> &'static [ScopeKind] {
            &[ScopeKind::Method]
        }

        fn build_visitor<'a>(&'a self, _reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
            Box::new(ExplodingVisitor)
        }

        fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
            String::new()
        }
    }

    struct Quiet;

    struct QuietVisitor;

    impl Visit<'_> for QuietVisitor {}

    impl Inspection for Quiet {
        fn display_name(&self) -> &'static str {
            "Quiet"
        }

        fn group_display_name(&self) -> &'static str {
            "Test"
        }

        fn scope_kinds(&self) -> &'static [ScopeKind] {
            &[ScopeKind::Class, ScopeKind::Method]
        }

        fn build_visitor<'a>(&'a self, _reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
            Box::new(QuietVisitor)
        }

        fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
            String::new()
        }
    }

    #[derive(Default)]
    struct CountingSettings {
        lookups: AtomicUsize,
        telemetry: Arc<Telemetry>,
    }

    impl TelemetrySettings for CountingSettings {
        fn telemetry_enabled(&self) -> bool {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn telemetry(&self) -> Arc<Telemetry> {
            Arc::clone(&self.telemetry)
        }
    }

    /// Settings whose switch can be flipped while wrappers are alive.
    #[derive(Default)]
    struct SwitchSettings {
        enabled: AtomicBool,
        telemetry: Arc<Telemetry>,
    }

    impl TelemetrySettings for SwitchSettings {
        fn telemetry_enabled(&self) -> bool {
            self.enabled.load(Ordering::SeqCst)
        }

        fn telemetry(&self) -> Arc<Telemetry> {
            Arc::clone(&self.telemetry)
        }
    }

    fn tree() -> Tree {
        Tree::new(NodeSpec::file().child(
            NodeSpec::class("A").child(NodeSpec::method("m").child(NodeSpec::code_block())),
        ))
    }

    #[test]
    fn one_sample_per_run_keyed_by_display_name() {
        let tree = tree();
        let settings = LocalTelemetry::new();
        let wrapper = Instrumented::new(Box::new(Quiet), Arc::new(settings.clone()));
        for scope in Scope::collect(&tree, &[ScopeKind::Class, ScopeKind::Method]) {
            wrapper.run(&tree, scope, &mut DiagnosticSink::new(), &PassOptions::default());
        }
        let samples = settings.collector().samples();
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.rule == "Quiet"));
    }

    #[test]
    fn sample_recorded_when_pass_panics() {
        let tree = tree();
        let settings = LocalTelemetry::new();
        let wrapper = Instrumented::new(Box::new(Exploding), Arc::new(settings.clone()));
        let scope = Scope::collect(&tree, &[ScopeKind::Method])[0];
        let result = catch_unwind(AssertUnwindSafe(|| {
            wrapper.run(&tree, scope, &mut DiagnosticSink::new(), &PassOptions::default());
        }));
        assert!(result.is_err());
        assert_eq!(settings.collector().len(), 1);
    }

    #[test]
    fn disabled_settings_record_nothing() {
        let tree = tree();
        let wrapper = Instrumented::new(Box::new(Quiet), Arc::new(NoTelemetry));
        let scope = Scope::collect(&tree, &[ScopeKind::Class])[0];
        wrapper.run(&tree, scope, &mut DiagnosticSink::new(), &PassOptions::default());
        assert_eq!(wrapper.resolved.get().map(Option::is_some), Some(false));
    }

    #[test]
    fn settings_are_consulted_once() {
        let tree = tree();
        let settings = Arc::new(CountingSettings::default());
        let wrapper = Instrumented::new(Box::new(Quiet), settings.clone());
        for scope in Scope::collect(&tree, &[ScopeKind::Class, ScopeKind::Method]) {
            wrapper.run(&tree, scope, &mut DiagnosticSink::new(), &PassOptions::default());
            wrapper.run(&tree, scope, &mut DiagnosticSink::new(), &PassOptions::default());
        }
        assert_eq!(settings.lookups.load(Ordering::SeqCst), 1);
        assert_eq!(settings.telemetry.len(), 4);
    }

    #[test]
    fn switching_telemetry_off_mid_run_keeps_the_cached_decision() {
        let tree = tree();
        let settings = Arc::new(SwitchSettings::default());
        settings.enabled.store(true, Ordering::SeqCst);
        let wrapper = Instrumented::new(Box::new(Quiet), settings.clone());
        let scopes = Scope::collect(&tree, &[ScopeKind::Class, ScopeKind::Method]);

        wrapper.run(&tree, scopes[0], &mut DiagnosticSink::new(), &PassOptions::default());
        settings.enabled.store(false, Ordering::SeqCst);
        wrapper.run(&tree, scopes[1], &mut DiagnosticSink::new(), &PassOptions::default());

        assert_eq!(settings.telemetry.len(), 2);
    }

    #[test]
    fn reconfiguring_picks_up_the_new_switch() {
        let tree = tree();
        let settings = Arc::new(SwitchSettings::default());
        let mut wrapper = Instrumented::new(Box::new(Quiet), settings.clone());
        let scope = Scope::collect(&tree, &[ScopeKind::Method])[0];

        wrapper.run(&tree, scope, &mut DiagnosticSink::new(), &PassOptions::default());
        settings.enabled.store(true, Ordering::SeqCst);
        wrapper.run(&tree, scope, &mut DiagnosticSink::new(), &PassOptions::default());
        assert!(settings.telemetry.is_empty());

        let _ = wrapper.inspection_mut();
        wrapper.run(&tree, scope, &mut DiagnosticSink::new(), &PassOptions::default());
        assert_eq!(settings.telemetry.len(), 1);

        settings.enabled.store(false, Ordering::SeqCst);
        let _ = wrapper.inspection_mut();
        wrapper.run(&tree, scope, &mut DiagnosticSink::new(), &PassOptions::default());
        assert_eq!(settings.telemetry.len(), 1);
    }

    #[test]
    fn process_switch_can_be_flipped_while_running() {
        let quiet_samples = || {
            ProcessTelemetry::global()
                .samples()
                .iter()
                .filter(|s| s.rule == "Quiet")
                .count()
        };
        let tree = tree();
        let scope = Scope::collect(&tree, &[ScopeKind::Method])[0];
        let mut wrapper = Instrumented::new(Box::new(Quiet), Arc::new(ProcessTelemetry));
        let before = quiet_samples();

        ProcessTelemetry::set_enabled(true);
        wrapper.run(&tree, scope, &mut DiagnosticSink::new(), &PassOptions::default());
        ProcessTelemetry::set_enabled(false);
        wrapper.run(&tree, scope, &mut DiagnosticSink::new(), &PassOptions::default());
        assert_eq!(quiet_samples(), before + 2);

        let _ = wrapper.inspection_mut();
        wrapper.run(&tree, scope, &mut DiagnosticSink::new(), &PassOptions::default());
        assert_eq!(quiet_samples(), before + 2);
        assert!(!ProcessTelemetry::is_enabled());
    }
}
