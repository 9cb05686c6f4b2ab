//! Metric inspection for anonymous classes with too many methods.
//!
//! # Rationale
//!
//! Anonymous classes are meant to be short. Once they grow several methods
//! a named inner class reads better and can be tested on its own.
//!
//! # Detected Patterns
//!
//! Anonymous classes declaring more non-constructor methods than the limit.
//! The problem is anchored on the base class reference.
//!
//! # Configuration
//!
//! - `limit`: Method count limit (default: 1)

use crate::fixes::MoveAnonymousToInnerClassFix;
use crate::groups;
use gadgets_core::visit::Visit;
use gadgets_core::{
    Fix, Inspection, MetricInspection, NodeKind, NodeRef, Reporter, Role, RuleConfig, ScopeKind,
    Threshold,
};
use std::sync::Arc;

/// Default method count limit.
pub const DEFAULT_LIMIT: usize = 1;

/// Reports anonymous classes with more methods than the limit.
#[derive(Debug, Clone)]
pub struct AnonymousClassMethodCountInspection {
    threshold: Threshold,
}

impl Default for AnonymousClassMethodCountInspection {
    fn default() -> Self {
        Self::new()
    }
}

impl AnonymousClassMethodCountInspection {
    /// Creates the inspection with the default limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            threshold: Threshold::new(DEFAULT_LIMIT),
        }
    }

    /// Sets the method count limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.threshold.set_limit(limit);
        self
    }
}

fn method_count(class: NodeRef<'_>) -> usize {
    class
        .children_of_kind(NodeKind::Method)
        .filter(|m| !m.is_constructor())
        .count()
}

impl Inspection for AnonymousClassMethodCountInspection {
    fn id(&self) -> &'static str {
        "AnonymousInnerClassWithTooManyMethods"
    }

    fn display_name(&self) -> &'static str {
        "Anonymous inner class with too many methods"
    }

    fn group_display_name(&self) -> &'static str {
        groups::CLASS_METRICS
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Class]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(MethodCountVisitor {
            reporter,
            rule: self,
        })
    }

    fn build_error_message(&self, anchor: NodeRef<'_>) -> String {
        let count = anchor.parent().map_or(0, method_count);
        format!("Anonymous inner class with too many methods (method count = {count}) #loc")
    }

    fn build_fix(&self, _anchor: NodeRef<'_>) -> Option<Arc<dyn Fix>> {
        Some(Arc::new(MoveAnonymousToInnerClassFix))
    }

    fn quick_fixes_only_when_interactive(&self) -> bool {
        true
    }

    fn has_fix(&self) -> bool {
        true
    }

    fn configure(&mut self, config: &RuleConfig) {
        let name = self.short_name();
        self.threshold.configure(name, config);
    }

    fn as_metric(&self) -> Option<&dyn MetricInspection> {
        Some(self)
    }
}

impl MetricInspection for AnonymousClassMethodCountInspection {
    fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    fn configuration_label(&self) -> &'static str {
        "Method count limit:"
    }
}

struct MethodCountVisitor<'a> {
    reporter: Reporter<'a>,
    rule: &'a AnonymousClassMethodCountInspection,
}

impl<'a> Visit<'a> for MethodCountVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    fn visit_class(&mut self, _class: NodeRef<'a>) {}

    fn visit_anonymous_class(&mut self, class: NodeRef<'a>) {
        if !self.rule.exceeds_limit(method_count(class)) {
            return;
        }
        if let Some(base) = class.child_with_role(Role::BaseClass) {
            self.reporter.register_error(base);
        }
    }
}
