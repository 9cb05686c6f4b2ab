//! Metric inspection counting the exit points of a method.
//!
//! # Rationale
//!
//! Methods with many exits are harder to follow and to instrument.
//!
//! # Detected Patterns
//!
//! Every explicit `return` counts, except those in nested classes. Falling off
//! the end of a `void` method or constructor counts as one more exit when the
//! body is empty or its last statement can complete normally.
//!
//! # Configuration
//!
//! - `limit`: Return point limit (default: 1)

use crate::groups;
use gadgets_core::flow::can_complete_normally;
use gadgets_core::visit::Visit;
use gadgets_core::{
    Inspection, MetricInspection, NodeKind, NodeRef, Reporter, RuleConfig, ScopeKind, Threshold,
};

/// Default return point limit.
pub const DEFAULT_LIMIT: usize = 1;

/// Reports methods with more return points than the limit.
#[derive(Debug, Clone)]
pub struct MultipleReturnPointsPerMethodInspection {
    threshold: Threshold,
}

impl Default for MultipleReturnPointsPerMethodInspection {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipleReturnPointsPerMethodInspection {
    /// Creates the inspection with the default limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            threshold: Threshold::new(DEFAULT_LIMIT),
        }
    }

    /// Sets the return point limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.threshold.set_limit(limit);
        self
    }

    /// Number of return points of `method`.
    #[must_use]
    pub fn return_point_count(method: NodeRef<'_>) -> usize {
        let explicit = method.body().map_or(0, count_returns);
        if may_fall_through_bottom(method) {
            explicit + 1
        } else {
            explicit
        }
    }
}

fn count_returns(node: NodeRef<'_>) -> usize {
    node.children()
        .map(|child| match child.kind() {
            NodeKind::ReturnStatement => 1,
            NodeKind::Class | NodeKind::AnonymousClass => 0,
            _ => count_returns(child),
        })
        .sum()
}

fn may_fall_through_bottom(method: NodeRef<'_>) -> bool {
    let returns_nothing =
        method.is_constructor() || method.attrs().return_type.as_deref() == Some("void");
    if !returns_nothing {
        return false;
    }
    let Some(body) = method.body() else {
        return false;
    };
    body.statements().last().map_or(true, can_complete_normally)
}

impl Inspection for MultipleReturnPointsPerMethodInspection {
    fn id(&self) -> &'static str {
        "MethodWithMultipleReturnPoints"
    }

    fn display_name(&self) -> &'static str {
        "Method with multiple return points."
    }

    fn group_display_name(&self) -> &'static str {
        groups::METHOD_METRICS
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Method]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(ReturnPointsVisitor {
            reporter,
            rule: self,
        })
    }

    fn build_error_message(&self, anchor: NodeRef<'_>) -> String {
        let count = Self::return_point_count(anchor);
        format!("#ref has {count} return points #loc")
    }

    fn configure(&mut self, config: &RuleConfig) {
        let name = self.short_name();
        self.threshold.configure(name, config);
    }

    fn as_metric(&self) -> Option<&dyn MetricInspection> {
        Some(self)
    }
}

impl MetricInspection for MultipleReturnPointsPerMethodInspection {
    fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    fn configuration_label(&self) -> &'static str {
        "Return point limit:"
    }
}

struct ReturnPointsVisitor<'a> {
    reporter: Reporter<'a>,
    rule: &'a MultipleReturnPointsPerMethodInspection,
}

impl<'a> Visit<'a> for ReturnPointsVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    // no walk: methods of nested classes are scopes of their own
    fn visit_method(&mut self, method: NodeRef<'a>) {
        let count = MultipleReturnPointsPerMethodInspection::return_point_count(method);
        if self.rule.exceeds_limit(count) {
            self.reporter.register_error(method);
        }
    }
}
