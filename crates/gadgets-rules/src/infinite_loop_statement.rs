//! Inspection for loops that can only be left by throwing.
//!
//! # Rationale
//!
//! A loop that can neither complete normally nor return forces every caller
//! to wait for an exception. This is almost always an accident.
//!
//! # Detected Patterns
//!
//! - `for (;;) { ... }` without `break` or `return`
//! - `while (true) { ... }` without `break` or `return`
//! - `do { ... } while (true);` without `break` or `return`
//!
//! Loops in nested classes are reported by the pass for that class.

use crate::groups;
use gadgets_core::flow::{can_complete_normally, contains_return};
use gadgets_core::visit::{walk, Visit};
use gadgets_core::{Inspection, NodeRef, Reporter, ScopeKind};

/// Reports loops that cannot complete without throwing.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfiniteLoopStatementInspection;

impl InfiniteLoopStatementInspection {
    /// Creates the inspection.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Inspection for InfiniteLoopStatementInspection {
    fn display_name(&self) -> &'static str {
        "Infinite loop statement"
    }

    fn group_display_name(&self) -> &'static str {
        groups::BUGS
    }

    fn is_enabled_by_default(&self) -> bool {
        true
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Method, ScopeKind::Field]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(InfiniteLoopVisitor { reporter })
    }

    fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
        "#ref statement cannot complete without throwing an exception #loc".into()
    }
}

struct InfiniteLoopVisitor<'a> {
    reporter: Reporter<'a>,
}

impl InfiniteLoopVisitor<'_> {
    fn check_loop(&mut self, statement: NodeRef<'_>) {
        if !can_complete_normally(statement) && !contains_return(statement) {
            self.reporter.register_error(statement);
        }
    }
}

impl<'a> Visit<'a> for InfiniteLoopVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    fn visit_class(&mut self, _class: NodeRef<'a>) {}

    fn visit_for_statement(&mut self, statement: NodeRef<'a>) {
        walk(self, statement);
        self.check_loop(statement);
    }

    fn visit_while_statement(&mut self, statement: NodeRef<'a>) {
        walk(self, statement);
        self.check_loop(statement);
    }

    fn visit_do_while_statement(&mut self, statement: NodeRef<'a>) {
        walk(self, statement);
        self.check_loop(statement);
    }
}
