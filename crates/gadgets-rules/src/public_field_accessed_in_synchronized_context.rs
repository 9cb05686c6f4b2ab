//! Inspection for non-private fields read or written under a lock.
//!
//! # Rationale
//!
//! Synchronizing access to a field that other classes can reach directly
//! protects nothing: they can touch it without taking the lock.
//!
//! # Detected Patterns
//!
//! References to fields that are neither `private` nor `final` inside a
//! `synchronized` method or a `synchronized (...) { }` block.

use crate::groups;
use gadgets_core::visit::{walk, Visit};
use gadgets_core::{
    Inspection, Modifier, NodeRef, Reporter, ScopeKind, ScopedValue, SymbolKind,
};

/// Reports non-private fields accessed in synchronized code.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicFieldAccessedInSynchronizedContextInspection;

impl PublicFieldAccessedInSynchronizedContextInspection {
    /// Creates the inspection.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Inspection for PublicFieldAccessedInSynchronizedContextInspection {
    fn id(&self) -> &'static str {
        "NonPrivateFieldAccessedInSynchronizedContext"
    }

    fn display_name(&self) -> &'static str {
        "Non-private field accessed in synchronized context"
    }

    fn group_display_name(&self) -> &'static str {
        groups::THREADING
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Method]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(SynchronizedFieldVisitor {
            reporter,
            in_synchronized: ScopedValue::new(false),
        })
    }

    fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
        "Non-private field #ref accessed in synchronized context #loc".into()
    }
}

struct SynchronizedFieldVisitor<'a> {
    reporter: Reporter<'a>,
    in_synchronized: ScopedValue<bool>,
}

impl<'a> Visit<'a> for SynchronizedFieldVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    fn visit_class(&mut self, _class: NodeRef<'a>) {}

    fn visit_method(&mut self, method: NodeRef<'a>) {
        let synchronized = method.has_modifier(Modifier::Synchronized);
        let _restore = self.in_synchronized.enter(synchronized);
        walk(self, method);
    }

    fn visit_synchronized_statement(&mut self, statement: NodeRef<'a>) {
        let _restore = self.in_synchronized.enter(true);
        walk(self, statement);
    }

    fn visit_reference_expression(&mut self, reference: NodeRef<'a>) {
        walk(self, reference);
        if !self.in_synchronized.get() {
            return;
        }
        let Some(target) = reference.resolve() else {
            return;
        };
        let exposed = target.kind() == Some(SymbolKind::Field)
            && !target.has_modifier(Modifier::Private)
            && !target.has_modifier(Modifier::Final);
        if exposed {
            self.reporter.register_error(reference);
        }
    }
}
