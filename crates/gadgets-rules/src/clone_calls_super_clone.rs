//! Inspection for `clone()` implementations that skip `super.clone()`.
//!
//! # Rationale
//!
//! Only `Object.clone()` creates an instance of the right runtime class.
//! A `clone()` that builds its copy with `new` breaks for every subclass.

use crate::groups;
use gadgets_core::visit::{walk, Visit};
use gadgets_core::{ClassKind, Inspection, Modifier, NodeKind, NodeRef, Reporter, Role, ScopeKind};

/// Reports `clone()` methods that never call `super.clone()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloneCallsSuperCloneInspection;

impl CloneCallsSuperCloneInspection {
    /// Creates the inspection.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_clone_implementation(method: NodeRef<'_>) -> bool {
    method.name() == Some("clone")
        && !method.has_modifier(Modifier::Abstract)
        && method.children_of_kind(NodeKind::Parameter).next().is_none()
        && method.parent().is_some_and(|class| {
            class.kind().is_class_like()
                && !matches!(class.class_kind(), ClassKind::Interface | ClassKind::Annotation)
        })
}

fn is_super_clone(call: NodeRef<'_>) -> bool {
    call.kind() == NodeKind::MethodCall
        && call.name() == Some("clone")
        && call
            .child_with_role(Role::Qualifier)
            .is_some_and(|q| q.strip_parentheses().kind() == NodeKind::SuperExpression)
}

/// Searches a method body for `super.clone()`, skipping nested classes.
struct SuperCloneFinder {
    found: bool,
}

impl<'t> Visit<'t> for SuperCloneFinder {
    fn should_continue(&self) -> bool {
        !self.found
    }

    fn visit_class(&mut self, _class: NodeRef<'t>) {}

    fn visit_method_call(&mut self, call: NodeRef<'t>) {
        if is_super_clone(call) {
            self.found = true;
            return;
        }
        walk(self, call);
    }
}

impl Inspection for CloneCallsSuperCloneInspection {
    fn id(&self) -> &'static str {
        "CloneDoesntCallSuperClone"
    }

    fn display_name(&self) -> &'static str {
        "'clone()' doesn't call 'super.clone()'"
    }

    fn group_display_name(&self) -> &'static str {
        groups::CLONEABLE
    }

    fn is_enabled_by_default(&self) -> bool {
        true
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Method]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(CloneVisitor { reporter })
    }

    fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
        "#ref() doesn't call super.clone()".into()
    }
}

struct CloneVisitor<'a> {
    reporter: Reporter<'a>,
}

impl<'a> Visit<'a> for CloneVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    // no walk: clone methods of nested classes are scopes of their own
    fn visit_method(&mut self, method: NodeRef<'a>) {
        if !is_clone_implementation(method) {
            return;
        }
        let mut finder = SuperCloneFinder { found: false };
        walk(&mut finder, method);
        if !finder.found {
            self.reporter.register_error(method);
        }
    }
}
