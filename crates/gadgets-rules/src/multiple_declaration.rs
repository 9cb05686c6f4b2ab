//! Inspection for several variables declared in one statement.
//!
//! # Detected Patterns
//!
//! - `int a, b;` as a local declaration: every variable after the first
//! - `int a, b;` as fields: every field without its own type element
//!
//! The initializer of a `for` loop is exempt.

use crate::fixes::NormalizeDeclarationFix;
use crate::groups;
use gadgets_core::visit::{walk, Visit};
use gadgets_core::{Fix, Inspection, NodeKind, NodeRef, Reporter, Role, ScopeKind};
use std::sync::Arc;

/// Reports declarations introducing more than one variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultipleDeclarationInspection;

impl MultipleDeclarationInspection {
    /// Creates the inspection.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Inspection for MultipleDeclarationInspection {
    fn id(&self) -> &'static str {
        "MultipleVariablesInDeclaration"
    }

    fn display_name(&self) -> &'static str {
        "Multiple variables in one declaration"
    }

    fn group_display_name(&self) -> &'static str {
        groups::STYLE
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Method, ScopeKind::Field]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(MultipleDeclarationVisitor { reporter })
    }

    fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
        "Multiple variables in one declaration #loc".into()
    }

    fn build_fix(&self, _anchor: NodeRef<'_>) -> Option<Arc<dyn Fix>> {
        Some(Arc::new(NormalizeDeclarationFix))
    }

    fn has_fix(&self) -> bool {
        true
    }
}

struct MultipleDeclarationVisitor<'a> {
    reporter: Reporter<'a>,
}

impl<'a> Visit<'a> for MultipleDeclarationVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    fn visit_class(&mut self, _class: NodeRef<'a>) {}

    fn visit_declaration_statement(&mut self, statement: NodeRef<'a>) {
        walk(self, statement);
        let in_for_init = statement.role() == Role::Init
            && statement
                .parent()
                .is_some_and(|p| p.kind() == NodeKind::ForStatement);
        if in_for_init {
            return;
        }
        for variable in statement.children_of_kind(NodeKind::LocalVariable).skip(1) {
            self.reporter.register_error(variable);
        }
    }

    fn visit_field(&mut self, field: NodeRef<'a>) {
        walk(self, field);
        if field.kind() == NodeKind::EnumConstant {
            return;
        }
        if field.children_of_kind(NodeKind::TypeElement).next().is_none() {
            self.reporter.register_error(field);
        }
    }
}
