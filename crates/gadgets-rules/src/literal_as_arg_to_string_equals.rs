//! Inspection for string literals passed to `equals` instead of receiving it.
//!
//! # Rationale
//!
//! `"literal".equals(value)` cannot throw when `value` is null, while
//! `value.equals("literal")` can.
//!
//! # Detected Patterns
//!
//! - `name.equals("admin")`
//! - `name.equalsIgnoreCase("admin")`

use crate::groups;
use gadgets_core::visit::{walk, Visit};
use gadgets_core::{
    Fix, FixError, Inspection, NodeId, NodeKind, NodeRef, Reporter, Role, ScopeKind, Tree,
};
use std::sync::Arc;

const EQUALS_METHODS: &[&str] = &["equals", "equalsIgnoreCase"];
const STRING_TYPES: &[&str] = &["java.lang.String", "String"];

/// Reports `x.equals("literal")`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralAsArgToStringEqualsInspection;

impl LiteralAsArgToStringEqualsInspection {
    /// Creates the inspection.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Target and single literal argument of a matching call.
fn call_parts(call: NodeRef<'_>) -> Option<(NodeRef<'_>, NodeRef<'_>)> {
    if !call.name().is_some_and(|n| EQUALS_METHODS.contains(&n)) {
        return None;
    }
    let mut arguments = call.children_with_role(Role::Argument);
    let argument = arguments.next()?;
    if arguments.next().is_some() {
        return None;
    }
    let is_string_literal = argument.kind() == NodeKind::Literal
        && argument
            .expression_type()
            .is_some_and(|t| STRING_TYPES.contains(&t));
    if !is_string_literal {
        return None;
    }
    let target = call.child_with_role(Role::Qualifier)?;
    if target.strip_parentheses().kind() == NodeKind::Literal {
        return None;
    }
    Some((target, argument))
}

impl Inspection for LiteralAsArgToStringEqualsInspection {
    fn display_name(&self) -> &'static str {
        "expression.equals(\"literal\") rather than \"literal\".equals(expression)"
    }

    fn group_display_name(&self) -> &'static str {
        groups::STYLE
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Method, ScopeKind::Field]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(LiteralEqualsVisitor { reporter })
    }

    fn build_error_message(&self, anchor: NodeRef<'_>) -> String {
        format!(
            "{}: String literal is argument of .{}(), instead of the target.",
            anchor.source_text(),
            anchor.name().unwrap_or("equals")
        )
    }

    fn build_fix(&self, _anchor: NodeRef<'_>) -> Option<Arc<dyn Fix>> {
        Some(Arc::new(FlipEqualsFix))
    }

    fn has_fix(&self) -> bool {
        true
    }
}

/// Rewrites `target.equals(literal)` as `literal.equals(target)`.
#[derive(Debug, Clone, Copy)]
struct FlipEqualsFix;

impl Fix for FlipEqualsFix {
    fn name(&self) -> String {
        "Flip .equals()".into()
    }

    fn apply(&self, tree: &mut Tree, anchor: NodeId) -> Result<(), FixError> {
        gadgets_core::ensure_writable(tree)?;
        let call = tree.get(anchor).ok_or(FixError::UnknownNode(anchor))?;
        let (target, argument) =
            call_parts(call).ok_or_else(|| FixError::shape(anchor, "not a literal equals call"))?;
        let text = format!(
            "{}.{}({})",
            argument.source_text(),
            call.name().unwrap_or("equals"),
            target.strip_parentheses().source_text()
        );
        tree.replace_with_text(anchor, text)
    }
}

struct LiteralEqualsVisitor<'a> {
    reporter: Reporter<'a>,
}

impl<'a> Visit<'a> for LiteralEqualsVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    fn visit_class(&mut self, _class: NodeRef<'a>) {}

    fn visit_method_call(&mut self, call: NodeRef<'a>) {
        walk(self, call);
        if call_parts(call).is_some() {
            self.reporter.register_error(call);
        }
    }
}
