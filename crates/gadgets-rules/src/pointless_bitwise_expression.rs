//! Inspection for bitwise expressions with no effect.
//!
//! # Rationale
//!
//! Masking with zero or all-ones, or shifting by zero, either does nothing or
//! always yields the same value. Such code is usually left over from an edit.
//!
//! # Detected Patterns
//!
//! - `x & 0`, `x & -1`, `x | 0`, `x | -1`, `x ^ 0`, `x ^ -1`
//! - `x << 0`, `x >> 0`, `x >>> 0`
//!
//! Constants are compared after casting to the type of the whole expression,
//! so `b & 0xff` is pointless for a `byte` but not for an `int`. Boolean
//! operands are never reported.

use crate::groups;
use gadgets_core::visit::{walk, Visit};
use gadgets_core::{
    BinaryOp, Fix, FixError, Inspection, NodeId, NodeRef, Reporter, Role, ScopeKind, Tree,
};
use std::sync::Arc;

const BOOLEAN_TYPES: &[&str] = &["boolean", "java.lang.Boolean"];

/// Reports bitwise expressions that can be simplified away.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointlessBitwiseExpressionInspection;

impl PointlessBitwiseExpressionInspection {
    /// Creates the inspection.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

struct Operands<'t> {
    op: BinaryOp,
    ty: &'t str,
    lhs: NodeRef<'t>,
    rhs: NodeRef<'t>,
}

impl<'t> Operands<'t> {
    /// Typed, non-boolean bitwise operands of `expression`.
    fn of(expression: NodeRef<'t>) -> Option<Self> {
        let op = expression.attrs().operator.filter(|op| op.is_bitwise())?;
        let ty = expression.expression_type()?;
        let lhs = expression.child_with_role(Role::Lhs)?;
        let rhs = expression.child_with_role(Role::Rhs)?;
        let untyped_or_boolean = |node: NodeRef<'_>| {
            node.expression_type()
                .map_or(true, |t| BOOLEAN_TYPES.contains(&t))
        };
        if BOOLEAN_TYPES.contains(&ty) || untyped_or_boolean(lhs) || untyped_or_boolean(rhs) {
            return None;
        }
        Some(Self { op, ty, lhs, rhs })
    }

    fn is_zero(&self, operand: NodeRef<'_>) -> bool {
        operand.constant_cast_to(self.ty).is_some_and(|c| c.is_zero())
    }

    fn is_all_ones(&self, operand: NodeRef<'_>) -> bool {
        operand.constant_cast_to(self.ty).is_some_and(|c| c.is_all_ones())
    }

    fn is_pointless(&self) -> bool {
        let (lhs, rhs) = (self.lhs, self.rhs);
        if self.op.is_shift() {
            return self.is_zero(rhs);
        }
        self.is_zero(lhs) || self.is_zero(rhs) || self.is_all_ones(lhs) || self.is_all_ones(rhs)
    }

    fn replacement(&self) -> String {
        let (lhs, rhs) = (self.lhs, self.rhs);
        let text = |node: NodeRef<'_>| node.source_text().into_owned();
        match self.op {
            BinaryOp::And if self.is_zero(lhs) || self.is_all_ones(rhs) => text(lhs),
            BinaryOp::And => text(rhs),
            BinaryOp::Or if self.is_zero(lhs) || self.is_all_ones(rhs) => text(rhs),
            BinaryOp::Or => text(lhs),
            BinaryOp::Xor if self.is_all_ones(lhs) => format!("~{}", text(rhs)),
            BinaryOp::Xor if self.is_all_ones(rhs) => format!("~{}", text(lhs)),
            BinaryOp::Xor if self.is_zero(rhs) => text(lhs),
            BinaryOp::Xor => text(rhs),
            _ => text(lhs),
        }
    }
}

impl Inspection for PointlessBitwiseExpressionInspection {
    fn display_name(&self) -> &'static str {
        "Pointless bitwise expression"
    }

    fn group_display_name(&self) -> &'static str {
        groups::VERBOSE
    }

    fn is_enabled_by_default(&self) -> bool {
        true
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Method, ScopeKind::Field]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(PointlessBitwiseVisitor { reporter })
    }

    fn build_error_message(&self, anchor: NodeRef<'_>) -> String {
        let replacement = Operands::of(anchor).map(|o| o.replacement()).unwrap_or_default();
        format!("#ref can be replaced with {replacement} #loc")
    }

    fn build_fix(&self, _anchor: NodeRef<'_>) -> Option<Arc<dyn Fix>> {
        Some(Arc::new(SimplifyFix))
    }

    fn has_fix(&self) -> bool {
        true
    }
}

/// Replaces the expression with its simplified form.
#[derive(Debug, Clone, Copy)]
struct SimplifyFix;

impl Fix for SimplifyFix {
    fn name(&self) -> String {
        "Simplify".into()
    }

    fn apply(&self, tree: &mut Tree, anchor: NodeId) -> Result<(), FixError> {
        gadgets_core::ensure_writable(tree)?;
        let expression = tree.get(anchor).ok_or(FixError::UnknownNode(anchor))?;
        let replacement = Operands::of(expression)
            .filter(Operands::is_pointless)
            .map(|o| o.replacement())
            .ok_or_else(|| FixError::shape(anchor, "expression is no longer pointless"))?;
        tree.replace_with_text(anchor, replacement)
    }
}

struct PointlessBitwiseVisitor<'a> {
    reporter: Reporter<'a>,
}

impl<'a> Visit<'a> for PointlessBitwiseVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    fn visit_class(&mut self, _class: NodeRef<'a>) {}

    fn visit_binary_expression(&mut self, expression: NodeRef<'a>) {
        walk(self, expression);
        if Operands::of(expression).is_some_and(|o| o.is_pointless()) {
            self.reporter.register_error(expression);
        }
    }
}
