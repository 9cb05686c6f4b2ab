//! Control-flow predicates.
//!
//! Host facts (`completes_normally`, `always_throws`) win whenever present.
//! Without them the answers come from a conservative structural walk: loops
//! with a missing or literal `true` condition never complete normally unless
//! they contain a `break`, and jump statements never complete normally.

use crate::tree::{NodeKind, NodeRef, Role};

/// Returns true if control can reach the point after `statement`.
#[must_use]
pub fn can_complete_normally(statement: NodeRef<'_>) -> bool {
    if let Some(fact) = statement.attrs().completes_normally {
        return fact;
    }
    match statement.kind() {
        NodeKind::ReturnStatement
        | NodeKind::ThrowStatement
        | NodeKind::BreakStatement
        | NodeKind::ContinueStatement => false,
        NodeKind::CodeBlock | NodeKind::BlockStatement => {
            statement.statements().all(can_complete_normally)
        }
        NodeKind::SynchronizedStatement => statement.body().map_or(true, can_complete_normally),
        NodeKind::IfStatement => match statement.child_with_role(Role::Else) {
            None => true,
            Some(otherwise) => {
                statement.body().map_or(true, can_complete_normally)
                    || can_complete_normally(otherwise)
            }
        },
        NodeKind::ForStatement | NodeKind::WhileStatement => {
            !is_constant_true(statement.child_with_role(Role::Condition)) || contains_break(statement)
        }
        NodeKind::DoWhileStatement => {
            let body_completes = statement.body().map_or(true, can_complete_normally);
            (body_completes && !is_constant_true(statement.child_with_role(Role::Condition)))
                || contains_break(statement)
        }
        NodeKind::ExpressionStatement => !statement.children().any(always_throws),
        _ => true,
    }
}

/// Returns true if `node` contains a `return` that belongs to the same method.
///
/// Nested classes are not searched.
#[must_use]
pub fn contains_return(node: NodeRef<'_>) -> bool {
    node.children().any(|child| match child.kind() {
        NodeKind::ReturnStatement => true,
        NodeKind::Class | NodeKind::AnonymousClass => false,
        _ => contains_return(child),
    })
}

/// Returns true if the statement or expression always throws.
#[must_use]
pub fn always_throws(node: NodeRef<'_>) -> bool {
    if let Some(fact) = node.attrs().always_throws {
        return fact;
    }
    match node.kind() {
        NodeKind::ThrowStatement => true,
        NodeKind::CodeBlock | NodeKind::BlockStatement => node.statements().any(always_throws),
        _ => false,
    }
}

/// Returns true if every path through the method ends in a throw.
///
/// Bodiless methods never qualify.
#[must_use]
pub fn method_always_throws(method: NodeRef<'_>) -> bool {
    if let Some(fact) = method.attrs().always_throws {
        return fact;
    }
    let Some(body) = method.body() else {
        return false;
    };
    !contains_return(body) && !can_complete_normally(body)
}

// Breaks inside nested loops are assumed to target those loops.
fn contains_break(node: NodeRef<'_>) -> bool {
    node.children().any(|child| match child.kind() {
        NodeKind::BreakStatement => true,
        NodeKind::Class | NodeKind::AnonymousClass => false,
        kind if kind.is_loop() => false,
        _ => contains_break(child),
    })
}

fn is_constant_true(condition: Option<NodeRef<'_>>) -> bool {
    let Some(condition) = condition else {
        return true;
    };
    let condition = condition.strip_parentheses();
    condition.kind() == NodeKind::Literal && condition.text() == Some("true")
}
