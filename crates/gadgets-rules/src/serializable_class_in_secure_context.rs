//! Inspection for serializable classes in code that must stay opaque.
//!
//! # Rationale
//!
//! Serializing an object exposes its private state. In a secure context a
//! class should refuse serialization by defining a `writeObject` that always
//! throws.
//!
//! # Detected Patterns
//!
//! Classes implementing `java.io.Serializable` (directly or not) without a
//! `writeObject(ObjectOutputStream)` method that always throws. Interfaces and
//! annotation types are skipped.

use crate::groups;
use gadgets_core::flow::method_always_throws;
use gadgets_core::visit::Visit;
use gadgets_core::{ClassKind, Inspection, NodeKind, NodeRef, Reporter, Role, ScopeKind};

const SERIALIZABLE: &str = "java.io.Serializable";
const OUTPUT_STREAM_TYPES: &[&str] = &["java.io.ObjectOutputStream", "ObjectOutputStream"];

/// Reports serializable classes that do not block serialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializableClassInSecureContextInspection;

impl SerializableClassInSecureContextInspection {
    /// Creates the inspection.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_write_object(method: NodeRef<'_>) -> bool {
    if method.name() != Some("writeObject") || method.attrs().return_type.as_deref() != Some("void") {
        return false;
    }
    let mut parameters = method.children_of_kind(NodeKind::Parameter);
    let first = parameters.next();
    parameters.next().is_none()
        && first
            .and_then(|p| p.expression_type())
            .is_some_and(|t| OUTPUT_STREAM_TYPES.contains(&t))
}

fn blocks_serialization(class: NodeRef<'_>) -> bool {
    class
        .children_of_kind(NodeKind::Method)
        .any(|m| is_write_object(m) && method_always_throws(m))
}

impl Inspection for SerializableClassInSecureContextInspection {
    fn display_name(&self) -> &'static str {
        "Serializable class in secure context"
    }

    fn group_display_name(&self) -> &'static str {
        groups::SECURITY
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Class]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(SerializableVisitor { reporter })
    }

    fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
        "Class #ref may be serialized, compromising security #loc".into()
    }
}

struct SerializableVisitor<'a> {
    reporter: Reporter<'a>,
}

impl<'a> Visit<'a> for SerializableVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    fn visit_class(&mut self, class: NodeRef<'a>) {
        if !self.reporter.is_scope_root(class) {
            return;
        }
        if matches!(class.class_kind(), ClassKind::Interface | ClassKind::Annotation) {
            return;
        }
        if !class.attrs().supertypes.iter().any(|s| s == SERIALIZABLE) {
            return;
        }
        if blocks_serialization(class) {
            return;
        }
        let anchor = if class.kind() == NodeKind::AnonymousClass {
            class.child_with_role(Role::BaseClass).unwrap_or(class)
        } else {
            class
        };
        self.reporter.register_error(anchor);
    }
}
