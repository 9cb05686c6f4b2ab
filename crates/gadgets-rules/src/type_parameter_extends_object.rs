//! Inspection for type parameters that explicitly extend `Object`.
//!
//! # Rationale
//!
//! Every type parameter is bounded by `java.lang.Object` already.
//!
//! # Detected Patterns
//!
//! - `class Box<T extends Object>`
//! - `<T extends java.lang.Object> void put(T value)`

use crate::groups;
use gadgets_core::visit::{walk, Visit};
use gadgets_core::{Fix, FixError, Inspection, NodeId, NodeRef, Reporter, Role, ScopeKind, Tree};
use std::sync::Arc;

const OBJECT_NAMES: &[&str] = &["Object", "java.lang.Object"];

fn is_object_bound(reference: NodeRef<'_>) -> bool {
    OBJECT_NAMES.contains(&reference.ref_text().as_ref())
}

/// Reports `extends Object` on type parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeParameterExtendsObjectInspection;

impl TypeParameterExtendsObjectInspection {
    /// Creates the inspection.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Inspection for TypeParameterExtendsObjectInspection {
    fn id(&self) -> &'static str {
        "TypeParameterExplicitlyExtendsObject"
    }

    fn display_name(&self) -> &'static str {
        "Type parameter explicitly extends java.lang.Object"
    }

    fn group_display_name(&self) -> &'static str {
        groups::VERBOSE
    }

    fn is_enabled_by_default(&self) -> bool {
        true
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Class]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(ExtendsObjectVisitor { reporter })
    }

    fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
        "Type parameter '#ref' explicitly extends java.lang.Object #loc".into()
    }

    fn build_fix(&self, _anchor: NodeRef<'_>) -> Option<Arc<dyn Fix>> {
        Some(Arc::new(RemoveExtendsObjectFix))
    }

    fn has_fix(&self) -> bool {
        true
    }
}

/// Deletes the `extends Object` bound of the anchored type parameter.
#[derive(Debug, Clone, Copy)]
struct RemoveExtendsObjectFix;

impl Fix for RemoveExtendsObjectFix {
    fn name(&self) -> String {
        "Remove redundant 'extends Object'".into()
    }

    fn apply(&self, tree: &mut Tree, anchor: NodeId) -> Result<(), FixError> {
        gadgets_core::ensure_writable(tree)?;
        let parameter = tree.get(anchor).ok_or(FixError::UnknownNode(anchor))?;
        let bounds: Vec<NodeId> = parameter
            .children_with_role(Role::Extends)
            .filter(|r| is_object_bound(*r))
            .map(|r| r.id())
            .collect();
        for bound in bounds {
            tree.detach(bound)?;
        }
        Ok(())
    }
}

struct ExtendsObjectVisitor<'a> {
    reporter: Reporter<'a>,
}

impl<'a> Visit<'a> for ExtendsObjectVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    fn visit_class(&mut self, class: NodeRef<'a>) {
        if self.reporter.is_scope_root(class) {
            walk(self, class);
        }
    }

    fn visit_type_parameter(&mut self, parameter: NodeRef<'a>) {
        walk(self, parameter);
        if parameter.children_with_role(Role::Extends).any(is_object_bound) {
            self.reporter.register_error(parameter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gadgets_core::{check_tree, NodeKind, NodeSpec, PassOptions};

    fn type_parameter(bound: &str) -> NodeSpec {
        NodeSpec::new(NodeKind::TypeParameter)
            .named("T")
            .child(NodeSpec::reference(bound).role(Role::Extends))
    }

    fn check(tree: &Tree) -> Vec<gadgets_core::Diagnostic> {
        check_tree(&TypeParameterExtendsObjectInspection::new(), tree, &PassOptions::default())
    }

    #[test]
    fn detects_class_and_method_parameters() {
        let tree = Tree::new(NodeSpec::file().child(
            NodeSpec::class("Box")
                .child(type_parameter("Object"))
                .child(NodeSpec::method("put").child(type_parameter("java.lang.Object"))),
        ));
        let diagnostics = check(&tree);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics[0].message,
            "Type parameter 'T' explicitly extends java.lang.Object"
        );
    }

    #[test]
    fn other_bounds_are_fine() {
        let tree = Tree::new(
            NodeSpec::file().child(NodeSpec::class("Box").child(type_parameter("Comparable"))),
        );
        assert!(check(&tree).is_empty());
    }

    #[test]
    fn nested_class_parameters_reported_by_their_own_pass() {
        let tree = Tree::new(NodeSpec::file().child(
            NodeSpec::class("Outer").child(NodeSpec::class("Inner").child(type_parameter("Object"))),
        ));
        assert_eq!(check(&tree).len(), 1);
    }

    #[test]
    fn fix_drops_the_bound() {
        let mut tree = Tree::new(
            NodeSpec::file().child(NodeSpec::class("Box").child(type_parameter("Object"))),
        );
        let diagnostics = check(&tree);
        diagnostics[0].apply_fix(&mut tree).unwrap();
        assert_eq!(tree.node(diagnostics[0].anchor).child_count(), 0);
        assert!(check(&tree).is_empty());
    }
}
