//! Inspection for classes that extend or implement an annotation type.
//!
//! Annotation types are interfaces, so the compiler accepts this, but the
//! result is never a usable annotation. Only checked from language level 5,
//! where annotations exist.

use crate::groups;
use gadgets_core::visit::Visit;
use gadgets_core::{ClassKind, Inspection, NodeRef, Reporter, Role, ScopeKind};

/// First language level with annotation types.
const MIN_LANGUAGE_LEVEL: u32 = 5;

/// Reports extends/implements references to annotation types.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtendsAnnotationInspection;

impl ExtendsAnnotationInspection {
    /// Creates the inspection.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Inspection for ExtendsAnnotationInspection {
    fn id(&self) -> &'static str {
        "ClassExplicitlyAnnotation"
    }

    fn display_name(&self) -> &'static str {
        "Class extends annotation interface"
    }

    fn group_display_name(&self) -> &'static str {
        groups::CLASS_LAYOUT
    }

    fn is_enabled_by_default(&self) -> bool {
        true
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Class]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(ExtendsAnnotationVisitor { reporter })
    }

    fn build_error_message(&self, anchor: NodeRef<'_>) -> String {
        let class = anchor
            .parent()
            .and_then(|c| c.name())
            .unwrap_or("<anonymous>");
        format!("Class {class} explicitly extends annotation interface '#ref' #loc")
    }
}

struct ExtendsAnnotationVisitor<'a> {
    reporter: Reporter<'a>,
}

impl<'a> Visit<'a> for ExtendsAnnotationVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    fn visit_class(&mut self, class: NodeRef<'a>) {
        if !self.reporter.is_scope_root(class) {
            return;
        }
        if class.tree().language_level() < MIN_LANGUAGE_LEVEL
            || class.class_kind() == ClassKind::Annotation
        {
            return;
        }
        let supertypes = class
            .children()
            .filter(|c| matches!(c.role(), Role::Extends | Role::Implements));
        for reference in supertypes {
            if reference.resolve().is_some_and(|t| t.is_annotation_type()) {
                self.reporter.register_error(reference);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gadgets_core::{check_tree, FileSpec, NodeSpec, PassOptions, Symbol, SymbolKind, Target, Tree};
    use insta::assert_snapshot;

    fn annotation_symbol(name: &str) -> Symbol {
        Symbol {
            kind: SymbolKind::Class,
            qualified_name: name.into(),
            owner: None,
            modifiers: Vec::new(),
            class_kind: ClassKind::Annotation,
        }
    }

    fn root() -> NodeSpec {
        NodeSpec::file()
            .child(NodeSpec::class("Marker").class_kind(ClassKind::Annotation).label("marker"))
            .child(
                NodeSpec::class("Impl")
                    .child(
                        NodeSpec::reference("Marker")
                            .role(Role::Implements)
                            .resolves_to(Target::Local("marker".into())),
                    )
                    .child(
                        NodeSpec::reference("Deprecated")
                            .role(Role::Implements)
                            .resolves_to_symbol(annotation_symbol("java.lang.Deprecated")),
                    )
                    .child(NodeSpec::reference("Runnable").role(Role::Implements)),
            )
    }

    fn check(tree: &Tree) -> Vec<String> {
        check_tree(&ExtendsAnnotationInspection::new(), tree, &PassOptions::default())
            .into_iter()
            .map(|d| d.message)
            .collect()
    }

    #[test]
    fn detects_local_and_external_annotations() {
        let messages = check(&Tree::new(root()));
        assert_eq!(messages.len(), 2);
        assert_snapshot!(messages[0], @"Class Impl explicitly extends annotation interface 'Marker'");
    }

    #[test]
    fn old_language_levels_are_skipped() {
        let tree = Tree::from_spec(FileSpec::new(root()).with_language_level(4));
        assert!(check(&tree).is_empty());
    }

    #[test]
    fn annotation_extending_annotation_is_skipped() {
        let tree = Tree::new(NodeSpec::file().child(
            NodeSpec::class("Meta").class_kind(ClassKind::Annotation).child(
                NodeSpec::reference("Deprecated")
                    .role(Role::Extends)
                    .resolves_to_symbol(annotation_symbol("java.lang.Deprecated")),
            ),
        ));
        assert!(check(&tree).is_empty());
    }
}
