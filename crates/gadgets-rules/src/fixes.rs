//! Fixes shared by several inspections.

use gadgets_core::{Fix, FixError, Modifier, NodeId, NodeKind, NodeSpec, Role, Tree};

/// Removes one modifier from the anchored declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveModifierFix {
    modifier: Modifier,
}

impl RemoveModifierFix {
    /// Fix removing `modifier`.
    #[must_use]
    pub fn new(modifier: Modifier) -> Self {
        Self { modifier }
    }
}

impl Fix for RemoveModifierFix {
    fn name(&self) -> String {
        format!("Remove '{}' modifier", self.modifier)
    }

    fn apply(&self, tree: &mut Tree, anchor: NodeId) -> Result<(), FixError> {
        tree.remove_modifier(anchor, self.modifier)
    }
}

/// Turns an anonymous class into a named inner class of the enclosing class.
///
/// The anchor is the base class reference of the anonymous class. Members
/// move to a new private class named `{Base}Impl` (suffixed with a number on
/// collision) and the `new` expression is rewritten to instantiate it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveAnonymousToInnerClassFix;

impl MoveAnonymousToInnerClassFix {
    fn inner_class_name(outer: gadgets_core::NodeRef<'_>, base: &str) -> String {
        let simple = base.rsplit('.').next().unwrap_or(base);
        let taken = |name: &str| {
            outer
                .children_of_kind(NodeKind::Class)
                .any(|c| c.name() == Some(name))
        };
        let stem = format!("{simple}Impl");
        if !taken(&stem) {
            return stem;
        }
        (2..)
            .map(|n| format!("{stem}{n}"))
            .find(|name| !taken(name))
            .unwrap_or(stem)
    }
}

impl Fix for MoveAnonymousToInnerClassFix {
    fn name(&self) -> String {
        "Convert to named inner class".into()
    }

    fn apply(&self, tree: &mut Tree, anchor: NodeId) -> Result<(), FixError> {
        gadgets_core::ensure_writable(tree)?;
        let node = tree.get(anchor).ok_or(FixError::UnknownNode(anchor))?;
        let anonymous = node
            .parent()
            .filter(|p| p.kind() == NodeKind::AnonymousClass)
            .ok_or_else(|| FixError::shape(anchor, "anchor is not the base of an anonymous class"))?;
        let creation = anonymous
            .parent()
            .ok_or_else(|| FixError::shape(anonymous.id(), "anonymous class is detached"))?;
        let outer = anonymous
            .containing_class()
            .ok_or_else(|| FixError::shape(anonymous.id(), "no enclosing class"))?;

        let base = node.ref_text().into_owned();
        let name = Self::inner_class_name(outer, &base);
        let members: Vec<NodeId> = anonymous
            .children()
            .filter(|c| c.role() != Role::BaseClass)
            .map(|c| c.id())
            .collect();
        let (outer, creation) = (outer.id(), creation.id());

        let class = tree.add_node(
            NodeSpec::class(name.clone())
                .modifier(Modifier::Private)
                .child(NodeSpec::reference(base).role(Role::Extends)),
        )?;
        for member in members {
            tree.detach(member)?;
            tree.insert_child(class, usize::MAX, member)?;
        }
        tree.insert_child(outer, usize::MAX, class)?;
        tree.replace_with_text(creation, format!("new {name}()"))
    }
}

/// Splits multi-variable declarations.
///
/// On a local variable, every variable after the first moves to its own
/// declaration statement right after the original. On a field sharing a
/// previous field's type, the field gets its own type element. Applying the
/// fix twice is harmless.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeDeclarationFix;

impl NormalizeDeclarationFix {
    fn split_statement(tree: &mut Tree, variable: NodeId) -> Result<(), FixError> {
        let node = tree.node(variable);
        let statement = node
            .parent()
            .filter(|p| p.kind() == NodeKind::DeclarationStatement)
            .ok_or_else(|| FixError::shape(variable, "variable is not part of a declaration"))?;
        let block = statement
            .parent()
            .ok_or_else(|| FixError::shape(statement.id(), "declaration is detached"))?;
        let index = statement.index_in_parent().unwrap_or(0);
        let extra: Vec<NodeId> = statement
            .children_of_kind(NodeKind::LocalVariable)
            .skip(1)
            .map(|v| v.id())
            .collect();
        let block = block.id();

        for (offset, variable) in extra.into_iter().enumerate() {
            tree.detach(variable)?;
            let declaration = tree.add_node(NodeSpec::new(NodeKind::DeclarationStatement))?;
            tree.insert_child(declaration, 0, variable)?;
            tree.insert_child(block, index + 1 + offset, declaration)?;
        }
        Ok(())
    }

    fn give_field_type(tree: &mut Tree, field: NodeId) -> Result<(), FixError> {
        let node = tree.node(field);
        if node.children_of_kind(NodeKind::TypeElement).next().is_some() {
            return Ok(());
        }
        let ty = node
            .expression_type()
            .ok_or_else(|| FixError::shape(field, "field type is unknown"))?
            .to_owned();
        let element = tree.add_node(NodeSpec::new(NodeKind::TypeElement).text(ty))?;
        tree.insert_child(field, 0, element)
    }
}

impl Fix for NormalizeDeclarationFix {
    fn name(&self) -> String {
        "Split into multiple declarations".into()
    }

    fn apply(&self, tree: &mut Tree, anchor: NodeId) -> Result<(), FixError> {
        gadgets_core::ensure_writable(tree)?;
        let kind = tree.get(anchor).ok_or(FixError::UnknownNode(anchor))?.kind();
        match kind {
            NodeKind::LocalVariable => Self::split_statement(tree, anchor),
            NodeKind::Field => Self::give_field_type(tree, anchor),
            _ => Err(FixError::shape(anchor, "not a variable declaration")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_modifier_names_the_modifier() {
        assert_eq!(
            RemoveModifierFix::new(Modifier::Final).name(),
            "Remove 'final' modifier"
        );
    }

    #[test]
    fn split_moves_trailing_variables_into_own_statements() {
        let mut tree = Tree::new(
            NodeSpec::file().child(NodeSpec::class("A").child(
                NodeSpec::method("m").child(
                    NodeSpec::code_block()
                        .child(
                            NodeSpec::new(NodeKind::DeclarationStatement)
                                .child(NodeSpec::local("a", "int"))
                                .child(NodeSpec::local("b", "int").label("b"))
                                .child(NodeSpec::local("c", "int")),
                        )
                        .child(NodeSpec::return_statement()),
                ),
            )),
        );
        let b = tree.by_label("b").unwrap().id();
        NormalizeDeclarationFix.apply(&mut tree, b).unwrap();

        let block = tree.by_label("b").unwrap().parent().unwrap().parent().unwrap();
        let kinds: Vec<NodeKind> = block.children().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::DeclarationStatement,
                NodeKind::DeclarationStatement,
                NodeKind::DeclarationStatement,
                NodeKind::ReturnStatement,
            ]
        );
        let names: Vec<&str> = block
            .children()
            .flat_map(|s| s.children_of_kind(NodeKind::LocalVariable))
            .filter_map(|v| v.name())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        // a second run finds nothing left to split
        NormalizeDeclarationFix.apply(&mut tree, b).unwrap();
        let statement = tree.node(b).parent().unwrap();
        assert_eq!(statement.child_count(), 1);
        assert_eq!(statement.parent().unwrap().child_count(), 4);
    }

    #[test]
    fn field_gets_its_own_type() {
        let mut tree = Tree::new(NodeSpec::file().child(
            NodeSpec::class("A")
                .child(NodeSpec::field("a", "int"))
                .child(NodeSpec::continued_field("b", "int").label("b")),
        ));
        let b = tree.by_label("b").unwrap().id();
        NormalizeDeclarationFix.apply(&mut tree, b).unwrap();
        let field = tree.node(b);
        let element = field.children_of_kind(NodeKind::TypeElement).next().unwrap();
        assert_eq!(element.text(), Some("int"));
    }

    #[test]
    fn anonymous_class_becomes_named_inner_class() {
        let mut tree = Tree::new(
            NodeSpec::file().child(
                NodeSpec::class("Outer")
                    .child(NodeSpec::class("RunnableImpl"))
                    .child(NodeSpec::method("m").child(NodeSpec::code_block().child(
                        NodeSpec::expression_statement(
                            NodeSpec::new(NodeKind::NewExpression).label("new").child(
                                NodeSpec::new(NodeKind::AnonymousClass)
                                    .child(
                                        NodeSpec::reference("Runnable")
                                            .role(Role::BaseClass)
                                            .label("base"),
                                    )
                                    .child(NodeSpec::method("run")),
                            ),
                        ),
                    ))),
            ),
        );
        let base = tree.by_label("base").unwrap().id();
        MoveAnonymousToInnerClassFix.apply(&mut tree, base).unwrap();

        let outer = tree.root().children().next().unwrap();
        let inner = outer
            .children_of_kind(NodeKind::Class)
            .find(|c| c.name() == Some("RunnableImpl2"))
            .unwrap();
        assert!(inner.has_modifier(Modifier::Private));
        assert_eq!(
            inner.child_with_role(Role::Extends).and_then(|r| r.name()),
            Some("Runnable")
        );
        assert_eq!(inner.children_of_kind(NodeKind::Method).count(), 1);
        let creation = tree.by_label("new").unwrap();
        assert_eq!(creation.kind(), NodeKind::Fragment);
        assert_eq!(creation.text(), Some("new RunnableImpl2()"));
    }
}
