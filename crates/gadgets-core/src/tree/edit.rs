//! Mutation API used by fixes.
//!
//! Every operation fails with [`FixError::ReadOnly`] before touching anything
//! when the tree is not writable.

use super::{Attrs, Modifier, NodeId, NodeKind, NodeSpec, Role, Tree};
use crate::fix::{ensure_writable, FixError};

impl Tree {
    fn check(&self, id: NodeId) -> Result<(), FixError> {
        ensure_writable(self)?;
        if id.index() >= self.nodes.len() {
            return Err(FixError::UnknownNode(id));
        }
        Ok(())
    }

    /// Removes a modifier from a declaration. Missing modifiers are not an error.
    ///
    /// # Errors
    ///
    /// Fails on read-only trees and unknown nodes.
    pub fn remove_modifier(&mut self, id: NodeId, modifier: Modifier) -> Result<(), FixError> {
        self.check(id)?;
        self.nodes[id.index()].modifiers.retain(|m| *m != modifier);
        Ok(())
    }

    /// Replaces a node with verbatim text, dropping its subtree.
    ///
    /// The node keeps its id, position and role and becomes a
    /// [`NodeKind::Fragment`].
    ///
    /// # Errors
    ///
    /// Fails on read-only trees and unknown nodes.
    pub fn replace_with_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), FixError> {
        self.check(id)?;
        let children = std::mem::take(&mut self.nodes[id.index()].children);
        for child in children {
            self.nodes[child.index()].parent = None;
        }
        let node = &mut self.nodes[id.index()];
        node.kind = NodeKind::Fragment;
        node.name = None;
        node.text = Some(text.into());
        node.modifiers.clear();
        node.attrs = Attrs::default();
        Ok(())
    }

    /// Unlinks a node from its parent. The subtree stays in the arena.
    ///
    /// # Errors
    ///
    /// Fails on read-only trees, unknown nodes and the root.
    pub fn detach(&mut self, id: NodeId) -> Result<(), FixError> {
        self.check(id)?;
        let Some(parent) = self.nodes[id.index()].parent.take() else {
            return Err(FixError::Shape {
                node: id,
                message: "node has no parent".into(),
            });
        };
        self.nodes[parent.index()].children.retain(|c| *c != id);
        Ok(())
    }

    /// Adds a detached subtree to the arena and returns its root id.
    ///
    /// # Errors
    ///
    /// Fails on read-only trees.
    pub fn add_node(&mut self, spec: NodeSpec) -> Result<NodeId, FixError> {
        ensure_writable(self)?;
        Ok(self.insert_spec(spec, None))
    }

    /// Attaches a detached node under `parent` at `index` (clamped to the end).
    ///
    /// # Errors
    ///
    /// Fails on read-only trees, unknown nodes, attached children and cycles.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), FixError> {
        self.check(parent)?;
        self.check(child)?;
        if self.nodes[child.index()].parent.is_some() || child == self.root {
            return Err(FixError::Shape {
                node: child,
                message: "node is already attached".into(),
            });
        }
        if parent == child || self.node(child).is_ancestor_of(self.node(parent)) {
            return Err(FixError::Shape {
                node: child,
                message: "insertion would create a cycle".into(),
            });
        }
        let siblings = &mut self.nodes[parent.index()].children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Changes the role of a node.
    ///
    /// # Errors
    ///
    /// Fails on read-only trees and unknown nodes.
    pub fn set_role(&mut self, id: NodeId, role: Role) -> Result<(), FixError> {
        self.check(id)?;
        self.nodes[id.index()].role = role;
        Ok(())
    }

    /// Renames a node.
    ///
    /// # Errors
    ///
    /// Fails on read-only trees and unknown nodes.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), FixError> {
        self.check(id)?;
        self.nodes[id.index()].name = Some(name.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::FileSpec;

    fn class_with_final_method() -> Tree {
        Tree::new(
            NodeSpec::file().child(
                NodeSpec::class("A")
                    .modifier(Modifier::Final)
                    .child(NodeSpec::method("m").modifier(Modifier::Final)),
            ),
        )
    }

    fn method_id(tree: &Tree) -> NodeId {
        tree.preorder()
            .find(|n| n.kind() == NodeKind::Method)
            .map(|n| n.id())
            .unwrap()
    }

    #[test]
    fn remove_modifier_edits_only_the_target() {
        let mut tree = class_with_final_method();
        let method = method_id(&tree);
        tree.remove_modifier(method, Modifier::Final).unwrap();
        assert!(!tree.node(method).has_modifier(Modifier::Final));
        let class = tree.node(method).parent().unwrap();
        assert!(class.has_modifier(Modifier::Final));
    }

    #[test]
    fn read_only_tree_is_left_untouched() {
        let mut tree = Tree::from_spec(
            FileSpec::new(NodeSpec::file().child(
                NodeSpec::class("A").child(NodeSpec::method("m").modifier(Modifier::Final)),
            ))
            .read_only(),
        );
        let method = method_id(&tree);
        let err = tree.remove_modifier(method, Modifier::Final).unwrap_err();
        assert!(matches!(err, FixError::ReadOnly));
        assert!(tree.node(method).has_modifier(Modifier::Final));
        assert!(matches!(tree.detach(method), Err(FixError::ReadOnly)));
        assert_eq!(tree.preorder().count(), 3);
    }

    #[test]
    fn detach_and_insert_moves_a_subtree() {
        let mut tree = class_with_final_method();
        let method = method_id(&tree);
        let root = tree.root().id();
        tree.detach(method).unwrap();
        assert_eq!(tree.preorder().count(), 2);
        tree.insert_child(root, 0, method).unwrap();
        assert_eq!(tree.root().children().next().unwrap().id(), method);
        assert!(matches!(
            tree.insert_child(root, 0, method),
            Err(FixError::Shape { .. })
        ));
    }

    #[test]
    fn replace_with_text_produces_fragment() {
        let mut tree = class_with_final_method();
        let method = method_id(&tree);
        tree.replace_with_text(method, "void m() {}").unwrap();
        let node = tree.node(method);
        assert_eq!(node.kind(), NodeKind::Fragment);
        assert_eq!(node.ref_text(), "void m() {}");
    }

    #[test]
    fn added_nodes_can_be_attached() {
        let mut tree = class_with_final_method();
        let class = tree.root().children().next().unwrap().id();
        let field = tree.add_node(NodeSpec::field("count", "int")).unwrap();
        tree.insert_child(class, usize::MAX, field).unwrap();
        let last = tree.node(class).children().last().unwrap();
        assert_eq!(last.name(), Some("count"));
    }
}
