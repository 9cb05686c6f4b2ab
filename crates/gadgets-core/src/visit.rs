//! Per-node-kind traversal callbacks.
//!
//! Every callback has a default that forwards to a more general one:
//! statement kinds go to [`Visit::visit_statement`], expression kinds to
//! [`Visit::visit_expression`], anonymous classes to [`Visit::visit_class`],
//! enum constants to [`Visit::visit_field`], and all of them end in
//! [`Visit::visit_element`], which walks the children.
//!
//! An override decides whether to descend by calling [`walk`]. Not calling it
//! prunes the subtree. Callers may also start a traversal on any node with
//! [`dispatch`].
//!
//! ```ignore
//! struct Loops<'t>(Vec<NodeRef<'t>>);
//!
//! impl<'t> Visit<'t> for Loops<'t> {
//!     fn visit_class(&mut self, _class: NodeRef<'t>) {
//!         // nested classes are scopes of their own
//!     }
//!
//!     fn visit_for_statement(&mut self, statement: NodeRef<'t>) {
//!         walk(self, statement);
//!         self.0.push(statement);
//!     }
//! }
//! ```

use crate::tree::{NodeKind, NodeRef};

/// Traversal callbacks, one per node kind.
pub trait Visit<'t> {
    /// Queried before every child visit. Returning false stops the walk.
    fn should_continue(&self) -> bool {
        true
    }

    /// Fallback for every node kind. Walks the children.
    fn visit_element(&mut self, node: NodeRef<'t>) {
        walk(self, node);
    }

    /// Compilation unit.
    fn visit_file(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    /// Import list.
    fn visit_import_list(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    /// Static import.
    fn visit_import_static(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    /// Named class. Anonymous classes arrive here by default too.
    fn visit_class(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    /// Anonymous class.
    fn visit_anonymous_class(&mut self, node: NodeRef<'t>) {
        self.visit_class(node);
    }

    /// Type parameter.
    fn visit_type_parameter(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    /// Method or constructor.
    fn visit_method(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    /// Field. Enum constants arrive here by default too.
    fn visit_field(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    /// Enum constant.
    fn visit_enum_constant(&mut self, node: NodeRef<'t>) {
        self.visit_field(node);
    }

    /// Parameter.
    fn visit_parameter(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    /// Type element.
    fn visit_type_element(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    /// Code reference.
    fn visit_reference(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    /// Code block.
    fn visit_code_block(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    /// Local variable.
    fn visit_local_variable(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    /// Comment.
    fn visit_comment(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    // Statements

    /// Any statement.
    fn visit_statement(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    /// Declaration statement.
    fn visit_declaration_statement(&mut self, node: NodeRef<'t>) {
        self.visit_statement(node);
    }

    /// Expression statement.
    fn visit_expression_statement(&mut self, node: NodeRef<'t>) {
        self.visit_statement(node);
    }

    /// `if` statement.
    fn visit_if_statement(&mut self, node: NodeRef<'t>) {
        self.visit_statement(node);
    }

    /// `for` statement.
    fn visit_for_statement(&mut self, node: NodeRef<'t>) {
        self.visit_statement(node);
    }

    /// `while` statement.
    fn visit_while_statement(&mut self, node: NodeRef<'t>) {
        self.visit_statement(node);
    }

    /// `do ... while` statement.
    fn visit_do_while_statement(&mut self, node: NodeRef<'t>) {
        self.visit_statement(node);
    }

    /// `return` statement.
    fn visit_return_statement(&mut self, node: NodeRef<'t>) {
        self.visit_statement(node);
    }

    /// `throw` statement.
    fn visit_throw_statement(&mut self, node: NodeRef<'t>) {
        self.visit_statement(node);
    }

    /// `break` statement.
    fn visit_break_statement(&mut self, node: NodeRef<'t>) {
        self.visit_statement(node);
    }

    /// `continue` statement.
    fn visit_continue_statement(&mut self, node: NodeRef<'t>) {
        self.visit_statement(node);
    }

    /// `synchronized` statement.
    fn visit_synchronized_statement(&mut self, node: NodeRef<'t>) {
        self.visit_statement(node);
    }

    /// Nested block statement.
    fn visit_block_statement(&mut self, node: NodeRef<'t>) {
        self.visit_statement(node);
    }

    // Expressions

    /// Any expression.
    fn visit_expression(&mut self, node: NodeRef<'t>) {
        self.visit_element(node);
    }

    /// Binary expression.
    fn visit_binary_expression(&mut self, node: NodeRef<'t>) {
        self.visit_expression(node);
    }

    /// Method call.
    fn visit_method_call(&mut self, node: NodeRef<'t>) {
        self.visit_expression(node);
    }

    /// `new` expression.
    fn visit_new_expression(&mut self, node: NodeRef<'t>) {
        self.visit_expression(node);
    }

    /// Reference expression.
    fn visit_reference_expression(&mut self, node: NodeRef<'t>) {
        self.visit_expression(node);
    }

    /// Literal.
    fn visit_literal(&mut self, node: NodeRef<'t>) {
        self.visit_expression(node);
    }

    /// Parenthesized expression.
    fn visit_parenthesized_expression(&mut self, node: NodeRef<'t>) {
        self.visit_expression(node);
    }

    /// `super` expression.
    fn visit_super_expression(&mut self, node: NodeRef<'t>) {
        self.visit_expression(node);
    }
}

/// Calls the callback matching the node's kind.
pub fn dispatch<'t, V: Visit<'t> + ?Sized>(visitor: &mut V, node: NodeRef<'t>) {
    match node.kind() {
        NodeKind::File => visitor.visit_file(node),
        NodeKind::ImportList => visitor.visit_import_list(node),
        NodeKind::ImportStatic => visitor.visit_import_static(node),
        NodeKind::Class => visitor.visit_class(node),
        NodeKind::AnonymousClass => visitor.visit_anonymous_class(node),
        NodeKind::TypeParameter => visitor.visit_type_parameter(node),
        NodeKind::Method => visitor.visit_method(node),
        NodeKind::Field => visitor.visit_field(node),
        NodeKind::EnumConstant => visitor.visit_enum_constant(node),
        NodeKind::Parameter => visitor.visit_parameter(node),
        NodeKind::TypeElement => visitor.visit_type_element(node),
        NodeKind::Reference => visitor.visit_reference(node),
        NodeKind::CodeBlock => visitor.visit_code_block(node),
        NodeKind::LocalVariable => visitor.visit_local_variable(node),
        NodeKind::Comment => visitor.visit_comment(node),
        NodeKind::DeclarationStatement => visitor.visit_declaration_statement(node),
        NodeKind::ExpressionStatement => visitor.visit_expression_statement(node),
        NodeKind::IfStatement => visitor.visit_if_statement(node),
        NodeKind::ForStatement => visitor.visit_for_statement(node),
        NodeKind::WhileStatement => visitor.visit_while_statement(node),
        NodeKind::DoWhileStatement => visitor.visit_do_while_statement(node),
        NodeKind::ReturnStatement => visitor.visit_return_statement(node),
        NodeKind::ThrowStatement => visitor.visit_throw_statement(node),
        NodeKind::BreakStatement => visitor.visit_break_statement(node),
        NodeKind::ContinueStatement => visitor.visit_continue_statement(node),
        NodeKind::SynchronizedStatement => visitor.visit_synchronized_statement(node),
        NodeKind::BlockStatement => visitor.visit_block_statement(node),
        NodeKind::BinaryExpression => visitor.visit_binary_expression(node),
        NodeKind::MethodCall => visitor.visit_method_call(node),
        NodeKind::NewExpression => visitor.visit_new_expression(node),
        NodeKind::ReferenceExpression => visitor.visit_reference_expression(node),
        NodeKind::Literal => visitor.visit_literal(node),
        NodeKind::ParenthesizedExpression => visitor.visit_parenthesized_expression(node),
        NodeKind::SuperExpression => visitor.visit_super_expression(node),
        NodeKind::Fragment => visitor.visit_element(node),
    }
}

/// Visits the children of `node` in source order.
///
/// Stops as soon as [`Visit::should_continue`] returns false.
pub fn walk<'t, V: Visit<'t> + ?Sized>(visitor: &mut V, node: NodeRef<'t>) {
    for child in node.children() {
        if !visitor.should_continue() {
            return;
        }
        dispatch(visitor, child);
    }
}
