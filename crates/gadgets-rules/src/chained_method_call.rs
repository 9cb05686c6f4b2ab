//! Inspection for method calls made on the result of another call.
//!
//! # Rationale
//!
//! Long call chains hide intermediate values from the debugger and make
//! null-related failures hard to pin down.
//!
//! # Detected Patterns
//!
//! - `a.b().c()` reports `c`
//! - `new Builder().build()`
//!
//! # Configuration
//!
//! - `ignore_field_initializations`: Skip calls inside field initializers
//!   (default: true)

use crate::groups;
use gadgets_core::visit::{walk, Visit};
use gadgets_core::{
    Fix, FixError, Inspection, NodeId, NodeKind, NodeRef, NodeSpec, Reporter, Role, RuleConfig,
    ScopeKind, Tree,
};
use std::sync::Arc;

/// Reports calls whose qualifier is itself a call.
#[derive(Debug, Clone)]
pub struct ChainedMethodCallInspection {
    ignore_field_initializations: bool,
}

impl Default for ChainedMethodCallInspection {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainedMethodCallInspection {
    /// Creates the inspection with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ignore_field_initializations: true,
        }
    }

    /// Sets whether calls in field initializers are skipped.
    #[must_use]
    pub fn ignore_field_initializations(mut self, ignore: bool) -> Self {
        self.ignore_field_initializations = ignore;
        self
    }
}

fn is_call(expression: NodeRef<'_>) -> bool {
    matches!(
        expression.strip_parentheses().kind(),
        NodeKind::MethodCall | NodeKind::NewExpression
    )
}

impl Inspection for ChainedMethodCallInspection {
    fn display_name(&self) -> &'static str {
        "Chained method calls"
    }

    fn group_display_name(&self) -> &'static str {
        groups::CONFUSING
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Method, ScopeKind::Field]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(ChainedCallVisitor {
            reporter,
            rule: self,
        })
    }

    fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
        "Chained method call #ref() #loc".into()
    }

    fn build_fix(&self, _anchor: NodeRef<'_>) -> Option<Arc<dyn Fix>> {
        Some(Arc::new(IntroduceVariableFix))
    }

    fn quick_fixes_only_when_interactive(&self) -> bool {
        true
    }

    fn has_fix(&self) -> bool {
        true
    }

    fn configure(&mut self, config: &RuleConfig) {
        self.ignore_field_initializations = config.get_bool("ignore_field_initializations", true);
    }
}

/// Moves the qualifier of the anchored call into a new local variable
/// declared just before the enclosing statement.
#[derive(Debug, Clone, Copy)]
struct IntroduceVariableFix;

impl IntroduceVariableFix {
    fn variable_name(qualifier: NodeRef<'_>) -> String {
        let base = match qualifier.kind() {
            NodeKind::MethodCall => qualifier.name().map(|name| {
                name.strip_prefix("get")
                    .filter(|rest| !rest.is_empty())
                    .unwrap_or(name)
            }),
            NodeKind::NewExpression => qualifier.name(),
            _ => None,
        };
        let Some(base) = base.filter(|b| !b.is_empty()) else {
            return "value".into();
        };
        let mut chars = base.chars();
        chars
            .next()
            .map(|first| first.to_lowercase().chain(chars).collect())
            .unwrap_or_else(|| "value".into())
    }
}

impl Fix for IntroduceVariableFix {
    fn name(&self) -> String {
        "Introduce variable".into()
    }

    fn apply(&self, tree: &mut Tree, anchor: NodeId) -> Result<(), FixError> {
        gadgets_core::ensure_writable(tree)?;
        let call = tree.get(anchor).ok_or(FixError::UnknownNode(anchor))?;
        let qualifier = call
            .child_with_role(Role::Qualifier)
            .ok_or_else(|| FixError::shape(anchor, "call has no qualifier"))?;
        let statement = call
            .ancestors()
            .find(|a| a.kind().is_statement() && a.parent().is_some_and(|p| p.kind() == NodeKind::CodeBlock))
            .ok_or_else(|| FixError::shape(anchor, "call is not inside a code block"))?;
        let block = statement
            .parent()
            .ok_or_else(|| FixError::shape(statement.id(), "statement is detached"))?;

        let name = Self::variable_name(qualifier.strip_parentheses());
        let ty = qualifier.expression_type().unwrap_or("var").to_owned();
        let index = statement.index_in_parent().unwrap_or(0);
        let (qualifier, block) = (qualifier.id(), block.id());

        let declaration = tree.add_node(
            NodeSpec::new(NodeKind::DeclarationStatement).child(NodeSpec::local(name.clone(), ty.clone())),
        )?;
        let variable = tree
            .node(declaration)
            .children()
            .next()
            .map(|v| v.id())
            .ok_or_else(|| FixError::shape(declaration, "declaration has no variable"))?;
        tree.detach(qualifier)?;
        tree.set_role(qualifier, Role::Initializer)?;
        tree.insert_child(variable, 0, qualifier)?;
        tree.insert_child(block, index, declaration)?;

        let reference = tree.add_node(
            NodeSpec::reference_expression(name)
                .ty(ty)
                .role(Role::Qualifier),
        )?;
        tree.insert_child(anchor, 0, reference)
    }
}

struct ChainedCallVisitor<'a> {
    reporter: Reporter<'a>,
    rule: &'a ChainedMethodCallInspection,
}

impl<'a> Visit<'a> for ChainedCallVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    fn visit_class(&mut self, _class: NodeRef<'a>) {}

    fn visit_method_call(&mut self, call: NodeRef<'a>) {
        walk(self, call);
        if !call.child_with_role(Role::Qualifier).is_some_and(is_call) {
            return;
        }
        if self.rule.ignore_field_initializations
            && call.ancestors().any(|a| a.kind() == NodeKind::Field)
        {
            return;
        }
        self.reporter.register_error(call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gadgets_core::{check_tree, PassOptions};

    fn chain() -> NodeSpec {
        NodeSpec::call(
            "build",
            Some(NodeSpec::call("getBuilder", Some(NodeSpec::reference_expression("factory"))).ty("Builder")),
        )
        .label("outer")
    }

    fn in_method(expression: NodeSpec) -> Tree {
        Tree::new(NodeSpec::file().child(NodeSpec::class("A").child(
            NodeSpec::method("m").child(NodeSpec::code_block().child(
                NodeSpec::expression_statement(expression),
            )),
        )))
    }

    fn in_field(expression: NodeSpec) -> Tree {
        Tree::new(NodeSpec::file().child(
            NodeSpec::class("A").child(NodeSpec::field("f", "Object").child(expression.role(Role::Initializer))),
        ))
    }

    #[test]
    fn detects_call_on_call() {
        let tree = in_method(chain());
        let diagnostics = check_tree(&ChainedMethodCallInspection::new(), &tree, &PassOptions::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Chained method call build()");
    }

    #[test]
    fn parenthesized_new_expression_counts() {
        let qualifier = NodeSpec::new(NodeKind::ParenthesizedExpression)
            .child(NodeSpec::new(NodeKind::NewExpression).named("Builder"));
        let tree = in_method(NodeSpec::call("build", Some(qualifier)));
        let diagnostics = check_tree(&ChainedMethodCallInspection::new(), &tree, &PassOptions::default());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn simple_qualifier_is_fine() {
        let tree = in_method(NodeSpec::call("build", Some(NodeSpec::reference_expression("b"))));
        assert!(check_tree(&ChainedMethodCallInspection::new(), &tree, &PassOptions::default()).is_empty());
    }

    #[test]
    fn field_initializers_follow_option() {
        let tree = in_field(chain());
        let default = ChainedMethodCallInspection::new();
        assert!(check_tree(&default, &tree, &PassOptions::default()).is_empty());

        let strict = ChainedMethodCallInspection::new().ignore_field_initializations(false);
        assert_eq!(check_tree(&strict, &tree, &PassOptions::default()).len(), 1);
    }

    #[test]
    fn configure_reads_option() {
        let mut rule = ChainedMethodCallInspection::new();
        rule.configure(&RuleConfig::default().with_option("ignore_field_initializations", false));
        assert!(!rule.ignore_field_initializations);
        rule.configure(&RuleConfig::default());
        assert!(rule.ignore_field_initializations);
    }

    #[test]
    fn introduce_variable_splits_the_chain() {
        let mut tree = in_method(chain());
        let diagnostics = check_tree(&ChainedMethodCallInspection::new(), &tree, &PassOptions::interactive());
        diagnostics[0].apply_fix(&mut tree).unwrap();

        let outer = tree.by_label("outer").unwrap();
        let qualifier = outer.child_with_role(Role::Qualifier).unwrap();
        assert_eq!(qualifier.kind(), NodeKind::ReferenceExpression);
        assert_eq!(qualifier.name(), Some("builder"));

        let block = outer.ancestors().find(|a| a.kind() == NodeKind::CodeBlock).unwrap();
        let declaration = block.children().next().unwrap();
        assert_eq!(declaration.kind(), NodeKind::DeclarationStatement);
        let variable = declaration.children().next().unwrap();
        assert_eq!(variable.name(), Some("builder"));
        assert_eq!(variable.expression_type(), Some("Builder"));
        assert_eq!(variable.children().next().and_then(|c| c.name()), Some("getBuilder"));

        assert!(check_tree(&ChainedMethodCallInspection::new(), &tree, &PassOptions::default()).is_empty());
    }
}
