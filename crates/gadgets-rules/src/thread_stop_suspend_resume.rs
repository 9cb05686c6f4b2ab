//! Inspection for calls to the deprecated `Thread` control methods.
//!
//! `Thread.stop()`, `suspend()` and `resume()` are inherently unsafe: they
//! release or keep monitors at arbitrary points.

use crate::groups;
use gadgets_core::visit::{walk, Visit};
use gadgets_core::{Inspection, NodeRef, Reporter, ScopeKind};

const METHOD_NAMES: &[&str] = &["stop", "suspend", "resume"];
const THREAD_CLASS: &str = "java.lang.Thread";

/// Reports calls to `Thread.stop`, `suspend` and `resume`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadStopSuspendResumeInspection;

impl ThreadStopSuspendResumeInspection {
    /// Creates the inspection.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Inspection for ThreadStopSuspendResumeInspection {
    fn id(&self) -> &'static str {
        "CallToThreadStopSuspendOrResumeManager"
    }

    fn display_name(&self) -> &'static str {
        "Call to 'Thread.stop()', '.suspend()' or '.resume()'"
    }

    fn group_display_name(&self) -> &'static str {
        groups::THREADING
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Method, ScopeKind::Field]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(ThreadControlVisitor { reporter })
    }

    fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
        "Call to Thread.#ref() #loc".into()
    }
}

struct ThreadControlVisitor<'a> {
    reporter: Reporter<'a>,
}

impl<'a> Visit<'a> for ThreadControlVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    fn visit_class(&mut self, _class: NodeRef<'a>) {}

    fn visit_method_call(&mut self, call: NodeRef<'a>) {
        walk(self, call);
        if !call.name().is_some_and(|n| METHOD_NAMES.contains(&n)) {
            return;
        }
        let declared_by_thread = call
            .resolve()
            .is_some_and(|target| target.owner() == Some(THREAD_CLASS));
        if declared_by_thread {
            self.reporter.register_error(call);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gadgets_core::{check_tree, NodeSpec, PassOptions, Symbol, SymbolKind, Tree};

    fn method_symbol(owner: &str, name: &str) -> Symbol {
        Symbol {
            kind: SymbolKind::Method,
            qualified_name: format!("{owner}.{name}"),
            owner: Some(owner.into()),
            modifiers: Vec::new(),
            class_kind: Default::default(),
        }
    }

    fn call_tree(name: &str, owner: &str) -> Tree {
        Tree::new(NodeSpec::file().child(NodeSpec::class("A").child(
            NodeSpec::method("m").child(NodeSpec::code_block().child(
                NodeSpec::expression_statement(
                    NodeSpec::call(name, Some(NodeSpec::reference_expression("worker")))
                        .resolves_to_symbol(method_symbol(owner, name)),
                ),
            )),
        )))
    }

    fn check(tree: &Tree) -> Vec<String> {
        check_tree(&ThreadStopSuspendResumeInspection::new(), tree, &PassOptions::default())
            .into_iter()
            .map(|d| d.message)
            .collect()
    }

    #[test]
    fn detects_thread_methods() {
        for name in METHOD_NAMES {
            let tree = call_tree(name, THREAD_CLASS);
            assert_eq!(check(&tree), vec![format!("Call to Thread.{name}()")]);
        }
    }

    #[test]
    fn same_name_on_other_class_is_fine() {
        assert!(check(&call_tree("stop", "com.acme.Timer")).is_empty());
    }

    #[test]
    fn unresolved_call_is_fine() {
        let tree = Tree::new(NodeSpec::file().child(NodeSpec::class("A").child(
            NodeSpec::method("m").child(NodeSpec::code_block().child(
                NodeSpec::expression_statement(NodeSpec::call("stop", None)),
            )),
        )));
        assert!(check(&tree).is_empty());
    }
}
