//! Inspection for TODO comments.
//!
//! # Configuration
//!
//! - `pattern`: Regular expression matched against comment text
//!   (default: `(?i)\btodo\b`)

use crate::groups;
use gadgets_core::visit::{walk, Visit};
use gadgets_core::{Inspection, NodeRef, Reporter, RuleConfig, ScopeKind};
use regex::Regex;

/// Default TODO pattern.
pub const DEFAULT_PATTERN: &str = r"(?i)\btodo\b";

/// Reports comments matching the TODO pattern.
#[derive(Debug, Clone)]
pub struct TodoCommentInspection {
    pattern: Option<Regex>,
}

impl Default for TodoCommentInspection {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoCommentInspection {
    /// Creates the inspection with the default pattern.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_PATTERN).ok(),
        }
    }

    /// Uses a custom pattern. Invalid patterns fall back to the default.
    #[must_use]
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.set_pattern(pattern);
        self
    }

    fn set_pattern(&mut self, pattern: &str) {
        match Regex::new(pattern) {
            Ok(regex) => self.pattern = Some(regex),
            Err(e) => {
                tracing::warn!(
                    "{}: invalid pattern `{}`: {}, using default",
                    self.short_name(),
                    pattern,
                    e
                );
                self.pattern = Regex::new(DEFAULT_PATTERN).ok();
            }
        }
    }

    fn is_todo(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(text))
    }
}

impl Inspection for TodoCommentInspection {
    fn display_name(&self) -> &'static str {
        "TODO comment"
    }

    fn group_display_name(&self) -> &'static str {
        groups::MATURITY
    }

    fn default_severity(&self) -> gadgets_core::Severity {
        gadgets_core::Severity::Info
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Class]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(TodoVisitor {
            reporter,
            rule: self,
        })
    }

    fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
        "TODO comment #ref #loc".into()
    }

    fn configure(&mut self, config: &RuleConfig) {
        self.set_pattern(config.get_str("pattern", DEFAULT_PATTERN));
    }
}

struct TodoVisitor<'a> {
    reporter: Reporter<'a>,
    rule: &'a TodoCommentInspection,
}

impl<'a> Visit<'a> for TodoVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    fn visit_class(&mut self, class: NodeRef<'a>) {
        if self.reporter.is_scope_root(class) {
            walk(self, class);
        }
    }

    fn visit_comment(&mut self, comment: NodeRef<'a>) {
        if comment.text().is_some_and(|t| self.rule.is_todo(t)) {
            self.reporter.register_error(comment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gadgets_core::{check_tree, NodeSpec, PassOptions, Severity, Tree};
    use insta::assert_snapshot;

    fn class_with_comments(comments: &[&str]) -> Tree {
        Tree::new(NodeSpec::file().child(NodeSpec::class("A").child(
            NodeSpec::method("m").child(
                NodeSpec::code_block().children(comments.iter().map(|c| NodeSpec::comment(*c))),
            ),
        )))
    }

    #[test]
    fn detects_todo_case_insensitively() {
        let tree = class_with_comments(&["// TODO: remove", "// todo later", "// fine"]);
        let diagnostics = check_tree(&TodoCommentInspection::new(), &tree, &PassOptions::default());
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].severity, Severity::Info);
        assert_snapshot!(diagnostics[0].message, @"TODO comment // TODO: remove");
    }

    #[test]
    fn word_boundary_is_required() {
        let tree = class_with_comments(&["// mastodon"]);
        assert!(check_tree(&TodoCommentInspection::new(), &tree, &PassOptions::default()).is_empty());
    }

    #[test]
    fn custom_pattern() {
        let rule = TodoCommentInspection::new().with_pattern(r"FIXME");
        let tree = class_with_comments(&["// FIXME", "// TODO"]);
        assert_eq!(check_tree(&rule, &tree, &PassOptions::default()).len(), 1);
    }

    #[test]
    fn invalid_pattern_falls_back_to_default() {
        let mut rule = TodoCommentInspection::new().with_pattern(r"FIXME");
        rule.configure(&RuleConfig::default().with_option("pattern", "(unclosed"));
        assert!(rule.is_todo("TODO"));
        assert!(!rule.is_todo("FIXME"));
    }
}
