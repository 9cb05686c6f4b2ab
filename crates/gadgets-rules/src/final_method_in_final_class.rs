//! Inspection for redundant `final` on methods of `final` classes.
//!
//! # Rationale
//!
//! A `final` class cannot be subclassed, so none of its methods can be
//! overridden. Marking them `final` again is noise.
//!
//! # Detected Patterns
//!
//! ```text
//! final class Point {
//!     final int x() { ... }   // redundant
//! }
//! ```

use crate::fixes::RemoveModifierFix;
use crate::groups;
use gadgets_core::visit::Visit;
use gadgets_core::{Fix, Inspection, Modifier, NodeKind, NodeRef, Reporter, ScopeKind};
use std::sync::Arc;

/// Reports `final` methods declared in `final` classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinalMethodInFinalClassInspection;

impl FinalMethodInFinalClassInspection {
    /// Creates the inspection.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Inspection for FinalMethodInFinalClassInspection {
    fn display_name(&self) -> &'static str {
        "'final' method in 'final' class"
    }

    fn group_display_name(&self) -> &'static str {
        groups::CLASS_LAYOUT
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Method]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(FinalMethodVisitor { reporter })
    }

    fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
        "Method '#ref()' declared 'final' in 'final' class #loc".into()
    }

    fn build_fix(&self, _anchor: NodeRef<'_>) -> Option<Arc<dyn Fix>> {
        Some(Arc::new(RemoveModifierFix::new(Modifier::Final)))
    }

    fn has_fix(&self) -> bool {
        true
    }
}

struct FinalMethodVisitor<'a> {
    reporter: Reporter<'a>,
}

impl<'a> Visit<'a> for FinalMethodVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    // no walk: nothing below a method can be a final method of this class
    fn visit_method(&mut self, method: NodeRef<'a>) {
        if !method.has_modifier(Modifier::Final) {
            return;
        }
        let in_final_class = method
            .parent()
            .is_some_and(|c| c.kind() == NodeKind::Class && c.has_modifier(Modifier::Final));
        if in_final_class {
            self.reporter.register_error(method);
        }
    }
}
