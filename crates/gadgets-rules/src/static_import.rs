//! Inspection for static imports.
//!
//! The imports belong to the file, so only the pass for the first top-level
//! class of a file reports them.

use crate::groups;
use gadgets_core::visit::Visit;
use gadgets_core::{Inspection, NodeKind, NodeRef, Reporter, ScopeKind};

/// Reports every `import static`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticImportInspection;

impl StaticImportInspection {
    /// Creates the inspection.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Inspection for StaticImportInspection {
    fn display_name(&self) -> &'static str {
        "Static import"
    }

    fn group_display_name(&self) -> &'static str {
        groups::IMPORTS
    }

    fn scope_kinds(&self) -> &'static [ScopeKind] {
        &[ScopeKind::Class]
    }

    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
        Box::new(StaticImportVisitor { reporter })
    }

    fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
        "Static import #ref #loc".into()
    }
}

struct StaticImportVisitor<'a> {
    reporter: Reporter<'a>,
}

impl<'a> Visit<'a> for StaticImportVisitor<'a> {
    fn should_continue(&self) -> bool {
        self.reporter.should_continue()
    }

    fn visit_class(&mut self, class: NodeRef<'a>) {
        let Some(file) = class.parent().filter(|p| p.kind() == NodeKind::File) else {
            return;
        };
        let first_class = file.children_of_kind(NodeKind::Class).next();
        if first_class != Some(class) {
            return;
        }
        let imports = file
            .children_of_kind(NodeKind::ImportList)
            .flat_map(|list| list.children_of_kind(NodeKind::ImportStatic));
        for import in imports {
            if let Some(reference) = import.children_of_kind(NodeKind::Reference).next() {
                self.reporter.register_error(reference);
            }
        }
    }
}
