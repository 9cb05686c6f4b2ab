//! Inspection contract and the check-scope operation.

use crate::config::RuleConfig;
use crate::diagnostic::{render_template, Diagnostic, DiagnosticSink, Severity};
use crate::fix::Fix;
use crate::metric::MetricInspection;
use crate::tree::{NodeId, NodeKind, NodeRef, Tree};
use crate::visit::{dispatch, Visit};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Kind of subtree an inspection is run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// A named or anonymous class.
    Class,
    /// A method or constructor.
    Method,
    /// A field or enum constant.
    Field,
}

impl ScopeKind {
    /// Scope kind rooted at nodes of `kind`, if any.
    #[must_use]
    pub fn of(kind: NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Class | NodeKind::AnonymousClass => Some(Self::Class),
            NodeKind::Method => Some(Self::Method),
            NodeKind::Field | NodeKind::EnumConstant => Some(Self::Field),
            _ => None,
        }
    }
}

/// A subtree handed to one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope {
    /// Kind of the scope root.
    pub kind: ScopeKind,
    /// Root node.
    pub root: NodeId,
}

impl Scope {
    /// Scope rooted at `node`, if it is a class, method or field.
    #[must_use]
    pub fn of(node: NodeRef<'_>) -> Option<Self> {
        ScopeKind::of(node.kind()).map(|kind| Self {
            kind,
            root: node.id(),
        })
    }

    /// All scopes of the given kinds, in pre-order.
    #[must_use]
    pub fn collect(tree: &Tree, kinds: &[ScopeKind]) -> Vec<Self> {
        tree.preorder()
            .filter_map(Self::of)
            .filter(|scope| kinds.contains(&scope.kind))
            .collect()
    }
}

/// Cooperative cancellation shared between a driver and running passes.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a flag that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-pass settings.
#[derive(Debug, Clone, Default)]
pub struct PassOptions {
    /// Interactive session: fixes restricted to interactive use are attached.
    pub interactive: bool,
    /// Severity override for this inspection.
    pub severity: Option<Severity>,
    /// Cancellation flag checked between node visits.
    pub cancel: Option<CancelFlag>,
}

impl PassOptions {
    /// Options for an interactive session.
    #[must_use]
    pub fn interactive() -> Self {
        Self {
            interactive: true,
            ..Self::default()
        }
    }
}

/// Derives a short name from a type path: last segment, generics removed,
/// `Inspection` suffix stripped.
///
/// ```
/// use gadgets_core::short_name_of;
///
/// assert_eq!(short_name_of("my_rules::TodoCommentInspection"), "TodoComment");
/// assert_eq!(short_name_of("Inspection"), "Inspection");
/// ```
#[must_use]
pub fn short_name_of(type_name: &'static str) -> &'static str {
    let path = type_name.split('<').next().unwrap_or(type_name);
    let last = path.rsplit("::").next().unwrap_or(path);
    match last.strip_suffix("Inspection") {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => last,
    }
}

/// An independent check run over scopes of a tree.
///
/// Inspections are immutable while passes run. Configuration goes through
/// [`Inspection::configure`], which needs exclusive access.
///
/// # Example
///
/// ```ignore
/// #[derive(Default)]
/// pub struct EmptyClassInspection;
///
/// impl Inspection for EmptyClassInspection {
///     fn display_name(&self) -> &'static str { "Empty class" }
///     fn group_display_name(&self) -> &'static str { "Class structure" }
///     fn scope_kinds(&self) -> &'static [ScopeKind] { &[ScopeKind::Class] }
///
///     fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a> {
///         Box::new(EmptyClassVisitor { reporter })
///     }
///
///     fn build_error_message(&self, _anchor: NodeRef<'_>) -> String {
///         "Class #ref is empty #loc".into()
///     }
/// }
/// ```
pub trait Inspection: Send + Sync {
    /// Unique short name, derived from the type name by default.
    fn short_name(&self) -> &'static str {
        short_name_of(std::any::type_name::<Self>())
    }

    /// Stable id used for suppression and configuration.
    fn id(&self) -> &'static str {
        self.short_name()
    }

    /// Human-readable name.
    fn display_name(&self) -> &'static str;

    /// Human-readable group.
    fn group_display_name(&self) -> &'static str;

    /// Whether the inspection runs without explicit configuration.
    fn is_enabled_by_default(&self) -> bool {
        false
    }

    /// Severity of reported diagnostics.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Scope kinds this inspection is run on.
    fn scope_kinds(&self) -> &'static [ScopeKind];

    /// Builds a fresh visitor for one pass.
    fn build_visitor<'a>(&'a self, reporter: Reporter<'a>) -> Box<dyn Visit<'a> + 'a>;

    /// Message template for a problem at `anchor` (`#ref` and `#loc` allowed).
    fn build_error_message(&self, anchor: NodeRef<'_>) -> String;

    /// Fix for a problem at `anchor`.
    fn build_fix(&self, anchor: NodeRef<'_>) -> Option<Arc<dyn Fix>> {
        let _ = anchor;
        None
    }

    /// Fixes are only attached in interactive sessions.
    fn quick_fixes_only_when_interactive(&self) -> bool {
        false
    }

    /// Whether the inspection can offer fixes.
    fn has_fix(&self) -> bool {
        false
    }

    /// Applies rule-specific options.
    fn configure(&mut self, config: &RuleConfig) {
        let _ = config;
    }

    /// Metric view of the inspection, for threshold rules.
    fn as_metric(&self) -> Option<&dyn MetricInspection> {
        None
    }
}

/// Type alias for boxed inspections.
pub type InspectionBox = Box<dyn Inspection>;

/// Handle through which a visitor reports problems.
pub struct Reporter<'a> {
    inspection: &'a dyn Inspection,
    tree: &'a Tree,
    scope: Scope,
    sink: &'a mut DiagnosticSink,
    options: &'a PassOptions,
}

impl std::fmt::Debug for Reporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("inspection", &self.inspection.short_name())
            .field("scope", &self.scope)
            .field("reported", &self.sink.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Reporter<'a> {
    /// Tree being analyzed.
    #[must_use]
    pub fn tree(&self) -> &'a Tree {
        self.tree
    }

    /// Scope of this pass.
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Returns true if `node` is the root of this pass's scope.
    #[must_use]
    pub fn is_scope_root(&self, node: NodeRef<'_>) -> bool {
        node.id() == self.scope.root
    }

    /// Whether this is an interactive session.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.options.interactive
    }

    /// False once cancellation was requested.
    #[must_use]
    pub fn should_continue(&self) -> bool {
        !self
            .options
            .cancel
            .as_ref()
            .is_some_and(CancelFlag::is_cancelled)
    }

    /// Number of diagnostics reported so far in this pass.
    #[must_use]
    pub fn reported(&self) -> usize {
        self.sink.len()
    }

    /// Reports a problem at `anchor` with the inspection's message.
    pub fn register_error(&mut self, anchor: NodeRef<'_>) {
        let template = self.inspection.build_error_message(anchor);
        self.register_error_with_message(anchor, template);
    }

    /// Reports a problem at `anchor` with a custom message template.
    pub fn register_error_with_message(&mut self, anchor: NodeRef<'_>, template: impl AsRef<str>) {
        let inspection = self.inspection;
        let fix_only_interactive = inspection.quick_fixes_only_when_interactive();
        let fix = if fix_only_interactive && !self.options.interactive {
            None
        } else {
            inspection.build_fix(anchor)
        };
        self.sink.report(Diagnostic {
            rule: inspection.short_name(),
            id: inspection.id(),
            severity: self
                .options
                .severity
                .unwrap_or_else(|| inspection.default_severity()),
            anchor: anchor.id(),
            location: anchor.location(),
            message: render_template(template.as_ref(), anchor),
            fix,
            fix_only_interactive,
        });
    }
}

/// Runs one pass of `inspection` over `scope`, appending to `sink`.
pub fn check_scope(
    inspection: &dyn Inspection,
    tree: &Tree,
    scope: Scope,
    sink: &mut DiagnosticSink,
    options: &PassOptions,
) {
    let Some(root) = tree.get(scope.root) else {
        tracing::warn!(
            "{}: scope root {} is not part of the tree",
            inspection.short_name(),
            scope.root
        );
        return;
    };
    tracing::debug!(
        "{}: checking {:?} scope at {}",
        inspection.short_name(),
        scope.kind,
        scope.root
    );
    let reporter = Reporter {
        inspection,
        tree,
        scope,
        sink,
        options,
    };
    let mut visitor = inspection.build_visitor(reporter);
    dispatch(visitor.as_mut(), root);
}

/// Runs `inspection` over every matching scope of `tree`, one sink per pass,
/// and concatenates the results. No telemetry, no failure isolation.
#[must_use]
pub fn check_tree(inspection: &dyn Inspection, tree: &Tree, options: &PassOptions) -> Vec<Diagnostic> {
    Scope::collect(tree, inspection.scope_kinds())
        .into_iter()
        .flat_map(|scope| {
            let mut sink = DiagnosticSink::new();
            check_scope(inspection, tree, scope, &mut sink, options);
            sink.into_diagnostics()
        })
        .collect()
}
