//! Serialized tree document and builder.

use super::{Attrs, BinaryOp, ClassKind, Modifier, NodeKind, Role, Span, Symbol, Target};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A whole file as produced by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSpec {
    /// Path of the analyzed source file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Source text, used for line/column computation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Language level (major version).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_level: Option<u32>,
    /// Read-only files reject every fix.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
    /// Root node, normally a `file`.
    pub root: NodeSpec,
}

impl FileSpec {
    /// Wraps a root node with default file settings.
    #[must_use]
    pub fn new(root: NodeSpec) -> Self {
        Self {
            path: None,
            source: None,
            language_level: None,
            read_only: false,
            root,
        }
    }

    /// Sets the file path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the source text.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the language level.
    #[must_use]
    pub fn with_language_level(mut self, level: u32) -> Self {
        self.language_level = Some(level);
        self
    }

    /// Marks the file read-only.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// A node and its subtree in nested form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Node kind.
    pub kind: NodeKind,
    /// Label used by `Target::Local` references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Declared or referenced name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Source text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Role inside the parent.
    #[serde(default, skip_serializing_if = "is_other")]
    pub role: Role,
    /// Declaration modifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
    /// Source range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Host facts.
    #[serde(default, skip_serializing_if = "is_default_attrs")]
    pub attrs: Attrs,
    /// Children in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

fn is_other(role: &Role) -> bool {
    *role == Role::Other
}

fn is_default_attrs(attrs: &Attrs) -> bool {
    *attrs == Attrs::default()
}

impl NodeSpec {
    /// Creates an empty node of the given kind.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            label: None,
            name: None,
            text: None,
            role: Role::Other,
            modifiers: Vec::new(),
            span: None,
            attrs: Attrs::default(),
            children: Vec::new(),
        }
    }

    // Builder methods

    /// Sets the name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the source text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the role inside the parent.
    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Adds a modifier.
    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the source range.
    #[must_use]
    pub fn span(mut self, offset: usize, length: usize) -> Self {
        self.span = Some(Span { offset, length });
        self
    }

    /// Appends a child.
    #[must_use]
    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Appends several children.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = NodeSpec>) -> Self {
        self.children.extend(children);
        self
    }

    // Facts

    /// Sets the expression or declaration type.
    #[must_use]
    pub fn ty(mut self, ty: impl Into<String>) -> Self {
        self.attrs.ty = Some(ty.into());
        self
    }

    /// Sets the folded constant value.
    #[must_use]
    pub fn constant(mut self, value: i64) -> Self {
        self.attrs.constant = Some(value);
        self
    }

    /// Sets the binary operator.
    #[must_use]
    pub fn operator(mut self, op: BinaryOp) -> Self {
        self.attrs.operator = Some(op);
        self
    }

    /// Sets the method return type.
    #[must_use]
    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.attrs.return_type = Some(ty.into());
        self
    }

    /// Marks a method as constructor.
    #[must_use]
    pub fn constructor(mut self) -> Self {
        self.attrs.constructor = true;
        self
    }

    /// Records whether the statement can complete normally.
    #[must_use]
    pub fn completes_normally(mut self, value: bool) -> Self {
        self.attrs.completes_normally = Some(value);
        self
    }

    /// Records whether the statement or method always throws.
    #[must_use]
    pub fn always_throws(mut self, value: bool) -> Self {
        self.attrs.always_throws = Some(value);
        self
    }

    /// Sets the resolution target.
    #[must_use]
    pub fn resolves_to(mut self, target: Target) -> Self {
        self.attrs.resolves_to = Some(target);
        self
    }

    /// Resolves to an external declaration.
    #[must_use]
    pub fn resolves_to_symbol(self, symbol: Symbol) -> Self {
        self.resolves_to(Target::External(symbol))
    }

    /// Sets the class flavour.
    #[must_use]
    pub fn class_kind(mut self, kind: ClassKind) -> Self {
        self.attrs.class_kind = kind;
        self
    }

    /// Sets the qualified name.
    #[must_use]
    pub fn qualified(mut self, name: impl Into<String>) -> Self {
        self.attrs.qualified_name = Some(name.into());
        self
    }

    /// Adds a (transitive) supertype.
    #[must_use]
    pub fn supertype(mut self, name: impl Into<String>) -> Self {
        self.attrs.supertypes.push(name.into());
        self
    }

    // Shorthands

    /// `file` node.
    #[must_use]
    pub fn file() -> Self {
        Self::new(NodeKind::File)
    }

    /// Named class.
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Class).named(name)
    }

    /// Anonymous class with its base class reference.
    #[must_use]
    pub fn anonymous_class(base: impl Into<String>) -> Self {
        Self::new(NodeKind::AnonymousClass)
            .child(Self::reference(base).role(Role::BaseClass))
    }

    /// Method returning `void`.
    #[must_use]
    pub fn method(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Method).named(name).returns("void")
    }

    /// Constructor.
    #[must_use]
    pub fn constructor_named(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Method).named(name).constructor()
    }

    /// Field with its own type element.
    #[must_use]
    pub fn field(name: impl Into<String>, ty: impl Into<String>) -> Self {
        let ty = ty.into();
        Self::new(NodeKind::Field)
            .named(name)
            .ty(ty.clone())
            .child(Self::new(NodeKind::TypeElement).text(ty))
    }

    /// Field sharing the type element of a previous field (`int a, b;`).
    #[must_use]
    pub fn continued_field(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(NodeKind::Field).named(name).ty(ty)
    }

    /// Local variable.
    #[must_use]
    pub fn local(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(NodeKind::LocalVariable).named(name).ty(ty)
    }

    /// Code reference.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Reference).named(name)
    }

    /// `{ ... }` block.
    #[must_use]
    pub fn code_block() -> Self {
        Self::new(NodeKind::CodeBlock).role(Role::Body)
    }

    /// Expression statement wrapping `expression`.
    #[must_use]
    pub fn expression_statement(expression: NodeSpec) -> Self {
        Self::new(NodeKind::ExpressionStatement).child(expression)
    }

    /// `return;` or `return value;`
    #[must_use]
    pub fn return_statement() -> Self {
        Self::new(NodeKind::ReturnStatement)
    }

    /// Binary expression.
    #[must_use]
    pub fn binary(op: BinaryOp, lhs: NodeSpec, rhs: NodeSpec) -> Self {
        Self::new(NodeKind::BinaryExpression)
            .operator(op)
            .child(lhs.role(Role::Lhs))
            .child(rhs.role(Role::Rhs))
    }

    /// Method call, optionally qualified.
    #[must_use]
    pub fn call(name: impl Into<String>, qualifier: Option<NodeSpec>) -> Self {
        let call = Self::new(NodeKind::MethodCall).named(name);
        match qualifier {
            Some(q) => call.child(q.role(Role::Qualifier)),
            None => call,
        }
    }

    /// Adds a call argument.
    #[must_use]
    pub fn argument(self, argument: NodeSpec) -> Self {
        self.child(argument.role(Role::Argument))
    }

    /// Reference to a variable or field.
    #[must_use]
    pub fn reference_expression(name: impl Into<String>) -> Self {
        Self::new(NodeKind::ReferenceExpression).named(name)
    }

    /// Literal with its source text.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Literal).text(text)
    }

    /// Comment with its source text.
    #[must_use]
    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Comment).text(text)
    }
}
