//! Syntax tree model handed to inspections by the host.
//!
//! The host parses source text and computes semantic facts (types, constant
//! values, reference targets, control-flow summaries). Inspections only read
//! the result through [`NodeRef`]. Fixes are the single writer and go through
//! the edit operations in `edit.rs`, which refuse to touch a read-only tree.
//!
//! Nodes live in an arena indexed by [`NodeId`]. The serialized form is the
//! nested [`FileSpec`] / [`NodeSpec`] document.
//!
//! # Shape conventions
//!
//! | Kind | Children |
//! |------|----------|
//! | `class` | type parameters, `extends`/`implements` references, fields, methods, inner classes, comments |
//! | `anonymous_class` | `base_class` reference, fields, methods (parent is a `new_expression`) |
//! | `method` | type parameters, parameters, `body` code block (absent when abstract) |
//! | `field` | optional type element, optional `initializer` expression |
//! | `for_statement` | `init`, `condition`, `update`, `body` |
//! | `while_statement` / `do_while_statement` | `condition`, `body` |
//! | `if_statement` | `condition`, `body`, optional `else` |
//! | `binary_expression` | `lhs`, `rhs` (operator in facts) |
//! | `method_call` | optional `qualifier`, `argument`s (method name in `name`) |

mod edit;
mod spec;

pub use spec::{FileSpec, NodeSpec};

use crate::constant::Constant;
use crate::diagnostic::Location;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node kinds the traversal knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Compilation unit.
    File,
    /// Import list of a file.
    ImportList,
    /// `import static ...;`
    ImportStatic,
    /// Named class, interface, enum or annotation type.
    Class,
    /// Anonymous class body attached to a `new` expression.
    AnonymousClass,
    /// Generic type parameter.
    TypeParameter,
    /// Method or constructor.
    Method,
    /// Field declaration.
    Field,
    /// Enum constant.
    EnumConstant,
    /// Method parameter.
    Parameter,
    /// Declared type of a field, variable or parameter.
    TypeElement,
    /// Code reference (extends/implements lists, imports, base classes).
    Reference,
    /// `{ ... }` body of a method or statement.
    CodeBlock,
    /// Local variable declaration statement.
    DeclarationStatement,
    /// Single declared local variable.
    LocalVariable,
    /// Expression used as a statement.
    ExpressionStatement,
    /// `if` statement.
    IfStatement,
    /// `for` statement.
    ForStatement,
    /// `while` statement.
    WhileStatement,
    /// `do ... while` statement.
    DoWhileStatement,
    /// `return` statement.
    ReturnStatement,
    /// `throw` statement.
    ThrowStatement,
    /// `break` statement.
    BreakStatement,
    /// `continue` statement.
    ContinueStatement,
    /// `synchronized (lock) { ... }`
    SynchronizedStatement,
    /// Nested block used as a statement.
    BlockStatement,
    /// Binary operator expression.
    BinaryExpression,
    /// Method call expression.
    MethodCall,
    /// `new` expression.
    NewExpression,
    /// Reference to a variable or field.
    ReferenceExpression,
    /// Literal value.
    Literal,
    /// `( ... )`
    ParenthesizedExpression,
    /// `super` qualifier.
    SuperExpression,
    /// Source comment.
    Comment,
    /// Verbatim text produced by a fix.
    Fragment,
}

impl NodeKind {
    /// Returns true for named and anonymous classes.
    #[must_use]
    pub fn is_class_like(self) -> bool {
        matches!(self, Self::Class | Self::AnonymousClass)
    }

    /// Returns true for statement kinds.
    #[must_use]
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            Self::DeclarationStatement
                | Self::ExpressionStatement
                | Self::IfStatement
                | Self::ForStatement
                | Self::WhileStatement
                | Self::DoWhileStatement
                | Self::ReturnStatement
                | Self::ThrowStatement
                | Self::BreakStatement
                | Self::ContinueStatement
                | Self::SynchronizedStatement
                | Self::BlockStatement
        )
    }

    /// Returns true for expression kinds.
    #[must_use]
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            Self::BinaryExpression
                | Self::MethodCall
                | Self::NewExpression
                | Self::ReferenceExpression
                | Self::Literal
                | Self::ParenthesizedExpression
                | Self::SuperExpression
        )
    }

    /// Returns true for loop statements.
    #[must_use]
    pub fn is_loop(self) -> bool {
        matches!(
            self,
            Self::ForStatement | Self::WhileStatement | Self::DoWhileStatement
        )
    }

    /// Leading keyword of the construct, if it has one.
    #[must_use]
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::IfStatement => Some("if"),
            Self::ForStatement => Some("for"),
            Self::WhileStatement => Some("while"),
            Self::DoWhileStatement => Some("do"),
            Self::ReturnStatement => Some("return"),
            Self::ThrowStatement => Some("throw"),
            Self::BreakStatement => Some("break"),
            Self::ContinueStatement => Some("continue"),
            Self::SynchronizedStatement => Some("synchronized"),
            Self::SuperExpression => Some("super"),
            _ => None,
        }
    }
}

/// Position of a child inside its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// No particular role.
    #[default]
    Other,
    /// Entry of an `extends` list.
    Extends,
    /// Entry of an `implements` list.
    Implements,
    /// Base type of an anonymous class.
    BaseClass,
    /// Receiver of a call or reference.
    Qualifier,
    /// Call argument.
    Argument,
    /// Left operand.
    Lhs,
    /// Right operand.
    Rhs,
    /// Loop or branch condition.
    Condition,
    /// `for` initialization.
    Init,
    /// `for` update.
    Update,
    /// Body of a method, loop or branch.
    Body,
    /// `else` branch.
    Else,
    /// Initializer of a field or variable.
    Initializer,
}

/// Declaration modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// `static`
    Static,
    /// `final`
    Final,
    /// `abstract`
    Abstract,
    /// `synchronized`
    Synchronized,
    /// `native`
    Native,
    /// `transient`
    Transient,
    /// `volatile`
    Volatile,
    /// `strictfp`
    Strictfp,
    /// `default`
    Default,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Static => "static",
            Self::Final => "final",
            Self::Abstract => "abstract",
            Self::Synchronized => "synchronized",
            Self::Native => "native",
            Self::Transient => "transient",
            Self::Volatile => "volatile",
            Self::Strictfp => "strictfp",
            Self::Default => "default",
        };
        f.write_str(keyword)
    }
}

/// Flavour of a class declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    /// Plain class.
    #[default]
    Class,
    /// Interface.
    Interface,
    /// Enum.
    Enum,
    /// Annotation type (`@interface`).
    Annotation,
}

impl ClassKind {
    fn is_default(&self) -> bool {
        *self == Self::Class
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `&`
    #[serde(rename = "&")]
    And,
    /// `|`
    #[serde(rename = "|")]
    Or,
    /// `^`
    #[serde(rename = "^")]
    Xor,
    /// `<<`
    #[serde(rename = "<<")]
    Shl,
    /// `>>`
    #[serde(rename = ">>")]
    Shr,
    /// `>>>`
    #[serde(rename = ">>>")]
    UShr,
    /// `+`
    #[serde(rename = "+")]
    Add,
    /// `-`
    #[serde(rename = "-")]
    Sub,
    /// `*`
    #[serde(rename = "*")]
    Mul,
    /// `/`
    #[serde(rename = "/")]
    Div,
    /// `%`
    #[serde(rename = "%")]
    Rem,
    /// `&&`
    #[serde(rename = "&&")]
    LogicalAnd,
    /// `||`
    #[serde(rename = "||")]
    LogicalOr,
    /// `==`
    #[serde(rename = "==")]
    Eq,
    /// `!=`
    #[serde(rename = "!=")]
    Ne,
    /// `<`
    #[serde(rename = "<")]
    Lt,
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `<=`
    #[serde(rename = "<=")]
    Le,
    /// `>=`
    #[serde(rename = ">=")]
    Ge,
}

impl BinaryOp {
    /// Source form of the operator.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }

    /// Returns true for the bitwise and shift operators.
    #[must_use]
    pub fn is_bitwise(self) -> bool {
        matches!(
            self,
            Self::And | Self::Or | Self::Xor | Self::Shl | Self::Shr | Self::UShr
        )
    }

    /// Returns true for the shift operators.
    #[must_use]
    pub fn is_shift(self) -> bool {
        matches!(self, Self::Shl | Self::Shr | Self::UShr)
    }
}

/// Byte range of a node in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first character.
    pub offset: usize,
    /// Length in bytes.
    pub length: usize,
}

/// What a symbol resolved to outside the tree is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// A class or interface.
    Class,
    /// A method.
    Method,
    /// A field.
    Field,
    /// A local variable or parameter.
    Variable,
}

/// Declaration that lives outside the analyzed tree (libraries, other files).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Kind of declaration.
    pub kind: SymbolKind,
    /// Fully qualified name (`java.lang.Thread.stop` or `java.lang.Thread`).
    pub qualified_name: String,
    /// Qualified name of the declaring class, for members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Declaration modifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
    /// Class flavour, for class symbols.
    #[serde(default, skip_serializing_if = "ClassKind::is_default")]
    pub class_kind: ClassKind,
}

/// Where a reference points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// A node in the same tree, by label.
    Local(String),
    /// A declaration outside the tree.
    External(Symbol),
}

/// Semantic facts computed by the host.
///
/// All facts are optional; queries fall back to structural answers when a
/// fact is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attrs {
    /// Method is a constructor.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub constructor: bool,
    /// Declared return type of a method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    /// Type of an expression, field, variable or parameter.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    /// Folded integral constant value of an expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constant: Option<i64>,
    /// Operator of a binary expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<BinaryOp>,
    /// Flavour of a class.
    #[serde(skip_serializing_if = "ClassKind::is_default")]
    pub class_kind: ClassKind,
    /// Fully qualified name of a class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    /// Transitive supertypes of a class, by qualified name.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supertypes: Vec<String>,
    /// Resolution target of a reference or call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolves_to: Option<Target>,
    /// Host answer to "can this statement complete normally".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completes_normally: Option<bool>,
    /// Host answer to "does this statement or method always throw".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub always_throws: Option<bool>,
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node kind.
    pub kind: NodeKind,
    /// Declared or referenced name.
    pub name: Option<String>,
    /// Source text, when the host provides it.
    pub text: Option<String>,
    /// Role inside the parent.
    pub role: Role,
    /// Declaration modifiers.
    pub modifiers: Vec<Modifier>,
    /// Source range.
    pub span: Option<Span>,
    /// Label used by local resolution targets.
    pub label: Option<String>,
    /// Host facts.
    pub attrs: Attrs,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Errors loading or saving a tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The serialized document is not valid.
    #[error("invalid tree document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Default language level (major version) when the host does not say.
pub const DEFAULT_LANGUAGE_LEVEL: u32 = 8;

/// Host syntax tree of one file.
#[derive(Debug, Clone)]
pub struct Tree {
    path: Option<PathBuf>,
    source: Option<String>,
    language_level: u32,
    writable: bool,
    nodes: Vec<Node>,
    root: NodeId,
    labels: HashMap<String, NodeId>,
}

impl Tree {
    /// Builds an in-memory, writable tree from a root node.
    #[must_use]
    pub fn new(root: NodeSpec) -> Self {
        Self::from_spec(FileSpec::new(root))
    }

    /// Builds a tree from its serialized form.
    #[must_use]
    pub fn from_spec(spec: FileSpec) -> Self {
        let mut tree = Self {
            path: spec.path,
            source: spec.source,
            language_level: spec.language_level.unwrap_or(DEFAULT_LANGUAGE_LEVEL),
            writable: !spec.read_only,
            nodes: Vec::new(),
            root: NodeId(0),
            labels: HashMap::new(),
        };
        tree.root = tree.insert_spec(spec.root, None);
        tree
    }

    /// Parses a tree from its JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not describe a tree.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let spec: FileSpec = serde_json::from_str(json)?;
        Ok(Self::from_spec(spec))
    }

    /// Serializes the tree (attached nodes only) back to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string_pretty(&self.to_spec())?)
    }

    /// Converts the tree back to its nested form.
    #[must_use]
    pub fn to_spec(&self) -> FileSpec {
        FileSpec {
            path: self.path.clone(),
            source: self.source.clone(),
            language_level: Some(self.language_level),
            read_only: !self.writable,
            root: self.spec_of(self.root),
        }
    }

    fn spec_of(&self, id: NodeId) -> NodeSpec {
        let node = &self.nodes[id.index()];
        NodeSpec {
            kind: node.kind,
            label: node.label.clone(),
            name: node.name.clone(),
            text: node.text.clone(),
            role: node.role,
            modifiers: node.modifiers.clone(),
            span: node.span,
            attrs: node.attrs.clone(),
            children: node.children.iter().map(|&c| self.spec_of(c)).collect(),
        }
    }

    fn insert_spec(&mut self, spec: NodeSpec, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        if let Some(label) = &spec.label {
            if self.labels.contains_key(label) {
                tracing::warn!("Duplicate node label `{}`, keeping the first", label);
            } else {
                self.labels.insert(label.clone(), id);
            }
        }
        self.nodes.push(Node {
            kind: spec.kind,
            name: spec.name,
            text: spec.text,
            role: spec.role,
            modifiers: spec.modifiers,
            span: spec.span,
            label: spec.label,
            attrs: spec.attrs,
            parent,
            children: Vec::with_capacity(spec.children.len()),
        });
        for child in spec.children {
            let child_id = self.insert_spec(child, Some(id));
            self.nodes[id.index()].children.push(child_id);
        }
        id
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.root)
    }

    /// Returns a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.index() < self.nodes.len(), "node {id} is not in this tree");
        NodeRef { tree: self, id }
    }

    /// Returns a node by id, if it belongs to this tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.index() < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    /// Returns a node by label.
    #[must_use]
    pub fn by_label(&self, label: &str) -> Option<NodeRef<'_>> {
        self.labels.get(label).map(|&id| self.node(id))
    }

    /// Iterates attached nodes in pre-order.
    pub fn preorder(&self) -> impl Iterator<Item = NodeRef<'_>> {
        let mut stack = vec![self.root];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.nodes[id.index()].children.iter().rev().copied());
            Some(self.node(id))
        })
    }

    /// Number of nodes in the arena, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// File path reported by the host.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Source text reported by the host.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Language level (major version) of the file.
    #[must_use]
    pub fn language_level(&self) -> u32 {
        self.language_level
    }

    /// Whether fixes may modify this tree.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Marks the tree writable or read-only.
    pub fn set_writable(&mut self, writable: bool) {
        self.writable = writable;
    }

    /// Sets the file path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the language level.
    #[must_use]
    pub fn with_language_level(mut self, level: u32) -> Self {
        self.language_level = level;
        self
    }

    /// Computes the source location of a node.
    #[must_use]
    pub fn location(&self, id: NodeId) -> Option<Location> {
        let span = self.get(id)?.span()?;
        let file = self
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("<memory>"));
        let Some(source) = &self.source else {
            return Some(Location::new(file, 0, 0).with_span(span.offset, span.length));
        };
        // offsets past the end or inside a character snap back to a boundary
        let mut end = span.offset.min(source.len());
        while !source.is_char_boundary(end) {
            end -= 1;
        }
        let prefix = &source[..end];
        let line = prefix.matches('\n').count() + 1;
        let column = prefix
            .rfind('\n')
            .map_or(prefix.chars().count(), |nl| prefix[nl + 1..].chars().count())
            + 1;
        Some(Location::new(file, line, column).with_span(span.offset, span.length))
    }
}

/// Borrowed handle to a node.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl Eq for NodeRef<'_> {}

impl<'t> NodeRef<'t> {
    fn data(&self) -> &'t Node {
        &self.tree.nodes[self.id.index()]
    }

    /// Node id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Owning tree.
    #[must_use]
    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    /// Declared or referenced name.
    #[must_use]
    pub fn name(&self) -> Option<&'t str> {
        self.data().name.as_deref()
    }

    /// Source text as given by the host.
    #[must_use]
    pub fn text(&self) -> Option<&'t str> {
        self.data().text.as_deref()
    }

    /// Role inside the parent.
    #[must_use]
    pub fn role(&self) -> Role {
        self.data().role
    }

    /// Declaration modifiers.
    #[must_use]
    pub fn modifiers(&self) -> &'t [Modifier] {
        &self.data().modifiers
    }

    /// Returns true if the declaration carries `modifier`.
    #[must_use]
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.data().modifiers.contains(&modifier)
    }

    /// Host facts.
    #[must_use]
    pub fn attrs(&self) -> &'t Attrs {
        &self.data().attrs
    }

    /// Source range.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        self.data().span
    }

    /// Source location.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.tree.location(self.id)
    }

    /// Parent node.
    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    /// Children in source order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// Number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// Index of this node among its parent's children.
    #[must_use]
    pub fn index_in_parent(&self) -> Option<usize> {
        let parent = self.parent()?;
        parent.data().children.iter().position(|&c| c == self.id)
    }

    /// First child with the given role.
    #[must_use]
    pub fn child_with_role(&self, role: Role) -> Option<NodeRef<'t>> {
        self.children().find(|c| c.role() == role)
    }

    /// All children with the given role.
    pub fn children_with_role(&self, role: Role) -> impl Iterator<Item = NodeRef<'t>> + 't {
        self.children().filter(move |c| c.role() == role)
    }

    /// All children of the given kind.
    pub fn children_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = NodeRef<'t>> + 't {
        self.children().filter(move |c| c.kind() == kind)
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let mut current = self.parent();
        std::iter::from_fn(move || {
            let node = current?;
            current = node.parent();
            Some(node)
        })
    }

    /// Nearest enclosing class or anonymous class.
    #[must_use]
    pub fn containing_class(&self) -> Option<NodeRef<'t>> {
        self.ancestors().find(|a| a.kind().is_class_like())
    }

    /// Returns true if `self` is a strict ancestor of `other`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: NodeRef<'_>) -> bool {
        other.ancestors().any(|a| a.id == self.id)
    }

    /// Body code block of a method, loop or synchronized statement.
    #[must_use]
    pub fn body(&self) -> Option<NodeRef<'t>> {
        self.child_with_role(Role::Body)
            .or_else(|| self.children_of_kind(NodeKind::CodeBlock).next())
    }

    /// Statements of a code block, or the single statement of a body.
    pub fn statements(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        self.children().filter(|c| c.kind().is_statement())
    }

    /// Returns true for constructors.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.attrs().constructor
    }

    /// Class flavour.
    #[must_use]
    pub fn class_kind(&self) -> ClassKind {
        self.attrs().class_kind
    }

    /// Qualified class name, falling back to the simple name.
    #[must_use]
    pub fn qualified_name(&self) -> Option<&'t str> {
        self.attrs().qualified_name.as_deref().or_else(|| self.name())
    }

    /// Type of an expression or declaration.
    #[must_use]
    pub fn expression_type(&self) -> Option<&'t str> {
        self.attrs().ty.as_deref()
    }

    /// Folded constant value of this expression cast to `ty`.
    #[must_use]
    pub fn constant_cast_to(&self, ty: &str) -> Option<Constant> {
        let value = match self.kind() {
            NodeKind::ParenthesizedExpression if self.attrs().constant.is_none() => {
                return self.children().next()?.constant_cast_to(ty);
            }
            _ => self.attrs().constant?,
        };
        Constant::cast(value, ty)
    }

    /// Resolves a reference or call to its declaration.
    #[must_use]
    pub fn resolve(&self) -> Option<Resolved<'t>> {
        match self.attrs().resolves_to.as_ref()? {
            Target::Local(label) => self.tree.by_label(label).map(Resolved::Node),
            Target::External(symbol) => Some(Resolved::External(symbol)),
        }
    }

    /// Parenthesized expressions unwrapped to their content.
    #[must_use]
    pub fn strip_parentheses(self) -> NodeRef<'t> {
        let mut current = self;
        while current.kind() == NodeKind::ParenthesizedExpression {
            match current.children().next() {
                Some(inner) => current = inner,
                None => break,
            }
        }
        current
    }

    /// Text shown for `#ref` in messages: name, text, keyword, or rebuilt source.
    #[must_use]
    pub fn ref_text(&self) -> Cow<'t, str> {
        if let Some(name) = self.name() {
            return Cow::Borrowed(name);
        }
        if let Some(text) = self.text() {
            return Cow::Borrowed(text);
        }
        if let Some(keyword) = self.kind().keyword() {
            return Cow::Borrowed(keyword);
        }
        self.source_text()
    }

    /// Source text of an expression, rebuilt from children when absent.
    #[must_use]
    pub fn source_text(&self) -> Cow<'t, str> {
        if let Some(text) = self.text() {
            return Cow::Borrowed(text);
        }
        match self.kind() {
            NodeKind::BinaryExpression => {
                let operand = |role| {
                    self.child_with_role(role)
                        .map(|c| c.source_text().into_owned())
                        .unwrap_or_default()
                };
                let op = self.attrs().operator.map_or("?", BinaryOp::symbol);
                Cow::Owned(format!("{} {op} {}", operand(Role::Lhs), operand(Role::Rhs)))
            }
            NodeKind::MethodCall => {
                let args: Vec<String> = self
                    .children_with_role(Role::Argument)
                    .map(|a| a.source_text().into_owned())
                    .collect();
                let name = self.name().unwrap_or_default();
                let call = format!("{name}({})", args.join(", "));
                match self.child_with_role(Role::Qualifier) {
                    Some(q) => Cow::Owned(format!("{}.{call}", q.source_text())),
                    None => Cow::Owned(call),
                }
            }
            NodeKind::ReferenceExpression => match self.child_with_role(Role::Qualifier) {
                Some(q) => Cow::Owned(format!(
                    "{}.{}",
                    q.source_text(),
                    self.name().unwrap_or_default()
                )),
                None => Cow::Borrowed(self.name().unwrap_or_default()),
            },
            NodeKind::NewExpression => Cow::Owned(format!(
                "new {}()",
                self.name().unwrap_or_default()
            )),
            NodeKind::ParenthesizedExpression => Cow::Owned(format!(
                "({})",
                self.children()
                    .next()
                    .map(|c| c.source_text().into_owned())
                    .unwrap_or_default()
            )),
            kind => Cow::Borrowed(
                self.name()
                    .or_else(|| kind.keyword())
                    .unwrap_or_default(),
            ),
        }
    }
}

/// Declaration a reference resolved to.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'t> {
    /// Declaration in the analyzed tree.
    Node(NodeRef<'t>),
    /// Declaration outside the tree.
    External(&'t Symbol),
}

impl<'t> Resolved<'t> {
    /// Kind of the declaration.
    #[must_use]
    pub fn kind(&self) -> Option<SymbolKind> {
        match self {
            Self::Node(node) => match node.kind() {
                NodeKind::Class | NodeKind::AnonymousClass | NodeKind::TypeParameter => {
                    Some(SymbolKind::Class)
                }
                NodeKind::Method => Some(SymbolKind::Method),
                NodeKind::Field | NodeKind::EnumConstant => Some(SymbolKind::Field),
                NodeKind::LocalVariable | NodeKind::Parameter => Some(SymbolKind::Variable),
                _ => None,
            },
            Self::External(symbol) => Some(symbol.kind),
        }
    }

    /// Returns true if the declaration carries `modifier`.
    #[must_use]
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        match self {
            Self::Node(node) => node.has_modifier(modifier),
            Self::External(symbol) => symbol.modifiers.contains(&modifier),
        }
    }

    /// Qualified name of the declaration.
    #[must_use]
    pub fn qualified_name(&self) -> Option<&'t str> {
        match self {
            Self::Node(node) => node.qualified_name(),
            Self::External(symbol) => Some(symbol.qualified_name.as_str()),
        }
    }

    /// Qualified name of the class declaring this member.
    #[must_use]
    pub fn owner(&self) -> Option<&'t str> {
        match self {
            Self::Node(node) => node.containing_class().and_then(|c| c.qualified_name()),
            Self::External(symbol) => symbol.owner.as_deref(),
        }
    }

    /// Returns true for annotation types.
    #[must_use]
    pub fn is_annotation_type(&self) -> bool {
        match self {
            Self::Node(node) => {
                node.kind() == NodeKind::Class && node.class_kind() == ClassKind::Annotation
            }
            Self::External(symbol) => {
                symbol.kind == SymbolKind::Class && symbol.class_kind == ClassKind::Annotation
            }
        }
    }
}
