//! Automatic fix protocol.

use crate::tree::{NodeId, Tree};
use std::fmt::Debug;
use thiserror::Error;

/// An automatic correction attached to a diagnostic.
///
/// Fixes that carry no per-diagnostic state are shared across reports as a
/// single `Arc<dyn Fix>` held by the inspection. Fixes that depend on the
/// pass build a fresh instance per report.
pub trait Fix: Debug + Send + Sync {
    /// Name shown to users when the fix is offered.
    fn name(&self) -> String;

    /// Applies the fix at `anchor`.
    ///
    /// # Errors
    ///
    /// Returns [`FixError::ReadOnly`] without mutating when the tree is not
    /// writable, and [`FixError::Shape`] when the anchor no longer has the
    /// shape the fix expects.
    fn apply(&self, tree: &mut Tree, anchor: NodeId) -> Result<(), FixError>;
}

/// Errors raised while applying a fix.
#[derive(Debug, Error)]
pub enum FixError {
    /// The tree is read-only.
    #[error("file is read-only")]
    ReadOnly,

    /// The diagnostic carries no fix.
    #[error("diagnostic has no fix")]
    NoFix,

    /// The anchor is not part of the tree.
    #[error("node {0} is not part of the tree")]
    UnknownNode(NodeId),

    /// The tree no longer has the expected shape.
    #[error("cannot fix node {node}: {message}")]
    Shape {
        /// Node the fix was working on.
        node: NodeId,
        /// What was wrong.
        message: String,
    },
}

impl FixError {
    /// Shape error helper.
    #[must_use]
    pub fn shape(node: NodeId, message: impl Into<String>) -> Self {
        Self::Shape {
            node,
            message: message.into(),
        }
    }
}

/// Fails with [`FixError::ReadOnly`] unless the tree is writable.
///
/// # Errors
///
/// Returns [`FixError::ReadOnly`] for read-only trees.
pub fn ensure_writable(tree: &Tree) -> Result<(), FixError> {
    if tree.is_writable() {
        Ok(())
    } else {
        Err(FixError::ReadOnly)
    }
}
