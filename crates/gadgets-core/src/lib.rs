//! # gadgets-core
//!
//! Inspection execution framework for syntax-tree based static analysis.
//!
//! This crate provides the contract shared by every inspection and the
//! machinery that runs them:
//!
//! - [`Tree`] and [`NodeRef`], the host syntax tree handed to inspections
//! - [`Visit`], the per-node-kind traversal protocol
//! - [`Inspection`] and [`MetricInspection`], the rule contracts
//! - [`DiagnosticSink`] and [`Diagnostic`], the reporting model
//! - [`Fix`], the optional automatic-fix protocol
//! - [`Instrumented`] and [`Telemetry`], timing around rule execution
//! - [`Analyzer`], the reference scheduler that drives all of the above
//!
//! ## Example
//!
//! ```ignore
//! use gadgets_core::{Analyzer, Tree};
//!
//! let tree = Tree::from_json(&std::fs::read_to_string("Foo.json")?)?;
//! let analyzer = Analyzer::builder()
//!     .inspection(MyInspection::default())
//!     .build()?;
//!
//! let result = analyzer.analyze(&tree);
//! for diagnostic in &result.diagnostics {
//!     println!("{diagnostic}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod constant;
mod diagnostic;
mod fix;
mod instrument;
mod metric;
mod rule;
mod scoped;
mod telemetry;

/// Derived control-flow predicates over statements and methods.
pub mod flow;
/// Host syntax tree model.
pub mod tree;
/// Traversal protocol.
pub mod visit;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig, TelemetryConfig};
pub use constant::Constant;
pub use diagnostic::{
    render_template, AnalysisResult, Diagnostic, DiagnosticReport, DiagnosticSink, Location,
    PassFailure, Severity,
};
pub use fix::{ensure_writable, Fix, FixError};
pub use instrument::Instrumented;
pub use metric::{exceeds, MetricInspection, Threshold};
pub use rule::{
    check_scope, check_tree, short_name_of, CancelFlag, Inspection, InspectionBox, PassOptions,
    Reporter, Scope, ScopeKind,
};
pub use scoped::{Restore, ScopedValue};
pub use telemetry::{
    LocalTelemetry, NoTelemetry, ProcessTelemetry, RuleTiming, Sample, Telemetry,
    TelemetrySettings, TimingGuard,
};
pub use tree::{
    Attrs, BinaryOp, ClassKind, FileSpec, Modifier, Node, NodeId, NodeKind, NodeRef, NodeSpec, Resolved,
    Role, Span, Symbol, SymbolKind, Target, Tree, TreeError,
};
pub use visit::Visit;
