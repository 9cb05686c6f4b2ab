//! # gadgets-rules
//!
//! Built-in inspections for gadgets.
//!
//! ## Available Inspections
//!
//! | Short name | Id | Default | Fix |
//! |------------|----|---------|-----|
//! | `InfiniteLoopStatement` | = | on | - |
//! | `FinalMethodInFinalClass` | = | off | Remove 'final' modifier |
//! | `AnonymousClassMethodCount` | `AnonymousInnerClassWithTooManyMethods` | off | Convert to named inner class |
//! | `MultipleReturnPointsPerMethod` | `MethodWithMultipleReturnPoints` | off | - |
//! | `PointlessBitwiseExpression` | = | on | Simplify |
//! | `TypeParameterExtendsObject` | `TypeParameterExplicitlyExtendsObject` | on | Remove redundant 'extends Object' |
//! | `ChainedMethodCall` | = | off | Introduce variable |
//! | `TodoComment` | = | off | - |
//! | `StaticImport` | = | off | - |
//! | `MultipleDeclaration` | `MultipleVariablesInDeclaration` | off | Split into multiple declarations |
//! | `LiteralAsArgToStringEquals` | = | off | Flip .equals() |
//! | `ThreadStopSuspendResume` | `CallToThreadStopSuspendOrResumeManager` | off | - |
//! | `PublicFieldAccessedInSynchronizedContext` | `NonPrivateFieldAccessedInSynchronizedContext` | off | - |
//! | `ExtendsAnnotation` | `ClassExplicitlyAnnotation` | on | - |
//! | `SerializableClassInSecureContext` | = | off | - |
//! | `CloneCallsSuperClone` | `CloneDoesntCallSuperClone` | on | - |
//!
//! ## Usage
//!
//! ```ignore
//! use gadgets_core::Analyzer;
//! use gadgets_rules::all_inspections;
//!
//! let analyzer = Analyzer::builder()
//!     .inspections(all_inspections())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod anonymous_class_method_count;
mod chained_method_call;
mod clone_calls_super_clone;
mod extends_annotation;
mod final_method_in_final_class;
mod fixes;
pub mod groups;
mod infinite_loop_statement;
mod literal_as_arg_to_string_equals;
mod multiple_declaration;
mod multiple_return_points_per_method;
mod pointless_bitwise_expression;
mod public_field_accessed_in_synchronized_context;
mod registry;
mod serializable_class_in_secure_context;
mod static_import;
mod thread_stop_suspend_resume;
mod todo_comment;
mod type_parameter_extends_object;

pub use anonymous_class_method_count::AnonymousClassMethodCountInspection;
pub use chained_method_call::ChainedMethodCallInspection;
pub use clone_calls_super_clone::CloneCallsSuperCloneInspection;
pub use extends_annotation::ExtendsAnnotationInspection;
pub use final_method_in_final_class::FinalMethodInFinalClassInspection;
pub use fixes::{MoveAnonymousToInnerClassFix, NormalizeDeclarationFix, RemoveModifierFix};
pub use infinite_loop_statement::InfiniteLoopStatementInspection;
pub use literal_as_arg_to_string_equals::LiteralAsArgToStringEqualsInspection;
pub use multiple_declaration::MultipleDeclarationInspection;
pub use multiple_return_points_per_method::MultipleReturnPointsPerMethodInspection;
pub use pointless_bitwise_expression::PointlessBitwiseExpressionInspection;
pub use public_field_accessed_in_synchronized_context::PublicFieldAccessedInSynchronizedContextInspection;
pub use registry::{all_inspections, default_inspections, find, names};
pub use serializable_class_in_secure_context::SerializableClassInSecureContextInspection;
pub use static_import::StaticImportInspection;
pub use thread_stop_suspend_resume::ThreadStopSuspendResumeInspection;
pub use todo_comment::TodoCommentInspection;
pub use type_parameter_extends_object::TypeParameterExtendsObjectInspection;

/// Re-export core types for convenience.
pub use gadgets_core::{Diagnostic, Inspection, Severity};
