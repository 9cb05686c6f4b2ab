//! Process-wide table of built-in inspections.

use crate::{
    AnonymousClassMethodCountInspection, ChainedMethodCallInspection,
    CloneCallsSuperCloneInspection, ExtendsAnnotationInspection,
    FinalMethodInFinalClassInspection, InfiniteLoopStatementInspection,
    LiteralAsArgToStringEqualsInspection, MultipleDeclarationInspection,
    MultipleReturnPointsPerMethodInspection, PointlessBitwiseExpressionInspection,
    PublicFieldAccessedInSynchronizedContextInspection, SerializableClassInSecureContextInspection,
    StaticImportInspection, ThreadStopSuspendResumeInspection, TodoCommentInspection,
    TypeParameterExtendsObjectInspection,
};
use gadgets_core::{Inspection, InspectionBox};

fn boxed<I: Inspection + Default + 'static>() -> InspectionBox {
    Box::new(I::default())
}

/// Constructors of every built-in inspection, in registration order.
static INSPECTIONS: &[fn() -> InspectionBox] = &[
    boxed::<InfiniteLoopStatementInspection>,
    boxed::<FinalMethodInFinalClassInspection>,
    boxed::<AnonymousClassMethodCountInspection>,
    boxed::<MultipleReturnPointsPerMethodInspection>,
    boxed::<PointlessBitwiseExpressionInspection>,
    boxed::<TypeParameterExtendsObjectInspection>,
    boxed::<ChainedMethodCallInspection>,
    boxed::<TodoCommentInspection>,
    boxed::<StaticImportInspection>,
    boxed::<MultipleDeclarationInspection>,
    boxed::<LiteralAsArgToStringEqualsInspection>,
    boxed::<ThreadStopSuspendResumeInspection>,
    boxed::<PublicFieldAccessedInSynchronizedContextInspection>,
    boxed::<ExtendsAnnotationInspection>,
    boxed::<SerializableClassInSecureContextInspection>,
    boxed::<CloneCallsSuperCloneInspection>,
];

/// Returns a fresh instance of every built-in inspection.
#[must_use]
pub fn all_inspections() -> Vec<InspectionBox> {
    INSPECTIONS.iter().map(|make| make()).collect()
}

/// Returns the inspections enabled by default.
#[must_use]
pub fn default_inspections() -> Vec<InspectionBox> {
    all_inspections()
        .into_iter()
        .filter(|i| i.is_enabled_by_default())
        .collect()
}

/// Finds an inspection by short name or id.
#[must_use]
pub fn find(name: &str) -> Option<InspectionBox> {
    all_inspections()
        .into_iter()
        .find(|i| i.short_name() == name || i.id() == name)
}

/// Short names of every built-in inspection.
#[must_use]
pub fn names() -> Vec<&'static str> {
    all_inspections().iter().map(|i| i.short_name()).collect()
}
