//! Group display names shared by the built-in inspections.

/// Probable bugs.
pub const BUGS: &str = "Probable bugs";
/// Class structure.
pub const CLASS_LAYOUT: &str = "Class structure";
/// Class metrics.
pub const CLASS_METRICS: &str = "Class metrics";
/// Method metrics.
pub const METHOD_METRICS: &str = "Method metrics";
/// Verbose or redundant code constructs.
pub const VERBOSE: &str = "Verbose or redundant code constructs";
/// Potentially confusing code constructs.
pub const CONFUSING: &str = "Potentially confusing code constructs";
/// Code maturity issues.
pub const MATURITY: &str = "Code maturity issues";
/// Imports.
pub const IMPORTS: &str = "Imports";
/// Code style issues.
pub const STYLE: &str = "Code style issues";
/// Threading issues.
pub const THREADING: &str = "Threading issues";
/// Security issues.
pub const SECURITY: &str = "Security issues";
/// Cloning issues.
pub const CLONEABLE: &str = "Cloning issues";
