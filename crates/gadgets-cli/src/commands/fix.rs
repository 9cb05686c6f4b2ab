//! Fix command implementation.

use anyhow::{bail, Context, Result};
use gadgets_core::{Analyzer, Diagnostic, FixError, Tree};
use gadgets_rules::all_inspections;
use std::path::Path;

use super::check::load_tree;
use crate::config_resolver::ConfigSource;

/// Outcome of applying the fixes of one analysis.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FixSummary {
    pub applied: usize,
    pub skipped: usize,
}

/// Runs the fix command.
pub fn run(
    file: &Path,
    rules: Option<Vec<String>>,
    output: Option<&Path>,
    source: &ConfigSource,
) -> Result<()> {
    let config = source.load()?;
    let mut builder = Analyzer::builder()
        .inspections(all_inspections())
        .config(config)
        .interactive(true);
    if let Some(rules) = rules {
        builder = builder.only(rules);
    }
    let analyzer = builder.build().context("Failed to build analyzer")?;

    let mut tree = load_tree(file)?;
    if !tree.is_writable() {
        bail!("{} is read-only", file.display());
    }

    let result = analyzer.analyze(&tree);
    let summary = apply_all(&mut tree, &result.diagnostics);

    let target = output.unwrap_or(file);
    let json = tree.to_json().context("Failed to serialize tree")?;
    std::fs::write(target, json).with_context(|| format!("Failed to write {}", target.display()))?;

    println!(
        "Applied {} fix(es), skipped {} in {}",
        summary.applied,
        summary.skipped,
        target.display()
    );
    Ok(())
}

/// Applies every attached fix, last diagnostic first so edits deeper in the
/// tree land before their ancestors change shape.
pub fn apply_all(tree: &mut Tree, diagnostics: &[Diagnostic]) -> FixSummary {
    let mut summary = FixSummary::default();
    for diagnostic in diagnostics.iter().rev() {
        let Some(name) = diagnostic.fix_name() else {
            continue;
        };
        match diagnostic.apply_fix(tree) {
            Ok(()) => {
                tracing::debug!("{}: applied '{}' at {}", diagnostic.rule, name, diagnostic.anchor);
                summary.applied += 1;
            }
            // an earlier fix may have detached or reshaped this anchor
            Err(e @ (FixError::UnknownNode(_) | FixError::Shape { .. })) => {
                tracing::debug!("{}: skipped '{}': {}", diagnostic.rule, name, e);
                summary.skipped += 1;
            }
            Err(e) => {
                tracing::warn!("{}: '{}' failed: {}", diagnostic.rule, name, e);
                summary.skipped += 1;
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use gadgets_core::{FileSpec, Modifier, NodeKind, NodeSpec};

    fn final_class_with_methods(names: &[&str]) -> FileSpec {
        FileSpec::new(
            NodeSpec::file().child(
                NodeSpec::class("Point")
                    .modifier(Modifier::Final)
                    .children(names.iter().map(|n| {
                        NodeSpec::new(NodeKind::Method)
                            .named(*n)
                            .returns("int")
                            .modifier(Modifier::Final)
                    })),
            ),
        )
    }

    fn analyzer() -> Analyzer {
        Analyzer::builder()
            .inspections(all_inspections())
            .only(["FinalMethodInFinalClass"])
            .interactive(true)
            .build()
            .unwrap()
    }

    #[test]
    fn applies_every_fix() {
        let mut tree = Tree::from_spec(final_class_with_methods(&["x", "y"]));
        let result = analyzer().analyze(&tree);
        let summary = apply_all(&mut tree, &result.diagnostics);
        assert_eq!(summary, FixSummary { applied: 2, skipped: 0 });
        assert!(analyzer().analyze(&tree).diagnostics.is_empty());
    }

    #[test]
    fn read_only_tree_is_left_alone() {
        let spec = final_class_with_methods(&["x"]);
        let result = analyzer().analyze(&Tree::from_spec(spec.clone()));

        let mut read_only = Tree::from_spec(spec.read_only());
        let summary = apply_all(&mut read_only, &result.diagnostics);
        assert_eq!(summary, FixSummary { applied: 0, skipped: 1 });
        assert_eq!(analyzer().analyze(&read_only).diagnostics.len(), 1);
    }

    #[test]
    fn writes_fixed_tree_to_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let input = tmp.path().join("Point.json");
        let output = tmp.path().join("Fixed.json");
        std::fs::write(
            &input,
            Tree::from_spec(final_class_with_methods(&["x"])).to_json().unwrap(),
        )
        .unwrap();

        run(
            &input,
            Some(vec!["FinalMethodInFinalClass".into()]),
            Some(&output),
            &ConfigSource::Default,
        )
        .unwrap();

        let fixed = load_tree(&output).unwrap();
        assert!(analyzer().analyze(&fixed).diagnostics.is_empty());
        let original = load_tree(&input).unwrap();
        assert_eq!(analyzer().analyze(&original).diagnostics.len(), 1);
    }
}
