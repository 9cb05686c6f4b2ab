//! Check command implementation.

use anyhow::{Context, Result};
use gadgets_core::{Analyzer, AnalyzerConfig, ProcessTelemetry, Tree};
use gadgets_rules::all_inspections;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use super::output::{self, FileReport};
use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Extension of serialized tree files.
const TREE_EXTENSION: &str = "json";

/// Command-line options of `gadgets check`.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub format: OutputFormat,
    pub rules: Option<Vec<String>>,
    pub all: bool,
    pub interactive: bool,
    pub telemetry: bool,
    pub exclude: Vec<String>,
}

/// Runs the check command.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<()> {
    let mut config = source.load()?;
    config.analyzer.exclude.extend(options.exclude.iter().cloned());
    let telemetry = options.telemetry || config.telemetry.enabled;
    ProcessTelemetry::set_enabled(telemetry);
    let analyzer_config = config.analyzer.clone();

    let analyzer = build_analyzer(config, options)?;
    let files = discover_files(path, &analyzer_config)?;
    tracing::info!(
        "Analyzing {} tree file(s) with {} of {} inspections",
        files.len(),
        analyzer.enabled_count(),
        analyzer.rule_count()
    );

    // 0 lets rayon pick one thread per core
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(analyzer_config.parallelism.unwrap_or(0))
        .build()
        .context("Failed to start worker pool")?;
    let reports: Vec<FileReport> = pool.install(|| {
        files
            .par_iter()
            .filter_map(|file| match check_file(&analyzer, file) {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::warn!("Skipping {}: {:#}", file.display(), e);
                    None
                }
            })
            .collect()
    });

    output::print(&reports, options.format)?;

    if telemetry {
        eprintln!("\n{}", ProcessTelemetry::global().format_summary());
    }

    if reports.iter().any(|r| r.result.has_errors()) {
        std::process::exit(1);
    }

    Ok(())
}

fn build_analyzer(config: gadgets_core::Config, options: &CheckOptions) -> Result<Analyzer> {
    let mut builder = Analyzer::builder()
        .inspections(all_inspections())
        .config(config)
        .enable_all(options.all);
    if options.interactive {
        builder = builder.interactive(true);
    }
    if let Some(rules) = &options.rules {
        builder = builder.only(rules.iter().cloned());
    }
    builder.build().context("Failed to build analyzer")
}

/// Loads one tree file and analyzes it.
pub(crate) fn check_file(analyzer: &Analyzer, file: &Path) -> Result<FileReport> {
    let tree = load_tree(file)?;
    let result = analyzer.analyze(&tree);
    Ok(FileReport {
        path: tree.path().map_or_else(|| file.to_path_buf(), Path::to_path_buf),
        source: tree.source().map(str::to_owned),
        result,
    })
}

/// Reads a tree file. Trees without a recorded path take the file's path.
pub(crate) fn load_tree(file: &Path) -> Result<Tree> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let tree = Tree::from_json(&json)
        .with_context(|| format!("Failed to parse tree {}", file.display()))?;
    Ok(if tree.path().is_some() {
        tree
    } else {
        tree.with_path(file)
    })
}

/// Collects tree files under `root`, honoring gitignore and exclude globs.
pub(crate) fn discover_files(root: &Path, config: &AnalyzerConfig) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let excludes = config
        .exclude
        .iter()
        .map(|pattern| {
            glob::Pattern::new(pattern)
                .with_context(|| format!("Invalid exclude pattern: {pattern}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut builder = ignore::WalkBuilder::new(root);
    builder.hidden(false).git_ignore(config.respect_gitignore);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(TREE_EXTENSION) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if excludes
            .iter()
            .any(|p| p.matches_path(relative) || p.matches_path(path))
        {
            tracing::debug!("Excluded {}", path.display());
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gadgets_core::{FileSpec, Modifier, NodeKind, NodeSpec, Severity};
    use std::fs;
    use tempfile::TempDir;

    fn final_point() -> FileSpec {
        FileSpec::new(
            NodeSpec::file().child(
                NodeSpec::class("Point").modifier(Modifier::Final).child(
                    NodeSpec::new(NodeKind::Method)
                        .named("x")
                        .returns("int")
                        .modifier(Modifier::Final),
                ),
            ),
        )
    }

    fn write_tree(path: &Path, spec: FileSpec) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, Tree::from_spec(spec).to_json().unwrap()).unwrap();
    }

    #[test]
    fn discovers_tree_files_and_skips_excluded() {
        let tmp = TempDir::new().unwrap();
        write_tree(&tmp.path().join("src/Point.json"), final_point());
        write_tree(&tmp.path().join("build/Generated.json"), final_point());
        fs::write(tmp.path().join("src/notes.txt"), "").unwrap();

        let files = discover_files(tmp.path(), &AnalyzerConfig::default()).unwrap();
        assert_eq!(files, vec![tmp.path().join("src/Point.json")]);
    }

    #[test]
    fn single_file_is_taken_as_is() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("Point.json");
        write_tree(&file, final_point());
        assert_eq!(
            discover_files(&file, &AnalyzerConfig::default()).unwrap(),
            vec![file]
        );
    }

    #[test]
    fn invalid_exclude_pattern_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let config = AnalyzerConfig {
            exclude: vec!["[".into()],
            ..AnalyzerConfig::default()
        };
        assert!(discover_files(tmp.path(), &config).is_err());
    }

    #[test]
    fn check_file_reports_with_file_path() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("Point.json");
        write_tree(&file, final_point());

        let options = CheckOptions {
            format: OutputFormat::Text,
            rules: Some(vec!["FinalMethodInFinalClass".into()]),
            all: false,
            interactive: false,
            telemetry: false,
            exclude: Vec::new(),
        };
        let analyzer = build_analyzer(gadgets_core::Config::default(), &options).unwrap();
        let report = check_file(&analyzer, &file).unwrap();

        assert_eq!(report.path, file);
        assert_eq!(report.result.diagnostics.len(), 1);
        assert_eq!(report.result.diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn malformed_tree_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("Broken.json");
        fs::write(&file, "{ not json").unwrap();
        assert!(load_tree(&file).is_err());
    }
}
