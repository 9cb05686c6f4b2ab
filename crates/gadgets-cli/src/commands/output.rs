//! Shared output formatting for analysis results.

use anyhow::Result;
use gadgets_core::{AnalysisResult, DiagnosticReport, Severity};
use miette::NamedSource;
use serde::Serialize;
use std::path::PathBuf;

use crate::OutputFormat;

/// Result of analyzing one tree file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// Path of the source file the tree describes.
    pub path: PathBuf,
    /// Source text, when the tree carries it.
    #[serde(skip)]
    pub source: Option<String>,
    /// Diagnostics and failures for the file.
    #[serde(flatten)]
    pub result: AnalysisResult,
}

/// Print analysis results in the specified format.
pub fn print(reports: &[FileReport], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(reports),
        OutputFormat::Pretty => print_pretty(reports),
        OutputFormat::Json => return print_json(reports),
        OutputFormat::Compact => print_compact(reports),
    }
    Ok(())
}

fn print_text(reports: &[FileReport]) {
    for report in reports {
        for diagnostic in &report.result.diagnostics {
            let severity_indicator = match diagnostic.severity {
                Severity::Error => "\x1b[31merror\x1b[0m",
                Severity::Warning => "\x1b[33mwarning\x1b[0m",
                Severity::Info => "\x1b[34minfo\x1b[0m",
            };
            match &diagnostic.location {
                Some(location) => println!("{} {} at {}", diagnostic.id, diagnostic.rule, location),
                None => println!(
                    "{} {} at {} (node {})",
                    diagnostic.id,
                    diagnostic.rule,
                    report.path.display(),
                    diagnostic.anchor
                ),
            }
            println!("  {}: {}", severity_indicator, diagnostic.message);
            if let Some(name) = diagnostic.fix_name() {
                println!("  = fix: {name}");
            }
            println!();
        }
    }
    print_failures(reports);
    print_summary(reports);
}

fn print_pretty(reports: &[FileReport]) {
    for report in reports {
        for diagnostic in &report.result.diagnostics {
            let rendered = miette::Report::new(DiagnosticReport::from(diagnostic));
            let rendered = match &report.source {
                Some(source) => rendered.with_source_code(NamedSource::new(
                    report.path.display().to_string(),
                    source.clone(),
                )),
                None => rendered,
            };
            println!("{rendered:?}");
        }
    }
    print_failures(reports);
    print_summary(reports);
}

fn print_failures(reports: &[FileReport]) {
    for report in reports {
        for failure in &report.result.failures {
            println!(
                "\x1b[31m{} failed\x1b[0m on {} at node {}: {}",
                failure.rule,
                report.path.display(),
                failure.scope,
                failure.message
            );
        }
    }
}

fn print_summary(reports: &[FileReport]) {
    let (mut errors, mut warnings, mut infos) = (0, 0, 0);
    for report in reports {
        let (e, w, i) = report.result.count_by_severity();
        errors += e;
        warnings += w;
        infos += i;
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color,
        errors,
        warnings,
        infos,
        reports.len()
    );
}

fn print_json(reports: &[FileReport]) -> Result<()> {
    let json = serde_json::to_string_pretty(reports)?;
    println!("{json}");
    Ok(())
}

fn print_compact(reports: &[FileReport]) {
    for report in reports {
        for diagnostic in &report.result.diagnostics {
            let location = diagnostic
                .location
                .as_ref()
                .map_or_else(|| report.path.display().to_string(), ToString::to_string);
            println!(
                "{}: {} [{}] {}",
                location, diagnostic.severity, diagnostic.id, diagnostic.message,
            );
        }
    }
}
