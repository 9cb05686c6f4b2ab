//! List rules command implementation.

use gadgets_rules::all_inspections;

/// Runs the list-rules command.
pub fn run() {
    println!("Available inspections:\n");
    println!(
        "{:<42} {:<46} {:<8} {:<5} Group",
        "Short name", "Id", "Default", "Fix"
    );
    println!("{}", "-".repeat(130));

    for inspection in all_inspections() {
        println!(
            "{:<42} {:<46} {:<8} {:<5} {}",
            inspection.short_name(),
            inspection.id(),
            if inspection.is_enabled_by_default() { "on" } else { "off" },
            if inspection.has_fix() { "yes" } else { "-" },
            inspection.group_display_name(),
        );
        if let Some(metric) = inspection.as_metric() {
            println!(
                "{:<42} {} {} (default {})",
                "",
                metric.configuration_label(),
                metric.limit(),
                metric.default_limit()
            );
        }
    }

    println!("\nUse --rules to run specific inspections, e.g.:");
    println!("  gadgets check --rules InfiniteLoopStatement,TodoComment");
    println!("  gadgets check --rules MethodWithMultipleReturnPoints");
    println!("Use --all to run every inspection not disabled in gadgets.toml.");
}
