//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# gadgets configuration

[analyzer]
# Attach fixes that are only offered in interactive sessions
interactive = false

# Glob patterns to exclude from analysis
exclude = [
    "**/target/**",
    "**/build/**",
]

# Respect .gitignore files
respect_gitignore = true

# Number of tree files analyzed in parallel (default: one per core)
# parallelism = 4

[telemetry]
# Print per-inspection timings after each run
enabled = false

# Inspection configurations, keyed by short name or id.
# Each inspection can be enabled/disabled and have its severity overridden.

[rules.InfiniteLoopStatement]
enabled = true
# severity = "error"

[rules.AnonymousClassMethodCount]
enabled = true
limit = 1

[rules.MultipleReturnPointsPerMethod]
enabled = true
limit = 1

# [rules.ChainedMethodCall]
# enabled = true
# ignore_field_initializations = true

# [rules.TodoComment]
# enabled = true
# pattern = "(?i)\\b(todo|fixme)\\b"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("gadgets.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created gadgets.toml");
    println!("\nNext steps:");
    println!("  1. Edit gadgets.toml to configure inspections");
    println!("  2. Run: gadgets check");

    Ok(())
}
