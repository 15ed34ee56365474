//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# styleguard configuration

# Preset to run: "recommended", "strict", or "minimal"
preset = "recommended"

[checker]
# File extensions to check
extensions = ["php", "inc"]

# Glob patterns to exclude from checking
exclude = [
    "**/vendor/**",
    "**/node_modules/**",
]

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.line-length]
enabled = true
line_limit = 180
# absolute_line_limit = 0  # 0 disables the hard limit

[rules.nesting-depth]
enabled = true
# max_depth = 3
# absolute_max_depth = 10

# [rules.no-silenced-errors]
# severity = "error"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("styleguard.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created styleguard.toml");
    println!("\nNext steps:");
    println!("  1. Edit styleguard.toml to configure rules");
    println!("  2. Run: styleguard check");

    Ok(())
}
