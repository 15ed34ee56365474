//! Shared output formatting for check results.

use anyhow::Result;
use styleguard_core::{Collector, Severity};

use crate::OutputFormat;

/// Print check results in the specified format.
pub fn print(log: &Collector, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(log),
        OutputFormat::Json => return print_json(log),
        OutputFormat::Compact => print_compact(log),
    }
    Ok(())
}

fn print_text(log: &Collector) {
    for diagnostic in log.diagnostics() {
        let severity_indicator = match diagnostic.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            diagnostic.code,
            diagnostic.rule,
            diagnostic.location.file,
            diagnostic.location.line,
            diagnostic.location.column,
        );
        println!("  {}: {}", severity_indicator, diagnostic.message);
        println!();
    }

    let summary_color = if log.error_count() > 0 {
        "\x1b[31m"
    } else if log.warning_count() > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!("{}{}\x1b[0m", summary_color, log.format_summary());
}

fn print_json(log: &Collector) -> Result<()> {
    let json = serde_json::to_string_pretty(log)?;
    println!("{json}");
    Ok(())
}

fn print_compact(log: &Collector) {
    for diagnostic in log.diagnostics() {
        println!("{diagnostic}");
    }
}
