//! Check command implementation.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use styleguard_core::{CheckerConfig, Collector, Config, Engine, RuleBox};
use styleguard_rules::{build_rule, configured_rules, Preset};

use super::output;
use crate::config_resolver::{self, ConfigSource};
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    preset_flag: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let target_dir = if path.is_file() {
        path.parent().unwrap_or(Path::new(".")).to_path_buf()
    } else {
        path.to_path_buf()
    };

    let source = config_resolver::resolve(&target_dir, config_path);
    let config = match &source {
        ConfigSource::Default => Config::default(),
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p)
                .with_context(|| format!("Failed to load config: {}", p.display()))?
        }
    };

    let preset_name = preset_flag.or_else(|| config.preset.clone());
    let preset = match preset_name.as_deref() {
        None => Preset::Recommended,
        Some(name) => match Preset::from_name(name) {
            Some(preset) => preset,
            None => bail!("Unknown preset: {name}"),
        },
    };

    let rules = if let Some(filter) = rules_filter {
        filter_rules(&filter, &config)?
    } else {
        configured_rules(preset, &config).context("Invalid rule configuration")?
    };

    let mut builder = Engine::builder().config(config.clone());
    for rule in rules {
        builder = builder.rule_box(rule);
    }
    let engine = builder.build().context("Failed to build engine")?;

    tracing::info!("Checking {:?} with {} rules", path, engine.rule_count());

    let files = discover_files(path, &config.checker, &exclude)?;
    tracing::info!("Found {} files to check", files.len());

    let mut log = Collector::new();
    for file in &files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        engine.check_file(&file.display().to_string(), &content, &mut log);
    }

    output::print(&log, format)?;

    // Exit with error code if there are errors
    if log.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

fn filter_rules(filter: &str, config: &Config) -> Result<Vec<RuleBox>> {
    let mut rules: Vec<RuleBox> = Vec::new();
    for name in filter.split(',').map(str::trim) {
        match build_rule(name, config).context("Invalid rule configuration")? {
            Some(rule) => rules.push(rule),
            None => tracing::warn!("Unknown rule: {}", name),
        }
    }
    Ok(rules)
}

/// Discovers the source files to check under `path`.
fn discover_files(path: &Path, checker: &CheckerConfig, extra_exclude: &[String]) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut exclude = checker.exclude.clone();
    exclude.extend(extra_exclude.iter().cloned());

    let mut files = Vec::new();
    for ext in &checker.extensions {
        let pattern = format!("{}/**/*.{ext}", path.display());
        for entry in glob::glob(&pattern).with_context(|| format!("Bad pattern: {pattern}"))? {
            let file = entry?;
            if should_exclude(&file, &exclude) {
                tracing::debug!("Excluding: {}", file.display());
                continue;
            }
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}

/// Checks if a path matches any exclude pattern.
fn should_exclude(path: &Path, patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy();

    for pattern in patterns {
        if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
            if glob_pattern.matches(&path_str) {
                return true;
            }
        }

        // Also check as substring for patterns like "**/vendor/**"
        let normalized = pattern.replace("**", "");
        if !normalized.is_empty() && path_str.contains(&normalized) {
            return true;
        }
    }

    false
}
