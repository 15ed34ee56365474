//! Rule presets and configuration-aware rule construction.

use styleguard_core::{Config, ConfigError, RuleBox};

use crate::{
    ArrayDeclaration, DocCommentAlignment, EmptyStatement, ForbiddenTokens, FunctionComment,
    LineLength, NestingDepth, SemicolonSpacing, SilencedErrors, SuperfluousWhitespace,
    UnusedParameter,
};

/// Preset configurations for styleguard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    Recommended,
    /// Every rule, with stricter settings.
    Strict,
    /// Minimal rules for gradual adoption.
    Minimal,
}

impl Preset {
    /// Parses a preset name from configuration.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Everything except the doc-comment contract checks, which teams
/// usually adopt once the spacing rules are green.
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ArrayDeclaration::new()),
        Box::new(NestingDepth::new()),
        Box::new(ForbiddenTokens::new()),
        Box::new(SilencedErrors::new()),
        Box::new(EmptyStatement::new()),
        Box::new(SemicolonSpacing::new()),
        Box::new(DocCommentAlignment::new()),
        Box::new(LineLength::new()),
        Box::new(SuperfluousWhitespace::new()),
    ]
}

/// Returns the strict set of rules: all of them, with silenced errors
/// upgraded to errors.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ArrayDeclaration::new()),
        Box::new(NestingDepth::new()),
        Box::new(ForbiddenTokens::new()),
        Box::new(SilencedErrors::new().error(true)),
        Box::new(EmptyStatement::new()),
        Box::new(SemicolonSpacing::new()),
        Box::new(DocCommentAlignment::new()),
        Box::new(FunctionComment::new()),
        Box::new(LineLength::new()),
        Box::new(SuperfluousWhitespace::new()),
        Box::new(UnusedParameter::new()),
    ]
}

/// Returns the minimal set of rules.
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ForbiddenTokens::new()),
        Box::new(SilencedErrors::new()),
        Box::new(EmptyStatement::new()),
    ]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ArrayDeclaration::new()),
        Box::new(NestingDepth::new()),
        Box::new(ForbiddenTokens::new()),
        Box::new(SilencedErrors::new()),
        Box::new(EmptyStatement::new()),
        Box::new(SemicolonSpacing::new()),
        Box::new(DocCommentAlignment::new()),
        Box::new(FunctionComment::new()),
        Box::new(LineLength::new()),
        Box::new(SuperfluousWhitespace::new()),
        Box::new(UnusedParameter::new()),
    ]
}

/// Builds one rule by name or code, honoring its `[rules.*]` section.
///
/// Returns `Ok(None)` for unknown names so callers can report them.
///
/// # Errors
///
/// Returns an error when the rule's configuration section holds an
/// invalid option value.
pub fn build_rule(name: &str, config: &Config) -> Result<Option<RuleBox>, ConfigError> {
    let section = config.rules.get(name);
    let rule: RuleBox = match name {
        "array-declaration" | "SG001" => Box::new(ArrayDeclaration::new()),
        "nesting-depth" | "SG002" => match section {
            Some(c) => Box::new(NestingDepth::from_config(c)?),
            None => Box::new(NestingDepth::new()),
        },
        "forbidden-tokens" | "SG003" => match section {
            Some(c) => Box::new(ForbiddenTokens::from_config(c)?),
            None => Box::new(ForbiddenTokens::new()),
        },
        "no-silenced-errors" | "SG004" => match section {
            Some(c) => Box::new(SilencedErrors::from_config(c)?),
            None => Box::new(SilencedErrors::new()),
        },
        "empty-statement" | "SG005" => Box::new(EmptyStatement::new()),
        "semicolon-spacing" | "SG006" => Box::new(SemicolonSpacing::new()),
        "doc-comment-alignment" | "SG007" => Box::new(DocCommentAlignment::new()),
        "function-doc-comment" | "SG008" => Box::new(FunctionComment::new()),
        "line-length" | "SG009" => match section {
            Some(c) => Box::new(LineLength::from_config(c)?),
            None => Box::new(LineLength::new()),
        },
        "superfluous-whitespace" | "SG010" => Box::new(SuperfluousWhitespace::new()),
        "unused-parameter" | "SG011" => Box::new(UnusedParameter::new()),
        _ => {
            tracing::debug!("No rule registered under '{name}'");
            return Ok(None);
        }
    };
    Ok(Some(rule))
}

/// Builds a preset's rules with every `[rules.*]` option applied.
///
/// # Errors
///
/// Returns an error when a configuration section holds an invalid
/// option value.
pub fn configured_rules(preset: Preset, config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    let mut rules = Vec::new();
    for default in preset.rules() {
        // Only rebuild when the rule actually has a section; preset
        // tweaks (e.g. strict settings) stand otherwise.
        if config.rules.contains_key(default.name()) {
            if let Some(rule) = build_rule(default.name(), config)? {
                rules.push(rule);
                continue;
            }
        }
        rules.push(default);
    }

    // A configured rule outside the preset is an opt-in; register it
    // too, in name order for reproducible dispatch.
    let mut extra: Vec<&String> = config
        .rules
        .keys()
        .filter(|name| !rules.iter().any(|r| r.name() == name.as_str()))
        .collect();
    extra.sort();
    for name in extra {
        if let Some(rule) = build_rule(name, config)? {
            rules.push(rule);
        }
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_not_empty() {
        assert!(!Preset::Recommended.rules().is_empty());
        assert!(!Preset::Strict.rules().is_empty());
        assert!(!Preset::Minimal.rules().is_empty());
        assert_eq!(all_rules().len(), 11);
    }

    #[test]
    fn strict_includes_everything() {
        assert_eq!(strict_rules().len(), all_rules().len());
    }

    #[test]
    fn build_rule_accepts_names_and_codes() {
        let config = Config::default();
        assert!(build_rule("line-length", &config)
            .expect("valid")
            .is_some());
        assert!(build_rule("SG009", &config).expect("valid").is_some());
        assert!(build_rule("no-such-rule", &config).expect("valid").is_none());
    }

    #[test]
    fn configured_rules_pick_up_options() {
        let config = Config::parse("[rules.nesting-depth]\nmax_depth = 1\n").expect("parse");
        let rules = configured_rules(Preset::Recommended, &config).expect("valid");
        assert_eq!(rules.len(), recommended_rules().len());
    }

    #[test]
    fn invalid_options_surface_at_build_time() {
        let config = Config::parse("[rules.line-length]\nline_limit = -5\n").expect("parse");
        let err = match build_rule("line-length", &config) {
            Err(e) => e,
            Ok(_) => panic!("negative limit must be rejected"),
        };
        assert!(matches!(err, ConfigError::InvalidOption { .. }));
    }

    #[test]
    fn preset_names_parse() {
        assert_eq!(Preset::from_name("strict"), Some(Preset::Strict));
        assert_eq!(Preset::from_name("fancy"), None);
    }
}
