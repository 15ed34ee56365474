//! Rule limiting how deeply a function body nests.
//!
//! # Configuration
//!
//! - `max_depth`: nesting beyond this warns (default: 3)
//! - `absolute_max_depth`: nesting beyond this errors (default: 10)
//!
//! A function exceeding both thresholds reports once, at the stricter
//! severity.

use styleguard_core::{
    ConfigError, Diagnostic, FileContext, Rule, RuleConfig, Severity, TokenKind,
};

/// Rule code for nesting-depth.
pub const CODE: &str = "SG002";

/// Rule name for nesting-depth.
pub const NAME: &str = "nesting-depth";

/// Flags functions whose bodies nest beyond the thresholds.
#[derive(Debug, Clone)]
pub struct NestingDepth {
    /// Nesting beyond this warns.
    pub max_depth: usize,
    /// Nesting beyond this errors.
    pub absolute_max_depth: usize,
}

impl Default for NestingDepth {
    fn default() -> Self {
        Self::new()
    }
}

impl NestingDepth {
    /// Creates a new rule with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: 3,
            absolute_max_depth: 10,
        }
    }

    /// Sets the warning threshold.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the error threshold.
    #[must_use]
    pub fn absolute_max_depth(mut self, depth: usize) -> Self {
        self.absolute_max_depth = depth;
        self
    }

    /// Builds the rule from its configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error when a threshold option is not a non-negative
    /// integer.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let defaults = Self::new();
        Ok(Self {
            max_depth: config.get_limit(NAME, "max_depth", defaults.max_depth)?,
            absolute_max_depth: config.get_limit(
                NAME,
                "absolute_max_depth",
                defaults.absolute_max_depth,
            )?,
        })
    }
}

impl Rule for NestingDepth {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits the nesting level of function bodies"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn kinds(&self) -> &'static [TokenKind] {
        &[TokenKind::KeywordFunction]
    }

    fn check(&self, ctx: &FileContext<'_>, at: usize) -> Vec<Diagnostic> {
        let note = ctx.note(at);
        // Declarations without a body have nothing to measure.
        let (Some(opener), Some(closer)) = (note.owned_opener, note.owned_closer) else {
            return Vec::new();
        };

        let mut max_seen = 0;
        for i in (opener + 1)..closer {
            max_seen = max_seen.max(ctx.note(i).depth);
        }

        // The function's own body does not count toward its nesting.
        let nesting = max_seen.saturating_sub(note.depth + 1);

        if nesting > self.absolute_max_depth {
            return vec![Diagnostic::new(
                CODE,
                NAME,
                Severity::Error,
                ctx.location(at),
                format!(
                    "Function's nesting level ({nesting}) exceeds allowed maximum of {}",
                    self.absolute_max_depth
                ),
            )];
        }
        if nesting > self.max_depth {
            return vec![Diagnostic::new(
                CODE,
                NAME,
                Severity::Warning,
                ctx.location(at),
                format!(
                    "Function's nesting level ({nesting}) exceeds {}; consider refactoring the function",
                    self.max_depth
                ),
            )];
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::run_rule;

    /// A function body with `levels` of nested conditionals.
    fn nested_function(levels: usize) -> String {
        let mut body = String::from("function deep($a) {\n");
        for i in 0..levels {
            body.push_str(&format!("if ($a > {i}) {{\n"));
        }
        body.push_str("f();\n");
        for _ in 0..levels {
            body.push_str("}\n");
        }
        body.push('}');
        body
    }

    #[test]
    fn shallow_functions_pass() {
        assert!(run_rule(&NestingDepth::new(), &nested_function(3)).is_empty());
    }

    #[test]
    fn four_levels_warn_once() {
        let found = run_rule(&NestingDepth::new(), &nested_function(4));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Warning);
        assert_eq!(
            found[0].message,
            "Function's nesting level (4) exceeds 3; consider refactoring the function"
        );
    }

    #[test]
    fn eleven_levels_error_once_not_twice() {
        let found = run_rule(&NestingDepth::new(), &nested_function(11));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Error);
        assert_eq!(
            found[0].message,
            "Function's nesting level (11) exceeds allowed maximum of 10"
        );
    }

    #[test]
    fn thresholds_are_configurable() {
        let rule = NestingDepth::new().max_depth(1);
        let found = run_rule(&rule, &nested_function(2));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Warning);
    }

    #[test]
    fn bodiless_declarations_are_skipped() {
        assert!(run_rule(&NestingDepth::new(), "function stub($a);").is_empty());
    }

    #[test]
    fn methods_measure_from_their_own_body() {
        // The class wrapper adds a brace level that must not count.
        let source = "class C {\nfunction m($a) {\nif ($a) {\nif ($a) {\nif ($a) {\nf();\n}\n}\n}\n}\n}";
        assert!(run_rule(&NestingDepth::new(), source).is_empty());
    }
}
