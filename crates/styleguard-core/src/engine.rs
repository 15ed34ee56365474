//! Engine orchestrating rule dispatch over token streams.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::{Config, ConfigError};
use crate::context::FileContext;
use crate::diagnostics::{Collector, Diagnostic, Location, Severity};
use crate::rule::{Rule, RuleBox};
use crate::stream::TokenStream;
use crate::structure::StructureIndex;
use crate::token::TokenKind;

/// Code reported when a file's delimiters do not balance.
pub const MALFORMED_CODE: &str = "SG000";
/// Rule name reported for unbalanced input.
pub const MALFORMED_RULE: &str = "malformed-input";
/// Code reported when a rule implementation faults.
pub const INTERNAL_CODE: &str = "SG999";
/// Rule name reported for a faulted rule.
pub const INTERNAL_RULE: &str = "internal-rule-error";

/// Errors that can occur while building an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration was invalid; nothing has been checked.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Builder for configuring an [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule. Registration order fixes reporting order when
    /// several rules fire on the same token.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Registers a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the engine, validating the configuration against the
    /// registered rules.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration names unknown rules;
    /// the failure happens here, before any file is processed.
    pub fn build(self) -> Result<Engine, EngineError> {
        let config = self.config.unwrap_or_default();

        let known: Vec<&str> = self.rules.iter().map(|r| r.name()).collect();
        config.validate(&known)?;

        // Kind -> rule indices, appended in registration order.
        let mut dispatch: HashMap<TokenKind, Vec<usize>> = HashMap::new();
        for (slot, rule) in self.rules.iter().enumerate() {
            for &kind in rule.kinds() {
                let interested = dispatch.entry(kind).or_default();
                if !interested.contains(&slot) {
                    interested.push(slot);
                }
            }
        }

        Ok(Engine {
            rules: self.rules,
            dispatch,
            config,
        })
    }
}

/// Runs registered rules over token streams, one file at a time.
///
/// The registry is read-only after [`EngineBuilder::build`]; the engine
/// may be shared across threads, with each worker holding its own
/// [`Collector`]. There is no I/O here: callers read files and hand in
/// their contents.
pub struct Engine {
    rules: Vec<RuleBox>,
    dispatch: HashMap<TokenKind, Vec<usize>>,
    config: Config,
}

impl Engine {
    /// Creates a new builder for configuring an engine.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the registered rules in registration order.
    #[must_use]
    pub fn rules(&self) -> &[RuleBox] {
        &self.rules
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Checks one file: lexes `source`, indexes structure, and replays
    /// the stream past every interested rule, collecting diagnostics
    /// into `log`.
    ///
    /// Unbalanced input yields exactly one `malformed-input` diagnostic
    /// and skips dispatch for the file. A panicking rule is contained:
    /// it becomes an `internal-rule-error` diagnostic at the offending
    /// token and dispatch continues with the next rule.
    pub fn check_file(&self, file: &str, source: &str, log: &mut Collector) {
        debug!("Checking: {file}");

        let stream = TokenStream::from_source(source);
        let index = match StructureIndex::build(&stream) {
            Ok(index) => index,
            Err(e) => {
                warn!("Skipping {file}: {e}");
                let (line, column) = e.position();
                log.report(Diagnostic::new(
                    MALFORMED_CODE,
                    MALFORMED_RULE,
                    Severity::Error,
                    Location::new(file, line, column),
                    e.to_string(),
                ));
                log.file_checked();
                return;
            }
        };

        let ctx = FileContext::new(file, &stream, &index);
        for at in 0..stream.len() {
            let Some(interested) = self.dispatch.get(&stream.token(at).kind) else {
                continue;
            };
            for &slot in interested {
                let rule = &self.rules[slot];
                if !self.config.is_rule_enabled(rule.name()) {
                    debug!("Skipping disabled rule: {}", rule.name());
                    continue;
                }
                self.run_rule(rule.as_ref(), &ctx, at, log);
            }
        }
        log.file_checked();
    }

    /// Invokes one rule at one token, containing panics.
    fn run_rule(&self, rule: &dyn Rule, ctx: &FileContext<'_>, at: usize, log: &mut Collector) {
        match catch_unwind(AssertUnwindSafe(|| rule.check(ctx, at))) {
            Ok(mut diagnostics) => {
                if let Some(severity) = self.config.rule_severity(rule.name()) {
                    for d in &mut diagnostics {
                        d.severity = severity;
                    }
                }
                for d in diagnostics {
                    log.report(d);
                }
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Rule '{}' failed at token {at}: {message}", rule.name());
                log.report(Diagnostic::new(
                    INTERNAL_CODE,
                    INTERNAL_RULE,
                    Severity::Error,
                    ctx.location(at),
                    format!("Rule '{}' failed while processing this token: {message}", rule.name()),
                ));
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubRule {
        name: &'static str,
        kinds: &'static [TokenKind],
        severity: Severity,
    }

    impl Rule for StubRule {
        fn name(&self) -> &'static str {
            self.name
        }
        fn code(&self) -> &'static str {
            "STUB"
        }
        fn kinds(&self) -> &'static [TokenKind] {
            self.kinds
        }
        fn check(&self, ctx: &FileContext<'_>, at: usize) -> Vec<Diagnostic> {
            vec![Diagnostic::new(
                self.code(),
                self.name(),
                self.severity,
                ctx.location(at),
                format!("{} fired", self.name()),
            )]
        }
    }

    struct PanickingRule;

    impl Rule for PanickingRule {
        fn name(&self) -> &'static str {
            "panicking-rule"
        }
        fn code(&self) -> &'static str {
            "BOOM"
        }
        fn kinds(&self) -> &'static [TokenKind] {
            &[TokenKind::Semicolon]
        }
        fn check(&self, _ctx: &FileContext<'_>, _at: usize) -> Vec<Diagnostic> {
            panic!("boom");
        }
    }

    fn two_rule_engine() -> Engine {
        Engine::builder()
            .rule(StubRule {
                name: "first",
                kinds: &[TokenKind::Comma],
                severity: Severity::Warning,
            })
            .rule(StubRule {
                name: "second",
                kinds: &[TokenKind::Comma, TokenKind::Semicolon],
                severity: Severity::Error,
            })
            .build()
            .expect("valid engine")
    }

    #[test]
    fn dispatch_follows_registration_order() {
        let engine = two_rule_engine();
        let mut log = Collector::new();
        engine.check_file("a.php", "f(1, 2);", &mut log);

        let rules: Vec<&str> = log.diagnostics().iter().map(|d| d.rule.as_str()).collect();
        assert_eq!(rules, vec!["first", "second", "second"]);
    }

    #[test]
    fn dispatch_is_idempotent() {
        let engine = two_rule_engine();
        let mut first = Collector::new();
        let mut second = Collector::new();
        engine.check_file("a.php", "f(1, 2);", &mut first);
        engine.check_file("a.php", "f(1, 2);", &mut second);

        let render = |log: &Collector| {
            log.diagnostics()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        };
        assert_eq!(render(&first), render(&second));
    }

    #[test]
    fn unbalanced_input_yields_single_diagnostic() {
        let engine = two_rule_engine();
        let mut log = Collector::new();
        engine.check_file("bad.php", "f(1, 2;", &mut log);

        assert_eq!(log.diagnostics().len(), 1);
        assert_eq!(log.diagnostics()[0].rule, MALFORMED_RULE);
        assert_eq!(log.diagnostics()[0].code, MALFORMED_CODE);
        assert_eq!(log.error_count(), 1);
    }

    #[test]
    fn panicking_rule_is_contained() {
        let engine = Engine::builder()
            .rule(PanickingRule)
            .rule(StubRule {
                name: "after",
                kinds: &[TokenKind::Semicolon],
                severity: Severity::Warning,
            })
            .build()
            .expect("valid engine");

        let mut log = Collector::new();
        engine.check_file("a.php", "f(); g();", &mut log);

        // One internal error per semicolon, and the later rule still ran.
        let rules: Vec<&str> = log.diagnostics().iter().map(|d| d.rule.as_str()).collect();
        assert_eq!(
            rules,
            vec![INTERNAL_RULE, "after", INTERNAL_RULE, "after"]
        );
    }

    #[test]
    fn config_can_disable_and_override() {
        let config = Config::parse(
            "[rules.first]\nenabled = false\n\n[rules.second]\nseverity = \"warning\"\n",
        )
        .expect("parse");

        let engine = Engine::builder()
            .rule(StubRule {
                name: "first",
                kinds: &[TokenKind::Comma],
                severity: Severity::Warning,
            })
            .rule(StubRule {
                name: "second",
                kinds: &[TokenKind::Comma],
                severity: Severity::Error,
            })
            .config(config)
            .build()
            .expect("valid engine");

        let mut log = Collector::new();
        engine.check_file("a.php", "f(1, 2)", &mut log);

        assert_eq!(log.diagnostics().len(), 1);
        assert_eq!(log.diagnostics()[0].rule, "second");
        assert_eq!(log.diagnostics()[0].severity, Severity::Warning);
    }

    #[test]
    fn unknown_rule_in_config_fails_build() {
        let config = Config::parse("[rules.no-such-rule]\nenabled = true\n").expect("parse");
        let err = Engine::builder()
            .rule(PanickingRule)
            .config(config)
            .build()
            .map(|_| ())
            .expect_err("unknown rule");
        assert!(matches!(err, EngineError::Config(_)));
    }
}
