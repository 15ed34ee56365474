//! Test support: drives a single rule over a source snippet the same
//! way the engine would, without building an engine.

use styleguard_core::{Diagnostic, FileContext, Rule, StructureIndex, TokenStream};

/// Runs `rule` over every matching token of `source`.
///
/// # Panics
///
/// Panics when the snippet's delimiters do not balance; rule tests use
/// well-formed snippets.
pub fn run_rule(rule: &dyn Rule, source: &str) -> Vec<Diagnostic> {
    let stream = TokenStream::from_source(source);
    let index = StructureIndex::build(&stream).expect("balanced test input");
    let ctx = FileContext::new("test.php", &stream, &index);

    let mut diagnostics = Vec::new();
    for at in 0..stream.len() {
        if rule.kinds().contains(&stream.token(at).kind) {
            diagnostics.extend(rule.check(&ctx, at));
        }
    }
    diagnostics
}

/// Like [`run_rule`], reduced to the messages.
pub fn messages(rule: &dyn Rule, source: &str) -> Vec<String> {
    run_rule(rule, source)
        .into_iter()
        .map(|d| d.message)
        .collect()
}
