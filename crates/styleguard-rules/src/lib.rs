//! # styleguard-rules
//!
//! Built-in style rules for styleguard.
//!
//! Each rule listens to a set of token kinds and is invoked by the
//! engine at every matching token of the annotated stream.
//!
//! ## Available Rules
//!
//! | Code  | Name | Description |
//! |-------|------|-------------|
//! | SG001 | `array-declaration` | Ensures arrays conform to the declaration standard |
//! | SG002 | `nesting-depth` | Limits the nesting level of function bodies |
//! | SG003 | `forbidden-tokens` | Forbids print, goto, and eval |
//! | SG004 | `no-silenced-errors` | Discourages the `@` silencing prefix |
//! | SG005 | `empty-statement` | Detects control structures with empty bodies |
//! | SG006 | `semicolon-spacing` | Ensures no whitespace before a semicolon |
//! | SG007 | `doc-comment-alignment` | Checks doc comment asterisk alignment |
//! | SG008 | `function-doc-comment` | Parses and verifies function doc comments |
//! | SG009 | `line-length` | Limits the length of lines |
//! | SG010 | `superfluous-whitespace` | Flags meaningless whitespace |
//! | SG011 | `unused-parameter` | Warns about parameters the body never uses |
//!
//! ## Usage
//!
//! ```ignore
//! use styleguard_core::Engine;
//! use styleguard_rules::{ArrayDeclaration, NestingDepth};
//!
//! let engine = Engine::builder()
//!     .rule(ArrayDeclaration::new())
//!     .rule(NestingDepth::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod array_declaration;
mod doc_comment_alignment;
mod empty_statement;
mod forbidden_tokens;
mod function_comment;
mod helpers;
mod line_length;
mod nesting_depth;
mod presets;
mod semicolon_spacing;
mod silenced_errors;
mod superfluous_whitespace;
#[cfg(test)]
mod testutil;
mod unused_parameter;

pub use array_declaration::ArrayDeclaration;
pub use doc_comment_alignment::DocCommentAlignment;
pub use empty_statement::EmptyStatement;
pub use forbidden_tokens::ForbiddenTokens;
pub use function_comment::FunctionComment;
pub use line_length::LineLength;
pub use nesting_depth::NestingDepth;
pub use presets::{
    all_rules, build_rule, configured_rules, minimal_rules, recommended_rules, strict_rules,
    Preset,
};
pub use semicolon_spacing::SemicolonSpacing;
pub use silenced_errors::SilencedErrors;
pub use superfluous_whitespace::SuperfluousWhitespace;
pub use unused_parameter::UnusedParameter;

/// Re-export core types for convenience.
pub use styleguard_core::{Rule, Severity};
