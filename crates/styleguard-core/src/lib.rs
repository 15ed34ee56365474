//! # styleguard-core
//!
//! Core framework for token-based style checking.
//!
//! A source file is lexed into a [`TokenStream`], a single indexing
//! pass builds the [`StructureIndex`] (delimiter pairs, nesting,
//! enclosing constructs), and the [`Engine`] replays the annotated
//! stream past every registered [`Rule`], collecting violations into a
//! [`Collector`]. This crate provides:
//!
//! - [`Token`] and [`TokenKind`] for the lexical model
//! - [`TokenStream`] with forward/backward search primitives
//! - [`StructureIndex`] with per-token structural notes
//! - [`Rule`] trait for pluggable token-based rules
//! - [`Engine`] for orchestrating dispatch
//! - [`Diagnostic`] and [`Collector`] for reported violations
//!
//! ## Example
//!
//! ```ignore
//! use styleguard_core::{Collector, Engine};
//!
//! let engine = Engine::builder()
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let mut log = Collector::new();
//! engine.check_file("src/index.php", &source, &mut log);
//! println!("{}", log.format_summary());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod diagnostics;
mod engine;
mod lexer;
mod rule;
mod stream;
mod structure;
mod token;

/// Utility modules for rule implementations.
pub mod utils;

pub use config::{CheckerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use diagnostics::{Collector, Diagnostic, DiagnosticReport, Location, Severity};
pub use engine::{
    Engine, EngineBuilder, EngineError, INTERNAL_CODE, INTERNAL_RULE, MALFORMED_CODE,
    MALFORMED_RULE,
};
pub use lexer::tokenize;
pub use rule::{Rule, RuleBox};
pub use stream::TokenStream;
pub use structure::{StructureError, StructureIndex, TokenNote};
pub use token::{Token, TokenKind};
