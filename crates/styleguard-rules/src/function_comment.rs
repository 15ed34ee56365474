//! Rule parsing and verifying function doc comments.
//!
//! Verifies that:
//!  - a `/** */` comment exists directly above the declaration
//!  - the short description is one line, capitalized, unterminated
//!  - one blank line separates short and long descriptions
//!  - one blank line separates the description from the tag block
//!  - `@param` tags come first, match the signature, and are complete
//!  - exactly one `@return` tag exists, after the parameters
//!  - `@throws` tags follow `@return` and carry a comment

use crate::helpers::signature_params;
use styleguard_core::{Diagnostic, FileContext, Location, Rule, Severity, TokenKind};

/// Rule code for function-doc-comment.
pub const CODE: &str = "SG008";

/// Rule name for function-doc-comment.
pub const NAME: &str = "function-doc-comment";

/// Modifier words allowed between a doc comment and its function.
const MODIFIERS: &[&str] = &["public", "private", "protected", "static", "abstract", "final"];

/// Verifies the doc comment of every named function declaration.
#[derive(Debug, Clone, Default)]
pub struct FunctionComment;

impl FunctionComment {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for FunctionComment {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Parses and verifies function doc comments"
    }

    fn kinds(&self) -> &'static [TokenKind] {
        &[TokenKind::KeywordFunction]
    }

    fn check(&self, ctx: &FileContext<'_>, at: usize) -> Vec<Diagnostic> {
        // Anonymous functions carry no doc comment.
        let named = ctx
            .stream
            .next_non_empty(at + 1)
            .map_or(false, |n| ctx.token(n).kind == TokenKind::Identifier);
        if !named {
            return Vec::new();
        }

        let comment = match find_comment(ctx, at) {
            CommentSearch::Doc(index) => index,
            CommentSearch::Plain => {
                return vec![error(
                    ctx.location(at),
                    "You must use \"/**\" style comments for a function comment",
                )];
            }
            CommentSearch::Missing => {
                return vec![error(ctx.location(at), "Missing function doc comment")];
            }
        };

        let block = DocBlock::parse(&ctx.token(comment).text);
        let base = ctx.token(comment).line;
        let line_at = |offset: usize| Location::new(ctx.file, base + offset, 1);

        if block.is_empty() {
            return vec![error(ctx.location(comment), "Function doc comment is empty")];
        }

        let mut diagnostics = Vec::new();
        self.check_description(&block, &line_at, ctx, comment, &mut diagnostics);
        self.check_tags(&block, &line_at, ctx, at, comment, &mut diagnostics);
        diagnostics
    }
}

impl FunctionComment {
    fn check_description(
        &self,
        block: &DocBlock,
        line_at: &dyn Fn(usize) -> Location,
        ctx: &FileContext<'_>,
        comment: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let Some((short_offset, short)) = block.short.first() else {
            diagnostics.push(error(
                ctx.location(comment),
                "Missing short description in function doc comment",
            ));
            return;
        };

        if block.blank_before_short > 0 {
            let word = if block.blank_before_short > 1 {
                "newlines"
            } else {
                "newline"
            };
            diagnostics.push(error(
                line_at(*short_offset),
                format!("Extra {word} found before function comment short description"),
            ));
        }

        if block.short.len() > 1 {
            diagnostics.push(error(
                line_at(*short_offset),
                "Function comment short description must be on a single line",
            ));
        }

        if let Some(first) = short.chars().next() {
            if !first.is_ascii_uppercase() {
                diagnostics.push(error(
                    line_at(*short_offset),
                    "Function comment short description must start with a capital letter",
                ));
            }
        }

        let last_short = block.short.last().map_or("", |(_, s)| s.as_str());
        if last_short.trim_end().ends_with('.') {
            diagnostics.push(error(
                line_at(*short_offset),
                "Function comment should not end with a period",
            ));
        }

        if let Some((long_offset, long)) = block.long.first() {
            if block.blank_after_short != 1 {
                diagnostics.push(error(
                    line_at(*long_offset),
                    "There must be exactly one blank line between descriptions in function comment",
                ));
            }
            if let Some(first) = long.chars().next() {
                if !first.is_ascii_uppercase() {
                    diagnostics.push(error(
                        line_at(*long_offset),
                        "Function comment long description must start with a capital letter",
                    ));
                }
            }
        }
    }

    #[allow(clippy::too_many_lines)] // One linear pass over the tag block.
    fn check_tags(
        &self,
        block: &DocBlock,
        line_at: &dyn Fn(usize) -> Location,
        ctx: &FileContext<'_>,
        at: usize,
        comment: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let closing_offset = ctx.token(comment).text.lines().count().saturating_sub(1);

        if let Some(first_tag) = block.tags.first() {
            if block.blank_before_tags != 1 {
                diagnostics.push(error(
                    line_at(first_tag.offset),
                    "There must be exactly one blank line before the tags in function comment",
                ));
            }
        }

        // Ordering: params first, then @return, then @throws.
        let mut seen_other = false;
        let mut seen_return = false;
        let mut return_count = 0;
        for tag in &block.tags {
            match tag.name.as_str() {
                "param" => {
                    if seen_other {
                        diagnostics.push(error(
                            line_at(tag.offset),
                            "Parameters must appear immediately after the comment",
                        ));
                    }
                }
                "return" => {
                    seen_other = true;
                    seen_return = true;
                    return_count += 1;
                    if return_count > 1 {
                        diagnostics.push(error(
                            line_at(tag.offset),
                            "Only 1 @return tag is allowed in function comment",
                        ));
                    } else if tag.rest.trim().is_empty() {
                        diagnostics.push(error(
                            line_at(tag.offset),
                            "Return type missing for @return tag in function comment",
                        ));
                    }
                }
                "throws" => {
                    seen_other = true;
                    if !seen_return {
                        diagnostics.push(error(
                            line_at(tag.offset),
                            "The @throws tag is in the wrong order; the tag follows @return",
                        ));
                    }
                    let mut words = tag.rest.split_whitespace();
                    match words.next() {
                        None => diagnostics.push(error(
                            line_at(tag.offset),
                            "Exception type and comment missing for @throws tag in function comment",
                        )),
                        Some(_) if words.next().is_none() => diagnostics.push(error(
                            line_at(tag.offset),
                            "Comment missing for @throws tag in function comment",
                        )),
                        Some(_) => {}
                    }
                }
                _ => {
                    seen_other = true;
                }
            }
        }

        if return_count == 0 {
            diagnostics.push(error(
                line_at(closing_offset),
                "Missing @return tag in function comment",
            ));
        }

        // Parameter tags versus the real signature.
        let real = signature_params(ctx, at);
        let mut documented: Vec<String> = Vec::new();
        let mut position = 0;
        for tag in block.tags.iter().filter(|t| t.name == "param") {
            position += 1;
            let mut var = None;
            for word in tag.rest.split_whitespace() {
                if word.starts_with('$') || word.starts_with("&$") {
                    var = Some(word.trim_start_matches('&').to_string());
                    break;
                }
            }
            let Some(var) = var else {
                diagnostics.push(error(
                    line_at(tag.offset),
                    format!("Missing parameter name at position {position}"),
                ));
                continue;
            };

            match real.get(position - 1) {
                Some(&index) => {
                    let real_name = &ctx.token(index).text;
                    if *real_name != var {
                        diagnostics.push(error(
                            line_at(tag.offset),
                            format!(
                                "Doc comment var \"{var}\" does not match actual variable name \"{real_name}\" at position {position}"
                            ),
                        ));
                    }
                    // The slot is documented even under the wrong name.
                    documented.push(real_name.clone());
                }
                None => {
                    diagnostics.push(error(
                        line_at(tag.offset),
                        format!("Superfluous doc comment at position {position}"),
                    ));
                    documented.push(var);
                }
            }
        }

        for &index in &real {
            let name = &ctx.token(index).text;
            if !documented.contains(name) {
                diagnostics.push(error(
                    line_at(closing_offset),
                    format!("Doc comment for \"{name}\" missing"),
                ));
            }
        }
    }
}

fn error(location: Location, message: impl Into<String>) -> Diagnostic {
    Diagnostic::new(CODE, NAME, Severity::Error, location, message)
}

enum CommentSearch {
    Doc(usize),
    Plain,
    Missing,
}

/// Walks back from the `function` keyword over whitespace and modifier
/// words to the token that should be the doc comment.
fn find_comment(ctx: &FileContext<'_>, at: usize) -> CommentSearch {
    let mut cursor = at;
    loop {
        let Some(prev) = cursor
            .checked_sub(1)
            .and_then(|p| ctx.stream.find_previous(&[TokenKind::Whitespace], p, None, true))
        else {
            return CommentSearch::Missing;
        };
        let token = ctx.token(prev);
        match token.kind {
            TokenKind::Identifier if MODIFIERS.contains(&token.text.to_lowercase().as_str()) => {
                cursor = prev;
            }
            TokenKind::DocComment => return CommentSearch::Doc(prev),
            TokenKind::Comment => return CommentSearch::Plain,
            _ => return CommentSearch::Missing,
        }
    }
}

/// One `@tag` line of a doc block.
#[derive(Debug)]
struct Tag {
    name: String,
    rest: String,
    /// Line offset within the comment token.
    offset: usize,
}

/// Parsed sections of a doc comment: short description, long
/// description, and the tag block, with the blank-line runs between
/// them.
#[derive(Debug, Default)]
struct DocBlock {
    blank_before_short: usize,
    short: Vec<(usize, String)>,
    blank_after_short: usize,
    long: Vec<(usize, String)>,
    blank_before_tags: usize,
    tags: Vec<Tag>,
}

#[derive(PartialEq)]
enum Section {
    Lead,
    Short,
    Long,
    Tags,
}

impl DocBlock {
    fn is_empty(&self) -> bool {
        self.short.is_empty() && self.long.is_empty() && self.tags.is_empty()
    }

    /// Splits the raw comment text into classified lines and runs the
    /// section state machine over them.
    fn parse(text: &str) -> Self {
        let mut block = Self::default();
        let mut section = Section::Lead;
        let mut blank_run = 0;

        for (offset, raw) in text.lines().enumerate() {
            let Some(content) = strip_decoration(raw, offset) else {
                continue;
            };
            if content.is_empty() {
                blank_run += 1;
                continue;
            }

            if let Some(tag_text) = content.strip_prefix('@') {
                if section != Section::Tags {
                    block.blank_before_tags = blank_run;
                    if section == Section::Short {
                        block.blank_after_short = blank_run;
                    }
                    section = Section::Tags;
                }
                blank_run = 0;
                let mut split = tag_text.splitn(2, char::is_whitespace);
                let name = split.next().unwrap_or("").to_string();
                let rest = split.next().unwrap_or("").trim().to_string();
                block.tags.push(Tag { name, rest, offset });
                continue;
            }

            match section {
                Section::Lead => {
                    block.blank_before_short = blank_run;
                    section = Section::Short;
                    block.short.push((offset, content));
                }
                Section::Short if blank_run == 0 => {
                    block.short.push((offset, content));
                }
                Section::Short => {
                    block.blank_after_short = blank_run;
                    section = Section::Long;
                    block.long.push((offset, content));
                }
                Section::Long => {
                    block.long.push((offset, content));
                }
                Section::Tags => {
                    // Continuation of the previous tag's comment.
                    if let Some(last) = block.tags.last_mut() {
                        if !last.rest.is_empty() {
                            last.rest.push(' ');
                        }
                        last.rest.push_str(&content);
                    }
                }
            }
            blank_run = 0;
        }
        block
    }
}

/// Strips the comment frame from one line: the `/**` opener, a leading
/// `*`, and the `*/` closer. Returns `None` for pure frame lines.
fn strip_decoration(raw: &str, offset: usize) -> Option<String> {
    let mut line = raw.trim();
    if offset == 0 {
        line = line.strip_prefix("/**").unwrap_or(line).trim_start();
    } else if let Some(rest) = line.strip_prefix('*') {
        line = rest.strip_prefix(' ').unwrap_or(rest);
    }
    line = line.strip_suffix("*/").map_or(line, str::trim_end);
    if raw.trim() == "*/" || (offset == 0 && line.is_empty() && raw.trim() == "/**") {
        return None;
    }
    Some(line.trim_end().to_string())
}
