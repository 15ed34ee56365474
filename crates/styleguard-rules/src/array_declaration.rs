//! Rule enforcing the array declaration standard.
//!
//! Single-line arrays may hold multiple values only inside a condition
//! or call; standalone multi-value arrays span lines, with keys and
//! values aligned two columns past the line start, the closing
//! parenthesis on its own line, and no trailing comma. Entries either
//! all carry keys or none do.
//!
//! A comma nested in more parenthesis pairs than the `array` keyword
//! plus one separates call arguments, not array entries; the
//! comparison is exactly `> count + 1` and is relied on by the entry
//! walk.

use styleguard_core::utils::spacing::line_start_column;
use styleguard_core::{Diagnostic, FileContext, Rule, Severity, TokenKind};

/// Rule code for array-declaration.
pub const CODE: &str = "SG001";

/// Rule name for array-declaration.
pub const NAME: &str = "array-declaration";

/// Kinds the entry walk stops at.
const ENTRY_KINDS: &[TokenKind] = &[
    TokenKind::DoubleArrow,
    TokenKind::Comma,
    TokenKind::KeywordArray,
];

/// Checks that arrays conform to the declaration standard.
#[derive(Debug, Clone, Default)]
pub struct ArrayDeclaration;

impl ArrayDeclaration {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// One collected array entry: the key token (if keyed) and the first
/// token of the value.
struct Entry {
    index: Option<usize>,
    value: Option<usize>,
}

impl Rule for ArrayDeclaration {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Ensures arrays conform to the array declaration standard"
    }

    fn kinds(&self) -> &'static [TokenKind] {
        &[TokenKind::KeywordArray]
    }

    fn check(&self, ctx: &FileContext<'_>, at: usize) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let token = ctx.token(at);

        if token.text != token.text.to_lowercase() {
            diagnostics.push(error(
                ctx,
                at,
                format!(
                    "Array keyword should be lower case; expected \"array\" but found \"{}\"",
                    token.text
                ),
            ));
        }

        let note = ctx.note(at);
        // A bare `array` (a type hint, say) declares nothing.
        let (Some(start), Some(end)) = (note.paren_opener, note.paren_closer) else {
            return diagnostics;
        };

        if start != at + 1 {
            diagnostics.push(error(
                ctx,
                at,
                "There must be no space between the keyword and the opening parenthesis",
            ));
        }

        let first_content = ctx
            .stream
            .find_next(TokenKind::EMPTY, start + 1, Some(end + 1), true);
        if first_content == Some(end) {
            if end - start != 1 {
                diagnostics.push(error(
                    ctx,
                    at,
                    "Empty array declaration must have no space between the parentheses",
                ));
            }
            return diagnostics;
        }

        // Keyed and unkeyed entries must not mix; everything below may
        // assume a homogeneous array.
        if let Some(mixed) = self.check_key_mix(ctx, at, start, end) {
            diagnostics.push(mixed);
            return diagnostics;
        }

        if ctx.token(start).line == ctx.token(end).line {
            self.check_single_line(ctx, at, start, end, &mut diagnostics);
        } else {
            self.check_multi_line(ctx, at, start, end, &mut diagnostics);
        }
        diagnostics
    }
}

impl ArrayDeclaration {
    /// Walks the entries watching for a key after an unkeyed entry or
    /// the reverse. Returns the violation to report, if any.
    fn check_key_mix(
        &self,
        ctx: &FileContext<'_>,
        at: usize,
        start: usize,
        end: usize,
    ) -> Option<Diagnostic> {
        let keyword_count = ctx.note(at).paren_depth;
        let mut key_used = false;
        let mut single_used = false;
        let mut last_was_comma = false;
        let mut last_comma = None;

        let mut next = start;
        while let Some(found) = ctx.stream.find_next(ENTRY_KINDS, next + 1, Some(end), false) {
            next = found;
            match ctx.token(found).kind {
                TokenKind::KeywordArray => {
                    // Nested arrays are handled by their own dispatch.
                    next = ctx.note(found).paren_closer.unwrap_or(found);
                }
                TokenKind::Comma => {
                    if ctx.note(found).paren_depth > keyword_count + 1 {
                        continue;
                    }
                    if key_used && last_was_comma {
                        return Some(error(
                            ctx,
                            found,
                            "No key specified for array entry; first entry specifies key",
                        ));
                    }
                    if !key_used {
                        single_used = true;
                    }
                    last_was_comma = true;
                    last_comma = Some(found);
                }
                _ => {
                    if single_used {
                        return Some(error(
                            ctx,
                            found,
                            "Key specified for array entry; first entry has no key",
                        ));
                    }
                    key_used = true;
                    last_was_comma = false;
                }
            }
        }

        // A final entry after the last comma has no arrow left to
        // claim it: keyed arrays must not end with a bare value.
        if key_used && last_was_comma {
            if let Some(comma) = last_comma {
                if let Some(entry) =
                    ctx.stream
                        .find_next(TokenKind::EMPTY, comma + 1, Some(end), true)
                {
                    return Some(error(
                        ctx,
                        entry,
                        "No key specified for array entry; first entry specifies key",
                    ));
                }
            }
        }
        None
    }

    fn check_single_line(
        &self,
        ctx: &FileContext<'_>,
        at: usize,
        start: usize,
        end: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let mut next = start;
        while let Some(arrow) =
            ctx.stream
                .find_next(&[TokenKind::DoubleArrow], next + 1, Some(end), false)
        {
            next = arrow;
            self.check_arrow_spacing(ctx, arrow, diagnostics);
        }

        let mut commas = Vec::new();
        next = start;
        while let Some(comma) = ctx
            .stream
            .find_next(&[TokenKind::Comma], next + 1, Some(end), false)
        {
            commas.push(comma);
            next = comma;
        }
        if commas.is_empty() {
            return;
        }

        // Multiple values on one line are only allowed inside a
        // condition or call: something must already be open on this
        // line.
        let opened = at.checked_sub(1).and_then(|p| {
            ctx.stream.find_previous(
                &[TokenKind::OpenParen, TokenKind::Semicolon],
                p,
                None,
                false,
            )
        });
        let allowed = opened.map_or(false, |o| ctx.token(o).line == ctx.token(at).line);
        if !allowed {
            diagnostics.push(error(
                ctx,
                at,
                "Array with multiple values cannot be declared on a single line",
            ));
            return;
        }

        for &comma in &commas {
            self.check_comma_spacing(ctx, comma, diagnostics);
        }
    }

    fn check_arrow_spacing(
        &self,
        ctx: &FileContext<'_>,
        arrow: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        if ctx.token(arrow - 1).kind != TokenKind::Whitespace {
            diagnostics.push(error(
                ctx,
                arrow,
                format!(
                    "Expected 1 space between \"{}\" and double arrow; 0 found",
                    ctx.token(arrow - 1).text
                ),
            ));
        } else {
            let width = ctx.token(arrow - 1).width();
            if width != 1 {
                diagnostics.push(error(
                    ctx,
                    arrow,
                    format!(
                        "Expected 1 space between \"{}\" and double arrow; {width} found",
                        ctx.token(arrow - 2).text
                    ),
                ));
            }
        }

        if ctx.token(arrow + 1).kind != TokenKind::Whitespace {
            diagnostics.push(error(
                ctx,
                arrow,
                format!(
                    "Expected 1 space between double arrow and \"{}\"; 0 found",
                    ctx.token(arrow + 1).text
                ),
            ));
        } else {
            let width = ctx.token(arrow + 1).width();
            if width != 1 {
                diagnostics.push(error(
                    ctx,
                    arrow,
                    format!(
                        "Expected 1 space between double arrow and \"{}\"; {width} found",
                        ctx.token(arrow + 2).text
                    ),
                ));
            }
        }
    }

    fn check_comma_spacing(
        &self,
        ctx: &FileContext<'_>,
        comma: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        if ctx.token(comma + 1).kind != TokenKind::Whitespace {
            diagnostics.push(error(
                ctx,
                comma,
                format!(
                    "Expected 1 space between comma and \"{}\"; 0 found",
                    ctx.token(comma + 1).text
                ),
            ));
        } else {
            let width = ctx.token(comma + 1).width();
            if width != 1 {
                diagnostics.push(error(
                    ctx,
                    comma,
                    format!(
                        "Expected 1 space between comma and \"{}\"; {width} found",
                        ctx.token(comma + 2).text
                    ),
                ));
            }
        }

        if comma > 0 && ctx.token(comma - 1).kind == TokenKind::Whitespace {
            let width = ctx.token(comma - 1).width();
            diagnostics.push(error(
                ctx,
                comma,
                format!(
                    "Expected 0 spaces between \"{}\" and comma; {width} found",
                    ctx.token(comma - 2).text
                ),
            ));
        }
    }

    #[allow(clippy::too_many_lines)] // The entry walk mirrors one linear scan.
    fn check_multi_line(
        &self,
        ctx: &FileContext<'_>,
        at: usize,
        start: usize,
        end: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let line_start = line_start_column(ctx.stream, at);
        let keyword_start = ctx.token(at).column;

        if let Some(last_content) =
            ctx.stream
                .find_previous(&[TokenKind::Whitespace], end - 1, Some(start), true)
        {
            if ctx.token(last_content).line != ctx.token(end).line - 1 {
                diagnostics.push(error(
                    ctx,
                    end,
                    "Closing parenthesis of array declaration must be on a new line immediately after the array",
                ));
            } else if ctx.token(end).column != line_start {
                diagnostics.push(error(
                    ctx,
                    end,
                    format!(
                        "Closing parenthesis not aligned correctly; expected {keyword_start} spaces but found {} spaces",
                        ctx.token(end).column
                    ),
                ));
            }
        }

        let keyword_count = ctx.note(at).paren_depth;
        let mut key_used = false;
        let mut entries: Vec<Entry> = Vec::new();

        let mut next = start;
        while let Some(found) = ctx.stream.find_next(ENTRY_KINDS, next + 1, Some(end), false) {
            next = found;
            match ctx.token(found).kind {
                TokenKind::KeywordArray => {
                    entries.push(Entry {
                        index: None,
                        value: Some(found),
                    });
                    next = ctx.note(found).paren_closer.unwrap_or(found);
                }
                TokenKind::Comma => {
                    if ctx.note(found).paren_depth > keyword_count + 1 {
                        continue;
                    }
                    if !key_used {
                        if ctx.token(found - 1).kind == TokenKind::Whitespace {
                            let width = ctx.token(found - 1).width();
                            diagnostics.push(error(
                                ctx,
                                found,
                                format!(
                                    "Expected 0 spaces between \"{}\" and comma; {width} found",
                                    ctx.token(found - 2).text
                                ),
                            ));
                        }
                        entries.push(Entry {
                            index: None,
                            value: find_value_start(ctx, found, start),
                        });
                    }
                }
                _ => {
                    key_used = true;
                    let index_end =
                        ctx.stream
                            .find_previous(TokenKind::EMPTY, found - 1, Some(start), true);
                    let index = index_end.map(|ie| {
                        ctx.stream
                            .find_previous(&[TokenKind::Whitespace], ie, Some(start), false)
                            .map_or(ie, |ws| ws + 1)
                    });
                    let value =
                        ctx.stream
                            .find_next(&[TokenKind::Whitespace], found + 1, Some(end), true);
                    entries.push(Entry { index, value });
                }
            }
        }

        if !key_used && !entries.is_empty() {
            if let Some(last_value) = entries.last().and_then(|e| e.value) {
                if let Some(trailing) = ctx.stream.find_previous(
                    &[TokenKind::Whitespace],
                    end - 1,
                    Some(last_value),
                    true,
                ) {
                    if ctx.token(trailing).kind == TokenKind::Comma {
                        diagnostics.push(error(
                            ctx,
                            trailing,
                            "Comma not allowed after last value in array declaration",
                        ));
                    }
                }
            }

            for entry in &entries {
                let Some(value) = entry.value else {
                    // The entry walk could not pin the value down;
                    // other checks will have reported the defect.
                    continue;
                };
                if value > 0 && ctx.token(value - 1).kind == TokenKind::Whitespace {
                    let column = ctx.token(value).column;
                    if column != line_start + 2 {
                        diagnostics.push(error(
                            ctx,
                            value,
                            format!(
                                "Array value not aligned correctly; expected {} spaces but found {column}",
                                line_start + 2
                            ),
                        ));
                    }
                }
            }
        }

        let value_count = entries.len();
        for entry in &entries {
            let Some(index) = entry.index else {
                if let Some(value) = entry.value {
                    if ctx.token(value).line == ctx.token(at).line && value_count > 1 {
                        diagnostics.push(error(
                            ctx,
                            at,
                            "The first value in a multi-value array must be on a new line",
                        ));
                    }
                }
                continue;
            };

            if ctx.token(index).line == ctx.token(at).line {
                diagnostics.push(error(
                    ctx,
                    at,
                    "The first index in a multi-value array must be on a new line",
                ));
                continue;
            }

            let column = ctx.token(index).column;
            if column != line_start + 2 {
                diagnostics.push(error(
                    ctx,
                    index,
                    format!(
                        "Array key not aligned correctly; expected {} spaces but found {column}",
                        line_start + 2
                    ),
                ));
                continue;
            }

            // Each keyed line ends in a comma, tight against the value.
            if let Some(value) = entry.value {
                if ctx.token(value).kind != TokenKind::KeywordArray {
                    if let Some(comma) =
                        ctx.stream
                            .find_next(&[TokenKind::Comma], value + 1, None, false)
                    {
                        if ctx.token(comma - 1).kind == TokenKind::Whitespace {
                            let width = ctx.token(comma - 1).width();
                            diagnostics.push(error(
                                ctx,
                                comma,
                                format!(
                                    "Expected 0 spaces between \"{}\" and comma; {width} found",
                                    ctx.token(comma - 2).text
                                ),
                            ));
                        }
                    }
                }
            }
        }
    }
}

/// First token of the unkeyed value a comma terminates: the first
/// non-whitespace token on the comma's line, or the first entry token
/// when the value opens the array.
fn find_value_start(ctx: &FileContext<'_>, comma: usize, start: usize) -> Option<usize> {
    let mut cursor = ctx.stream.prev_non_empty(comma - 1)?;
    let line = ctx.token(comma).line;
    while ctx.token(cursor).line == line {
        if cursor == start || cursor == 0 {
            break;
        }
        cursor -= 1;
    }
    ctx.stream
        .find_next(&[TokenKind::Whitespace], cursor + 1, Some(comma), true)
}

fn error(ctx: &FileContext<'_>, at: usize, message: impl Into<String>) -> Diagnostic {
    Diagnostic::new(CODE, NAME, Severity::Error, ctx.location(at), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{messages, run_rule};

    #[test]
    fn keyword_must_be_lower_case() {
        let found = messages(&ArrayDeclaration::new(), "$a = Array();");
        assert_eq!(
            found,
            vec!["Array keyword should be lower case; expected \"array\" but found \"Array\""]
        );
    }

    #[test]
    fn no_space_before_the_opening_parenthesis() {
        let found = messages(&ArrayDeclaration::new(), "$a = array ();");
        assert_eq!(
            found,
            vec!["There must be no space between the keyword and the opening parenthesis"]
        );
    }

    #[test]
    fn empty_arrays_must_be_tight() {
        assert!(run_rule(&ArrayDeclaration::new(), "$a = array();").is_empty());
        let found = messages(&ArrayDeclaration::new(), "$a = array( );");
        assert_eq!(
            found,
            vec!["Empty array declaration must have no space between the parentheses"]
        );
    }

    #[test]
    fn single_value_on_one_line_is_fine() {
        assert!(run_rule(&ArrayDeclaration::new(), "$a = array(1);").is_empty());
    }

    #[test]
    fn multiple_values_need_their_own_lines() {
        let found = messages(&ArrayDeclaration::new(), "$a = array(1, 2);");
        assert_eq!(
            found,
            vec!["Array with multiple values cannot be declared on a single line"]
        );
    }

    #[test]
    fn multiple_values_inside_a_condition_are_allowed() {
        let source = "if (in_array($x, array(1, 2))) { f(); }";
        assert!(run_rule(&ArrayDeclaration::new(), source).is_empty());
    }

    #[test]
    fn condition_arrays_still_get_comma_spacing_checked() {
        let source = "if (in_array($x, array(1,2))) { f(); }";
        let found = messages(&ArrayDeclaration::new(), source);
        assert_eq!(
            found,
            vec!["Expected 1 space between comma and \"2\"; 0 found"]
        );
    }

    #[test]
    fn arrow_spacing_is_exact() {
        let source = "if (f(array('a'=>1))) { g(); }";
        let found = messages(&ArrayDeclaration::new(), source);
        assert_eq!(
            found,
            vec![
                "Expected 1 space between \"'a'\" and double arrow; 0 found",
                "Expected 1 space between double arrow and \"1\"; 0 found",
            ]
        );
    }

    #[test]
    fn mixing_keyed_and_unkeyed_entries_is_reported() {
        let found = messages(&ArrayDeclaration::new(), "$x = array('a' => 1, 2);");
        assert_eq!(
            found,
            vec!["No key specified for array entry; first entry specifies key"]
        );
    }

    #[test]
    fn key_after_unkeyed_entry_is_the_converse() {
        let found = messages(&ArrayDeclaration::new(), "$x = array(1, 'a' => 2);");
        assert_eq!(
            found,
            vec!["Key specified for array entry; first entry has no key"]
        );
    }

    #[test]
    fn well_formed_keyed_arrays_pass() {
        let source = "$a = array(\n  'a' => 1,\n  'b' => 2\n);";
        assert!(run_rule(&ArrayDeclaration::new(), source).is_empty());
    }

    #[test]
    fn keys_must_align_two_past_the_line_start() {
        let source = "$a = array(\n   'a' => 1,\n   'b' => 2\n);";
        let found = messages(&ArrayDeclaration::new(), source);
        assert_eq!(
            found,
            vec![
                "Array key not aligned correctly; expected 3 spaces but found 4",
                "Array key not aligned correctly; expected 3 spaces but found 4",
            ]
        );
    }

    #[test]
    fn trailing_comma_after_last_value_is_reported() {
        let source = "$a = array(\n  1,\n  2,\n);";
        let found = messages(&ArrayDeclaration::new(), source);
        assert_eq!(
            found,
            vec!["Comma not allowed after last value in array declaration"]
        );
    }

    #[test]
    fn first_value_must_start_a_new_line() {
        let source = "$a = array(1,\n  2,\n);";
        let found = messages(&ArrayDeclaration::new(), source);
        assert_eq!(
            found,
            vec![
                "Comma not allowed after last value in array declaration",
                "The first value in a multi-value array must be on a new line",
            ]
        );
    }

    #[test]
    fn closing_parenthesis_must_be_on_its_own_line() {
        let source = "$a = array(\n  1,\n  2);";
        let found = messages(&ArrayDeclaration::new(), source);
        assert_eq!(
            found,
            vec![
                "Closing parenthesis of array declaration must be on a new line immediately after the array"
            ]
        );
    }

    #[test]
    fn misaligned_closing_parenthesis_is_reported() {
        let source = "$a = array(\n  1,\n  2\n  );";
        let found = messages(&ArrayDeclaration::new(), source);
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("Closing parenthesis not aligned correctly"));
    }

    #[test]
    fn commas_nested_in_calls_are_not_array_commas() {
        let source = "$a = array(\n  f($x ,$y),\n  g($z)\n);";
        let found = messages(&ArrayDeclaration::new(), source);
        assert!(found.is_empty(), "unexpected: {found:?}");
    }

    #[test]
    fn nested_arrays_are_left_to_their_own_dispatch() {
        let source = "$a = array(\n  array(3, 4),\n  array(5, 6)\n);";
        let found = run_rule(&ArrayDeclaration::new(), source);
        // The outer array is fine; each inner array reports its own
        // single-line violation when dispatched on its keyword.
        let single_line: Vec<&str> = found.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            single_line,
            vec![
                "Array with multiple values cannot be declared on a single line",
                "Array with multiple values cannot be declared on a single line",
            ]
        );
    }
}
