//! Helpers shared by declaration-oriented rules.

use styleguard_core::{FileContext, TokenKind};

/// Parameter variable token indices of a function declaration, in
/// order.
///
/// `at` is the `function` keyword. A parameter is a variable directly
/// after the signature's opening parenthesis, a comma, a type hint, or
/// a by-reference marker; variables inside default-value expressions
/// are not parameters.
pub(crate) fn signature_params(ctx: &FileContext<'_>, at: usize) -> Vec<usize> {
    let note = ctx.note(at);
    let (Some(open), Some(close)) = (note.paren_opener, note.paren_closer) else {
        return Vec::new();
    };

    let mut params = Vec::new();
    let mut i = open;
    while let Some(var) = ctx
        .stream
        .find_next(&[TokenKind::Variable], i + 1, Some(close), false)
    {
        if is_param_position(ctx, var, open) {
            params.push(var);
        }
        i = var;
    }
    params
}

fn is_param_position(ctx: &FileContext<'_>, var: usize, open: usize) -> bool {
    let Some(prev) = ctx.stream.prev_non_empty(var.saturating_sub(1)) else {
        return false;
    };
    match ctx.token(prev).kind {
        TokenKind::OpenParen => prev == open,
        TokenKind::Comma => true,
        // `Foo $x` or `array $x` is a type-hinted parameter when the
        // hint itself opens the slot.
        TokenKind::Identifier | TokenKind::KeywordArray => at_slot_start(ctx, prev, open),
        // `&$x` passes by reference; look through the marker.
        TokenKind::Operator if ctx.token(prev).text == "&" => at_slot_start(ctx, prev, open),
        _ => false,
    }
}

fn at_slot_start(ctx: &FileContext<'_>, token: usize, open: usize) -> bool {
    token
        .checked_sub(1)
        .and_then(|p| ctx.stream.prev_non_empty(p))
        .map_or(false, |before| {
            before == open || ctx.token(before).kind == TokenKind::Comma
        })
}
