//! Post-processing pipeline for assembled expressions
//!
//! Stages run in a fixed order: user-supplied plugins, subroutine
//! expansion, atomic-group emulation, separator cleanup, and finally the
//! dialect-backport stage (skipped when the target engine natively
//! supports the modern class dialect). Every stage is a pure function from
//! expression text to expression text.

use crate::context::{RegexContext, RunningContext, TokenKind, scan_token};
use crate::error::Error;
use crate::options::Resolved;
use crate::stages;
use crate::{EMULATION_MARKER, SEPARATOR};

/// Data passed to every pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub struct StageData {
    /// The resolved flag string for the whole pattern
    pub flags: String,
    /// Whether emulation (synthetic-capture tracking) is on
    pub emulation: bool,
}

/// A pipeline stage: rewrites the expression, or fails the compilation
pub type Plugin = fn(&str, &StageData) -> Result<String, Error>;

/// Run the full pipeline over an assembled expression
pub(crate) fn run(expr: String, resolved: &Resolved) -> Result<String, Error> {
    let data = StageData {
        flags: resolved.flags.as_string(),
        emulation: resolved.emulation,
    };
    let mut expr = expr;
    for plugin in resolved.plugins {
        expr = plugin(&expr, &data)?;
    }
    if !resolved.disable_subroutines {
        expr = stages::expand_subroutines(&expr, &data)?;
    }
    if !resolved.disable_atomic {
        expr = stages::emulate_atomic_groups(&expr, &data)?;
    }
    expr = cleanup(&expr);
    if !resolved.caps.modern_classes
        && let Some(backport) = resolved.backport
    {
        expr = backport(&expr, &data)?;
    }
    Ok(expr)
}

/// One separator occurrence found outside any character class
struct Separator {
    start: usize,
    end: usize,
    prev: Option<(TokenKind, String)>,
}

fn find_separators(expr: &str) -> Vec<Separator> {
    let mut ctx = RunningContext::default();
    let mut pos = 0;
    let mut prev: Option<(TokenKind, String)> = None;
    let mut found = Vec::new();
    while pos < expr.len() {
        if ctx.regex == RegexContext::Default && expr[pos..].starts_with(SEPARATOR) {
            found.push(Separator {
                start: pos,
                end: pos + SEPARATOR.len(),
                prev: prev.clone(),
            });
            pos += SEPARATOR.len();
            continue;
        }
        let token = scan_token(&expr[pos..], &ctx);
        pos += token.text.len();
        if token.kind != TokenKind::Whitespace {
            prev = Some((token.kind, token.text.to_string()));
        }
        ctx.advance(&token);
    }
    found
}

fn remove_spans(expr: &str, spans: &[(usize, usize)]) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut last = 0;
    for &(start, end) in spans {
        out.push_str(&expr[last..start]);
        last = end;
    }
    out.push_str(&expr[last..]);
    out
}

/// Collapse runs of adjacent separators into one occurrence
fn collapse_separator_runs(expr: &str) -> String {
    let separators = find_separators(expr);
    let mut doomed = Vec::new();
    let mut run_end = usize::MAX;
    for sep in &separators {
        if sep.start == run_end {
            doomed.push((sep.start, sep.end));
        }
        run_end = sep.end;
    }
    remove_spans(expr, &doomed)
}

fn quantifier_follows(rest: &str) -> bool {
    match rest.chars().next() {
        Some('?') | Some('*') | Some('+') => true,
        Some('{') => rest[1..].starts_with(|c: char| c.is_ascii_digit()),
        _ => false,
    }
}

fn preceding_is_boundary(prev: &Option<(TokenKind, String)>) -> bool {
    let Some((kind, text)) = prev else {
        // Start of expression.
        return true;
    };
    match kind {
        TokenKind::GroupOpen
        | TokenKind::GroupClose
        | TokenKind::Alternator
        | TokenKind::ClassClose => true,
        // A bare `(?` is a malformed opener, not a boundary; the separator
        // after it is load-bearing.
        TokenKind::NonCapturingOpen => text != "(?",
        TokenKind::Literal => text == ".",
        TokenKind::Escape => matches!(
            text.as_str(),
            r"\b" | r"\B" | r"\d" | r"\D" | r"\w" | r"\W" | r"\s" | r"\S"
        ),
        _ => false,
    }
}

fn following_is_boundary(rest: &str) -> bool {
    match rest.chars().next() {
        None => false,
        Some(')') | Some('|') | Some('.') | Some('^') | Some('$') | Some('\\') => true,
        // A group opener is a boundary, except a `(?(`-style construct:
        // deliberately conservative around reserved DEFINE-like groups.
        Some('(') => !rest.starts_with("(?("),
        _ => false,
    }
}

/// Delete inert separators left over from preprocessing
///
/// A run of separators collapses to one; a lone separator is deleted only
/// when the surrounding tokens are themselves atomic boundaries, and never
/// when it sits next to a synthetic-capture marker.
pub(crate) fn cleanup(expr: &str) -> String {
    let collapsed = collapse_separator_runs(expr);
    let separators = find_separators(&collapsed);
    let mut doomed = Vec::new();
    let synthetic_open = format!("({}", EMULATION_MARKER);

    for sep in &separators {
        let before = &collapsed[..sep.start];
        let after = &collapsed[sep.end..];
        if before.ends_with(EMULATION_MARKER) || after.starts_with(&synthetic_open) {
            continue;
        }
        let at_start = sep.start == 0;
        let at_end = sep.end == collapsed.len();
        let removable = (at_start && !quantifier_follows(after))
            || at_end
            || following_is_boundary(after)
            || (preceding_is_boundary(&sep.prev) && !quantifier_follows(after));
        if removable {
            doomed.push((sep.start, sep.end));
        }
    }
    remove_spans(&collapsed, &doomed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_runs() {
        assert_eq!(cleanup("a(?:)(?:)(?:)b"), "a(?:)b");
    }

    #[test]
    fn test_delete_at_start_and_end() {
        assert_eq!(cleanup("(?:)a"), "a");
        assert_eq!(cleanup("a(?:)"), "a");
    }

    #[test]
    fn test_keep_at_start_before_quantifier() {
        assert_eq!(cleanup("(?:)*a"), "(?:)*a");
        assert_eq!(cleanup("(?:){2}a"), "(?:){2}a");
    }

    #[test]
    fn test_delete_before_boundary_tokens() {
        assert_eq!(cleanup("a(?:)|b"), "a|b");
        assert_eq!(cleanup("(a(?:))"), "(a)");
        assert_eq!(cleanup(r"a(?:)\d"), r"a\d");
        assert_eq!(cleanup("a(?:)(b)"), "a(b)");
        assert_eq!(cleanup("a(?:)$"), "a$");
    }

    #[test]
    fn test_keep_before_define_like_group() {
        assert_eq!(cleanup("a(?:)(?(1)b)"), "a(?:)(?(1)b)");
    }

    #[test]
    fn test_delete_after_boundary_tokens() {
        assert_eq!(cleanup("((?:)a)"), "(a)");
        assert_eq!(cleanup("a|(?:)b"), "a|b");
        assert_eq!(cleanup("[a-z](?:)b"), "[a-z]b");
        assert_eq!(cleanup(r"\b(?:)b"), r"\bb");
    }

    #[test]
    fn test_keep_after_boundary_when_quantifier_follows() {
        // The separator is what the quantifier binds to; deleting it would
        // rebind the quantifier.
        assert_eq!(cleanup("((?:)?:a)"), "((?:)?:a)");
        assert_eq!(cleanup("a|(?:)*b"), "a|(?:)*b");
    }

    #[test]
    fn test_keep_after_malformed_group_marker() {
        // The separator after `(?` is what keeps the `?` from being read
        // as part of a group-type marker.
        assert_eq!(cleanup("(?(?:):a)"), "(?(?:):a)");
    }

    #[test]
    fn test_keep_between_plain_literals() {
        assert_eq!(cleanup(r"(a)\1(?:)0"), r"(a)\1(?:)0");
    }

    #[test]
    fn test_keep_next_to_synthetic_marker() {
        assert_eq!(cleanup("($E$(?:)a)x"), "($E$(?:)a)x");
        assert_eq!(cleanup("a(?:)($E$b)"), "a(?:)($E$b)");
    }

    #[test]
    fn test_class_content_untouched() {
        assert_eq!(cleanup("[(?:)]a(?:)"), "[(?:)]a");
    }
}
