//! Whitespace/comment preprocessor for extended mode
//!
//! This module rewrites one literal template segment at a time, deleting
//! insignificant whitespace and `#` comments without changing match
//! semantics. It applies only to literal segments, never to interpolated
//! fragments. The carried [`ExtendedState`] makes it resumable: the state
//! returned for one segment is the exact input for the next, including the
//! "currently inside a comment" sub-state.

use crate::context::{
    CharClassContext, RegexContext, RunningContext, Token, TokenKind, context_after, scan_token,
};
use crate::error::{Error, SyntaxError};
use crate::options::Modes;
use crate::SEPARATOR;

/// Last retained token, kept for adjacency decisions
#[derive(Debug, Clone)]
struct Significant {
    kind: TokenKind,
    text: String,
}

impl Significant {
    fn is_digit_extensible(&self) -> bool {
        Token {
            kind: self.kind,
            text: &self.text,
        }
        .is_digit_extensible()
    }

    fn is_class_atom(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Literal
                | TokenKind::Escape
                | TokenKind::Backref(_)
                | TokenKind::ClassClose
                | TokenKind::EnclosedClose
        )
    }

    /// Whether appending `next` directly would extend this token into a
    /// different escape
    fn is_extensible_by(&self, next: char) -> bool {
        if self.is_digit_extensible() {
            return next.is_ascii_digit();
        }
        if self.kind != TokenKind::Escape {
            return false;
        }
        match self.text.as_bytes().get(1) {
            // A short fixed-length hex escape; more hex digits would
            // complete it into a different escape (`\x4` + `1` is `\x41`).
            Some(b'x') => self.text.len() < 4 && next.is_ascii_hexdigit(),
            Some(b'u') => self.text.len() < 6 && next.is_ascii_hexdigit(),
            Some(b'c') => self.text.len() == 2 && next.is_ascii_alphabetic(),
            _ => false,
        }
    }
}

/// Whether `next` appended after `last` would merge into a different token
fn merge_hazard(last: &Option<Significant>, next: &str) -> bool {
    let Some(c) = next.chars().next() else {
        return false;
    };
    last.as_ref().is_some_and(|t| t.is_extensible_by(c))
}

/// Preprocessor state threaded across segment boundaries
#[derive(Debug, Clone)]
pub struct ExtendedState {
    /// Running context of the expression emitted so far
    pub context: RunningContext,
    /// Capturing groups opened so far, left to right
    pub captures: usize,
    last: Option<Significant>,
    in_comment: bool,
    stripped_ws: bool,
}

impl ExtendedState {
    /// Create the state for an empty expression
    pub fn new(modern: bool) -> Self {
        ExtendedState {
            context: RunningContext::new(modern),
            captures: 0,
            last: None,
            in_comment: false,
            stripped_ws: false,
        }
    }

    /// Record text appended to the expression from outside the preprocessor
    /// (an interpolated fragment), keeping the carried state consistent
    pub fn note_external(&mut self, fragment: &str, captures_added: usize) {
        let mut ctx = self.context;
        let mut pos = 0;
        let mut last = None;
        while pos < fragment.len() {
            let token = scan_token(&fragment[pos..], &ctx);
            pos += token.text.len();
            last = Some(Significant {
                kind: token.kind,
                text: token.text.to_string(),
            });
            ctx.advance(&token);
        }
        self.context = ctx;
        self.captures += captures_added;
        if last.is_some() {
            self.last = last;
            self.stripped_ws = false;
        }
        self.in_comment = false;
    }

    /// Whether a fragment appended now must be preceded by a separator to
    /// keep it from extending the last retained token
    pub fn needs_separator_before(&self, next: &str) -> bool {
        self.context.regex == RegexContext::Default && merge_hazard(&self.last, next)
    }

    fn retain(&mut self, out: &mut String, kind: TokenKind, text: &str) {
        out.push_str(text);
        let token = Token { kind, text };
        self.context.advance(&token);
        self.last = Some(Significant {
            kind,
            text: text.to_string(),
        });
        self.stripped_ws = false;
    }

    fn emit_separator(&mut self, out: &mut String) {
        out.push_str(SEPARATOR);
        self.context = context_after(SEPARATOR, self.context);
    }
}

/// Rewrite one literal segment under the carried state
///
/// Returns the transformed segment text; the updated state (context, last
/// significant token, comment sub-state) is left in `state` for the next
/// segment or interpolation hole.
pub fn apply(segment: &str, state: &mut ExtendedState, modes: &Modes) -> Result<String, Error> {
    let mut out = String::with_capacity(segment.len());
    let mut pos = 0;

    while pos < segment.len() {
        if state.in_comment {
            // A comment runs through the next newline; the newline itself
            // becomes a potential separator point.
            match segment[pos..].find('\n') {
                Some(idx) => {
                    pos += idx + 1;
                    state.in_comment = false;
                    state.stripped_ws = true;
                }
                None => pos = segment.len(),
            }
            continue;
        }

        let token = scan_token(&segment[pos..], &state.context);
        pos += token.text.len();

        match state.context.regex {
            RegexContext::Default if modes.extended => {
                process_default(&token, state, &mut out, modes)?;
            }
            RegexContext::CharClass => {
                process_class(&token, state, &mut out, modes)?;
            }
            _ => process_verbatim(&token, state, &mut out, modes),
        }
    }

    Ok(out)
}

fn process_default(
    token: &Token,
    state: &mut ExtendedState,
    out: &mut String,
    modes: &Modes,
) -> Result<(), Error> {
    match token.kind {
        TokenKind::Whitespace => {
            state.stripped_ws = true;
            return Ok(());
        }
        TokenKind::Literal if token.text == "#" => {
            state.in_comment = true;
            return Ok(());
        }
        TokenKind::Escape if is_escaped_insignificant(token.text) => {
            // Un-escape to the literal character: once whitespace is
            // insignificant, the escape is the only way to match it.
            let literal = &token.text[1..];
            state.retain(out, TokenKind::Literal, literal);
            return Ok(());
        }
        TokenKind::Quantifier => {
            // A quantifier binds to the preceding significant token even if
            // whitespace separated them; never put a separator before it.
            if token.text.starts_with('?')
                && state.last.as_ref().is_some_and(|t| t.kind == TokenKind::GroupOpen)
            {
                // `( ?` must not collapse into a group-type marker.
                state.retain(out, TokenKind::Quantifier, token.text);
                state.emit_separator(out);
                state.last = Some(Significant {
                    kind: TokenKind::GroupClose,
                    text: ")".to_string(),
                });
                return Ok(());
            }
            state.retain(out, TokenKind::Quantifier, token.text);
            return Ok(());
        }
        _ => {}
    }
    process_verbatim(token, state, out, modes);
    Ok(())
}

fn process_class(
    token: &Token,
    state: &mut ExtendedState,
    out: &mut String,
    modes: &Modes,
) -> Result<(), Error> {
    let class = state.context.class;
    let strippable = matches!(class, CharClassContext::Default | CharClassContext::Range);

    match token.kind {
        TokenKind::Whitespace if modes.extended => {
            if class == CharClassContext::InvalidIncompleteToken {
                return Err(SyntaxError::WhitespaceInToken.into());
            }
            if !strippable {
                out.push_str(token.text);
                state.context.advance(token);
                return Ok(());
            }
            // Only ASCII space and tab are insignificant inside a class.
            let kept: String = token
                .text
                .chars()
                .filter(|&c| c != ' ' && c != '\t')
                .collect();
            if kept.len() < token.text.len() {
                state.stripped_ws = true;
            }
            if !kept.is_empty() {
                out.push_str(&kept);
                state.context.advance(token);
            }
            return Ok(());
        }
        TokenKind::EnclosedContent
            if modes.extended
                && class == CharClassContext::EnclosedToken
                && token.text.contains([' ', '\t']) =>
        {
            // The token is still open; whitespace here is ambiguous about
            // which token it terminates.
            return Err(SyntaxError::WhitespaceInToken.into());
        }
        TokenKind::EnclosedContent if modes.extended && class == CharClassContext::QToken => {
            let kept: String = token
                .text
                .chars()
                .filter(|&c| c != ' ' && c != '\t')
                .collect();
            if kept.len() < token.text.len() {
                state.stripped_ws = true;
            }
            if !kept.is_empty() {
                state.retain(out, TokenKind::EnclosedContent, &kept);
            }
            return Ok(());
        }
        TokenKind::Escape
            if modes.extended && strippable && is_escaped_class_space(token.text) =>
        {
            let literal = &token.text[1..];
            state.retain(out, TokenKind::Literal, literal);
            return Ok(());
        }
        TokenKind::RangeOp if modes.extended && state.stripped_ws => {
            if state.last.as_ref().is_some_and(|t| t.is_class_atom()) {
                // The stripped whitespace must not silently turn a spaced
                // hyphen into a range.
                return Err(SyntaxError::AmbiguousRangeHyphen.into());
            }
        }
        TokenKind::Incomplete if modes.extended && state.stripped_ws => {
            return Err(SyntaxError::WhitespaceInToken.into());
        }
        _ if modes.extended && state.stripped_ws && merge_hazard(&state.last, token.text) => {
            // A separator is a group construct, so inside a class the
            // merge cannot be fenced off, only rejected.
            return Err(SyntaxError::WhitespaceInToken.into());
        }
        _ => {}
    }
    process_verbatim(token, state, out, modes);
    Ok(())
}

fn process_verbatim(token: &Token, state: &mut ExtendedState, out: &mut String, modes: &Modes) {
    if state.stripped_ws && state.needs_separator_before(token.text) {
        // Two originally-separated tokens would merge into a different
        // token (`\1 0` is not `\10`, `\x4 1` is not `\x41`); keep them
        // apart.
        state.emit_separator(out);
    }

    match token.kind {
        TokenKind::GroupOpen if modes.named_only => {
            // Named-only mode: bare groups in literal text do not capture.
            out.push_str("(?:");
            state.context = context_after("(?:", state.context);
            state.last = Some(Significant {
                kind: TokenKind::NonCapturingOpen,
                text: "(?:".to_string(),
            });
            state.stripped_ws = false;
        }
        TokenKind::GroupOpen | TokenKind::NamedOpen => {
            state.captures += 1;
            state.retain(out, token.kind, token.text);
        }
        TokenKind::Whitespace => {
            // Retained whitespace (extended mode off, or a class position
            // where it is significant) is not a significant token.
            out.push_str(token.text);
            state.context.advance(token);
        }
        _ => state.retain(out, token.kind, token.text),
    }
}

fn is_escaped_insignificant(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some('\\')
        && chars
            .next()
            .is_some_and(|c| c.is_whitespace() || c == '#')
}

fn is_escaped_class_space(text: &str) -> bool {
    matches!(text, "\\ " | "\\\t")
}
