//! Interpolation compiler for substitution values
//!
//! This module turns one substitution value into a pattern fragment that is
//! safe and correct for the syntactic position of its hole. Safety invariant:
//! no unescaped character at either edge of a fragment may extend an
//! operation (quantifier, range, set operator, group marker) across the
//! fragment's boundary; when no safe rendering exists the embedding fails.

use crate::context::{
    CharClassContext, EnclosedKind, RegexContext, RunningContext, TokenKind, context_after,
    count_captures, scan_token,
};
use crate::error::{Error, InterpolationError};
use crate::options::{Capabilities, FlagSet};

/// A value substituted into a template hole
#[derive(Debug, Clone, PartialEq)]
pub enum Substitution {
    /// Plain text, matched literally after escaping
    Text(String),
    /// A number, rendered decimal (hexadecimal inside code-point escapes)
    Number(i64),
    /// A trusted pattern, spliced without re-escaping on the caller's
    /// authority that it is already valid syntax
    Pattern(String),
    /// A native sub-pattern with its own flags
    Regex {
        /// The sub-pattern source
        source: String,
        /// The sub-pattern's local flags
        flags: String,
    },
}

impl Substitution {
    /// Build a trusted-pattern value
    pub fn pattern(source: impl Into<String>) -> Self {
        Substitution::Pattern(source.into())
    }

    /// Build a native-regex value from source and flags
    pub fn regex(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Substitution::Regex {
            source: source.into(),
            flags: flags.into(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Substitution::Text(_) => "text",
            Substitution::Number(_) => "number",
            Substitution::Pattern(_) => "pattern",
            Substitution::Regex { .. } => "regex",
        }
    }
}

impl From<&str> for Substitution {
    fn from(value: &str) -> Self {
        Substitution::Text(value.to_string())
    }
}

impl From<String> for Substitution {
    fn from(value: String) -> Self {
        Substitution::Text(value)
    }
}

impl From<i64> for Substitution {
    fn from(value: i64) -> Self {
        Substitution::Number(value)
    }
}

impl From<u32> for Substitution {
    fn from(value: u32) -> Self {
        Substitution::Number(i64::from(value))
    }
}

/// Whether literal text exists immediately before and after the hole
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boundary {
    /// Content precedes the hole
    pub before: bool,
    /// Content follows the hole
    pub after: bool,
}

/// A compiled fragment and the capturing groups it contributes
#[derive(Debug, Clone, PartialEq)]
pub struct Embedded {
    /// The fragment text, safe for the hole's position
    pub text: String,
    /// Capturing groups opened inside the fragment
    pub captures: usize,
}

impl Embedded {
    fn plain(text: String) -> Self {
        Embedded { text, captures: 0 }
    }
}

/// Compile one substitution value for the hole described by `ctx`
pub fn embed(
    value: &Substitution,
    outer_flags: &FlagSet,
    ctx: &RunningContext,
    boundary: Boundary,
    preceding_captures: usize,
    caps: &Capabilities,
    modern: bool,
) -> Result<Embedded, Error> {
    if ctx.is_incomplete() {
        return Err(InterpolationError::AfterIncompleteToken.into());
    }
    match ctx.regex {
        RegexContext::GroupName => embed_restricted(value, "in a group name", NameKind::Ident),
        RegexContext::IntervalQuantifier => {
            embed_restricted(value, "in an interval quantifier", NameKind::Bound)
        }
        RegexContext::EnclosedToken => embed_enclosed(value, ctx.enclosed_kind()),
        RegexContext::CharClass => match ctx.class {
            CharClassContext::QToken | CharClassContext::EnclosedToken => {
                embed_enclosed(value, ctx.enclosed_kind())
            }
            _ => embed_in_class(value, modern),
        },
        RegexContext::Default => {
            embed_in_default(value, outer_flags, boundary, preceding_captures, caps)
        }
        RegexContext::InvalidIncompleteToken => {
            Err(InterpolationError::AfterIncompleteToken.into())
        }
    }
}

enum NameKind {
    Ident,
    Bound,
}

fn embed_restricted(
    value: &Substitution,
    place: &'static str,
    kind: NameKind,
) -> Result<Embedded, Error> {
    let text = match value {
        Substitution::Number(n) => n.to_string(),
        Substitution::Text(text) => text.clone(),
        other => {
            return Err(InterpolationError::ValueNotAllowed {
                kind: other.kind(),
                place,
            }
            .into());
        }
    };
    let safe = match kind {
        NameKind::Ident => text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_'),
        NameKind::Bound => text.chars().all(|c| c.is_ascii_digit() || c == ','),
    };
    if !safe {
        return Err(InterpolationError::UnsafeText { text, place }.into());
    }
    Ok(Embedded::plain(text))
}

fn embed_enclosed(value: &Substitution, kind: Option<EnclosedKind>) -> Result<Embedded, Error> {
    let place = "in an enclosed token";
    let text = match (value, kind) {
        (Substitution::Number(n), Some(EnclosedKind::CodePoint)) => {
            if *n < 0 {
                return Err(InterpolationError::UnsafeText {
                    text: n.to_string(),
                    place: "as a code point",
                }
                .into());
            }
            format!("{:X}", n)
        }
        (Substitution::Number(n), _) => n.to_string(),
        (Substitution::Text(text), k) => {
            let safe = match k {
                Some(EnclosedKind::CodePoint) => {
                    text.chars().all(|c| c.is_ascii_hexdigit())
                }
                Some(EnclosedKind::Property) => text
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '='),
                Some(EnclosedKind::GroupRef) => text
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_'),
                Some(EnclosedKind::QString) => !text.contains(['}', '\\']),
                None => false,
            };
            if !safe {
                return Err(InterpolationError::UnsafeText {
                    text: text.clone(),
                    place,
                }
                .into());
            }
            text.clone()
        }
        (other, _) => {
            return Err(InterpolationError::ValueNotAllowed {
                kind: other.kind(),
                place,
            }
            .into());
        }
    };
    Ok(Embedded::plain(text))
}

fn embed_in_class(value: &Substitution, modern: bool) -> Result<Embedded, Error> {
    match value {
        Substitution::Text(text) => {
            let escaped = escape_for_class(text);
            Ok(Embedded::plain(wrap_class_element(escaped, text.chars().count())))
        }
        Substitution::Number(n) => {
            let text = n.to_string();
            let escaped = escape_for_class(&text);
            Ok(Embedded::plain(wrap_class_element(escaped, text.len())))
        }
        Substitution::Pattern(source) => {
            check_class_boundary(source)?;
            let elements = class_element_count(source, modern);
            Ok(Embedded {
                captures: 0,
                text: wrap_class_element(source.clone(), elements),
            })
        }
        Substitution::Regex { .. } => Err(InterpolationError::ValueNotAllowed {
            kind: value.kind(),
            place: "inside a character class",
        }
        .into()),
    }
}

fn embed_in_default(
    value: &Substitution,
    outer_flags: &FlagSet,
    boundary: Boundary,
    preceding_captures: usize,
    caps: &Capabilities,
) -> Result<Embedded, Error> {
    match value {
        Substitution::Text(text) => {
            let escaped = escape_literal(text);
            Ok(Embedded::plain(wrap_atom(
                escaped,
                text.chars().count(),
                boundary,
            )))
        }
        Substitution::Number(n) => {
            let text = n.to_string();
            Ok(Embedded::plain(wrap_atom(text.clone(), text.len(), boundary)))
        }
        Substitution::Pattern(source) => {
            let captures = count_captures(source, RunningContext::default());
            Ok(Embedded {
                text: format!("(?:{})", source),
                captures,
            })
        }
        Substitution::Regex { source, flags } => {
            let local = FlagSet::parse_lenient(flags);
            let captures = count_captures(source, RunningContext::default());
            let shifted = shift_backrefs(source, preceding_captures);
            let (enable, disable) = local.diff(outer_flags);
            let text = if enable.is_empty() && disable.is_empty() {
                format!("(?:{})", shifted)
            } else if caps.scoped_flag_groups {
                // The scoped flag group expresses exactly the differing
                // flags and already supplies the grouping.
                if disable.is_empty() {
                    format!("(?{}:{})", enable, shifted)
                } else {
                    format!("(?{}-{}:{})", enable, disable, shifted)
                }
            } else {
                let mut letters = enable;
                letters.push_str(&disable);
                return Err(InterpolationError::UnrepresentableFlags(letters).into());
            };
            Ok(Embedded { text, captures })
        }
    }
}

/// Escape plain text so it matches literally at top level
pub(crate) fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape plain text so every character is a safe class atom
pub(crate) fn escape_for_class(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '[' | ']' | '^' | '-' | '&' | '~') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn wrap_atom(escaped: String, elements: usize, boundary: Boundary) -> String {
    // A one-token fragment is naturally atomic; longer fragments only need
    // grouping when adjacent content could bind to part of them.
    if elements > 1 && (boundary.before || boundary.after) {
        format!("(?:{})", escaped)
    } else {
        escaped
    }
}

fn wrap_class_element(content: String, elements: usize) -> String {
    if elements > 1 {
        format!("[{}]", content)
    } else {
        content
    }
}

/// Count the class elements the content would parse as
fn class_element_count(source: &str, modern: bool) -> usize {
    let mut ctx = context_after("[", RunningContext::new(modern));
    let mut pos = 0;
    let mut count = 0;
    while pos < source.len() {
        let token = scan_token(&source[pos..], &ctx);
        pos += token.text.len();
        // A nested class or enclosed token counts once, at its opener; a
        // completed range `a-z` counts once; an explicit set operator
        // always forces wrapping.
        match token.kind {
            TokenKind::ClassClose
            | TokenKind::EnclosedClose
            | TokenKind::EnclosedContent
            | TokenKind::Whitespace
            | TokenKind::RangeOp => {}
            TokenKind::UnionOp | TokenKind::IntersectionOp => count += 2,
            _ => {
                if ctx.class != CharClassContext::Range {
                    count += 1;
                }
            }
        }
        ctx.advance(&token);
    }
    count
}

fn check_class_boundary(source: &str) -> Result<(), Error> {
    for op in ["&&", "-"] {
        if source.starts_with(op) {
            return Err(InterpolationError::BoundaryOperator(op.to_string()).into());
        }
        if source.ends_with(op) && !ends_escaped(source, op.len()) {
            return Err(InterpolationError::BoundaryOperator(op.to_string()).into());
        }
    }
    Ok(())
}

/// Whether the trailing operator of `len` bytes is itself escaped
fn ends_escaped(source: &str, op_len: usize) -> bool {
    let head = &source[..source.len() - op_len];
    let backslashes = head.chars().rev().take_while(|&c| c == '\\').count();
    backslashes % 2 == 1
}

/// Shift every numbered backreference in `source` by `by`
pub(crate) fn shift_backrefs(source: &str, by: usize) -> String {
    let mut ctx = RunningContext::default();
    let mut out = String::with_capacity(source.len());
    let mut pos = 0;
    while pos < source.len() {
        let token = scan_token(&source[pos..], &ctx);
        pos += token.text.len();
        match token.kind {
            TokenKind::Backref(n) => {
                out.push('\\');
                out.push_str(&(n as usize + by).to_string());
            }
            _ => out.push_str(token.text),
        }
        ctx.advance(&token);
    }
    out
}
