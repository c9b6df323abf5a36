//! Default pipeline stages: subroutine expansion and atomic-group emulation
//!
//! Both stages rewrite the expression into constructs the target engine
//! supports natively. Every capturing group they introduce carries the
//! synthetic marker, so emulation mode can filter those captures out of
//! match results.

use std::collections::HashMap;

use crate::EMULATION_MARKER;
use crate::context::{
    RegexContext, RunningContext, TokenKind, context_after, count_captures, scan_token,
};
use crate::error::{Error, SyntaxError};
use crate::pipeline::StageData;

/// Rewrite numbered backreferences `>= min` up by `by`
///
/// Named backreferences `\k<...>` are untouched; class content is never a
/// backreference and is copied verbatim.
fn renumber_backrefs(text: &str, min: u32, by: u32) -> String {
    let mut ctx = RunningContext::default();
    let mut pos = 0;
    let mut out = String::with_capacity(text.len());
    while pos < text.len() {
        let token = scan_token(&text[pos..], &ctx);
        match token.kind {
            TokenKind::Backref(n) if n >= min => {
                out.push('\\');
                out.push_str(&(n + by).to_string());
            }
            _ => out.push_str(token.text),
        }
        pos += token.text.len();
        ctx.advance(&token);
    }
    out
}

/// Index of the `)` closing the group whose opener ends at `from`
fn find_group_close(text: &str, from: usize, mut ctx: RunningContext) -> Option<usize> {
    let mut depth = 1u32;
    let mut pos = from;
    while pos < text.len() {
        let token = scan_token(&text[pos..], &ctx);
        match token.kind {
            TokenKind::GroupOpen | TokenKind::NamedOpen | TokenKind::NonCapturingOpen => {
                depth += 1;
            }
            TokenKind::GroupClose => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            _ => {}
        }
        pos += token.text.len();
        ctx.advance(&token);
    }
    None
}

// ---------------------------------------------------------------------------
// Atomic groups
// ---------------------------------------------------------------------------

/// Emulate atomic groups and possessive quantifiers
///
/// Possessive quantifiers are first rewritten to atomic-group form, then
/// each `(?>body)` is expanded innermost-first to `(?:(?=(body))\N)`: a
/// lookahead captures the greedy match and the backreference consumes it,
/// which cuts off backtracking into the body. The introduced capture is
/// synthetic, and every numbered backreference that points past it is
/// renumbered.
pub(crate) fn emulate_atomic_groups(expr: &str, _data: &StageData) -> Result<String, Error> {
    let mut expr = rewrite_possessive(expr.to_string());
    while let Some(open) = last_atomic_open(&expr) {
        let body_start = open + 3;
        let ctx = context_after(&expr[..body_start], RunningContext::default());
        let close = find_group_close(&expr, body_start, ctx)
            .ok_or(Error::Syntax(SyntaxError::UnclosedGroup))?;
        let number = count_captures(&expr[..open], RunningContext::default()) as u32 + 1;
        expr = format!(
            "{}(?:(?=({}{}))\\{}){}",
            renumber_backrefs(&expr[..open], number, 1),
            EMULATION_MARKER,
            renumber_backrefs(&expr[body_start..close], number, 1),
            number,
            renumber_backrefs(&expr[close + 1..], number, 1),
        );
    }
    Ok(expr)
}

/// Byte index of the last `(?>` opener outside any class
///
/// The last opener in text order cannot contain another one, so processing
/// it first gives innermost-first expansion.
fn last_atomic_open(expr: &str) -> Option<usize> {
    let mut ctx = RunningContext::default();
    let mut pos = 0;
    let mut found = None;
    while pos < expr.len() {
        let token = scan_token(&expr[pos..], &ctx);
        if token.kind == TokenKind::NonCapturingOpen && token.text == "(?>" {
            found = Some(pos);
        }
        pos += token.text.len();
        ctx.advance(&token);
    }
    found
}

/// Whether `{...}` content is a valid interval quantifier
fn is_interval(content: &str) -> bool {
    let (min, max) = match content.split_once(',') {
        Some((a, b)) => (a, Some(b)),
        None => (content, None),
    };
    !min.is_empty()
        && min.bytes().all(|b| b.is_ascii_digit())
        && max.is_none_or(|m| m.bytes().all(|b| b.is_ascii_digit()))
}

fn rewrite_possessive(mut expr: String) -> String {
    while let Some((atom, keep_end, resume)) = find_possessive(&expr) {
        expr = format!(
            "{}(?>{}){}",
            &expr[..atom],
            &expr[atom..keep_end],
            &expr[resume..]
        );
    }
    expr
}

/// Find the next possessive quantifier: `X*+`, `X++`, `X?+`, or `X{n,m}+`
///
/// Returns the start of the quantified atom, the end of the text to keep
/// inside the atomic group, and the position after the trailing `+`.
fn find_possessive(expr: &str) -> Option<(usize, usize, usize)> {
    let mut ctx = RunningContext::default();
    let mut pos = 0;
    let mut atom: Option<usize> = None;
    let mut openers: Vec<usize> = Vec::new();
    let mut class_start = 0;
    let mut enclosed_start = 0;
    let mut brace_start = 0;
    while pos < expr.len() {
        let token = scan_token(&expr[pos..], &ctx);
        let end = pos + token.text.len();
        if ctx.regex == RegexContext::Default {
            match token.kind {
                TokenKind::Quantifier if token.text.len() == 2 && token.text.ends_with('+') => {
                    if let Some(a) = atom {
                        return Some((a, pos + 1, end));
                    }
                }
                TokenKind::Literal | TokenKind::Escape | TokenKind::Backref(_) => {
                    atom = Some(pos);
                }
                TokenKind::GroupOpen | TokenKind::NamedOpen | TokenKind::NonCapturingOpen => {
                    openers.push(pos);
                    atom = None;
                }
                TokenKind::GroupClose => atom = openers.pop(),
                TokenKind::ClassOpen => class_start = pos,
                TokenKind::EnclosedOpen(_) => enclosed_start = pos,
                TokenKind::BraceOpen => brace_start = pos,
                TokenKind::Alternator | TokenKind::FlagDirective | TokenKind::Incomplete => {
                    atom = None;
                }
                _ => {}
            }
        } else {
            match token.kind {
                TokenKind::BraceClose => {
                    let rest = &expr[end..];
                    if is_interval(&expr[brace_start + 1..pos])
                        && rest.starts_with('+')
                        && !rest.starts_with("+?")
                        && let Some(a) = atom
                    {
                        return Some((a, end, end + 1));
                    }
                }
                TokenKind::EnclosedClose if ctx.regex == RegexContext::EnclosedToken => {
                    atom = Some(enclosed_start);
                }
                _ => {}
            }
        }
        let was_class = ctx.regex == RegexContext::CharClass;
        ctx.advance(&token);
        if was_class && ctx.regex == RegexContext::Default {
            // A whole class just closed; it is the quantifiable atom.
            atom = Some(class_start);
        }
        pos = end;
    }
    None
}

// ---------------------------------------------------------------------------
// Subroutines
// ---------------------------------------------------------------------------

/// A named group definition found in the expression
struct Definition {
    body_start: usize,
    body_end: usize,
    /// The group's own capture number
    number: u32,
    /// Capturing groups opened inside the body
    inner: u32,
}

struct OpenGroup {
    name: Option<String>,
    number: u32,
    body_start: usize,
}

fn collect_definitions(expr: &str) -> HashMap<String, Definition> {
    let mut ctx = RunningContext::default();
    let mut pos = 0;
    let mut counter = 0u32;
    let mut stack: Vec<OpenGroup> = Vec::new();
    let mut defs = HashMap::new();
    while pos < expr.len() {
        let token = scan_token(&expr[pos..], &ctx);
        let end = pos + token.text.len();
        match ctx.regex {
            RegexContext::GroupName => {
                if let Some(top) = stack.last_mut() {
                    match token.kind {
                        TokenKind::EnclosedContent => {
                            if let Some(name) = &mut top.name {
                                name.push_str(token.text);
                            }
                        }
                        TokenKind::EnclosedClose => top.body_start = end,
                        _ => {}
                    }
                }
            }
            RegexContext::Default | RegexContext::CharClass => match token.kind {
                TokenKind::GroupOpen => {
                    counter += 1;
                    stack.push(OpenGroup {
                        name: None,
                        number: counter,
                        body_start: end,
                    });
                }
                TokenKind::NamedOpen => {
                    counter += 1;
                    stack.push(OpenGroup {
                        name: Some(String::new()),
                        number: counter,
                        body_start: end,
                    });
                }
                TokenKind::NonCapturingOpen => {
                    stack.push(OpenGroup {
                        name: None,
                        number: 0,
                        body_start: end,
                    });
                }
                TokenKind::GroupClose => {
                    if let Some(group) = stack.pop()
                        && let Some(name) = group.name
                    {
                        defs.insert(
                            name,
                            Definition {
                                body_start: group.body_start,
                                body_end: pos,
                                number: group.number,
                                inner: counter - group.number,
                            },
                        );
                    }
                }
                _ => {}
            },
            _ => {}
        }
        pos = end;
        ctx.advance(&token);
    }
    defs
}

/// A `\g<name>` subroutine call
struct Call {
    start: usize,
    end: usize,
    name: String,
}

fn find_calls(expr: &str) -> Vec<Call> {
    let mut ctx = RunningContext::default();
    let mut pos = 0;
    let mut calls = Vec::new();
    let mut open: Option<(usize, String)> = None;
    while pos < expr.len() {
        let token = scan_token(&expr[pos..], &ctx);
        let end = pos + token.text.len();
        match token.kind {
            TokenKind::EnclosedOpen(_) if token.text == r"\g<" => {
                open = Some((pos, String::new()));
            }
            TokenKind::EnclosedContent => {
                if let Some((_, name)) = &mut open {
                    name.push_str(token.text);
                }
            }
            TokenKind::EnclosedClose => {
                if let Some((start, name)) = open.take() {
                    calls.push(Call { start, end, name });
                }
            }
            _ => {}
        }
        pos = end;
        ctx.advance(&token);
    }
    calls
}

fn check_recursion(expr: &str) -> Result<(), Error> {
    let defs = collect_definitions(expr);
    let graph: HashMap<&str, Vec<String>> = defs
        .iter()
        .map(|(name, def)| {
            let callees = find_calls(&expr[def.body_start..def.body_end])
                .into_iter()
                .map(|c| c.name)
                .collect();
            (name.as_str(), callees)
        })
        .collect();

    fn visit(
        name: &str,
        graph: &HashMap<&str, Vec<String>>,
        state: &mut HashMap<String, bool>,
    ) -> Result<(), SyntaxError> {
        match state.get(name) {
            Some(false) => return Err(SyntaxError::RecursiveSubroutine(name.to_string())),
            Some(true) => return Ok(()),
            None => {}
        }
        state.insert(name.to_string(), false);
        if let Some(callees) = graph.get(name) {
            for callee in callees {
                visit(callee, graph, state)?;
            }
        }
        state.insert(name.to_string(), true);
        Ok(())
    }

    let mut state = HashMap::new();
    for call in find_calls(expr) {
        visit(&call.name, &graph, &mut state).map_err(Error::Syntax)?;
    }
    Ok(())
}

/// Rewrite a definition body for splicing at a call site
///
/// Capturing openers become synthetic unnamed opens (a second group with
/// the same name would be rejected by the engine). Backreferences into the
/// body are retargeted to the spliced copy's numbering; backreferences to
/// groups at or past the splice point are shifted like the rest of the
/// expression.
fn transform_body(body: &str, own: u32, inner: u32, new_number: u32, added: u32) -> String {
    let mut ctx = RunningContext::default();
    let mut pos = 0;
    let mut out = String::with_capacity(body.len());
    let mut dropping_name = false;
    while pos < body.len() {
        let token = scan_token(&body[pos..], &ctx);
        if dropping_name {
            if token.kind == TokenKind::EnclosedClose {
                dropping_name = false;
            }
        } else {
            match token.kind {
                TokenKind::GroupOpen => {
                    out.push('(');
                    // An already-synthetic capture keeps its one marker.
                    if !body[pos + 1..].starts_with(EMULATION_MARKER) {
                        out.push_str(EMULATION_MARKER);
                    }
                }
                TokenKind::NamedOpen => {
                    out.push('(');
                    out.push_str(EMULATION_MARKER);
                    dropping_name = true;
                }
                TokenKind::Backref(m) => {
                    let target = if m > own && m <= own + inner {
                        new_number + (m - own)
                    } else if m >= new_number {
                        m + added
                    } else {
                        m
                    };
                    out.push('\\');
                    out.push_str(&target.to_string());
                }
                _ => out.push_str(token.text),
            }
        }
        pos += token.text.len();
        ctx.advance(&token);
    }
    out
}

/// Expand `\g<name>` subroutine calls
///
/// Each call is replaced by a copy of the named group's body wrapped in a
/// synthetic capture. Calls to undefined groups and cyclic call chains are
/// syntax errors; acyclic nested calls are expanded transitively.
pub(crate) fn expand_subroutines(expr: &str, _data: &StageData) -> Result<String, Error> {
    check_recursion(expr)?;
    let mut expr = expr.to_string();
    loop {
        let Some(call) = find_calls(&expr).into_iter().next() else {
            return Ok(expr);
        };
        let defs = collect_definitions(&expr);
        let def = defs
            .get(&call.name)
            .ok_or_else(|| Error::Syntax(SyntaxError::UndefinedSubroutine(call.name.clone())))?;
        let new_number = count_captures(&expr[..call.start], RunningContext::default()) as u32 + 1;
        let added = 1 + def.inner;
        let body = transform_body(
            &expr[def.body_start..def.body_end],
            def.number,
            def.inner,
            new_number,
            added,
        );
        expr = format!(
            "{}({}{}){}",
            renumber_backrefs(&expr[..call.start], new_number, added),
            EMULATION_MARKER,
            body,
            renumber_backrefs(&expr[call.end..], new_number, added),
        );
    }
}
