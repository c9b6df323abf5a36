//! Target-engine wrapper: capture map extraction and match filtering
//!
//! The compiled expression may contain synthetic captures introduced by
//! emulation stages, tagged with a marker after their `(`. This module
//! strips the markers, records which capture indices are synthetic, and
//! wraps the target engine so that match results only expose the captures
//! the caller wrote.

use std::collections::HashMap;
use std::sync::Arc;

use crate::EMULATION_MARKER;
use crate::context::{RunningContext, TokenKind, scan_token};
use crate::error::{Error, Result};
use crate::interpolate::Substitution;
use crate::options::FlagSet;

/// A match result
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// The start position of the match
    pub start: usize,
    /// The end position of the match (exclusive)
    pub end: usize,
    /// Captured groups (index -> (start, end))
    pub groups: HashMap<u32, (usize, usize)>,
    /// Named captured groups (name -> (start, end))
    pub named_groups: HashMap<String, (usize, usize)>,
}

impl Match {
    /// Get the matched text
    pub fn as_str<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }

    /// Get a capture group by index (1-based)
    pub fn group(&self, n: u32) -> Option<(usize, usize)> {
        self.groups.get(&n).copied()
    }

    /// Get a named capture group
    pub fn named_group(&self, name: &str) -> Option<(usize, usize)> {
        self.named_groups.get(name).copied()
    }

    /// Get the text of a capture group
    pub fn group_str<'a>(&self, input: &'a str, n: u32) -> Option<&'a str> {
        self.group(n).map(|(start, end)| &input[start..end])
    }

    /// Get the text of a named capture group
    pub fn named_group_str<'a>(&self, input: &'a str, name: &str) -> Option<&'a str> {
        self.named_group(name)
            .map(|(start, end)| &input[start..end])
    }
}

/// Strip synthetic markers and record which captures are synthetic
///
/// The returned map has one entry per capture index: entry 0 is the whole
/// match and always `true`; a capture whose `(` was followed by the marker
/// gets `false`. Marker text inside a character class is literal and kept.
pub(crate) fn extract_capture_map(expr: &str) -> (String, Vec<bool>) {
    let mut ctx = RunningContext::default();
    let mut pos = 0;
    let mut out = String::with_capacity(expr.len());
    let mut map = vec![true];
    while pos < expr.len() {
        let token = scan_token(&expr[pos..], &ctx);
        pos += token.text.len();
        match token.kind {
            TokenKind::GroupOpen => {
                out.push('(');
                if expr[pos..].starts_with(EMULATION_MARKER) {
                    map.push(false);
                    pos += EMULATION_MARKER.len();
                } else {
                    map.push(true);
                }
            }
            TokenKind::NamedOpen => {
                out.push_str(token.text);
                map.push(true);
            }
            _ => out.push_str(token.text),
        }
        ctx.advance(&token);
    }
    (out, map)
}

/// A compiled pattern bound to the target engine
///
/// Cloning shares the capture map rather than recomputing it.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: fancy_regex::Regex,
    source: String,
    flags: String,
    capture_map: Option<Arc<Vec<bool>>>,
}

impl Matcher {
    /// Build a matcher from a pipeline-processed expression
    ///
    /// Markers are always stripped; the capture map is kept for filtering
    /// only when emulation mode is on.
    pub(crate) fn new(expr: &str, flags: &FlagSet, emulation: bool) -> Result<Matcher> {
        let (source, map) = extract_capture_map(expr);
        let flags = flags.as_string();
        let pattern = if flags.is_empty() {
            source.clone()
        } else {
            format!("(?{}){}", flags, source)
        };
        let regex =
            fancy_regex::Regex::new(&pattern).map_err(|e| Error::Engine(e.to_string()))?;
        Ok(Matcher {
            regex,
            source,
            flags,
            capture_map: emulation.then(|| Arc::new(map)),
        })
    }

    /// The compiled pattern text, without markers
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The resolved flag string
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Check if the pattern matches anywhere in the input
    pub fn is_match(&self, input: &str) -> Result<bool> {
        self.regex
            .is_match(input)
            .map_err(|e| Error::Engine(e.to_string()))
    }

    /// Find the first match in the input
    pub fn find(&self, input: &str) -> Result<Option<Match>> {
        let captures = self
            .regex
            .captures(input)
            .map_err(|e| Error::Engine(e.to_string()))?;
        Ok(captures.map(|c| self.filter(&c)))
    }

    /// Find all non-overlapping matches
    pub fn find_all(&self, input: &str) -> Result<Vec<Match>> {
        let mut matches = Vec::new();
        let mut pos = 0;
        while pos <= input.len() {
            let captures = self
                .regex
                .captures_from_pos(input, pos)
                .map_err(|e| Error::Engine(e.to_string()))?;
            let Some(captures) = captures else { break };
            let m = self.filter(&captures);
            pos = if m.end > m.start {
                m.end
            } else {
                // Step past an empty match to the next char boundary.
                m.end
                    + input[m.end..]
                        .chars()
                        .next()
                        .map(char::len_utf8)
                        .unwrap_or(1)
            };
            matches.push(m);
        }
        Ok(matches)
    }

    /// Convert engine captures to a filtered, renumbered match
    fn filter(&self, captures: &fancy_regex::Captures) -> Match {
        let whole = captures.get(0).map(|g| (g.start(), g.end())).unwrap_or((0, 0));
        let mut groups = HashMap::new();
        let mut index = 0u32;
        for i in 1..captures.len() {
            let visible = self
                .capture_map
                .as_ref()
                .is_none_or(|map| map.get(i).copied().unwrap_or(true));
            if visible {
                index += 1;
                if let Some(g) = captures.get(i) {
                    groups.insert(index, (g.start(), g.end()));
                }
            }
        }
        let mut named_groups = HashMap::new();
        for (i, name) in self.regex.capture_names().enumerate() {
            if let Some(name) = name
                && let Some(g) = captures.get(i)
            {
                named_groups.insert(name.to_string(), (g.start(), g.end()));
            }
        }
        Match {
            start: whole.0,
            end: whole.1,
            groups,
            named_groups,
        }
    }
}

/// A compiled matcher interpolates as a native-regex value
impl From<&Matcher> for Substitution {
    fn from(matcher: &Matcher) -> Self {
        Substitution::Regex {
            source: matcher.source.clone(),
            flags: matcher.flags.clone(),
        }
    }
}
