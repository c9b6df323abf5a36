//! Token-context tracker for pattern text
//!
//! This module classifies every position in a pattern as it is assembled.
//! It is an incremental scanner: `scan_token` recognizes exactly one token
//! at the head of the remaining text given the current context, and
//! `RunningContext::advance` folds one token into the state. Both are pure,
//! so the whitespace preprocessor, the interpolation compiler, the pipeline
//! cleanup, and the capture-map scan all share them and always agree on
//! whether an operation is safe at a given character.

/// Syntactic position at the pattern level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegexContext {
    /// Top-level pattern text
    Default,
    /// Inside a character class `[...]`
    CharClass,
    /// Inside the name part of `(?<name>`
    GroupName,
    /// Inside an interval quantifier `{n,m}`
    IntervalQuantifier,
    /// Inside an enclosed token such as `\p{...}` or `\u{...}`
    EnclosedToken,
    /// The text so far ends in the middle of a fixed-length token
    InvalidIncompleteToken,
}

/// Syntactic position inside a character class
///
/// Meaningful only while [`RegexContext::CharClass`] is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClassContext {
    /// Expecting a class atom
    Default,
    /// Immediately after a range hyphen, expecting the range end
    Range,
    /// Immediately after the doubled-hyphen set operator `--`
    Union,
    /// Immediately after the set intersection operator `&&`
    Intersection,
    /// Inside a `\q{...}` string token
    QToken,
    /// Inside an enclosed token such as `\p{...}`
    EnclosedToken,
    /// The class text so far ends in the middle of a fixed-length token
    InvalidIncompleteToken,
}

/// Kind of an enclosed token, recorded while it is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnclosedKind {
    /// `\u{...}` or `\x{...}`: content is hexadecimal code-point digits
    CodePoint,
    /// `\p{...}` or `\P{...}`: content is a property name
    Property,
    /// `\k<...>` or `\g<...>`: content is a group name
    GroupRef,
    /// `\q{...}`: content is a literal string alternative list
    QString,
}

/// Running classification of the assembled expression
///
/// A pure function of the expression text consumed so far: folding the same
/// prefix twice yields the same value. The `modern` field is configuration
/// (whether the modern class dialect with `--`/`&&` operators and nested
/// classes is active), fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningContext {
    /// Pattern-level position
    pub regex: RegexContext,
    /// Class-level position
    pub class: CharClassContext,
    /// Nesting depth of character classes (0 = outside any class)
    class_depth: u32,
    /// Kind of the currently open enclosed token, if any
    enclosed: Option<EnclosedKind>,
    /// Whether the modern class dialect is active
    modern: bool,
}

impl RunningContext {
    /// Create a starting context for an empty expression
    pub fn new(modern: bool) -> Self {
        RunningContext {
            regex: RegexContext::Default,
            class: CharClassContext::Default,
            class_depth: 0,
            enclosed: None,
            modern,
        }
    }

    /// Kind of the currently open enclosed token
    pub fn enclosed_kind(&self) -> Option<EnclosedKind> {
        self.enclosed
    }

    /// Whether the text consumed so far ends mid-token
    pub fn is_incomplete(&self) -> bool {
        self.regex == RegexContext::InvalidIncompleteToken
            || (self.regex == RegexContext::CharClass
                && self.class == CharClassContext::InvalidIncompleteToken)
    }

    /// Fold one recognized token into the context
    pub fn advance(&mut self, token: &Token) {
        match self.regex {
            RegexContext::GroupName => {
                if token.kind == TokenKind::EnclosedClose {
                    self.regex = RegexContext::Default;
                }
            }
            RegexContext::EnclosedToken => {
                if token.kind == TokenKind::EnclosedClose {
                    self.regex = RegexContext::Default;
                    self.enclosed = None;
                }
            }
            RegexContext::IntervalQuantifier => {
                if token.kind == TokenKind::BraceClose {
                    self.regex = RegexContext::Default;
                }
            }
            RegexContext::InvalidIncompleteToken => {
                // Unrecoverable without re-scanning from the start; dependent
                // stages refuse unsafe operations at this boundary.
            }
            RegexContext::CharClass => self.advance_in_class(token),
            RegexContext::Default => self.advance_in_default(token),
        }
    }

    fn advance_in_default(&mut self, token: &Token) {
        match token.kind {
            TokenKind::ClassOpen => {
                self.regex = RegexContext::CharClass;
                self.class = CharClassContext::Default;
                self.class_depth = 1;
            }
            TokenKind::NamedOpen => self.regex = RegexContext::GroupName,
            TokenKind::EnclosedOpen(kind) => {
                self.regex = RegexContext::EnclosedToken;
                self.enclosed = Some(kind);
            }
            TokenKind::BraceOpen => self.regex = RegexContext::IntervalQuantifier,
            TokenKind::Incomplete => self.regex = RegexContext::InvalidIncompleteToken,
            _ => {}
        }
    }

    fn advance_in_class(&mut self, token: &Token) {
        match self.class {
            CharClassContext::QToken | CharClassContext::EnclosedToken => {
                if token.kind == TokenKind::EnclosedClose {
                    self.class = CharClassContext::Default;
                    self.enclosed = None;
                }
                return;
            }
            CharClassContext::InvalidIncompleteToken => return,
            _ => {}
        }
        match token.kind {
            TokenKind::ClassOpen => {
                self.class_depth += 1;
                self.class = CharClassContext::Default;
            }
            TokenKind::ClassClose => {
                self.class_depth -= 1;
                if self.class_depth == 0 {
                    self.regex = RegexContext::Default;
                }
                self.class = CharClassContext::Default;
            }
            TokenKind::EnclosedOpen(EnclosedKind::QString) => {
                self.class = CharClassContext::QToken;
                self.enclosed = Some(EnclosedKind::QString);
            }
            TokenKind::EnclosedOpen(kind) => {
                self.class = CharClassContext::EnclosedToken;
                self.enclosed = Some(kind);
            }
            TokenKind::RangeOp => self.class = CharClassContext::Range,
            TokenKind::UnionOp => self.class = CharClassContext::Union,
            TokenKind::IntersectionOp => self.class = CharClassContext::Intersection,
            TokenKind::Incomplete => self.class = CharClassContext::InvalidIncompleteToken,
            TokenKind::Whitespace => {}
            _ => self.class = CharClassContext::Default,
        }
    }
}

impl Default for RunningContext {
    fn default() -> Self {
        RunningContext::new(true)
    }
}

/// Kind of a recognized token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Run of whitespace characters
    Whitespace,
    /// A single ordinary character
    Literal,
    /// A complete escape sequence (`\n`, `\d`, `\x41`, `\0`, ...)
    Escape,
    /// A numbered backreference `\1`..`\99`
    Backref(u32),
    /// Capturing group opener `(`
    GroupOpen,
    /// Named group opener `(?<` (the name follows as separate tokens)
    NamedOpen,
    /// Non-capturing opener: `(?:`, lookarounds, atomic `(?>`, `(?flags:`
    NonCapturingOpen,
    /// Self-contained flag directive `(?flags)`
    FlagDirective,
    /// Group closer `)`
    GroupClose,
    /// Character class opener `[` or `[^`
    ClassOpen,
    /// Character class closer `]`
    ClassClose,
    /// Interval quantifier opener `{`
    BraceOpen,
    /// Interval quantifier closer `}`
    BraceClose,
    /// Quantifier `?` `*` `+` with optional lazy/possessive suffix
    Quantifier,
    /// Alternation bar `|`
    Alternator,
    /// Class range hyphen `-`
    RangeOp,
    /// Class doubled-hyphen set operator `--`
    UnionOp,
    /// Class intersection operator `&&`
    IntersectionOp,
    /// Opener of an enclosed token, e.g. `\p{` or `\k<`
    EnclosedOpen(EnclosedKind),
    /// Closer of an enclosed token or group name (`}` or `>`)
    EnclosedClose,
    /// Content run inside an enclosed token or group name
    EnclosedContent,
    /// The text ends in the middle of a fixed-length token
    Incomplete,
}

/// One recognized token: its kind and the exact source text it spans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Kind of the token
    pub kind: TokenKind,
    /// Source text spanned by the token
    pub text: &'a str,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, text: &'a str) -> Self {
        Token { kind, text }
    }

    /// Whether this token is a numbered or octal escape that a following
    /// digit would extend into a different escape
    pub fn is_digit_extensible(&self) -> bool {
        let mut chars = self.text.chars();
        chars.next() == Some('\\')
            && !self.text[1..].is_empty()
            && self.text[1..].chars().all(|c| c.is_ascii_digit())
    }
}

fn char_at(text: &str, idx: usize) -> Option<char> {
    text[idx..].chars().next()
}

/// Recognize the token at the start of `rest` under `ctx`
///
/// `rest` must be non-empty. The returned token's text is always a prefix
/// of `rest`; no lookahead beyond the current token is performed.
pub fn scan_token<'a>(rest: &'a str, ctx: &RunningContext) -> Token<'a> {
    debug_assert!(!rest.is_empty());
    match ctx.regex {
        RegexContext::GroupName => scan_enclosed(rest, '>'),
        RegexContext::EnclosedToken => {
            let closer = match ctx.enclosed {
                Some(EnclosedKind::GroupRef) => '>',
                _ => '}',
            };
            scan_enclosed(rest, closer)
        }
        RegexContext::IntervalQuantifier => scan_in_interval(rest),
        RegexContext::CharClass => match ctx.class {
            CharClassContext::QToken | CharClassContext::EnclosedToken => {
                scan_enclosed(rest, '}')
            }
            _ => scan_in_class(rest, ctx.modern),
        },
        RegexContext::Default | RegexContext::InvalidIncompleteToken => scan_in_default(rest),
    }
}

fn scan_enclosed(rest: &str, closer: char) -> Token<'_> {
    let first = rest.chars().next().unwrap();
    if first == closer {
        return Token::new(TokenKind::EnclosedClose, &rest[..closer.len_utf8()]);
    }
    let end = rest.find(closer).unwrap_or(rest.len());
    Token::new(TokenKind::EnclosedContent, &rest[..end])
}

fn scan_in_interval(rest: &str) -> Token<'_> {
    let first = rest.chars().next().unwrap();
    match first {
        '}' => Token::new(TokenKind::BraceClose, &rest[..1]),
        c if c.is_whitespace() => scan_whitespace(rest),
        c => Token::new(TokenKind::Literal, &rest[..c.len_utf8()]),
    }
}

fn scan_whitespace(rest: &str) -> Token<'_> {
    let end = rest
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(rest.len());
    Token::new(TokenKind::Whitespace, &rest[..end])
}

fn scan_in_default(rest: &str) -> Token<'_> {
    let first = rest.chars().next().unwrap();
    match first {
        c if c.is_whitespace() => scan_whitespace(rest),
        '\\' => scan_escape(rest, false, true),
        '(' => scan_group_open(rest),
        ')' => Token::new(TokenKind::GroupClose, &rest[..1]),
        '[' => scan_class_open(rest),
        '{' => Token::new(TokenKind::BraceOpen, &rest[..1]),
        '|' => Token::new(TokenKind::Alternator, &rest[..1]),
        '?' | '*' | '+' => scan_quantifier(rest),
        c => Token::new(TokenKind::Literal, &rest[..c.len_utf8()]),
    }
}

fn scan_in_class(rest: &str, modern: bool) -> Token<'_> {
    let first = rest.chars().next().unwrap();
    match first {
        c if c.is_whitespace() => scan_whitespace(rest),
        '\\' => scan_escape(rest, true, modern),
        ']' => Token::new(TokenKind::ClassClose, &rest[..1]),
        '[' if modern => scan_class_open(rest),
        '-' if modern && rest[1..].starts_with('-') => {
            Token::new(TokenKind::UnionOp, &rest[..2])
        }
        '-' => Token::new(TokenKind::RangeOp, &rest[..1]),
        '&' if modern && rest[1..].starts_with('&') => {
            Token::new(TokenKind::IntersectionOp, &rest[..2])
        }
        c => Token::new(TokenKind::Literal, &rest[..c.len_utf8()]),
    }
}

fn scan_class_open(rest: &str) -> Token<'_> {
    let len = if rest[1..].starts_with('^') { 2 } else { 1 };
    Token::new(TokenKind::ClassOpen, &rest[..len])
}

fn scan_quantifier(rest: &str) -> Token<'_> {
    // A following `?` makes the quantifier lazy, a following `+` possessive.
    let len = match char_at(rest, 1) {
        Some('?') | Some('+') => 2,
        _ => 1,
    };
    Token::new(TokenKind::Quantifier, &rest[..len])
}

fn scan_group_open(rest: &str) -> Token<'_> {
    if !rest[1..].starts_with('?') {
        return Token::new(TokenKind::GroupOpen, &rest[..1]);
    }
    let Some(third) = char_at(rest, 2) else {
        return Token::new(TokenKind::Incomplete, rest);
    };
    match third {
        ':' | '=' | '!' | '>' => Token::new(TokenKind::NonCapturingOpen, &rest[..3]),
        '<' => match char_at(rest, 3) {
            Some('=') | Some('!') => Token::new(TokenKind::NonCapturingOpen, &rest[..4]),
            // Text ending right at `(?<` is a name position, not mid-token:
            // a substitution may legally supply the name.
            _ => Token::new(TokenKind::NamedOpen, &rest[..3]),
        },
        c if c.is_ascii_alphabetic() || c == '-' => scan_flag_group(rest),
        _ => Token::new(TokenKind::NonCapturingOpen, &rest[..2]),
    }
}

fn scan_flag_group(rest: &str) -> Token<'_> {
    let mut idx = 2;
    while let Some(c) = char_at(rest, idx) {
        if c.is_ascii_alphabetic() || c == '-' {
            idx += 1;
        } else if c == ':' {
            return Token::new(TokenKind::NonCapturingOpen, &rest[..idx + 1]);
        } else if c == ')' {
            return Token::new(TokenKind::FlagDirective, &rest[..idx + 1]);
        } else {
            break;
        }
    }
    if idx >= rest.len() {
        Token::new(TokenKind::Incomplete, rest)
    } else {
        // Not a recognizable group modifier; let the engine reject it.
        Token::new(TokenKind::NonCapturingOpen, &rest[..2])
    }
}

fn scan_escape(rest: &str, in_class: bool, modern: bool) -> Token<'_> {
    let Some(second) = char_at(rest, 1) else {
        return Token::new(TokenKind::Incomplete, rest);
    };
    match second {
        'p' | 'P' if rest[2..].starts_with('{') => {
            Token::new(TokenKind::EnclosedOpen(EnclosedKind::Property), &rest[..3])
        }
        'u' | 'x' if rest[2..].starts_with('{') => {
            Token::new(TokenKind::EnclosedOpen(EnclosedKind::CodePoint), &rest[..3])
        }
        'u' => scan_fixed_hex(rest, 4),
        'x' => scan_fixed_hex(rest, 2),
        'c' => match char_at(rest, 2) {
            Some(c) if c.is_ascii_alphabetic() => Token::new(TokenKind::Escape, &rest[..3]),
            Some(_) => Token::new(TokenKind::Escape, &rest[..2]),
            None => Token::new(TokenKind::Incomplete, rest),
        },
        'k' | 'g' if !in_class && rest[2..].starts_with('<') => {
            Token::new(TokenKind::EnclosedOpen(EnclosedKind::GroupRef), &rest[..3])
        }
        'q' if in_class && modern && rest[2..].starts_with('{') => {
            Token::new(TokenKind::EnclosedOpen(EnclosedKind::QString), &rest[..3])
        }
        '1'..='9' if !in_class => {
            let digits = rest[1..]
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len() - 1);
            let num = rest[1..1 + digits].parse().unwrap_or(0);
            Token::new(TokenKind::Backref(num), &rest[..1 + digits])
        }
        '0' => {
            let octal = rest[2..]
                .find(|c: char| !('0'..='7').contains(&c))
                .unwrap_or(rest.len() - 2)
                .min(2);
            Token::new(TokenKind::Escape, &rest[..2 + octal])
        }
        c => Token::new(TokenKind::Escape, &rest[..1 + c.len_utf8()]),
    }
}

fn scan_fixed_hex(rest: &str, want: usize) -> Token<'_> {
    let hex = rest[2..]
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(rest.len() - 2);
    if hex >= want {
        Token::new(TokenKind::Escape, &rest[..2 + want])
    } else if 2 + hex == rest.len() {
        Token::new(TokenKind::Incomplete, rest)
    } else {
        // Malformed short escape followed by more text; kept whole so the
        // engine rejects it and adjacency decisions see one token.
        Token::new(TokenKind::Escape, &rest[..2 + hex])
    }
}

/// Fold every token of `text` into `start` and return the final context
pub fn context_after(text: &str, start: RunningContext) -> RunningContext {
    let mut ctx = start;
    let mut pos = 0;
    while pos < text.len() {
        let token = scan_token(&text[pos..], &ctx);
        pos += token.text.len();
        ctx.advance(&token);
    }
    ctx
}

/// Count the capturing groups opened in `text`, starting from `start`
pub(crate) fn count_captures(text: &str, start: RunningContext) -> usize {
    let mut ctx = start;
    let mut pos = 0;
    let mut count = 0;
    while pos < text.len() {
        let token = scan_token(&text[pos..], &ctx);
        if matches!(token.kind, TokenKind::GroupOpen | TokenKind::NamedOpen) {
            count += 1;
        }
        pos += token.text.len();
        ctx.advance(&token);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        let mut ctx = RunningContext::default();
        let mut pos = 0;
        let mut out = Vec::new();
        while pos < text.len() {
            let token = scan_token(&text[pos..], &ctx);
            out.push(token.kind);
            pos += token.text.len();
            ctx.advance(&token);
        }
        out
    }

    #[test]
    fn test_literals_and_quantifiers() {
        assert_eq!(
            kinds("a*b+?c??"),
            vec![
                TokenKind::Literal,
                TokenKind::Quantifier,
                TokenKind::Literal,
                TokenKind::Quantifier,
                TokenKind::Literal,
                TokenKind::Quantifier,
            ]
        );
    }

    #[test]
    fn test_group_openers() {
        assert_eq!(kinds("(a)")[0], TokenKind::GroupOpen);
        assert_eq!(kinds("(?:a)")[0], TokenKind::NonCapturingOpen);
        assert_eq!(kinds("(?=a)")[0], TokenKind::NonCapturingOpen);
        assert_eq!(kinds("(?<!a)")[0], TokenKind::NonCapturingOpen);
        assert_eq!(kinds("(?>a)")[0], TokenKind::NonCapturingOpen);
        assert_eq!(kinds("(?<x>a)")[0], TokenKind::NamedOpen);
        assert_eq!(kinds("(?i:a)")[0], TokenKind::NonCapturingOpen);
        assert_eq!(kinds("(?i)a")[0], TokenKind::FlagDirective);
    }

    #[test]
    fn test_named_group_context() {
        let ctx = context_after("(?<na", RunningContext::default());
        assert_eq!(ctx.regex, RegexContext::GroupName);
        let ctx = context_after("(?<name>", RunningContext::default());
        assert_eq!(ctx.regex, RegexContext::Default);
    }

    #[test]
    fn test_enclosed_token_context() {
        let ctx = context_after(r"\p{", RunningContext::default());
        assert_eq!(ctx.regex, RegexContext::EnclosedToken);
        assert_eq!(ctx.enclosed_kind(), Some(EnclosedKind::Property));

        let ctx = context_after(r"\u{4", RunningContext::default());
        assert_eq!(ctx.regex, RegexContext::EnclosedToken);
        assert_eq!(ctx.enclosed_kind(), Some(EnclosedKind::CodePoint));

        let ctx = context_after(r"\u{41}", RunningContext::default());
        assert_eq!(ctx.regex, RegexContext::Default);
    }

    #[test]
    fn test_incomplete_tokens() {
        assert!(context_after("\\", RunningContext::default()).is_incomplete());
        assert!(context_after(r"\x4", RunningContext::default()).is_incomplete());
        assert!(context_after(r"\u12", RunningContext::default()).is_incomplete());
        assert!(context_after("(?", RunningContext::default()).is_incomplete());
        assert!(!context_after(r"\x41", RunningContext::default()).is_incomplete());
    }

    #[test]
    fn test_char_class_contexts() {
        let ctx = context_after("[a-", RunningContext::default());
        assert_eq!(ctx.regex, RegexContext::CharClass);
        assert_eq!(ctx.class, CharClassContext::Range);

        let ctx = context_after("[a-z", RunningContext::default());
        assert_eq!(ctx.class, CharClassContext::Default);

        let ctx = context_after("[a&&", RunningContext::default());
        assert_eq!(ctx.class, CharClassContext::Intersection);

        let ctx = context_after("[a--", RunningContext::default());
        assert_eq!(ctx.class, CharClassContext::Union);

        let ctx = context_after("[a-z]", RunningContext::default());
        assert_eq!(ctx.regex, RegexContext::Default);
    }

    #[test]
    fn test_nested_class_depth() {
        let ctx = context_after("[[a-z][0-9]", RunningContext::default());
        assert_eq!(ctx.regex, RegexContext::CharClass);
        let ctx = context_after("[[a-z][0-9]]", RunningContext::default());
        assert_eq!(ctx.regex, RegexContext::Default);
    }

    #[test]
    fn test_legacy_class_operators_are_literals() {
        let mut ctx = RunningContext::new(false);
        let mut pos = 0;
        let text = "[a--b&&c]";
        let mut ops = 0;
        while pos < text.len() {
            let token = scan_token(&text[pos..], &ctx);
            if matches!(
                token.kind,
                TokenKind::UnionOp | TokenKind::IntersectionOp
            ) {
                ops += 1;
            }
            pos += token.text.len();
            ctx.advance(&token);
        }
        assert_eq!(ops, 0);
    }

    #[test]
    fn test_interval_quantifier_context() {
        let ctx = context_after("a{1,", RunningContext::default());
        assert_eq!(ctx.regex, RegexContext::IntervalQuantifier);
        let ctx = context_after("a{1,2}", RunningContext::default());
        assert_eq!(ctx.regex, RegexContext::Default);
    }

    #[test]
    fn test_backref_token() {
        let mut ctx = RunningContext::default();
        let token = scan_token(r"\12a", &ctx);
        assert_eq!(token.kind, TokenKind::Backref(12));
        assert_eq!(token.text, r"\12");
        assert!(token.is_digit_extensible());
        ctx.advance(&token);
        assert_eq!(ctx.regex, RegexContext::Default);
    }

    #[test]
    fn test_octal_escape_is_digit_extensible() {
        let ctx = RunningContext::default();
        let token = scan_token(r"\07x", &ctx);
        assert_eq!(token.kind, TokenKind::Escape);
        assert_eq!(token.text, r"\07");
        assert!(token.is_digit_extensible());
    }

    #[test]
    fn test_short_hex_escape_is_one_token() {
        let ctx = RunningContext::default();
        let token = scan_token(r"\x4 1", &ctx);
        assert_eq!(token.kind, TokenKind::Escape);
        assert_eq!(token.text, r"\x4");
        let token = scan_token(r"\u123 4", &ctx);
        assert_eq!(token.kind, TokenKind::Escape);
        assert_eq!(token.text, r"\u123");
    }

    #[test]
    fn test_escaped_whitespace_is_one_escape() {
        let ctx = RunningContext::default();
        let token = scan_token("\\ x", &ctx);
        assert_eq!(token.kind, TokenKind::Escape);
        assert_eq!(token.text, "\\ ");
    }

    #[test]
    fn test_count_captures() {
        let start = RunningContext::default();
        assert_eq!(count_captures("(a)(?:b)(?<x>c)", start), 2);
        assert_eq!(count_captures(r"[(]\(", start), 0);
        assert_eq!(count_captures("((a))", start), 2);
    }

    #[test]
    fn test_recompute_is_deterministic() {
        let text = r"(?<y>[a\q{xy}--b])\k<y>{2,3}";
        let a = context_after(text, RunningContext::default());
        let b = context_after(text, RunningContext::default());
        assert_eq!(a, b);
    }
}
