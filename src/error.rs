//! Error types for the pattern compiler
//!
//! This module provides error handling using the `thiserror` crate.
//! Errors are categorized by their source: option resolution, pattern
//! syntax, or interpolation. All errors are raised synchronously at
//! compile time and abort the whole compilation.

use thiserror::Error;

/// The main error type for pattern compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Errors in the supplied options or template shape
    #[error("option error: {0}")]
    Option(#[from] OptionError),

    /// Errors detected while scanning the pattern text
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// Errors raised while embedding a substitution value
    #[error("interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// The target engine rejected the compiled pattern
    #[error("target engine error: {0}")]
    Engine(String),
}

/// Errors in the supplied options or template shape
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionError {
    /// A reserved mode letter was requested explicitly
    #[error("flag '{0}' is implicit and cannot be requested explicitly")]
    ReservedFlag(char),

    /// A flag letter the target engine does not accept
    #[error("unrecognized flag '{0}'")]
    UnknownFlag(char),

    /// The same flag letter appeared twice
    #[error("duplicate flag '{0}'")]
    DuplicateFlag(char),

    /// Template segments and values do not interleave
    #[error("template with {values} values requires {} segments, found {segments}", values + 1)]
    MalformedTemplate {
        /// Number of literal segments supplied
        segments: usize,
        /// Number of substitution values supplied
        values: usize,
    },

    /// The modern class dialect was forced but the target lacks it
    #[error("target engine does not support the modern class dialect")]
    UnsupportedDialect,
}

/// Errors detected while scanning the pattern text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    /// The pattern ended in the middle of a token
    #[error("pattern ends with an incomplete token")]
    IncompleteToken,

    /// Removed whitespace would silently validate a trailing range hyphen
    #[error("invalid unescaped hyphen after removed whitespace in character class")]
    AmbiguousRangeHyphen,

    /// Whitespace touched a token that is still incomplete
    #[error("whitespace is adjacent to an incomplete token in character class")]
    WhitespaceInToken,

    /// A group opened in the pattern was never closed
    #[error("unclosed group")]
    UnclosedGroup,

    /// A subroutine call names a group that does not exist
    #[error("subroutine call to undefined group '{0}'")]
    UndefinedSubroutine(String),

    /// A subroutine call expands to a body that calls itself
    #[error("recursive subroutine call to group '{0}'")]
    RecursiveSubroutine(String),
}

/// Errors raised while embedding a substitution value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// The value kind is not allowed at this position
    #[error("{kind} value is not allowed {place}")]
    ValueNotAllowed {
        /// Human-readable kind of the rejected value
        kind: &'static str,
        /// Description of the syntactic position
        place: &'static str,
    },

    /// The hole sits right after an incomplete token
    #[error("cannot interpolate immediately after an incomplete token")]
    AfterIncompleteToken,

    /// A trusted pattern starts or ends with a bare class operator
    #[error("trusted pattern has a bare '{0}' operator at its boundary")]
    BoundaryOperator(String),

    /// Sub-pattern flags that cannot be expressed on this target
    #[error("cannot express sub-pattern flags '{0}' on this target")]
    UnrepresentableFlags(String),

    /// Text interpolated where only restricted characters are safe
    #[error("'{text}' is not safe {place}")]
    UnsafeText {
        /// The offending text
        text: String,
        /// Description of the syntactic position
        place: &'static str,
    },
}

/// Result type alias for compilation
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_error_display() {
        let err = Error::Option(OptionError::ReservedFlag('x'));
        assert_eq!(
            err.to_string(),
            "option error: flag 'x' is implicit and cannot be requested explicitly"
        );
    }

    #[test]
    fn test_malformed_template_display() {
        let err = OptionError::MalformedTemplate {
            segments: 2,
            values: 2,
        };
        assert_eq!(
            err.to_string(),
            "template with 2 values requires 3 segments, found 2"
        );
    }

    #[test]
    fn test_syntax_error_conversion() {
        let err: Error = SyntaxError::AmbiguousRangeHyphen.into();
        assert!(matches!(err, Error::Syntax(_)));
        assert!(err.to_string().starts_with("syntax error:"));
    }

    #[test]
    fn test_interpolation_error_display() {
        let err = InterpolationError::ValueNotAllowed {
            kind: "regex",
            place: "inside a character class",
        };
        assert_eq!(
            err.to_string(),
            "regex value is not allowed inside a character class"
        );
    }

    #[test]
    fn test_boundary_operator_display() {
        let err = InterpolationError::BoundaryOperator("&&".to_string());
        assert_eq!(
            err.to_string(),
            "trusted pattern has a bare '&&' operator at its boundary"
        );
    }
}
