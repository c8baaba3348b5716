//! Error types for the regular-language engine
//!
//! Only the surface syntax can fail: automata construction and the
//! conversions between representations are total. Errors are split by the
//! stage that raised them, lexing or parsing.

use thiserror::Error;

/// The main error type for the engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegexError {
    /// Errors that occur during lexing/tokenization
    #[error("lexer error at position {position}: {kind}")]
    Lexer {
        /// Position in the input where the error occurred
        position: usize,
        /// The specific kind of lexer error
        kind: LexerErrorKind,
    },

    /// Errors that occur during parsing
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Specific kinds of lexer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerErrorKind {
    /// Unclosed character class (e.g., `[abc` without `]`)
    #[error("unclosed character class")]
    UnclosedCharacterClass,

    /// A backslash with nothing after it
    #[error("trailing backslash")]
    TrailingBackslash,

    /// A class range whose start comes after its end (e.g., `[z-a]`)
    #[error("invalid range '{0}-{1}'")]
    InvalidRange(char, char),
}

/// Errors that occur during parsing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Unexpected token encountered
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// What was expected
        expected: String,
        /// What was actually found
        found: String,
    },

    /// A postfix operator with no operand
    #[error("nothing to repeat before '{0}'")]
    NothingToRepeat(char),

    /// Unexpected end of input
    #[error("unexpected end of input")]
    UnexpectedEof,
}

/// A span representing a location in the source pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (inclusive)
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single character
    pub fn single(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An error with associated source location
#[derive(Error, Debug, Clone)]
#[error("{error} at position {span:?}")]
pub struct SpannedError {
    /// The underlying error
    pub error: RegexError,
    /// The location in the source
    pub span: Span,
}

impl SpannedError {
    /// Create a new spanned error
    pub fn new(error: RegexError, span: Span) -> Self {
        SpannedError { error, span }
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, RegexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_error_display() {
        let err = RegexError::Lexer {
            position: 3,
            kind: LexerErrorKind::UnclosedCharacterClass,
        };
        assert_eq!(
            err.to_string(),
            "lexer error at position 3: unclosed character class"
        );
    }

    #[test]
    fn test_invalid_range_display() {
        let kind = LexerErrorKind::InvalidRange('z', 'a');
        assert_eq!(kind.to_string(), "invalid range 'z-a'");
    }

    #[test]
    fn test_parse_error_unexpected_token() {
        let err = ParseError::UnexpectedToken {
            expected: "`)`".to_string(),
            found: "EOF".to_string(),
        };
        assert_eq!(err.to_string(), "expected `)`, found EOF");
    }

    #[test]
    fn test_nothing_to_repeat() {
        let err = ParseError::NothingToRepeat('*');
        assert_eq!(err.to_string(), "nothing to repeat before '*'");
    }

    #[test]
    fn test_regex_error_from_parse_error() {
        let regex_err: RegexError = ParseError::UnexpectedEof.into();
        assert_eq!(
            regex_err.to_string(),
            "parse error: unexpected end of input"
        );
    }

    #[test]
    fn test_span_creation() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(Span::default().is_empty());
    }

    #[test]
    fn test_spanned_error() {
        let error = RegexError::Parse(ParseError::UnexpectedEof);
        let spanned = SpannedError::new(error, Span::single(42));
        assert!(spanned.to_string().contains("unexpected end of input"));
        assert!(spanned.to_string().contains("42"));
    }
}
