//! Lexer for tokenizing regex patterns
//!
//! A bracket expression such as `[^a-z_]` is lexed as a whole into a single
//! [`Token::Class`], so the parser never sees class syntax. Positions are
//! counted in characters, not bytes.

use crate::charclass::{CharClass, CharRange};
use crate::error::{LexerErrorKind, RegexError, Span, SpannedError};
use std::fmt;

/// A token in a regex pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Pipe `|` (alternation)
    Pipe,
    /// Star `*` (zero or more)
    Star,
    /// Question `?` (optional)
    Question,
    /// Plus `+` (one or more)
    Plus,
    /// Dot `.` (any character)
    Dot,
    /// A literal character, possibly escaped
    Literal(char),
    /// A bracket expression
    Class(CharClass),
    /// End of input
    Eof,
}

impl Token {
    /// The postfix operator character, if this token is one
    pub fn postfix_operator(&self) -> Option<char> {
        match self {
            Token::Star => Some('*'),
            Token::Question => Some('?'),
            Token::Plus => Some('+'),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftParen => write!(f, "`(`"),
            Token::RightParen => write!(f, "`)`"),
            Token::Pipe => write!(f, "`|`"),
            Token::Star => write!(f, "`*`"),
            Token::Question => write!(f, "`?`"),
            Token::Plus => write!(f, "`+`"),
            Token::Dot => write!(f, "`.`"),
            Token::Literal(c) => write!(f, "literal `{}`", c),
            Token::Class(class) => write!(f, "class `{}`", class.to_regex_string()),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

/// A token together with the characters it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Lexer for tokenizing regex patterns
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input string
    pub fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Consume one character
    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.position += 1;
        Some(c)
    }

    fn error(&self, kind: LexerErrorKind, span: Span) -> SpannedError {
        SpannedError::new(
            RegexError::Lexer {
                position: span.start,
                kind,
            },
            span,
        )
    }

    /// Read the character after a backslash at `start`
    fn read_escaped(&mut self, start: usize) -> Result<char, SpannedError> {
        match self.advance() {
            Some(c) => Ok(c),
            None => Err(self.error(
                LexerErrorKind::TrailingBackslash,
                Span::new(start, self.position),
            )),
        }
    }

    /// Read one class member, handling escapes
    fn read_class_char(&mut self, open: usize) -> Result<char, SpannedError> {
        let start = self.position;
        match self.advance() {
            Some('\\') => self.read_escaped(start),
            Some(c) => Ok(c),
            None => Err(self.error(
                LexerErrorKind::UnclosedCharacterClass,
                Span::new(open, self.position),
            )),
        }
    }

    /// Read a bracket expression (assumes `[` at `open` was already consumed)
    fn read_class(&mut self, open: usize) -> Result<CharClass, SpannedError> {
        let negated = self.chars.next_if_eq(&'^').is_some();
        if negated {
            self.position += 1;
        }

        let mut ranges = Vec::new();
        loop {
            if self.chars.next_if_eq(&']').is_some() {
                self.position += 1;
                break;
            }

            let item_start = self.position;
            let first = self.read_class_char(open)?;

            // A `-` right before `]` is a literal dash.
            let mut lookahead = self.chars.clone();
            let is_range =
                lookahead.next() == Some('-') && lookahead.next().is_some_and(|c| c != ']');

            if is_range {
                self.advance();
                let last = self.read_class_char(open)?;
                if first > last {
                    return Err(self.error(
                        LexerErrorKind::InvalidRange(first, last),
                        Span::new(item_start, self.position),
                    ));
                }
                ranges.push(CharRange::range(first, last));
            } else {
                ranges.push(CharRange::single(first));
            }
        }

        Ok(CharClass::from_ranges(ranges, negated))
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<SpannedToken, SpannedError> {
        let start = self.position;
        let Some(c) = self.advance() else {
            return Ok(SpannedToken {
                token: Token::Eof,
                span: Span::new(start, start),
            });
        };

        let token = match c {
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '|' => Token::Pipe,
            '*' => Token::Star,
            '?' => Token::Question,
            '+' => Token::Plus,
            '.' => Token::Dot,
            '[' => Token::Class(self.read_class(start)?),
            '\\' => Token::Literal(self.read_escaped(start)?),
            c => Token::Literal(c),
        };

        Ok(SpannedToken {
            token,
            span: Span::new(start, self.position),
        })
    }

    /// Tokenize the entire input; the last token is always [`Token::Eof`]
    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>, SpannedError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.token == Token::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    fn lex_error(input: &str) -> RegexError {
        Lexer::new(input).tokenize().unwrap_err().error
    }

    #[test]
    fn test_literal_sequence() {
        assert_eq!(
            tokens("abc"),
            vec![
                Token::Literal('a'),
                Token::Literal('b'),
                Token::Literal('c'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokens(""), vec![Token::Eof]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            tokens("(a|.)*?+"),
            vec![
                Token::LeftParen,
                Token::Literal('a'),
                Token::Pipe,
                Token::Dot,
                Token::RightParen,
                Token::Star,
                Token::Question,
                Token::Plus,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            tokens(r"\*\\\."),
            vec![
                Token::Literal('*'),
                Token::Literal('\\'),
                Token::Literal('.'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_character_class() {
        let expected = CharClass::from_ranges(
            [CharRange::range('a', 'z'), CharRange::single('_')],
            false,
        );
        assert_eq!(
            tokens("[a-z_]"),
            vec![Token::Class(expected), Token::Eof]
        );
    }

    #[test]
    fn test_negated_and_degenerate_classes() {
        assert_eq!(
            tokens("[^0-9]"),
            vec![Token::Class(CharClass::range('0', '9').complement()), Token::Eof]
        );
        assert_eq!(tokens("[]"), vec![Token::Class(CharClass::empty()), Token::Eof]);
        assert_eq!(tokens("[^]"), vec![Token::Class(CharClass::universal()), Token::Eof]);
    }

    #[test]
    fn test_class_dash_and_escapes() {
        let expected = CharClass::from_ranges(
            [CharRange::single('a'), CharRange::single('-')],
            false,
        );
        assert_eq!(tokens("[a-]"), vec![Token::Class(expected), Token::Eof]);

        let expected = CharClass::from_ranges(
            [CharRange::single(']'), CharRange::single('^')],
            false,
        );
        assert_eq!(tokens(r"[\]\^]"), vec![Token::Class(expected), Token::Eof]);
    }

    #[test]
    fn test_spans() {
        let spanned = Lexer::new("a[bc]*").tokenize().unwrap();
        let spans: Vec<_> = spanned.iter().map(|t| (t.span.start, t.span.end)).collect();
        assert_eq!(spans, vec![(0, 1), (1, 5), (5, 6), (6, 6)]);
    }

    #[test]
    fn test_unclosed_class() {
        assert_eq!(
            lex_error("ab[cd"),
            RegexError::Lexer {
                position: 2,
                kind: LexerErrorKind::UnclosedCharacterClass,
            }
        );
    }

    #[test]
    fn test_trailing_backslash() {
        assert_eq!(
            lex_error("ab\\"),
            RegexError::Lexer {
                position: 2,
                kind: LexerErrorKind::TrailingBackslash,
            }
        );
    }

    #[test]
    fn test_invalid_range() {
        assert_eq!(
            lex_error("[z-a]"),
            RegexError::Lexer {
                position: 1,
                kind: LexerErrorKind::InvalidRange('z', 'a'),
            }
        );
    }
}
