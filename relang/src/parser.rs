//! Parser for regex patterns
//!
//! This module provides a recursive descent parser that converts
//! tokens into a [`Pattern`] tree. The tree mirrors the source: nothing is
//! simplified, so `(|)` yields `(alt ε ε)`.
//!
//! Grammar (in order of precedence, lowest to highest):
//!   pattern       := alternation
//!   alternation   := concatenation ( '|' concatenation )*
//!   concatenation := postfix*
//!   postfix       := atom ( '*' | '?' | '+' )*
//!   atom          := literal | '.' | class | '(' pattern ')'

use crate::charclass::CharClass;
use crate::error::{ParseError, RegexError, Result, SpannedError};
use crate::lexer::{Lexer, SpannedToken, Token};
use crate::pattern::Pattern;

/// Parser for regex patterns
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: SpannedToken,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input string
    pub fn new(input: &'a str) -> std::result::Result<Self, SpannedError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Parser { lexer, current })
    }

    /// Advance to the next token
    fn advance(&mut self) -> std::result::Result<(), SpannedError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn error(&self, error: ParseError) -> SpannedError {
        SpannedError::new(RegexError::Parse(error), self.current.span)
    }

    /// Expect a specific token, error if not found
    fn expect(&mut self, expected: Token) -> std::result::Result<(), SpannedError> {
        if self.current.token == expected {
            return self.advance();
        }
        if self.current.token == Token::Eof {
            return Err(self.error(ParseError::UnexpectedEof));
        }
        Err(self.error(ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.current.token.to_string(),
        }))
    }

    /// Parse the entire input and return the pattern tree
    pub fn parse(&mut self) -> std::result::Result<Pattern, SpannedError> {
        let pattern = self.parse_alternation()?;

        // Ensure we've consumed all tokens
        if self.current.token != Token::Eof {
            return Err(self.error(ParseError::UnexpectedToken {
                expected: "EOF".to_string(),
                found: self.current.token.to_string(),
            }));
        }

        Ok(pattern)
    }

    /// Parse alternation (lowest precedence)
    /// alternation := concatenation ( '|' concatenation )*
    fn parse_alternation(&mut self) -> std::result::Result<Pattern, SpannedError> {
        let mut pattern = self.parse_concatenation()?;

        while self.current.token == Token::Pipe {
            self.advance()?; // consume '|'
            let next = self.parse_concatenation()?;
            pattern = Pattern::Alternation(Box::new(pattern), Box::new(next));
        }

        Ok(pattern)
    }

    /// Parse a concatenation
    /// concatenation := postfix*
    fn parse_concatenation(&mut self) -> std::result::Result<Pattern, SpannedError> {
        let mut patterns = Vec::new();

        while let Some(pattern) = self.parse_postfix()? {
            patterns.push(pattern);
        }

        Ok(match patterns.len() {
            0 => Pattern::Empty,
            1 => patterns.pop().unwrap_or(Pattern::Empty),
            _ => Pattern::Concat(patterns),
        })
    }

    /// Parse an atom followed by any number of postfix operators.
    /// Returns `None` when no atom starts here.
    fn parse_postfix(&mut self) -> std::result::Result<Option<Pattern>, SpannedError> {
        let Some(mut base) = self.parse_atom()? else {
            if let Some(op) = self.current.token.postfix_operator() {
                return Err(self.error(ParseError::NothingToRepeat(op)));
            }
            return Ok(None);
        };

        while let Some(op) = self.current.token.postfix_operator() {
            self.advance()?;
            base = match op {
                '*' => Pattern::KleeneStar(Box::new(base)),
                '?' => Pattern::Alternation(Box::new(base), Box::new(Pattern::Empty)),
                _ => Pattern::Concat(vec![base.clone(), Pattern::KleeneStar(Box::new(base))]),
            };
        }

        Ok(Some(base))
    }

    /// Parse an atom
    /// atom := literal | '.' | class | '(' pattern ')'
    fn parse_atom(&mut self) -> std::result::Result<Option<Pattern>, SpannedError> {
        if self.current.token == Token::LeftParen {
            return self.parse_group().map(Some);
        }

        let atom = match &self.current.token {
            Token::Literal(c) => Pattern::Literal(CharClass::single(*c)),
            Token::Dot => Pattern::Literal(CharClass::universal()),
            Token::Class(class) => Pattern::Literal(class.clone()),
            _ => return Ok(None),
        };
        self.advance()?;
        Ok(Some(atom))
    }

    /// Parse a parenthesized group
    fn parse_group(&mut self) -> std::result::Result<Pattern, SpannedError> {
        self.advance()?; // consume '('
        let pattern = self.parse_alternation()?;
        self.expect(Token::RightParen)?;
        Ok(pattern)
    }
}

/// Parse a regex pattern string, keeping the location of any error
pub fn parse_spanned(input: &str) -> std::result::Result<Pattern, SpannedError> {
    Parser::new(input)?.parse()
}

/// Parse a regex pattern string into a pattern tree
pub fn parse(input: &str) -> Result<Pattern> {
    parse_spanned(input).map_err(|e| e.error)
}
