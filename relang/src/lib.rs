//! Relang Core Library
//!
//! A regular-language engine: regex syntax is compiled into finite automata,
//! and a language can be converted freely between its pattern, NFA and DFA
//! forms. Automata label their edges with blocks of a partition of the whole
//! `char` domain, so large classes such as `[^a]` never get enumerated.

pub mod alphabet;
pub mod charclass;
pub mod convert;
pub mod dfa;
pub mod error;
pub mod language;
pub mod lexer;
pub mod nfa;
pub mod parser;
pub mod pattern;

pub use alphabet::{Alphabet, SymbolId};
pub use charclass::{CharClass, CharRange};
pub use convert::{dfa_to_nfa, nfa_to_dfa, nfa_to_regex, regex_to_nfa};
pub use dfa::{Dfa, DfaState};
pub use error::{LexerErrorKind, ParseError, RegexError, Result, Span, SpannedError};
pub use language::RegularLanguage;
pub use lexer::{Lexer, SpannedToken, Token};
pub use nfa::{Nfa, NfaState, StateId, Transition};
pub use parser::{Parser, parse, parse_spanned};
pub use pattern::Pattern;

/// Compile a regex pattern into a regular language
///
/// This is the main entry point for compiling patterns.
pub fn compile(input: &str) -> Result<RegularLanguage> {
    RegularLanguage::parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end() {
        // string -> tokens -> pattern -> NFA -> DFA -> pattern
        let language = compile("(ab)*(c|d)").unwrap();
        assert!(language.dfa().matches("ababd"));

        let regex = language.regex().to_regex_string();
        let again = compile(&regex).unwrap();
        for input in ["c", "abc", "abd", "ab", "aad", ""] {
            assert_eq!(again.matches(input), language.matches(input), "{:?}", input);
        }
    }

    #[test]
    fn test_compile_error() {
        assert!(matches!(
            compile("a(*)"),
            Err(RegexError::Parse(ParseError::NothingToRepeat('*')))
        ));
    }
}
