//! A regular language with lazily derived representations
//!
//! [`RegularLanguage`] is created from one of a pattern, an NFA or a DFA and
//! computes the others on first use. Once computed, a representation is
//! cached for the lifetime of the value and never recomputed.

use crate::convert::{dfa_to_nfa, nfa_to_dfa, nfa_to_regex, regex_to_nfa};
use crate::dfa::Dfa;
use crate::error::Result;
use crate::nfa::Nfa;
use crate::parser;
use crate::pattern::Pattern;
use std::cell::OnceCell;

/// A regular language held as any of its representations
#[derive(Debug, Clone)]
pub struct RegularLanguage {
    nfa: OnceCell<Nfa>,
    dfa: OnceCell<Dfa>,
    regex: OnceCell<Pattern>,
}

impl RegularLanguage {
    pub fn from_pattern(pattern: Pattern) -> Self {
        RegularLanguage {
            nfa: OnceCell::new(),
            dfa: OnceCell::new(),
            regex: OnceCell::from(pattern),
        }
    }

    pub fn from_nfa(nfa: Nfa) -> Self {
        RegularLanguage {
            nfa: OnceCell::from(nfa),
            dfa: OnceCell::new(),
            regex: OnceCell::new(),
        }
    }

    pub fn from_dfa(dfa: Dfa) -> Self {
        RegularLanguage {
            nfa: OnceCell::new(),
            dfa: OnceCell::from(dfa),
            regex: OnceCell::new(),
        }
    }

    /// Parse regex syntax into a language
    ///
    /// # Example
    ///
    /// ```
    /// use relang::RegularLanguage;
    ///
    /// let language = RegularLanguage::parse("(ab)*(c|d)").unwrap();
    /// assert!(language.matches("ababc"));
    /// assert!(!language.matches("ab"));
    /// ```
    pub fn parse(source: &str) -> Result<Self> {
        parser::parse(source).map(Self::from_pattern)
    }

    /// The NFA, built from the pattern if there is one, else from the DFA
    pub fn nfa(&self) -> &Nfa {
        self.nfa.get_or_init(|| match (self.regex.get(), self.dfa.get()) {
            (Some(pattern), _) => regex_to_nfa(pattern),
            (None, Some(dfa)) => dfa_to_nfa(dfa),
            (None, None) => unreachable!("a language always holds at least one representation"),
        })
    }

    /// The DFA, built from the NFA
    pub fn dfa(&self) -> &Dfa {
        self.dfa.get_or_init(|| nfa_to_dfa(self.nfa()))
    }

    /// The pattern, built from the NFA
    pub fn regex(&self) -> &Pattern {
        self.regex.get_or_init(|| nfa_to_regex(self.nfa()))
    }

    /// Check whether `input` is in the language.
    ///
    /// Runs the DFA when one is already built and the NFA otherwise; never
    /// builds a DFA just to answer this.
    pub fn matches(&self, input: &str) -> bool {
        match self.dfa.get() {
            Some(dfa) => dfa.matches(input),
            None => self.nfa().matches(input),
        }
    }

    /// The language of every string not in this one
    pub fn complement(&self) -> RegularLanguage {
        RegularLanguage::from_dfa(self.dfa().complement())
    }

    pub fn has_nfa(&self) -> bool {
        self.nfa.get().is_some()
    }

    pub fn has_dfa(&self) -> bool {
        self.dfa.get().is_some()
    }

    pub fn has_regex(&self) -> bool {
        self.regex.get().is_some()
    }
}

impl From<Pattern> for RegularLanguage {
    fn from(pattern: Pattern) -> Self {
        Self::from_pattern(pattern)
    }
}

impl From<Nfa> for RegularLanguage {
    fn from(nfa: Nfa) -> Self {
        Self::from_nfa(nfa)
    }
}

impl From<Dfa> for RegularLanguage {
    fn from(dfa: Dfa) -> Self {
        Self::from_dfa(dfa)
    }
}

impl std::str::FromStr for RegularLanguage {
    type Err = crate::error::RegexError;

    fn from_str(source: &str) -> Result<Self> {
        Self::parse(source)
    }
}
