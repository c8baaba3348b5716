//! DFA (Deterministic Finite Automaton) storage and simulation
//!
//! Every state maps each symbol of the DFA's alphabet to at most one
//! destination. A missing entry is an implicit reject. State 0 is always the
//! start state.

use crate::alphabet::{Alphabet, SymbolId};
use crate::charclass::CharClass;
use crate::nfa::{Nfa, StateId};
use std::collections::BTreeMap;
use std::fmt;

/// A DFA state
#[derive(Debug, Clone, Default)]
pub struct DfaState {
    start: bool,
    accept: bool,
    transitions: BTreeMap<SymbolId, StateId>,
}

impl DfaState {
    pub fn is_start(&self) -> bool {
        self.start
    }

    pub fn is_accept(&self) -> bool {
        self.accept
    }

    /// Transitions keyed by symbol of the owning DFA's alphabet
    pub fn transitions(&self) -> &BTreeMap<SymbolId, StateId> {
        &self.transitions
    }

    fn refresh_transitions(&mut self, origins: &[SymbolId]) {
        self.transitions = origins
            .iter()
            .enumerate()
            .filter_map(|(symbol, old)| self.transitions.get(old).map(|&to| (symbol, to)))
            .collect();
    }
}

/// A DFA (Deterministic Finite Automaton)
#[derive(Debug)]
pub struct Dfa {
    alphabet: Alphabet,
    states: Vec<DfaState>,
}

impl Dfa {
    /// Create a DFA holding only its start state
    pub fn new() -> Self {
        Dfa {
            alphabet: Alphabet::new(),
            states: vec![DfaState {
                start: true,
                ..DfaState::default()
            }],
        }
    }

    /// Build a DFA from an NFA using the subset construction
    pub fn from_nfa(nfa: &Nfa) -> Self {
        crate::convert::nfa_to_dfa(nfa)
    }

    pub fn start_state(&self) -> StateId {
        0
    }

    /// Allocate a new non-start state and return its ID
    pub fn new_state(&mut self) -> StateId {
        self.states.push(DfaState::default());
        self.states.len() - 1
    }

    pub fn state(&self, id: StateId) -> &DfaState {
        &self.states[id]
    }

    /// All states in id order
    pub fn states(&self) -> impl Iterator<Item = (StateId, &DfaState)> {
        self.states.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false: the start state always exists
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn is_accept(&self, id: StateId) -> bool {
        self.states[id].accept
    }

    pub fn set_accept(&mut self, id: StateId, accept: bool) {
        self.states[id].accept = accept;
    }

    /// Add a transition between states.
    ///
    /// The alphabet is refined first if it cannot express `on`. The edge then
    /// replaces any existing edge on each block making up `on`.
    pub fn add_transition(&mut self, from: StateId, to: StateId, on: &CharClass) {
        assert!(to < self.states.len(), "DFA state {} does not exist", to);
        if on.is_empty() {
            return;
        }
        if self.alphabet.requires_expanding_alphabet(on) {
            let origins = self.alphabet.expand_to_include(on);
            for state in &mut self.states {
                state.refresh_transitions(&origins);
            }
        }
        let symbols = self.alphabet.constituent_classes(on);
        let state = &mut self.states[from];
        for symbol in symbols {
            state.transitions.insert(symbol, to);
        }
    }

    /// The destination of `state` on `symbol`, if any
    pub fn transition_on(&self, state: StateId, symbol: SymbolId) -> Option<StateId> {
        self.states[state].transitions.get(&symbol).copied()
    }

    /// Check whether the whole input is in the language
    pub fn matches(&self, input: &str) -> bool {
        let mut state = self.start_state();

        for c in input.chars() {
            match self.transition_on(state, self.alphabet.symbol(c)) {
                Some(next) => state = next,
                None => return false,
            }
        }

        self.states[state].accept
    }

    /// Structural deep copy.
    ///
    /// The copy replays every transition through [`Dfa::add_transition`], so
    /// it derives its own alphabet and shares nothing with `self`.
    pub fn copy(&self) -> Dfa {
        let mut copy = Dfa::new();
        let mut mapping = vec![copy.start_state(); self.states.len()];

        for (id, state) in self.states() {
            let new_id = if id == self.start_state() {
                copy.start_state()
            } else {
                copy.new_state()
            };
            copy.set_accept(new_id, state.accept);
            mapping[id] = new_id;
        }

        for (id, state) in self.states() {
            for (&symbol, &to) in &state.transitions {
                copy.add_transition(mapping[id], mapping[to], self.alphabet.class(symbol));
            }
        }

        copy
    }

    /// Whether every state has a transition on every symbol
    pub fn is_complete(&self) -> bool {
        let symbols = self.alphabet.len();
        self.states.iter().all(|s| s.transitions.len() == symbols)
    }

    /// Route every missing transition to a new rejecting sink state
    pub fn complete(&mut self) {
        if self.is_complete() {
            return;
        }
        let sink = self.new_state();
        let symbols = self.alphabet.len();
        for state in &mut self.states {
            for symbol in 0..symbols {
                state.transitions.entry(symbol).or_insert(sink);
            }
        }
    }

    /// A DFA accepting exactly the strings this one rejects
    pub fn complement(&self) -> Dfa {
        let mut dfa = self.copy();
        dfa.complete();
        for state in &mut dfa.states {
            state.accept = !state.accept;
        }
        dfa
    }

    /// A human-readable dump of states and transitions
    pub fn pretty_print(&self) -> String {
        self.to_string()
    }
}

impl Default for Dfa {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Dfa {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, state) in self.states() {
            write!(f, "State {}:", id)?;
            if state.start {
                write!(f, " (start)")?;
            }
            if state.accept {
                write!(f, " (accept)")?;
            }
            writeln!(f)?;

            for (&symbol, to) in &state.transitions {
                writeln!(f, "  --> {} on {}", to, self.alphabet.class(symbol))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts `(ab)*`
    fn ab_star() -> Dfa {
        let mut dfa = Dfa::new();
        let s0 = dfa.start_state();
        let s1 = dfa.new_state();
        dfa.set_accept(s0, true);
        dfa.add_transition(s0, s1, &CharClass::single('a'));
        dfa.add_transition(s1, s0, &CharClass::single('b'));
        dfa
    }

    #[test]
    fn test_new_has_start_state() {
        let dfa = Dfa::new();
        assert_eq!(dfa.len(), 1);
        assert!(dfa.state(dfa.start_state()).is_start());
        assert!(!dfa.matches(""));
    }

    #[test]
    fn test_matches() {
        let dfa = ab_star();
        assert!(dfa.matches(""));
        assert!(dfa.matches("ab"));
        assert!(dfa.matches("abab"));
        assert!(!dfa.matches("a"));
        assert!(!dfa.matches("aba"));
        assert!(!dfa.matches("ba"));
        assert!(!dfa.matches("abx"));
    }

    #[test]
    fn test_overwrite_transition() {
        let mut dfa = Dfa::new();
        let s1 = dfa.new_state();
        let s2 = dfa.new_state();
        dfa.set_accept(s2, true);
        dfa.add_transition(0, s1, &CharClass::single('a'));
        dfa.add_transition(0, s2, &CharClass::single('a'));
        assert!(dfa.matches("a"));
    }

    #[test]
    fn test_refinement_splits_existing_edges() {
        let mut dfa = Dfa::new();
        let letter = dfa.new_state();
        let vowel = dfa.new_state();
        dfa.set_accept(letter, true);
        dfa.add_transition(0, letter, &CharClass::range('a', 'z'));
        dfa.add_transition(0, vowel, &CharClass::single('e'));

        assert!(dfa.matches("a"));
        assert!(dfa.matches("z"));
        assert!(!dfa.matches("e"));
        assert!(!dfa.matches("0"));
        assert_eq!(dfa.alphabet().len(), 3);
    }

    #[test]
    fn test_class_spanning_blocks() {
        let mut dfa = Dfa::new();
        let s1 = dfa.new_state();
        dfa.set_accept(s1, true);
        dfa.add_transition(0, s1, &CharClass::single('m'));
        dfa.add_transition(0, s1, &CharClass::range('a', 'z'));
        assert!(dfa.matches("a"));
        assert!(dfa.matches("m"));
        assert!(dfa.matches("q"));
    }

    #[test]
    fn test_copy_is_isolated() {
        let dfa = ab_star();
        let mut copy = dfa.copy();
        for id in 0..copy.len() {
            let accept = copy.is_accept(id);
            copy.set_accept(id, !accept);
        }
        copy.add_transition(0, 0, &CharClass::single('z'));

        assert!(dfa.matches("ab"));
        assert!(!dfa.matches("z"));
        assert!(!copy.matches("ab"));
        assert!(copy.matches("a"));
        assert_eq!(dfa.alphabet().len(), 3);
    }

    #[test]
    fn test_complement() {
        let dfa = ab_star();
        let complement = dfa.complement();
        assert!(complement.is_complete());
        for input in ["", "a", "ab", "aba", "abab", "b", "xyz", "abx"] {
            assert_eq!(complement.matches(input), !dfa.matches(input), "{:?}", input);
        }
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut dfa = ab_star();
        dfa.complete();
        let len = dfa.len();
        dfa.complete();
        assert_eq!(dfa.len(), len);
    }

    #[test]
    fn test_pretty_print() {
        let dfa = ab_star();
        let dump = dfa.pretty_print();
        assert!(dump.starts_with("State 0: (start) (accept)\n"));
        assert!(dump.contains("  --> 1 on a\n"));
        assert!(dump.contains("State 1:\n  --> 0 on b\n"));
    }
}
