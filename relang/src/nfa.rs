//! NFA (Nondeterministic Finite Automaton) storage and simulation
//!
//! States live in an arena owned by the [`Nfa`] and refer to each other by
//! [`StateId`]. Character transitions are labelled with symbols of the
//! automaton's own [`Alphabet`]; adding a transition whose class straddles a
//! symbol boundary first refines the alphabet and rebuilds every state's
//! table against the finer symbols.

use crate::alphabet::{Alphabet, SymbolId};
use crate::charclass::CharClass;
use crate::pattern::Pattern;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// An NFA state ID
pub type StateId = usize;

/// The label of an NFA edge
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Epsilon transition (no input consumed)
    Epsilon,
    /// Transition on any character of the class
    Class(CharClass),
}

impl From<CharClass> for Transition {
    fn from(class: CharClass) -> Self {
        Transition::Class(class)
    }
}

/// An NFA state
#[derive(Debug, Clone, Default)]
pub struct NfaState {
    start: bool,
    accept: bool,
    transitions: BTreeMap<SymbolId, BTreeSet<StateId>>,
    epsilon: BTreeSet<StateId>,
    /// States with an edge (of any kind) into this one
    incoming: BTreeSet<StateId>,
}

impl NfaState {
    pub fn is_start(&self) -> bool {
        self.start
    }

    pub fn is_accept(&self) -> bool {
        self.accept
    }

    /// Character transitions, keyed by symbol of the owning NFA's alphabet
    pub fn transitions(&self) -> &BTreeMap<SymbolId, BTreeSet<StateId>> {
        &self.transitions
    }

    /// Destinations of epsilon edges
    pub fn epsilon_transitions(&self) -> &BTreeSet<StateId> {
        &self.epsilon
    }

    fn refresh_transitions(&mut self, origins: &[SymbolId]) {
        let mut refreshed: BTreeMap<SymbolId, BTreeSet<StateId>> = BTreeMap::new();
        for (symbol, old) in origins.iter().enumerate() {
            if let Some(targets) = self.transitions.get(old) {
                refreshed
                    .entry(symbol)
                    .or_default()
                    .extend(targets.iter().copied());
            }
        }
        self.transitions = refreshed;
    }
}

/// An NFA (Nondeterministic Finite Automaton)
#[derive(Debug, Clone, Default)]
pub struct Nfa {
    alphabet: Alphabet,
    /// Arena of states; deleted states leave a `None` so ids stay stable
    states: Vec<Option<NfaState>>,
}

impl Nfa {
    /// Create a new NFA with no states
    pub fn new() -> Self {
        Nfa {
            alphabet: Alphabet::new(),
            states: Vec::new(),
        }
    }

    /// Build an NFA from a pattern using Thompson's construction
    pub fn from_pattern(pattern: &Pattern) -> Self {
        crate::convert::regex_to_nfa(pattern)
    }

    /// Allocate a new state and return its ID
    pub fn new_state(&mut self) -> StateId {
        self.states.push(Some(NfaState::default()));
        self.states.len() - 1
    }

    /// Remove a state together with every edge into or out of it.
    ///
    /// Deleting an id that is already gone does nothing. Every other use of
    /// a deleted id panics.
    pub fn delete_state(&mut self, id: StateId) {
        let Some(state) = self.states.get_mut(id).and_then(Option::take) else {
            return;
        };

        for source in state.incoming {
            if let Some(Some(source)) = self.states.get_mut(source) {
                source.epsilon.remove(&id);
                source.transitions.retain(|_, targets| {
                    targets.remove(&id);
                    !targets.is_empty()
                });
            }
        }

        let outgoing = state
            .transitions
            .values()
            .flatten()
            .chain(&state.epsilon);
        for &target in outgoing {
            if let Some(Some(target)) = self.states.get_mut(target) {
                target.incoming.remove(&id);
            }
        }
    }

    /// The state with the given id, if it exists and was not deleted
    pub fn state(&self, id: StateId) -> Option<&NfaState> {
        self.states.get(id).and_then(Option::as_ref)
    }

    fn live(&self, id: StateId) -> &NfaState {
        match self.state(id) {
            Some(state) => state,
            None => panic!("NFA state {} does not exist", id),
        }
    }

    fn live_mut(&mut self, id: StateId) -> &mut NfaState {
        match self.states.get_mut(id).and_then(Option::as_mut) {
            Some(state) => state,
            None => panic!("NFA state {} does not exist", id),
        }
    }

    /// All live states in id order
    pub fn states(&self) -> impl Iterator<Item = (StateId, &NfaState)> {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(id, s)| s.as_ref().map(|s| (id, s)))
    }

    /// Number of live states
    pub fn len(&self) -> usize {
        self.states.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn start_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states().filter(|(_, s)| s.start).map(|(id, _)| id)
    }

    pub fn accept_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states().filter(|(_, s)| s.accept).map(|(id, _)| id)
    }

    pub fn set_start(&mut self, id: StateId, start: bool) {
        self.live_mut(id).start = start;
    }

    pub fn set_accept(&mut self, id: StateId, accept: bool) {
        self.live_mut(id).accept = accept;
    }

    pub fn is_start(&self, id: StateId) -> bool {
        self.live(id).start
    }

    pub fn is_accept(&self, id: StateId) -> bool {
        self.live(id).accept
    }

    /// The alphabet the transitions are expressed in
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Add a transition between states.
    ///
    /// A class that the alphabet cannot express yet refines the alphabet
    /// first; the edge is then recorded on every block making up the class.
    /// An empty class adds nothing.
    pub fn add_transition(&mut self, from: StateId, transition: Transition, to: StateId) {
        self.live(to);
        match transition {
            Transition::Epsilon => {
                self.live_mut(from).epsilon.insert(to);
            }
            Transition::Class(class) => {
                self.live(from);
                if class.is_empty() {
                    return;
                }
                self.refine_alphabet(&class);
                let symbols = self.alphabet.constituent_classes(&class);
                let state = self.live_mut(from);
                for symbol in symbols {
                    state.transitions.entry(symbol).or_default().insert(to);
                }
            }
        }
        self.live_mut(to).incoming.insert(from);
    }

    fn refine_alphabet(&mut self, class: &CharClass) {
        if !self.alphabet.requires_expanding_alphabet(class) {
            return;
        }
        let origins = self.alphabet.expand_to_include(class);
        for state in self.states.iter_mut().flatten() {
            state.refresh_transitions(&origins);
        }
    }

    /// Destinations of `state` on `symbol`, without epsilon closure
    pub fn transitions_on(
        &self,
        state: StateId,
        symbol: SymbolId,
    ) -> impl Iterator<Item = StateId> + '_ {
        self.live(state)
            .transitions
            .get(&symbol)
            .into_iter()
            .flatten()
            .copied()
    }

    /// States reachable from `state` through epsilon edges, including itself
    pub fn epsilon_closure(&self, state: StateId) -> BTreeSet<StateId> {
        self.epsilon_closure_of([state])
    }

    /// Compute epsilon closure of a set of states
    pub fn epsilon_closure_of(
        &self,
        states: impl IntoIterator<Item = StateId>,
    ) -> BTreeSet<StateId> {
        let mut closure = BTreeSet::new();
        let mut stack = Vec::new();
        for state in states {
            if closure.insert(state) {
                stack.push(state);
            }
        }

        while let Some(state) = stack.pop() {
            for &target in &self.live(state).epsilon {
                if closure.insert(target) {
                    stack.push(target);
                }
            }
        }

        closure
    }

    /// All states reachable from `states` by consuming one character of `symbol`
    pub fn step(&self, states: &BTreeSet<StateId>, symbol: SymbolId) -> BTreeSet<StateId> {
        let targets: Vec<StateId> = states
            .iter()
            .flat_map(|&s| self.transitions_on(s, symbol))
            .collect();
        self.epsilon_closure_of(targets)
    }

    /// Check whether the whole input is in the language
    pub fn matches(&self, input: &str) -> bool {
        let mut current = self.epsilon_closure_of(self.start_states());

        for c in input.chars() {
            if current.is_empty() {
                return false;
            }
            current = self.step(&current, self.alphabet.symbol(c));
        }

        current.iter().any(|&s| self.live(s).accept)
    }

    /// A human-readable dump of states and transitions
    pub fn pretty_print(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Nfa {
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

            for (&symbol, targets) in &state.transitions {
                for target in targets {
                    writeln!(f, "  --> {} on {}", target, self.alphabet.class(symbol))?;
                }
            }
            for target in &state.epsilon {
                writeln!(f, "  --> {} on ε", target)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(word: &str) -> Nfa {
        let mut nfa = Nfa::new();
        let mut prev = nfa.new_state();
        nfa.set_start(prev, true);
        for c in word.chars() {
            let next = nfa.new_state();
            nfa.add_transition(prev, Transition::Class(CharClass::single(c)), next);
            prev = next;
        }
        nfa.set_accept(prev, true);
        nfa
    }

    #[test]
    fn test_new_state() {
        let mut nfa = Nfa::new();
        let s0 = nfa.new_state();
        let s1 = nfa.new_state();
        assert_ne!(s0, s1);
        assert!(!nfa.is_start(s0));
        assert!(!nfa.is_accept(s1));
        assert_eq!(nfa.len(), 2);
    }

    #[test]
    fn test_epsilon_closure() {
        let mut nfa = Nfa::new();
        let s0 = nfa.new_state();
        let s1 = nfa.new_state();
        let s2 = nfa.new_state();
        let s3 = nfa.new_state();

        nfa.add_transition(s0, Transition::Epsilon, s1);
        nfa.add_transition(s1, Transition::Epsilon, s2);
        nfa.add_transition(s2, Transition::Epsilon, s0);
        nfa.add_transition(s2, Transition::Class(CharClass::single('x')), s3);

        let closure = nfa.epsilon_closure(s0);
        assert_eq!(closure, BTreeSet::from([s0, s1, s2]));
        assert_eq!(nfa.epsilon_closure(s3), BTreeSet::from([s3]));
    }

    #[test]
    fn test_matches_literal_chain() {
        let nfa = chain("abc");
        assert!(nfa.matches("abc"));
        assert!(!nfa.matches("ab"));
        assert!(!nfa.matches("abcd"));
        assert!(!nfa.matches(""));
    }

    #[test]
    fn test_refinement_keeps_existing_edges() {
        let mut nfa = Nfa::new();
        let s0 = nfa.new_state();
        let s1 = nfa.new_state();
        let s2 = nfa.new_state();
        nfa.set_start(s0, true);
        nfa.set_accept(s1, true);
        nfa.set_accept(s2, true);

        nfa.add_transition(s0, Transition::Class(CharClass::range('a', 'z')), s1);
        assert_eq!(nfa.alphabet().len(), 2);
        nfa.add_transition(s0, Transition::Class(CharClass::single('m')), s2);
        assert_eq!(nfa.alphabet().len(), 3);

        assert!(nfa.matches("a"));
        assert!(nfa.matches("m"));
        assert!(nfa.matches("z"));
        assert!(!nfa.matches("0"));

        let m = nfa.alphabet().symbol('m');
        let targets: BTreeSet<_> = nfa.transitions_on(s0, m).collect();
        assert_eq!(targets, BTreeSet::from([s1, s2]));
    }

    #[test]
    fn test_empty_class_adds_nothing() {
        let mut nfa = Nfa::new();
        let s0 = nfa.new_state();
        let s1 = nfa.new_state();
        nfa.add_transition(s0, Transition::Class(CharClass::empty()), s1);
        assert!(nfa.state(s0).unwrap().transitions().is_empty());
        assert_eq!(nfa.alphabet().len(), 1);
    }

    #[test]
    fn test_multiple_start_states() {
        let mut nfa = chain("ab");
        let extra = nfa.new_state();
        let end = nfa.new_state();
        nfa.set_start(extra, true);
        nfa.set_accept(end, true);
        nfa.add_transition(extra, Transition::Class(CharClass::single('z')), end);

        assert!(nfa.matches("ab"));
        assert!(nfa.matches("z"));
        assert!(!nfa.matches("az"));
    }

    #[test]
    fn test_delete_state_scrubs_edges() {
        let mut nfa = Nfa::new();
        let s0 = nfa.new_state();
        let s1 = nfa.new_state();
        let s2 = nfa.new_state();
        nfa.set_start(s0, true);
        nfa.set_accept(s2, true);
        nfa.add_transition(s0, Transition::Class(CharClass::single('a')), s1);
        nfa.add_transition(s0, Transition::Epsilon, s1);
        nfa.add_transition(s1, Transition::Class(CharClass::single('b')), s2);
        nfa.add_transition(s0, Transition::Class(CharClass::single('c')), s2);

        nfa.delete_state(s1);

        assert!(nfa.state(s1).is_none());
        assert_eq!(nfa.len(), 2);
        let s0_state = nfa.state(s0).unwrap();
        assert!(s0_state.epsilon_transitions().is_empty());
        assert!(s0_state.transitions().values().all(|t| !t.contains(&s1)));
        assert!(!nfa.state(s2).unwrap().incoming.contains(&s1));
        assert!(nfa.matches("c"));
        assert!(!nfa.matches("ab"));
    }

    #[test]
    fn test_delete_state_twice() {
        let mut nfa = Nfa::new();
        let s0 = nfa.new_state();
        let s1 = nfa.new_state();
        nfa.set_start(s0, true);
        nfa.set_accept(s0, true);
        nfa.add_transition(s1, Transition::Class(CharClass::single('a')), s0);

        nfa.delete_state(s1);
        nfa.delete_state(s1);
        nfa.delete_state(42);

        assert_eq!(nfa.len(), 1);
        assert!(nfa.state(s0).unwrap().incoming.is_empty());
        assert!(nfa.matches(""));
    }

    #[test]
    #[should_panic]
    fn test_transition_to_deleted_state_panics() {
        let mut nfa = Nfa::new();
        let s0 = nfa.new_state();
        let s1 = nfa.new_state();
        nfa.delete_state(s1);
        nfa.add_transition(s0, Transition::Epsilon, s1);
    }

    #[test]
    fn test_pretty_print() {
        let nfa = chain("a");
        assert_eq!(
            nfa.pretty_print(),
            "State 0: (start)\n  --> 1 on a\n\nState 1: (accept)\n\n"
        );
    }
}
