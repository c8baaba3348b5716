//! DFA to NFA (structural embedding)

use crate::dfa::Dfa;
use crate::nfa::{Nfa, Transition};
use log::debug;

/// Lift a DFA into an equivalent NFA with one state per DFA state and no
/// epsilon edges.
pub fn dfa_to_nfa(dfa: &Dfa) -> Nfa {
    let mut nfa = Nfa::new();
    let mapping: Vec<_> = dfa.states().map(|_| nfa.new_state()).collect();

    for (id, state) in dfa.states() {
        nfa.set_start(mapping[id], state.is_start());
        nfa.set_accept(mapping[id], state.is_accept());
        for (&symbol, &to) in state.transitions() {
            let class = dfa.alphabet().class(symbol).clone();
            nfa.add_transition(mapping[id], Transition::Class(class), mapping[to]);
        }
    }

    debug!(
        "dfa embedding: {} states, {} symbols",
        nfa.len(),
        nfa.alphabet().len()
    );
    nfa
}
