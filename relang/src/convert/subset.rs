//! NFA to DFA (subset construction)

use crate::dfa::Dfa;
use crate::nfa::{Nfa, StateId};
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet};

/// Build a DFA accepting the same language as `nfa`.
///
/// Every DFA state stands for an epsilon-closed set of NFA states. The empty
/// set never gets a state of its own: a missing transition already rejects.
pub fn nfa_to_dfa(nfa: &Nfa) -> Dfa {
    let mut dfa = Dfa::new();
    let mut mapping: BTreeMap<BTreeSet<StateId>, StateId> = BTreeMap::new();

    let initial = nfa.epsilon_closure_of(nfa.start_states());
    mapping.insert(initial.clone(), dfa.start_state());
    let mut worklist = vec![initial];

    while let Some(current) = worklist.pop() {
        let from = mapping[&current];
        trace!("subset construction: visiting {:?} as DFA state {}", current, from);

        dfa.set_accept(from, current.iter().any(|&s| nfa.is_accept(s)));

        for (symbol, class) in nfa.alphabet().symbols().iter().enumerate() {
            let next = nfa.step(&current, symbol);
            if next.is_empty() {
                continue;
            }

            let to = match mapping.get(&next) {
                Some(&to) => to,
                None => {
                    let to = dfa.new_state();
                    mapping.insert(next.clone(), to);
                    worklist.push(next);
                    to
                }
            };
            dfa.add_transition(from, to, class);
        }
    }

    debug!(
        "subset construction: {} NFA states -> {} DFA states, {} symbols",
        nfa.len(),
        dfa.len(),
        dfa.alphabet().len()
    );
    dfa
}
