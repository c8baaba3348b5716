//! Pattern to NFA (Thompson construction)

use crate::nfa::{Nfa, StateId, Transition};
use crate::pattern::Pattern;
use log::debug;

/// Entry and exit states of the sub-automaton built for one pattern node
#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: StateId,
    end: StateId,
}

/// Build an NFA accepting exactly the language of `pattern`.
///
/// The result has a single start state and a single accept state.
pub fn regex_to_nfa(pattern: &Pattern) -> Nfa {
    let mut nfa = Nfa::new();
    let fragment = build(&mut nfa, pattern);
    nfa.set_start(fragment.start, true);
    nfa.set_accept(fragment.end, true);

    debug!(
        "thompson construction: {} states, {} symbols",
        nfa.len(),
        nfa.alphabet().len()
    );
    nfa
}

fn build(nfa: &mut Nfa, pattern: &Pattern) -> Fragment {
    match pattern {
        Pattern::Literal(class) => {
            let start = nfa.new_state();
            let end = nfa.new_state();
            nfa.add_transition(start, Transition::Class(class.clone()), end);
            Fragment { start, end }
        }
        Pattern::Concat(parts) => {
            let mut parts = parts.iter();
            let Some(first) = parts.next() else {
                return build(nfa, &Pattern::Empty);
            };

            let mut fragment = build(nfa, first);
            for part in parts {
                let next = build(nfa, part);
                nfa.add_transition(fragment.end, Transition::Epsilon, next.start);
                fragment.end = next.end;
            }
            fragment
        }
        Pattern::Alternation(left, right) => {
            let start = nfa.new_state();
            let left = build(nfa, left);
            let right = build(nfa, right);
            let end = nfa.new_state();

            nfa.add_transition(start, Transition::Epsilon, left.start);
            nfa.add_transition(start, Transition::Epsilon, right.start);
            nfa.add_transition(left.end, Transition::Epsilon, end);
            nfa.add_transition(right.end, Transition::Epsilon, end);
            Fragment { start, end }
        }
        Pattern::KleeneStar(base) => {
            // The loop goes through a fresh hub; epsilon edges between the
            // base's own endpoints would make `(ab*)*` accept "b".
            let hub = nfa.new_state();
            let base = build(nfa, base);
            nfa.add_transition(hub, Transition::Epsilon, base.start);
            nfa.add_transition(base.end, Transition::Epsilon, hub);
            Fragment {
                start: hub,
                end: hub,
            }
        }
        Pattern::Empty => {
            let state = nfa.new_state();
            Fragment {
                start: state,
                end: state,
            }
        }
        Pattern::Null => Fragment {
            start: nfa.new_state(),
            end: nfa.new_state(),
        },
    }
}
