//! NFA to pattern (state elimination)
//!
//! States are ordered with the start states first. `b[i]` describes the ways
//! to finish from state `i` and `a[i][j]` the ways to move from `i` to `j` in
//! one step. Eliminating the last state routes every path through it
//! directly between the remaining states, until only the start states carry
//! meaning.

use crate::charclass::CharClass;
use crate::nfa::{Nfa, StateId};
use crate::pattern::Pattern;
use log::debug;
use std::collections::BTreeMap;
use std::mem;

/// Build a pattern for the language of `nfa`.
///
/// The result is language-equivalent to the NFA but not minimal.
pub fn nfa_to_regex(nfa: &Nfa) -> Pattern {
    let order: Vec<StateId> = nfa
        .states()
        .filter(|(_, s)| s.is_start())
        .chain(nfa.states().filter(|(_, s)| !s.is_start()))
        .map(|(id, _)| id)
        .collect();
    let index: BTreeMap<StateId, usize> =
        order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let n = order.len();
    let starts = nfa.start_states().count();

    let mut b: Vec<Pattern> = order
        .iter()
        .map(|&id| {
            if nfa.is_accept(id) {
                Pattern::Empty
            } else {
                Pattern::Null
            }
        })
        .collect();

    let mut a: Vec<Vec<Pattern>> = Vec::with_capacity(n);
    for &id in &order {
        let mut classes = vec![CharClass::empty(); n];
        let mut epsilon = vec![false; n];
        if let Some(state) = nfa.state(id) {
            for (&symbol, targets) in state.transitions() {
                let class = nfa.alphabet().class(symbol);
                for target in targets {
                    let j = index[target];
                    classes[j] = classes[j].union(class);
                }
            }
            for target in state.epsilon_transitions() {
                epsilon[index[target]] = true;
            }
        }

        let row = classes
            .into_iter()
            .zip(epsilon)
            .map(|(class, epsilon)| {
                let literal = Pattern::literal(class);
                if epsilon {
                    Pattern::alternation(literal, Pattern::Empty)
                } else {
                    literal
                }
            })
            .collect();
        a.push(row);
    }

    for k in (0..n).rev() {
        let self_loop = Pattern::star(a[k][k].clone());
        b[k] = Pattern::concat([self_loop.clone(), mem::take(&mut b[k])]);
        for j in 0..k {
            a[k][j] = Pattern::concat([self_loop.clone(), mem::take(&mut a[k][j])]);
        }

        for i in 0..k {
            if a[i][k] == Pattern::Null {
                continue;
            }
            let via = Pattern::concat([a[i][k].clone(), b[k].clone()]);
            b[i] = Pattern::alternation(mem::take(&mut b[i]), via);
            for j in 0..k {
                let via = Pattern::concat([a[i][k].clone(), a[k][j].clone()]);
                a[i][j] = Pattern::alternation(mem::take(&mut a[i][j]), via);
            }
        }
    }

    // `b[i]` only covers paths that stay among states `>= i`; paths that
    // reach an earlier start state `j` continue with its finished `b[j]`.
    for i in 0..starts {
        for j in 0..i {
            let via = Pattern::concat([a[i][j].clone(), b[j].clone()]);
            b[i] = Pattern::alternation(mem::take(&mut b[i]), via);
        }
    }

    let pattern = b
        .into_iter()
        .take(starts)
        .fold(Pattern::Null, Pattern::alternation)
        .simplify();

    debug!("state elimination: {} states -> {}", n, pattern);
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{dfa_to_nfa, nfa_to_dfa, regex_to_nfa};
    use crate::nfa::Transition;
    use crate::parser::parse;

    const SAMPLES: &[&str] = &[
        "", "a", "b", "c", "d", "ab", "abc", "abd", "abab", "ababc", "aad", "foo", "fo",
        "fofoo", "ffoo", "xyz", "aaa",
    ];

    fn assert_round_trip(source: &str) {
        let nfa = regex_to_nfa(&parse(source).unwrap());
        let regex = nfa_to_regex(&nfa);
        let again = regex_to_nfa(&regex);
        for input in SAMPLES {
            assert_eq!(
                again.matches(input),
                nfa.matches(input),
                "{:?} -> {} disagrees on {:?}",
                source,
                regex,
                input
            );
        }
    }

    #[test]
    fn test_round_trip() {
        for source in ["abc", "(ab)*(c|d)", "(foo?)*", "a|b*", "[a-c]*d", "", "()*", "[]"] {
            assert_round_trip(source);
        }
    }

    #[test]
    fn test_single_literal() {
        let nfa = regex_to_nfa(&parse("a").unwrap());
        assert_eq!(nfa_to_regex(&nfa).to_regex_string(), "a");
    }

    #[test]
    fn test_dead_language_is_null() {
        let nfa = regex_to_nfa(&parse("a[]").unwrap());
        assert_eq!(nfa_to_regex(&nfa), Pattern::Null);
    }

    #[test]
    fn test_from_dfa() {
        let nfa = regex_to_nfa(&parse("(ab)*(c|d)").unwrap());
        let embedded = dfa_to_nfa(&nfa_to_dfa(&nfa));
        let regex = nfa_to_regex(&embedded);
        let again = regex_to_nfa(&regex);
        for input in SAMPLES {
            assert_eq!(again.matches(input), nfa.matches(input), "{:?}", input);
        }
    }

    #[test]
    fn test_start_states_reaching_each_other() {
        // 0 -a-> 1 -b-> 2 (accept), both 0 and 1 are start states and
        // 1 -c-> 0 loops back to the first one.
        let mut nfa = Nfa::new();
        let s0 = nfa.new_state();
        let s1 = nfa.new_state();
        let s2 = nfa.new_state();
        nfa.set_start(s0, true);
        nfa.set_start(s1, true);
        nfa.set_accept(s2, true);
        nfa.add_transition(s0, Transition::Class(CharClass::single('a')), s1);
        nfa.add_transition(s1, Transition::Class(CharClass::single('b')), s2);
        nfa.add_transition(s1, Transition::Class(CharClass::single('c')), s0);

        let again = regex_to_nfa(&nfa_to_regex(&nfa));
        for input in ["b", "ab", "cab", "acab", "cacab", "", "a", "c", "ca"] {
            assert_eq!(again.matches(input), nfa.matches(input), "{:?}", input);
        }
        assert!(again.matches("cab"));
    }
}
