use std::collections::VecDeque;

use super::{Automaton, StateId};
use crate::math::{OrderedSet, Set};

impl Automaton {
    /// Returns the set of states that `self` can be in after reading `word`, starting from
    /// all initial states at once. Symbols that are not in the alphabet lead to the empty set.
    pub fn reached_states(&self, word: &str) -> OrderedSet<&StateId> {
        let mut current: OrderedSet<&StateId> = self.initial_states.iter().collect();
        for symbol in word.chars() {
            if current.is_empty() {
                break;
            }
            current = current
                .into_iter()
                .filter_map(|q| self.successors(q, symbol))
                .flatten()
                .collect();
        }
        current
    }

    /// Returns true if some run of `self` on `word` ends in a final state. This works for
    /// nondeterministic and incomplete automata alike.
    pub fn accepts(&self, word: &str) -> bool {
        self.reached_states(word)
            .into_iter()
            .any(|q| self.final_states.contains(q))
    }

    /// Returns true if the empty word is accepted, i.e. some initial state is final.
    pub fn accepts_empty(&self) -> bool {
        !self.initial_states.is_disjoint(&self.final_states)
    }

    /// Computes the states that can be reached from some initial state by a breadth first
    /// search over all transitions.
    pub fn reachable_states(&self) -> OrderedSet<StateId> {
        let mut seen: Set<&StateId> = self.initial_states.iter().collect();
        let mut queue: VecDeque<&StateId> = self.initial_states.iter().collect();

        while let Some(q) = queue.pop_front() {
            for &a in &self.alphabet {
                for p in self.successors(q, a).into_iter().flatten() {
                    if seen.insert(p) {
                        queue.push_back(p);
                    }
                }
            }
        }
        seen.into_iter().cloned().collect()
    }
}
