use std::collections::VecDeque;

use tracing::{debug, trace};

use super::{Automaton, StateId, Transitions};
use crate::{
    error::AutomatonError,
    label::StateLabeler,
    math::{Map, OrderedSet},
    options::Options,
    Show,
};

impl Automaton {
    /// Determinizes `self` using the default [`Options`], see [`Automaton::determinize_with`].
    pub fn determinize(&self) -> Result<Automaton, AutomatonError> {
        self.determinize_with(&Options::default())
    }

    /// Returns a deterministic and complete automaton accepting the same language as `self`.
    /// If `self` is deterministic already, an identical copy is returned. Otherwise `self` is
    /// completed (see [`Automaton::complete_with`]) and the subset construction is run on the
    /// result, naming composite states according to [`Options::labels`]. Only subsets that are
    /// reachable from the set of initial states become states of the result.
    ///
    /// Fails if `self` has no initial state, if the sink label is taken, if two different
    /// subsets receive the same label or if more than [`Options::max_states`] states are
    /// discovered.
    ///
    /// ```
    /// use automaton_engine::prelude::*;
    ///
    /// let nfa = Automaton::builder()
    ///     .with_alphabet(['a', 'b'])
    ///     .with_states([0, 1])
    ///     .with_initial([0])
    ///     .with_final([1])
    ///     .with_transitions([(0, 'a', 0), (0, 'a', 1), (0, 'b', 0), (1, 'a', 1), (1, 'b', 1)])
    ///     .build()
    ///     .unwrap();
    ///
    /// let dfa = nfa.determinize().unwrap();
    /// assert!(dfa.is_deterministic());
    /// assert_eq!(dfa.sorted_states(), vec![&StateId::from(0), &StateId::from("01")]);
    /// ```
    pub fn determinize_with(&self, options: &Options) -> Result<Automaton, AutomatonError> {
        let mut labeler = options.labels.labeler();
        self.determinize_labeled(labeler.as_mut(), options)
    }

    /// Like [`Automaton::determinize_with`], but names composite states through the given
    /// `labeler` instead of the one selected in `options`. The labeler is asked exactly once
    /// for every subset that is discovered, so it does not need to be consistent across calls.
    pub fn determinize_labeled(
        &self,
        labeler: &mut dyn StateLabeler,
        options: &Options,
    ) -> Result<Automaton, AutomatonError> {
        if self.initial_states.is_empty() {
            return Err(AutomatonError::precondition(
                "determinize",
                "must have at least one initial state",
            ));
        }
        if self.is_deterministic() {
            debug!("automaton is already deterministic");
            return Ok(self.clone());
        }

        let completed = self.complete_with(options)?;
        completed.subset_construction(labeler, options.max_states)
    }

    /// Breadth first subset construction on a complete automaton. Composite states are
    /// expanded in the order in which they are discovered.
    fn subset_construction(
        &self,
        labeler: &mut dyn StateLabeler,
        max_states: Option<usize>,
    ) -> Result<Automaton, AutomatonError> {
        let mut states = OrderedSet::new();
        let mut transitions = Transitions::new();
        let mut final_states = OrderedSet::new();

        // label of every subset discovered so far, and the subset every label stands for
        let mut labels: Map<OrderedSet<StateId>, StateId> = Map::default();
        let mut owners: Map<StateId, OrderedSet<StateId>> = Map::default();
        let mut queue = VecDeque::new();

        // gives the label of `subset`, and whether the subset is new
        let mut discover = |subset: &OrderedSet<StateId>,
                            labeler: &mut dyn StateLabeler|
         -> Result<(StateId, bool), AutomatonError> {
            if let Some(known) = labels.get(subset) {
                return Ok((known.clone(), false));
            }
            if let Some(limit) = max_states {
                if labels.len() >= limit {
                    return Err(AutomatonError::ResourceLimit { limit });
                }
            }
            let label = labeler.label(subset);
            if owners.contains_key(&label) {
                return Err(AutomatonError::NameCollision {
                    label,
                    purpose: "composite state",
                });
            }
            owners.insert(label.clone(), subset.clone());
            labels.insert(subset.clone(), label.clone());
            Ok((label, true))
        };

        let start = self.initial_states.clone();
        let (start_label, _) = discover(&start, &mut *labeler)?;
        queue.push_back((start_label.clone(), start));

        while let Some((label, subset)) = queue.pop_front() {
            trace!("expanding {} = {}", label.show(), subset.show());
            if !subset.is_disjoint(&self.final_states) {
                final_states.insert(label.clone());
            }

            for &a in &self.alphabet {
                let successor: OrderedSet<StateId> = subset
                    .iter()
                    .filter_map(|q| self.successors(q, a))
                    .flatten()
                    .cloned()
                    .collect();
                if successor.is_empty() {
                    continue;
                }

                let (successor_label, fresh) = discover(&successor, &mut *labeler)?;
                if fresh {
                    trace!("discovered {} = {}", successor_label.show(), successor.show());
                    queue.push_back((successor_label.clone(), successor));
                }
                transitions.insert((label.clone(), a), OrderedSet::from([successor_label]));
            }
            states.insert(label);
        }

        debug!(
            "subset construction turned {} states into {} states",
            self.size(),
            states.len()
        );

        Ok(Automaton {
            alphabet: self.alphabet.clone(),
            states,
            transitions,
            initial_states: OrderedSet::from([start_label]),
            final_states,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{label::Interned, prelude::*};

    #[test_log::test]
    fn subset_construction() {
        let nfa = crate::tests::second_to_last_a();
        let dfa = nfa.determinize().unwrap();

        assert!(dfa.is_deterministic());
        assert_eq!(dfa.initial_states().len(), 1);
        // completing first adds the sink P, which then travels along in the subsets
        assert_eq!(
            dfa.sorted_states()
                .into_iter()
                .map(StateId::as_str)
                .collect::<Vec<_>>(),
            vec!["0", "01", "012", "012P", "01P", "02", "02P", "0P"]
        );
        assert_eq!(
            dfa.sorted_final()
                .into_iter()
                .map(StateId::as_str)
                .collect::<Vec<_>>(),
            vec!["012", "012P", "02", "02P"]
        );
        crate::tests::assert_same_language(&nfa, &dfa, 8);
    }

    #[test_log::test]
    fn multiple_initial_states_are_merged() {
        let nfa = Automaton::builder()
            .with_alphabet(['a', 'b'])
            .with_states([0, 1, 2])
            .with_initial([0, 1])
            .with_final([2])
            .with_transitions([(0, 'a', 2), (1, 'b', 2)])
            .build()
            .unwrap();

        let dfa = nfa.determinize().unwrap();
        assert!(dfa.is_deterministic());
        assert_eq!(dfa.sorted_initial(), vec![&StateId::from("01")]);
        // the sink of the completion shows up on its own and inside composite states
        assert!(dfa.contains_state(&StateId::from("2P")));
        assert!(dfa.contains_state(&StateId::from("P")));
        crate::tests::assert_same_language(&nfa, &dfa, 6);
    }

    #[test]
    fn deterministic_input_is_returned_as_is() {
        let dfa = crate::tests::ends_with_a();
        assert_eq!(dfa.determinize().unwrap(), dfa);
    }

    #[test_log::test]
    fn determinization_is_stable() {
        let nfa = crate::tests::second_to_last_a();
        let once = nfa.determinize().unwrap();
        let twice = once.determinize().unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn requires_an_initial_state() {
        let aut = Automaton::builder()
            .with_alphabet(['a'])
            .with_states([0])
            .build()
            .unwrap();
        assert_eq!(
            aut.determinize(),
            Err(AutomatonError::Precondition {
                operation: "determinize",
                requirement: "must have at least one initial state"
            })
        );
    }

    #[test]
    fn ambiguous_concatenation_is_reported() {
        // {1, 12} and {11, 2} are both named 112 when concatenating
        let nfa = Automaton::builder()
            .with_alphabet(['a', 'b'])
            .with_states(["0", "1", "12", "11", "2"])
            .with_initial(["0"])
            .with_transitions([
                ("0", 'a', "1"),
                ("0", 'a', "12"),
                ("0", 'b', "11"),
                ("0", 'b', "2"),
            ])
            .build()
            .unwrap();

        assert_eq!(
            nfa.determinize(),
            Err(AutomatonError::NameCollision {
                label: StateId::from("112"),
                purpose: "composite state"
            })
        );

        let braced = nfa
            .determinize_with(&Options::default().with_labels(LabelStrategy::Braced))
            .unwrap();
        assert!(braced.contains_state(&StateId::from("{1,12}")));
        assert!(braced.contains_state(&StateId::from("{11,2}")));
        assert!(braced.is_deterministic());
    }

    #[test]
    fn interned_labels_keep_their_members() {
        let nfa = crate::tests::second_to_last_a();
        let mut labeler = Interned::default();
        let dfa = nfa
            .determinize_labeled(&mut labeler, &Options::default())
            .unwrap();

        assert_eq!(dfa.size(), labeler.len());
        assert_eq!(dfa.sorted_initial(), vec![&StateId::from(0)]);
        let members = labeler.members(&StateId::from(1)).unwrap();
        assert_eq!(members.len(), 2);
        crate::tests::assert_same_language(&nfa, &dfa, 6);
    }

    #[test]
    fn state_ceiling_is_enforced() {
        let nfa = crate::tests::second_to_last_a();
        let options = Options::default().with_max_states(7);
        assert_eq!(
            nfa.determinize_with(&options),
            Err(AutomatonError::ResourceLimit { limit: 7 })
        );
        assert!(nfa
            .determinize_with(&Options::default().with_max_states(8))
            .is_ok());
    }

    #[test_log::test]
    fn every_subset_is_labeled_once() {
        let nfa = crate::tests::second_to_last_a();
        let mut calls = 0usize;
        let mut counter = |_: &math::OrderedSet<StateId>| {
            calls += 1;
            StateId::from(format!("q{calls}"))
        };

        let dfa = nfa
            .determinize_labeled(&mut counter, &Options::default())
            .unwrap();
        // four states once the sink is added, so at most sixteen subsets
        assert!(dfa.size() <= 16);
        assert_eq!(dfa.size(), 8);
        assert_eq!(calls, 8);
        assert_eq!(dfa.sorted_initial(), vec![&StateId::from("q1")]);
        crate::tests::assert_same_language(&nfa, &dfa, 8);
    }

    #[test]
    fn sink_collision_is_reported() {
        let aut = Automaton::builder()
            .with_alphabet(['a', 'b'])
            .with_states(["P", "Q"])
            .with_initial(["P", "Q"])
            .with_transitions([("P", 'a', "Q")])
            .build()
            .unwrap();
        assert!(matches!(
            aut.determinize(),
            Err(AutomatonError::NameCollision { purpose: "sink state", .. })
        ));
    }
}
