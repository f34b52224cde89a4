use tracing::debug;

use super::{Automaton, StateId};
use crate::{error::AutomatonError, math::OrderedSet, options::Options};

impl Automaton {
    /// Standardizes `self` using the default [`Options`], see [`Automaton::standardize_with`].
    pub fn standardize(&self) -> Result<Automaton, AutomatonError> {
        self.standardize_with(&Options::default())
    }

    /// Returns an automaton with a single initial state that has no incoming transitions and
    /// that accepts the same language as `self`. A standard automaton is returned unchanged.
    ///
    /// Otherwise a fresh state labeled [`Options::initial_label`] becomes the only initial
    /// state. On each symbol it leads to every state that one of the previous initial states
    /// leads to, and it is final if one of them was, so acceptance of the empty word is
    /// preserved. The previous initial states remain as ordinary states.
    ///
    /// ```
    /// use automaton_engine::prelude::*;
    ///
    /// let aut = Automaton::builder()
    ///     .with_alphabet(['a'])
    ///     .with_states([0])
    ///     .with_initial([0])
    ///     .with_final([0])
    ///     .with_transition(0, 'a', 0)
    ///     .build()
    ///     .unwrap();
    ///
    /// let standard = aut.standardize().unwrap();
    /// assert!(standard.is_standard());
    /// assert!(standard.accepts_empty());
    /// ```
    pub fn standardize_with(&self, options: &Options) -> Result<Automaton, AutomatonError> {
        if self.is_standard() {
            debug!("automaton is already standard");
            return Ok(self.clone());
        }

        let fresh = &options.initial_label;
        if self.contains_state(fresh) {
            return Err(AutomatonError::NameCollision {
                label: fresh.clone(),
                purpose: "initial state",
            });
        }

        let mut transitions = self.transitions.clone();
        for &a in &self.alphabet {
            let targets: OrderedSet<StateId> = self
                .initial_states
                .iter()
                .filter_map(|q| self.successors(q, a))
                .flatten()
                .cloned()
                .collect();
            if !targets.is_empty() {
                transitions.insert((fresh.clone(), a), targets);
            }
        }

        let mut final_states = self.final_states.clone();
        if self.accepts_empty() {
            final_states.insert(fresh.clone());
        }

        let mut states = self.states.clone();
        states.insert(fresh.clone());

        debug!(
            "standardized automaton, {fresh} replaces {} initial states",
            self.initial_states.len()
        );

        Ok(Automaton {
            alphabet: self.alphabet.clone(),
            states,
            transitions,
            initial_states: OrderedSet::from([fresh.clone()]),
            final_states,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn standardization_unions_initial_transitions() {
        let aut = Automaton::builder()
            .with_alphabet(['a', 'b'])
            .with_states([0, 1, 2])
            .with_initial([0, 1])
            .with_final([1])
            .with_transitions([(0, 'a', 2), (1, 'a', 0), (1, 'b', 1), (2, 'b', 0)])
            .build()
            .unwrap();

        let standard = aut.standardize().unwrap();
        let fresh = StateId::from("I");
        assert!(standard.is_standard());
        assert_eq!(standard.sorted_initial(), vec![&fresh]);
        assert_eq!(
            standard.destinations(&fresh, 'a'),
            vec![&StateId::from(0), &StateId::from(2)]
        );
        assert_eq!(standard.destinations(&fresh, 'b'), vec![&StateId::from(1)]);
        // state 1 was initial and final, so the empty word must still be accepted
        assert!(standard.is_final(&fresh));
        assert!(standard.accepts_empty());
        assert!(!standard.is_initial(&StateId::from(0)));
        assert!(standard.contains_state(&StateId::from(1)));
        crate::tests::assert_same_language(&aut, &standard, 6);
    }

    #[test]
    fn standard_automaton_is_unchanged() {
        let aut = Automaton::builder()
            .with_alphabet(['a'])
            .with_states([0, 1])
            .with_initial([0])
            .with_transitions([(0, 'a', 1), (1, 'a', 1)])
            .build()
            .unwrap();
        assert_eq!(aut.standardize().unwrap(), aut);
    }

    #[test_log::test]
    fn single_initial_state_with_loop() {
        let dfa = crate::tests::ends_with_a();
        let standard = dfa.standardize().unwrap();
        assert!(standard.is_standard());
        assert!(!standard.accepts_empty());
        assert!(!standard.is_final(&StateId::from("I")));
        assert_eq!(standard.size(), 3);
        crate::tests::assert_same_language(&dfa, &standard, 6);
        assert!(standard.standardize().unwrap().is_standard());
    }

    #[test]
    fn without_initial_states() {
        let aut = Automaton::builder()
            .with_alphabet(['a'])
            .with_states([0])
            .with_final([0])
            .with_transition(0, 'a', 0)
            .build()
            .unwrap();
        let standard = aut.standardize().unwrap();
        assert!(standard.is_standard());
        assert!(standard.destinations(&StateId::from("I"), 'a').is_empty());
        assert!(!standard.accepts("a"));
    }

    #[test]
    fn initial_label_must_be_fresh() {
        let aut = Automaton::builder()
            .with_alphabet(['a'])
            .with_states(["I"])
            .with_initial(["I"])
            .with_transition("I", 'a', "I")
            .build()
            .unwrap();
        assert_eq!(
            aut.standardize(),
            Err(AutomatonError::NameCollision {
                label: StateId::from("I"),
                purpose: "initial state"
            })
        );
        let standard = aut
            .standardize_with(&Options::default().with_initial_label("S"))
            .unwrap();
        assert!(standard.is_standard());
        assert_eq!(standard.destinations(&StateId::from("S"), 'a'), vec![&StateId::from("I")]);
    }
}
