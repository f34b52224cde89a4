use tracing::debug;

use super::Automaton;
use crate::error::AutomatonError;

impl Automaton {
    /// Returns an automaton accepting exactly the words that `self` rejects, by swapping final
    /// and non-final states. This is only sound for deterministic and complete automata, for
    /// anything else [`AutomatonError::Precondition`] is returned.
    pub fn complement(&self) -> Result<Automaton, AutomatonError> {
        if !self.is_deterministic() {
            return Err(AutomatonError::precondition(
                "complement",
                "must be deterministic and complete",
            ));
        }

        let final_states = self
            .states
            .difference(&self.final_states)
            .cloned()
            .collect();
        debug!("complementing automaton with {} states", self.size());

        Ok(Automaton {
            alphabet: self.alphabet.clone(),
            states: self.states.clone(),
            transitions: self.transitions.clone(),
            initial_states: self.initial_states.clone(),
            final_states,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn complement_flips_acceptance() {
        let dfa = crate::tests::ends_with_a();
        let complement = dfa.complement().unwrap();

        assert_eq!(complement.sorted_final(), vec![&StateId::from(0)]);
        assert_eq!(complement.transitions(), dfa.transitions());
        assert_eq!(complement.initial_states(), dfa.initial_states());
        for word in crate::tests::words_up_to(&['a', 'b'], 6) {
            assert_ne!(dfa.accepts(&word), complement.accepts(&word));
        }
    }

    #[test]
    fn complement_is_involutive() {
        let dfa = crate::tests::wiki_dfa();
        assert_eq!(dfa.complement().unwrap().complement().unwrap(), dfa);
    }

    #[test]
    fn nondeterministic_automaton_is_rejected() {
        let nfa = crate::tests::second_to_last_a();
        assert_eq!(
            nfa.complement(),
            Err(AutomatonError::Precondition {
                operation: "complement",
                requirement: "must be deterministic and complete"
            })
        );

        let complement = nfa.determinize().unwrap().complement().unwrap();
        for word in crate::tests::words_up_to(&['a', 'b'], 6) {
            assert_ne!(nfa.accepts(&word), complement.accepts(&word));
        }
    }
}
