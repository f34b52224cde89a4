use tracing::debug;

use super::{Automaton, StateId};
use crate::{error::AutomatonError, math::OrderedSet, options::Options};

impl Automaton {
    /// Completes `self` using the default [`Options`], see [`Automaton::complete_with`].
    pub fn complete(&self) -> Result<Automaton, AutomatonError> {
        self.complete_with(&Options::default())
    }

    /// Returns a complete automaton that accepts the same language as `self`. If `self` is
    /// already complete, an identical copy is returned. Otherwise a non-initial, non-final
    /// sink state labeled [`Options::sink_label`] is added, every missing transition leads to
    /// it and it loops on every symbol.
    ///
    /// Fails with [`AutomatonError::NameCollision`] if `self` already has a state carrying
    /// the sink label.
    pub fn complete_with(&self, options: &Options) -> Result<Automaton, AutomatonError> {
        if self.is_complete() {
            debug!("automaton is already complete");
            return Ok(self.clone());
        }

        let sink = &options.sink_label;
        if self.contains_state(sink) {
            return Err(AutomatonError::NameCollision {
                label: sink.clone(),
                purpose: "sink state",
            });
        }

        let mut states = self.states.clone();
        states.insert(sink.clone());

        let mut transitions = self.transitions.clone();
        let mut added = 0;
        for q in &states {
            for &a in &self.alphabet {
                transitions.entry((q.clone(), a)).or_insert_with(|| {
                    added += 1;
                    OrderedSet::from([sink.clone()])
                });
            }
        }
        debug!(
            "completed automaton through sink state {sink}, added {added} transitions"
        );

        Ok(Automaton {
            alphabet: self.alphabet.clone(),
            states,
            transitions,
            initial_states: self.initial_states.clone(),
            final_states: self.final_states.clone(),
        })
    }

    /// Returns the states that are missing a transition on at least one symbol.
    pub fn incomplete_states(&self) -> Vec<&StateId> {
        self.states
            .iter()
            .filter(|q| {
                self.alphabet
                    .iter()
                    .any(|&a| !self.transitions.contains_key(&((*q).clone(), a)))
            })
            .collect()
    }
}
