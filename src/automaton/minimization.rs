use tracing::{debug, trace};

use super::{Automaton, StateId, Transitions};
use crate::{
    error::AutomatonError,
    math::{Map, OrderedSet, Partition},
    Show,
};

impl Automaton {
    /// Computes the coarsest partition of the reachable states of `self` into blocks of
    /// language equivalent states, using Moore's partition refinement.
    ///
    /// The initial partition separates final from non-final states, listing the final block
    /// first. In every round, each state is assigned a signature, which is the sequence of
    /// blocks its successors belong to (going through the alphabet in ascending order). All
    /// signatures of a round are computed against the partition as it was at the start of the
    /// round. Blocks are then split by signature, and the refinement stops as soon as a round
    /// does not split any block.
    ///
    /// Fails if `self` is not deterministic (which includes complete).
    pub fn equivalence_partition(&self) -> Result<Partition<StateId>, AutomatonError> {
        if !self.is_deterministic() {
            return Err(AutomatonError::precondition(
                "minimize",
                "must be deterministic and complete",
            ));
        }

        let reachable = self.reachable_states();
        let (accepting, rejecting): (Vec<_>, Vec<_>) = reachable
            .into_iter()
            .partition(|q| self.final_states.contains(q));
        let mut partition = Partition::new([accepting, rejecting]);

        let mut round = 0;
        loop {
            round += 1;
            let snapshot = partition.index();
            let refined = partition.refine(|q| {
                self.alphabet
                    .iter()
                    .map(|&a| {
                        self.successor(q, a)
                            .and_then(|p| snapshot.get(p))
                            .copied()
                    })
                    .collect::<Vec<_>>()
            });
            trace!("round {round} of refinement gives {}", refined.show());

            if refined.size() == partition.size() {
                debug!(
                    "partition refinement stabilized after {round} rounds with {} blocks",
                    partition.size()
                );
                return Ok(partition);
            }
            partition = refined;
        }
    }

    /// Returns the minimal deterministic and complete automaton accepting the same language as
    /// `self`. States that cannot be reached from the initial state are dropped, and every
    /// block of [`Automaton::equivalence_partition`] becomes a single state, named after the
    /// smallest state of the block.
    ///
    /// Fails with [`AutomatonError::Precondition`] if `self` is not deterministic, so
    /// nondeterministic or incomplete automata need to go through
    /// [`Automaton::determinize`] first.
    ///
    /// ```
    /// use automaton_engine::prelude::*;
    ///
    /// let dfa = Automaton::builder()
    ///     .with_alphabet(['a'])
    ///     .with_states([0, 1])
    ///     .with_initial([0])
    ///     .with_final([0, 1])
    ///     .with_transitions([(0, 'a', 1), (1, 'a', 0)])
    ///     .build()
    ///     .unwrap();
    ///
    /// let min = dfa.minimize().unwrap();
    /// assert_eq!(min.sorted_states(), vec![&StateId::from(0)]);
    /// assert!(min.accepts("aaa"));
    /// ```
    pub fn minimize(&self) -> Result<Automaton, AutomatonError> {
        let partition = self.equivalence_partition()?;

        let mut representative: Map<&StateId, &StateId> = Map::default();
        for block in &partition {
            if let Some(smallest) = block.first() {
                for q in block {
                    representative.insert(q, smallest);
                }
            }
        }
        let represent = |q: &StateId| representative.get(q).map(|&r| r.clone());

        let states: OrderedSet<StateId> = partition
            .iter()
            .filter_map(|block| block.first())
            .cloned()
            .collect();

        let mut transitions = Transitions::new();
        for q in &states {
            for &a in &self.alphabet {
                if let Some(target) = self.successor(q, a).and_then(represent) {
                    transitions.insert((q.clone(), a), OrderedSet::from([target]));
                }
            }
        }

        let initial_states = self.initial_states.iter().filter_map(represent).collect();
        let final_states = states
            .iter()
            .filter(|q| self.final_states.contains(*q))
            .cloned()
            .collect();

        debug!("minimized automaton from {} to {} states", self.size(), states.len());

        Ok(Automaton {
            alphabet: self.alphabet.clone(),
            states,
            transitions,
            initial_states,
            final_states,
        })
    }
}
