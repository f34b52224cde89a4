use super::Automaton;

impl Automaton {
    /// Returns true if every state has at least one transition on every symbol of the
    /// alphabet. An automaton without states is trivially complete.
    pub fn is_complete(&self) -> bool {
        self.states.iter().all(|q| {
            self.alphabet
                .iter()
                .all(|&a| self.transitions.contains_key(&(q.clone(), a)))
        })
    }

    /// Returns true if `self` is complete, has exactly one initial state and no pair of
    /// state and symbol has more than one successor. Note that an incomplete automaton is
    /// never considered deterministic.
    pub fn is_deterministic(&self) -> bool {
        self.is_complete()
            && self.initial_states.len() == 1
            && self.transitions.values().all(|d| d.len() == 1)
    }

    /// Returns true if `self` has a single initial state that is not the destination of
    /// any transition.
    pub fn is_standard(&self) -> bool {
        match self.initial_states.first() {
            Some(initial) if self.initial_states.len() == 1 => {
                !self.transitions.values().any(|d| d.contains(initial))
            }
            _ => false,
        }
    }
}
