use crate::{automaton::StateId, label::LabelStrategy};

/// Settings for the transformations that synthesize states. The defaults mirror the usual
/// pen-and-paper conventions: the sink state is called `P`, a fresh initial state `I` and
/// composite states are named by concatenating their members.
///
/// ```
/// use automaton_engine::prelude::*;
///
/// let options = Options::default()
///     .with_sink_label("trap")
///     .with_labels(LabelStrategy::Braced)
///     .with_max_states(1024);
/// assert_eq!(options.sink_label, StateId::from("trap"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Label of the sink state added by completion.
    pub sink_label: StateId,
    /// Label of the initial state added by standardization.
    pub initial_label: StateId,
    /// How the subset construction names composite states.
    pub labels: LabelStrategy,
    /// Maximal number of states determinization may produce, `None` means unbounded.
    pub max_states: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sink_label: StateId::from("P"),
            initial_label: StateId::from("I"),
            labels: LabelStrategy::default(),
            max_states: None,
        }
    }
}

impl Options {
    /// Sets the label of the sink state.
    pub fn with_sink_label<Q: Into<StateId>>(mut self, label: Q) -> Self {
        self.sink_label = label.into();
        self
    }

    /// Sets the label of the initial state introduced by standardization.
    pub fn with_initial_label<Q: Into<StateId>>(mut self, label: Q) -> Self {
        self.initial_label = label.into();
        self
    }

    /// Chooses how composite states are labeled.
    pub fn with_labels(mut self, labels: LabelStrategy) -> Self {
        self.labels = labels;
        self
    }

    /// Bounds the number of states that determinization may produce.
    pub fn with_max_states(mut self, limit: usize) -> Self {
        self.max_states = Some(limit);
        self
    }
}
