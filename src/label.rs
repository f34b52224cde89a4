use itertools::Itertools;

use crate::{
    automaton::StateId,
    math::{Bijection, OrderedSet},
};

/// Names the composite states that the subset construction produces. Each composite state
/// corresponds to a set of states of the original automaton, and the labeler turns that set
/// into a [`StateId`].
///
/// Implementations must be consistent, meaning that the same set is always given the same
/// label during one run of the construction. They should also be injective on the sets that
/// occur; where they are not, determinization detects the clash and reports it instead of
/// merging two different subsets.
///
/// Any closure mapping sets of states to a [`StateId`] is a labeler, too.
pub trait StateLabeler {
    /// Produces the label of the composite state consisting of `states`.
    fn label(&mut self, states: &OrderedSet<StateId>) -> StateId;
}

impl<F: FnMut(&OrderedSet<StateId>) -> StateId> StateLabeler for F {
    fn label(&mut self, states: &OrderedSet<StateId>) -> StateId {
        (self)(states)
    }
}

/// Joins the labels of the members in ascending order, with an optional separator in
/// between. Without separator, `{0, 1, 2}` becomes `012`. This is only injective if no
/// concatenation of state labels can be read in two ways, e.g. `{1, 12}` and `{11, 2}` both
/// give `112`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Concatenate {
    separator: String,
}

impl Concatenate {
    /// Creates a labeler that puts `separator` between consecutive member labels.
    pub fn with_separator<S: Into<String>>(separator: S) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl StateLabeler for Concatenate {
    fn label(&mut self, states: &OrderedSet<StateId>) -> StateId {
        StateId::new(states.iter().map(StateId::as_str).join(&self.separator))
    }
}

/// Labels a set by listing its members in braces, e.g. `{0,1,2}`. Unlike [`Concatenate`]
/// this is always injective as long as no state label contains a comma or a brace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Braced;

impl StateLabeler for Braced {
    fn label(&mut self, states: &OrderedSet<StateId>) -> StateId {
        StateId::new(format!(
            "{{{}}}",
            states.iter().map(StateId::as_str).join(",")
        ))
    }
}

/// Numbers composite states in the order in which they are first labeled, starting from `0`.
/// The table that relates numbers and sets is kept, so the members of a composite state can
/// be looked up afterwards.
#[derive(Debug, Clone, Default)]
pub struct Interned {
    table: Bijection<usize, OrderedSet<StateId>>,
}

impl Interned {
    /// Gives the set of original states that the composite state `label` stands for.
    pub fn members(&self, label: &StateId) -> Option<&OrderedSet<StateId>> {
        label
            .as_str()
            .parse::<usize>()
            .ok()
            .and_then(|id| self.table.get_by_left(&id))
    }

    /// Returns the number of sets that have been labeled so far.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if nothing has been labeled yet.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl StateLabeler for Interned {
    fn label(&mut self, states: &OrderedSet<StateId>) -> StateId {
        if let Some(id) = self.table.get_by_right(states) {
            return StateId::from(*id);
        }
        let id = self.table.len();
        self.table.insert(id, states.clone());
        StateId::from(id)
    }
}

/// Selects one of the built in labelers, this is what [`crate::Options`] stores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LabelStrategy {
    /// Use [`Concatenate`] without separator.
    #[default]
    Concatenate,
    /// Use [`Braced`].
    Braced,
    /// Use a fresh [`Interned`] labeler for every construction.
    Interned,
}

impl LabelStrategy {
    /// Instantiates the labeler for one run of the subset construction.
    pub fn labeler(&self) -> Box<dyn StateLabeler> {
        match self {
            LabelStrategy::Concatenate => Box::<Concatenate>::default(),
            LabelStrategy::Braced => Box::new(Braced),
            LabelStrategy::Interned => Box::<Interned>::default(),
        }
    }
}

impl std::str::FromStr for LabelStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concatenate" => Ok(LabelStrategy::Concatenate),
            "braced" => Ok(LabelStrategy::Braced),
            "interned" => Ok(LabelStrategy::Interned),
            other => Err(format!("unknown label strategy `{other}`")),
        }
    }
}
