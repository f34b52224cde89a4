use std::collections::BTreeMap;

use itertools::Itertools;
use tracing::trace;

use crate::{
    error::{AutomatonError, MalformedInput},
    math::OrderedSet,
    Show,
};

mod complement;
mod completion;
mod determinization;
mod minimization;
mod queries;
mod run;
mod standardization;

/// The symbols an automaton reads. Alphabets are ordered sets of symbols, and this order is
/// the canonical order in which transformations go through the alphabet.
pub type Symbol = char;

/// The transition relation of an [`Automaton`], mapping a pair of state and symbol to the
/// set of possible successors. Pairs without a transition are simply absent, the
/// destination sets are never empty.
pub type Transitions = BTreeMap<(StateId, Symbol), OrderedSet<StateId>>;

/// Identifies a state of an [`Automaton`]. States are named by strings and ordered
/// lexicographically by their name, so `"10" < "2"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StateId(String);

impl StateId {
    /// Creates a state with the given name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    /// Returns the name of the state.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StateId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

macro_rules! impl_state_id_from_int {
    ($($int:ty),*) => {
        $(
            impl From<$int> for StateId {
                fn from(value: $int) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

impl_state_id_from_int!(i32, u32, u64, usize);

impl From<&StateId> for StateId {
    fn from(value: &StateId) -> Self {
        value.clone()
    }
}

impl std::fmt::Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for StateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Show for StateId {
    fn show(&self) -> String {
        self.0.clone()
    }
}

/// A finite automaton over an alphabet of [`Symbol`]s. It may be nondeterministic, i.e. have
/// several initial states or several successors for a state and symbol, and it may be
/// incomplete, meaning that some pairs of state and symbol have no successor at all.
///
/// Automata are immutable once built. All transformations borrow `self` and produce a new
/// automaton, so the input of a transformation remains available and unchanged.
///
/// # Example
/// ```
/// use automaton_engine::prelude::*;
///
/// let aut = Automaton::builder()
///     .with_alphabet(['a', 'b'])
///     .with_states([0, 1])
///     .with_initial([0])
///     .with_final([1])
///     .with_transitions([(0, 'a', 1), (1, 'b', 0)])
///     .build()
///     .unwrap();
///
/// assert!(!aut.is_complete());
/// assert!(aut.accepts("aba"));
/// assert!(aut.complete().unwrap().is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    alphabet: OrderedSet<Symbol>,
    states: OrderedSet<StateId>,
    transitions: Transitions,
    initial_states: OrderedSet<StateId>,
    final_states: OrderedSet<StateId>,
}

impl Automaton {
    /// Assembles an automaton from its components, verifying that every state that is
    /// mentioned by the transitions, the initial and the final states is declared in `states`,
    /// that all transitions use symbols from `alphabet` and that no transition has an empty
    /// set of destinations.
    pub fn new(
        alphabet: OrderedSet<Symbol>,
        states: OrderedSet<StateId>,
        transitions: Transitions,
        initial_states: OrderedSet<StateId>,
        final_states: OrderedSet<StateId>,
    ) -> Result<Self, AutomatonError> {
        let aut = Self {
            alphabet,
            states,
            transitions,
            initial_states,
            final_states,
        };
        aut.validate()?;
        trace!(
            "built automaton with {} states and {} transitions",
            aut.size(),
            aut.transition_count()
        );
        Ok(aut)
    }

    /// Creates an [`AutomatonBuilder`], which is the most convenient way of assembling an
    /// automaton by hand.
    pub fn builder() -> AutomatonBuilder {
        AutomatonBuilder::default()
    }

    fn validate(&self) -> Result<(), MalformedInput> {
        let declared = |q: &StateId| {
            if self.states.contains(q) {
                Ok(())
            } else {
                Err(MalformedInput::UnknownState(q.clone()))
            }
        };

        for q in self.initial_states.iter().chain(&self.final_states) {
            declared(q)?;
        }
        for ((source, symbol), destinations) in &self.transitions {
            declared(source)?;
            if !self.alphabet.contains(symbol) {
                return Err(MalformedInput::UnknownSymbol(*symbol));
            }
            if destinations.is_empty() {
                return Err(MalformedInput::EmptyDestination(source.clone(), *symbol));
            }
            for destination in destinations {
                declared(destination)?;
            }
        }
        Ok(())
    }

    /// Returns the alphabet.
    pub fn alphabet(&self) -> &OrderedSet<Symbol> {
        &self.alphabet
    }

    /// Returns the set of all states.
    pub fn states(&self) -> &OrderedSet<StateId> {
        &self.states
    }

    /// Returns the transition relation.
    pub fn transitions(&self) -> &Transitions {
        &self.transitions
    }

    /// Returns the set of initial states.
    pub fn initial_states(&self) -> &OrderedSet<StateId> {
        &self.initial_states
    }

    /// Returns the set of final (accepting) states.
    pub fn final_states(&self) -> &OrderedSet<StateId> {
        &self.final_states
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of transitions, counting every destination of a pair separately.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(|d| d.len()).sum()
    }

    /// Returns true if `state` is a state of `self`.
    pub fn contains_state(&self, state: &StateId) -> bool {
        self.states.contains(state)
    }

    /// Returns true if `state` is initial.
    pub fn is_initial(&self, state: &StateId) -> bool {
        self.initial_states.contains(state)
    }

    /// Returns true if `state` is final.
    pub fn is_final(&self, state: &StateId) -> bool {
        self.final_states.contains(state)
    }

    /// Gives the set of successors of `state` on `symbol`, or `None` if there is no
    /// transition for this pair.
    pub fn successors(&self, state: &StateId, symbol: Symbol) -> Option<&OrderedSet<StateId>> {
        self.transitions.get(&(state.clone(), symbol))
    }

    /// Gives the unique successor of `state` on `symbol`. Returns `None` if there is no
    /// transition or if it is nondeterministic.
    pub fn successor(&self, state: &StateId, symbol: Symbol) -> Option<&StateId> {
        self.successors(state, symbol)
            .filter(|destinations| destinations.len() == 1)
            .and_then(|destinations| destinations.iter().next())
    }

    /// Returns the destinations of `state` on `symbol` in ascending order. In contrast to
    /// [`Automaton::successors`], an undefined pair yields an empty vector.
    pub fn destinations(&self, state: &StateId, symbol: Symbol) -> Vec<&StateId> {
        self.successors(state, symbol)
            .map(|destinations| destinations.iter().collect())
            .unwrap_or_default()
    }

    /// Iterates over all transitions as triples of source, symbol and destination.
    pub fn edges(&self) -> impl Iterator<Item = (&StateId, Symbol, &StateId)> + '_ {
        self.transitions
            .iter()
            .flat_map(|((source, symbol), destinations)| {
                destinations.iter().map(move |d| (source, *symbol, d))
            })
    }

    /// The alphabet in ascending order.
    pub fn sorted_alphabet(&self) -> Vec<Symbol> {
        self.alphabet.iter().copied().collect()
    }

    /// The states in ascending order.
    pub fn sorted_states(&self) -> Vec<&StateId> {
        self.states.iter().collect()
    }

    /// The initial states in ascending order.
    pub fn sorted_initial(&self) -> Vec<&StateId> {
        self.initial_states.iter().collect()
    }

    /// The final states in ascending order.
    pub fn sorted_final(&self) -> Vec<&StateId> {
        self.final_states.iter().collect()
    }
}

impl Show for Automaton {
    fn show(&self) -> String {
        format!(
            "{} states, initial {}, final {}, transitions [{}]",
            self.size(),
            self.initial_states.show(),
            self.final_states.show(),
            self.edges()
                .map(|(p, a, q)| format!("{}-{}->{}", p.show(), a, q.show()))
                .join(", ")
        )
    }
}

/// Helper struct for assembling an [`Automaton`]. Everything that is handed to the builder is
/// only checked once [`AutomatonBuilder::build`] is called, which reports ill-formed input
/// instead of silently repairing it. In particular, states used by transitions are not
/// declared implicitly.
///
/// ```
/// use automaton_engine::prelude::*;
///
/// let err = Automaton::builder()
///     .with_alphabet(['a'])
///     .with_states([0])
///     .with_transitions([(0, 'a', 1)])
///     .build()
///     .unwrap_err();
/// assert_eq!(err, MalformedInput::UnknownState(StateId::from(1)).into());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    alphabet: Vec<Symbol>,
    states: Vec<StateId>,
    initial: Vec<StateId>,
    accepting: Vec<StateId>,
    transitions: Vec<(StateId, Symbol, StateId)>,
}

impl AutomatonBuilder {
    /// Adds the given symbols to the alphabet.
    pub fn with_alphabet<I: IntoIterator<Item = Symbol>>(mut self, symbols: I) -> Self {
        self.alphabet.extend(symbols);
        self
    }

    /// Declares the given states.
    pub fn with_states<Q: Into<StateId>, I: IntoIterator<Item = Q>>(mut self, states: I) -> Self {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Marks the given states as initial.
    pub fn with_initial<Q: Into<StateId>, I: IntoIterator<Item = Q>>(mut self, states: I) -> Self {
        self.initial.extend(states.into_iter().map(Into::into));
        self
    }

    /// Marks the given states as final.
    pub fn with_final<Q: Into<StateId>, I: IntoIterator<Item = Q>>(mut self, states: I) -> Self {
        self.accepting.extend(states.into_iter().map(Into::into));
        self
    }

    /// Adds transitions, given as triples of source, symbol and destination. Giving several
    /// triples with the same source and symbol makes the automaton nondeterministic.
    pub fn with_transitions<Q, I>(mut self, transitions: I) -> Self
    where
        Q: Into<StateId>,
        I: IntoIterator<Item = (Q, Symbol, Q)>,
    {
        self.transitions.extend(
            transitions
                .into_iter()
                .map(|(p, a, q)| (p.into(), a, q.into())),
        );
        self
    }

    /// Adds a single transition.
    pub fn with_transition<Q: Into<StateId>>(mut self, source: Q, symbol: Symbol, target: Q) -> Self {
        self.transitions.push((source.into(), symbol, target.into()));
        self
    }

    /// Consumes the builder and produces the automaton. Fails if a symbol is declared twice, if
    /// a state is declared, marked initial or marked final twice, or if the resulting automaton
    /// violates the invariants checked by [`Automaton::new`].
    pub fn build(self) -> Result<Automaton, AutomatonError> {
        fn distinct<T: Ord + std::fmt::Display>(
            items: Vec<T>,
        ) -> Result<OrderedSet<T>, MalformedInput> {
            let mut set = OrderedSet::new();
            for item in items {
                if set.contains(&item) {
                    return Err(MalformedInput::Duplicate(item.to_string()));
                }
                set.insert(item);
            }
            Ok(set)
        }

        let alphabet = distinct(self.alphabet)?;
        let states = distinct(self.states)?;
        let initial_states = distinct(self.initial)?;
        let final_states = distinct(self.accepting)?;

        let mut transitions = Transitions::new();
        for (source, symbol, target) in self.transitions {
            transitions
                .entry((source, symbol))
                .or_default()
                .insert(target);
        }

        Automaton::new(alphabet, states, transitions, initial_states, final_states)
    }
}
