//! Library for transforming finite automata over a finite alphabet.
//!
//! An [`Automaton`] is an immutable value consisting of an alphabet, a set of states, a
//! transition relation mapping pairs of state and symbol to sets of successor states, as well
//! as sets of initial and final states. It may be nondeterministic (several successors for one
//! pair, several initial states) and incomplete (pairs without any successor).
//!
//! On top of this, the crate implements the classical pipeline used when working with finite
//! automata by hand:
//! - the structural predicates [`Automaton::is_complete`], [`Automaton::is_deterministic`] and
//!   [`Automaton::is_standard`],
//! - completion through a sink state ([`Automaton::complete`]),
//! - determinization via the subset construction ([`Automaton::determinize`]),
//! - standardization, which ensures a single initial state without incoming edges
//!   ([`Automaton::standardize`]),
//! - minimization by partition refinement ([`Automaton::minimize`]) and
//! - complementation ([`Automaton::complement`]).
//!
//! Every transformation borrows its input and returns a freshly built automaton, so a caller
//! holding on to the original never observes it changing. Operations that need to invent new
//! state names (sink state, fresh initial state, composite states of the subset construction)
//! can be configured through [`Options`], see also the [`label`] module.
//!
//! Automata are usually obtained from one of the two text formats in [`text`] and presented
//! through the tables built in [`table`].
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automaton_engine::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{Automaton, AutomatonBuilder, StateId, Symbol},
        error::{AutomatonError, MalformedInput},
        label::{LabelStrategy, StateLabeler},
        math,
        options::Options,
        table::{summary, transition_table, TableStyle},
        text::{self, TextFormat},
        Show,
    };
}

/// This module contains the set, map and partition types that are used throughout the crate.
pub mod math;

/// Defines the [`Automaton`] itself together with all operations on it.
pub mod automaton;
pub use automaton::{Automaton, AutomatonBuilder, StateId, Symbol};

/// Errors that can be produced when building, loading or transforming automata.
pub mod error;

/// Strategies for naming the states that transformations synthesize.
pub mod label;

/// Configuration of the transformations.
pub mod options;
pub use options::Options;

/// Reading and writing automata in a simple line based text format.
pub mod text;

/// Rendering automata as human readable tables.
pub mod table;

use itertools::Itertools;

/// Helper trait which can be used to display states, symbols and collections thereof.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state that is simply its label
    /// and for a symbol it is the symbol itself.
    fn show(&self) -> String;
    /// Show a collection of the thing, for a collection of states this should be {q0, q1, q2, ...}.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("{{{}}}", iter.into_iter().map(|x| x.show()).join(", "))
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "yes",
            false => "no",
        }
        .to_string()
    }
}

impl<S: Show> Show for std::collections::BTreeSet<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}
