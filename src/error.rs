use thiserror::Error;

use crate::automaton::{StateId, Symbol};

/// The ways in which a description of an automaton can be structurally invalid. Errors that
/// stem from a text file carry the (1-based) line on which they were detected.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[allow(missing_docs)]
pub enum MalformedInput {
    #[error("input ended before line {line} ({expected})")]
    MissingLine { line: usize, expected: &'static str },
    #[error("line {line}: expected a non-negative number but found `{found}`")]
    InvalidNumber { line: usize, found: String },
    #[error("line {line}: declared {declared} {what} but listed {listed}")]
    CountMismatch {
        line: usize,
        what: &'static str,
        declared: usize,
        listed: usize,
    },
    #[error("line {line}: alphabet of size {size} is not supported, at most 26 symbols are")]
    AlphabetTooLarge { line: usize, size: usize },
    #[error("line {line}: {declared} states are declared, at most {limit} are supported")]
    TooManyStates {
        line: usize,
        declared: usize,
        limit: usize,
    },
    #[error("line {line}: malformed transition `{found}`")]
    MalformedTransition { line: usize, found: String },
    #[error("line {line}: malformed symbol `{found}`, symbols are single characters")]
    MalformedSymbol { line: usize, found: String },
    #[error("state `{0}` is used but was never declared")]
    UnknownState(StateId),
    #[error("symbol `{0}` is not part of the alphabet")]
    UnknownSymbol(Symbol),
    #[error("transition on ({0}, {1}) has no destination")]
    EmptyDestination(StateId, Symbol),
    #[error("`{0}` is declared more than once")]
    Duplicate(String),
    #[error("`{0}` cannot be written as a token of the listed format")]
    Unwritable(String),
    #[error("could not read input: {0}")]
    Io(String),
}

/// Errors produced by the operations on automata. Every error is local to the call that
/// produced it, repeating the call with the same input yields the same error.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AutomatonError {
    /// The description of an automaton violates its structural invariants.
    #[error("malformed automaton: {0}")]
    MalformedInput(#[from] MalformedInput),
    /// An operation was invoked on an automaton that does not satisfy its precondition.
    #[error("cannot {operation}: automaton {requirement}")]
    Precondition {
        /// Name of the rejected operation.
        operation: &'static str,
        /// The property the automaton is lacking, phrased as `must ...`.
        requirement: &'static str,
    },
    /// A state that should be synthesized would reuse the label of an existing state.
    #[error("cannot introduce {purpose} `{label}`, a state with this label already exists")]
    NameCollision {
        /// The colliding label.
        label: StateId,
        /// What the state was going to be used for.
        purpose: &'static str,
    },
    /// Determinization discovered more composite states than allowed.
    #[error("determinization exceeded the limit of {limit} states")]
    ResourceLimit {
        /// The configured maximum number of states.
        limit: usize,
    },
}

impl AutomatonError {
    pub(crate) fn precondition(operation: &'static str, requirement: &'static str) -> Self {
        Self::Precondition {
            operation,
            requirement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = AutomatonError::precondition("minimize", "must be deterministic and complete");
        assert_eq!(
            err.to_string(),
            "cannot minimize: automaton must be deterministic and complete"
        );

        let err: AutomatonError = MalformedInput::UnknownSymbol('z').into();
        assert_eq!(
            err.to_string(),
            "malformed automaton: symbol `z` is not part of the alphabet"
        );

        let err = MalformedInput::AlphabetTooLarge { line: 1, size: 30 };
        assert_eq!(
            err.to_string(),
            "line 1: alphabet of size 30 is not supported, at most 26 symbols are"
        );
    }
}
