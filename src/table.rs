use itertools::Itertools;
use owo_colors::OwoColorize;

use crate::{automaton::Automaton, Show};

/// Controls how [`transition_table`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStyle {
    /// Highlight header and the markers of initial and final states with ANSI colors.
    pub colored: bool,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self { colored: true }
    }
}

impl TableStyle {
    /// A style without any ANSI escape codes, suitable for files and tests.
    pub fn plain() -> Self {
        Self { colored: false }
    }
}

/// Returns a string representation of the transition table of `aut`. There is one column per
/// symbol and one row per state, both in ascending order. Initial states are marked with a
/// leading `->`, final states with a trailing `<-`. A cell lists the destinations of the pair
/// separated by commas, or `-` if there is no transition.
pub fn transition_table(aut: &Automaton, style: &TableStyle) -> String {
    let mut builder = tabled::builder::Builder::default();
    builder.push_record(
        std::iter::once("State".to_string())
            .chain(aut.alphabet().iter().map(|a| a.to_string()))
            .map(|header| {
                if style.colored {
                    header.bold().to_string()
                } else {
                    header
                }
            }),
    );

    for q in aut.states() {
        let (incoming, outgoing) = match style.colored {
            true => ("->".green().to_string(), "<-".red().to_string()),
            false => ("->".to_string(), "<-".to_string()),
        };
        let mut row = vec![format!(
            "{}{}{}",
            if aut.is_initial(q) { incoming + " " } else { String::new() },
            q.show(),
            if aut.is_final(q) { " ".to_string() + &outgoing } else { String::new() },
        )];
        for &a in aut.alphabet() {
            let destinations = aut.destinations(q, a);
            if destinations.is_empty() {
                row.push("-".to_string());
            } else {
                row.push(destinations.into_iter().map(|d| d.show()).join(","));
            }
        }
        builder.push_record(row);
    }

    builder
        .build()
        .with(tabled::settings::Style::rounded())
        .to_string()
}

/// Describes `aut` in a few lines: its alphabet, states, initial and final states and
/// whether it is deterministic, complete and standard.
pub fn summary(aut: &Automaton) -> String {
    [
        format!("Alphabet: {}", aut.sorted_alphabet().iter().join(" ")),
        format!("States: {}", aut.sorted_states().iter().join(" ")),
        format!("Initial states: {}", aut.sorted_initial().iter().join(" ")),
        format!("Final states: {}", aut.sorted_final().iter().join(" ")),
        format!("Deterministic: {}", aut.is_deterministic().show()),
        format!("Complete: {}", aut.is_complete().show()),
        format!("Standard: {}", aut.is_standard().show()),
    ]
    .join("\n")
}

impl std::fmt::Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", transition_table(self, &TableStyle::plain()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn plain_table() {
        let nfa = crate::tests::second_to_last_a();
        let table = transition_table(&nfa, &TableStyle::plain());
        let rows = table.lines().collect::<Vec<_>>();

        assert_eq!(rows.len(), 7);
        assert!(rows[1].contains("State"));
        assert!(rows[3].contains("-> 0"));
        assert!(rows[3].contains("0,1"));
        assert!(rows[5].contains("2 <-"));
        assert_eq!(rows[5].matches(" - ").count(), 2);
        assert!(!table.contains('\u{1b}'));
        assert_eq!(nfa.to_string(), table);
    }

    #[test]
    fn colored_table_uses_escape_codes() {
        let dfa = crate::tests::ends_with_a();
        let table = transition_table(&dfa, &TableStyle::default());
        assert!(table.contains('\u{1b}'));
    }

    #[test]
    fn summary_lists_properties() {
        let dfa = crate::tests::ends_with_a();
        assert_eq!(
            summary(&dfa),
            "Alphabet: a b\nStates: 0 1\nInitial states: 0\nFinal states: 1\n\
             Deterministic: yes\nComplete: yes\nStandard: no"
        );
    }
}
