//! Two line based formats are understood, both ignore blank lines and lines starting with `#`.
//!
//! The [`TextFormat::Counted`] format numbers everything. The first line gives the size `n` of
//! the alphabet, which then consists of the first `n` lowercase letters. The second line gives
//! the number `m` of states, which are named `0` to `m-1`. The third and fourth line list the
//! initial and the final states, each preceded by their number. The fifth line holds the
//! number of transitions, which follow one per line as `source symbol target`:
//! ```text
//! 2
//! 3
//! 1 0
//! 1 2
//! 4
//! 0 a 0
//! 0 b 0
//! 0 a 1
//! 1 b 2
//! ```
//! Transitions may also be written without spaces, e.g. `0a1`.
//!
//! The [`TextFormat::Listed`] format spells out the alphabet, the states, the initial and the
//! final states on the first four lines (a single `-` stands for the empty set), all further
//! lines are transitions:
//! ```text
//! a b
//! q0 q1
//! q0
//! q1
//! q0 a q1
//! q1 b q0
//! ```
//! It can represent any automaton whose state labels contain no whitespace, so it is also
//! the format in which [`to_listed`] writes automata.
use std::{io::Read, path::Path};

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    automaton::{Automaton, StateId, Symbol},
    error::{AutomatonError, MalformedInput},
};

/// Selects the text format, see the [module level documentation](self).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFormat {
    /// Counts followed by numbered states and transitions.
    #[default]
    Counted,
    /// Explicit lists of symbols and state labels.
    Listed,
}

impl std::str::FromStr for TextFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "counted" => Ok(TextFormat::Counted),
            "listed" => Ok(TextFormat::Listed),
            other => Err(format!("unknown text format `{other}`")),
        }
    }
}

/// Parses an automaton given in `format`. Parsing is all or nothing, the first problem that
/// is encountered is reported.
pub fn parse(input: &str, format: TextFormat) -> Result<Automaton, AutomatonError> {
    let aut = match format {
        TextFormat::Counted => parse_counted(input)?,
        TextFormat::Listed => parse_listed(input)?,
    };
    debug!(
        "parsed automaton with {} states and {} transitions",
        aut.size(),
        aut.transition_count()
    );
    Ok(aut)
}

/// Reads everything from `read` and parses it, see [`parse`].
pub fn from_reader<R: Read>(mut read: R, format: TextFormat) -> Result<Automaton, AutomatonError> {
    let mut input = String::new();
    read.read_to_string(&mut input)
        .map_err(|e| MalformedInput::Io(e.to_string()))?;
    parse(&input, format)
}

/// Loads an automaton from the file at `path`, see [`parse`].
pub fn from_path<P: AsRef<Path>>(path: P, format: TextFormat) -> Result<Automaton, AutomatonError> {
    let path = path.as_ref();
    trace!("reading automaton from {}", path.display());
    let input = std::fs::read_to_string(path)
        .map_err(|e| MalformedInput::Io(format!("{}: {e}", path.display())))?;
    parse(&input, format)
}

/// Largest number of states a [`TextFormat::Counted`] description may declare.
pub const MAX_DECLARED_STATES: usize = 1 << 16;

/// Writes `aut` in the [`TextFormat::Listed`] format. Fails with
/// [`MalformedInput::Unwritable`] if a state or symbol could not be read back, which is the
/// case for empty labels, labels containing whitespace, `-` and anything starting with `#`.
pub fn to_listed(aut: &Automaton) -> Result<String, MalformedInput> {
    fn token(text: String) -> Result<String, MalformedInput> {
        if text.is_empty()
            || text == "-"
            || text.starts_with('#')
            || text.contains(char::is_whitespace)
        {
            Err(MalformedInput::Unwritable(text))
        } else {
            Ok(text)
        }
    }

    fn set_line<I: Iterator<Item = String>>(items: I) -> Result<String, MalformedInput> {
        let line = items.map(token).collect::<Result<Vec<_>, _>>()?.join(" ");
        Ok(if line.is_empty() { "-".to_string() } else { line })
    }

    let mut out = String::new();
    out.push_str(&set_line(aut.alphabet().iter().map(|a| a.to_string()))?);
    out.push('\n');
    for states in [aut.states(), aut.initial_states(), aut.final_states()] {
        out.push_str(&set_line(states.iter().map(|q| q.to_string()))?);
        out.push('\n');
    }
    for (source, symbol, target) in aut.edges() {
        out.push_str(&format!("{source} {symbol} {target}\n"));
    }
    Ok(out)
}

/// Iterates over the relevant lines of the input together with their line number.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    position: usize,
}

impl<'a> Lines<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            inner: input.lines().enumerate(),
            position: 0,
        }
    }

    fn expect(&mut self, expected: &'static str) -> Result<(usize, &'a str), MalformedInput> {
        self.next().ok_or(MalformedInput::MissingLine {
            line: self.position + 1,
            expected,
        })
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        for (i, line) in self.inner.by_ref() {
            self.position = i + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            return Some((i + 1, line));
        }
        None
    }
}

fn number(line: usize, text: &str) -> Result<usize, MalformedInput> {
    text.parse().map_err(|_| MalformedInput::InvalidNumber {
        line,
        found: text.to_string(),
    })
}

fn symbol(line: usize, text: &str) -> Result<Symbol, MalformedInput> {
    match text.chars().exactly_one() {
        Ok(symbol) => Ok(symbol),
        Err(_) => Err(MalformedInput::MalformedSymbol {
            line,
            found: text.to_string(),
        }),
    }
}

/// Parses `source symbol target`, or the compact `<digits><symbol><digits>`.
fn transition(line: usize, text: &str) -> Result<(StateId, Symbol, StateId), MalformedInput> {
    let tokens = text.split_whitespace().collect_vec();
    match tokens.as_slice() {
        [source, a, target] => Ok((StateId::from(*source), symbol(line, a)?, StateId::from(*target))),
        [compact] => {
            let malformed = || MalformedInput::MalformedTransition {
                line,
                found: compact.to_string(),
            };
            let split = compact
                .find(|c: char| !c.is_ascii_digit())
                .filter(|&i| i > 0)
                .ok_or_else(malformed)?;
            let (source, rest) = compact.split_at(split);
            let mut rest = rest.chars();
            let a = rest.next().ok_or_else(malformed)?;
            let target = rest.as_str();
            if target.is_empty() || !target.chars().all(|c| c.is_ascii_digit()) {
                return Err(malformed());
            }
            Ok((StateId::from(source), a, StateId::from(target)))
        }
        _ => Err(MalformedInput::MalformedTransition {
            line,
            found: text.to_string(),
        }),
    }
}

/// Parses `<count> <ids>` and checks that the count matches.
fn counted_list(
    line: usize,
    text: &str,
    what: &'static str,
) -> Result<Vec<StateId>, MalformedInput> {
    let mut tokens = text.split_whitespace();
    let declared = number(line, tokens.next().unwrap_or_default())?;
    let ids = tokens.map(StateId::from).collect_vec();
    if ids.len() != declared {
        return Err(MalformedInput::CountMismatch {
            line,
            what,
            declared,
            listed: ids.len(),
        });
    }
    Ok(ids)
}

fn parse_counted(input: &str) -> Result<Automaton, AutomatonError> {
    let mut lines = Lines::new(input);

    let (line, text) = lines.expect("alphabet size")?;
    let size = number(line, text)?;
    if size > 26 {
        return Err(MalformedInput::AlphabetTooLarge { line, size }.into());
    }
    let (line, text) = lines.expect("number of states")?;
    let states = number(line, text)?;
    if states > MAX_DECLARED_STATES {
        return Err(MalformedInput::TooManyStates {
            line,
            declared: states,
            limit: MAX_DECLARED_STATES,
        }
        .into());
    }
    let (line, text) = lines.expect("initial states")?;
    let initial = counted_list(line, text, "initial states")?;
    let (line, text) = lines.expect("final states")?;
    let accepting = counted_list(line, text, "final states")?;
    let (count_line, text) = lines.expect("number of transitions")?;
    let declared = number(count_line, text)?;

    let transitions = lines
        .map(|(line, text)| transition(line, text))
        .collect::<Result<Vec<_>, _>>()?;
    if transitions.len() != declared {
        return Err(MalformedInput::CountMismatch {
            line: count_line,
            what: "transitions",
            declared,
            listed: transitions.len(),
        }
        .into());
    }

    Automaton::builder()
        .with_alphabet(('a'..='z').take(size))
        .with_states(0..states)
        .with_initial(initial)
        .with_final(accepting)
        .with_transitions(transitions)
        .build()
}

fn parse_listed(input: &str) -> Result<Automaton, AutomatonError> {
    fn tokens(text: &str) -> Vec<&str> {
        match text {
            "-" => vec![],
            _ => text.split_whitespace().collect(),
        }
    }

    let mut lines = Lines::new(input);

    let (line, text) = lines.expect("alphabet")?;
    let alphabet = tokens(text)
        .into_iter()
        .map(|token| symbol(line, token))
        .collect::<Result<Vec<_>, _>>()?;
    let (_, states) = lines.expect("states")?;
    let (_, initial) = lines.expect("initial states")?;
    let (_, accepting) = lines.expect("final states")?;

    let transitions = lines
        .map(|(line, text)| transition(line, text))
        .collect::<Result<Vec<_>, _>>()?;

    Automaton::builder()
        .with_alphabet(alphabet)
        .with_states(tokens(states))
        .with_initial(tokens(initial))
        .with_final(tokens(accepting))
        .with_transitions(transitions)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTED: &str = "# second to last symbol is an a
2
3
1 0
1 2
5
0a0
0b0
0a1
1 a 2
1 b 2
";

    #[test_log::test]
    fn counted_format() {
        let aut = parse(COUNTED, TextFormat::Counted).unwrap();
        assert_eq!(aut, crate::tests::second_to_last_a());
    }

    #[test_log::test]
    fn listed_format() {
        let input = "a b\n\nq0 q1\nq0\n-\nq0 a q1\nq1 b q0\n";
        let aut = parse(input, TextFormat::Listed).unwrap();
        assert_eq!(aut.size(), 2);
        assert!(aut.final_states().is_empty());
        assert_eq!(
            aut.destinations(&StateId::from("q1"), 'b'),
            vec![&StateId::from("q0")]
        );
    }

    #[test_log::test]
    fn listed_output_can_be_read_back() {
        let dfa = crate::tests::second_to_last_a().determinize().unwrap();
        let text = to_listed(&dfa).unwrap();
        assert!(text.starts_with("a b\n0 01 012 012P 01P 02 02P 0P\n0\n012 012P 02 02P\n"));
        assert_eq!(parse(&text, TextFormat::Listed).unwrap(), dfa);

        let empty = Automaton::builder().build().unwrap();
        assert_eq!(to_listed(&empty).unwrap(), "-\n-\n-\n-\n");
        assert_eq!(parse(&to_listed(&empty).unwrap(), TextFormat::Listed).unwrap(), empty);
    }

    #[test]
    fn counts_must_match() {
        let missing_transition = COUNTED.replace("1 b 2\n", "");
        assert_eq!(
            parse(&missing_transition, TextFormat::Counted),
            Err(MalformedInput::CountMismatch {
                line: 6,
                what: "transitions",
                declared: 5,
                listed: 4
            }
            .into())
        );

        let wrong_initial = COUNTED.replace("1 0\n", "2 0\n");
        assert_eq!(
            parse(&wrong_initial, TextFormat::Counted),
            Err(MalformedInput::CountMismatch {
                line: 4,
                what: "initial states",
                declared: 2,
                listed: 1
            }
            .into())
        );
    }

    #[test]
    fn structural_errors() {
        assert_eq!(
            parse("2\n3\n", TextFormat::Counted),
            Err(MalformedInput::MissingLine {
                line: 3,
                expected: "initial states"
            }
            .into())
        );
        assert_eq!(
            parse("two\n", TextFormat::Counted),
            Err(MalformedInput::InvalidNumber {
                line: 1,
                found: "two".to_string()
            }
            .into())
        );
        assert_eq!(
            parse("27\n", TextFormat::Counted),
            Err(MalformedInput::AlphabetTooLarge { line: 1, size: 27 }.into())
        );
        assert_eq!(
            parse("1\n2\n1 5\n0\n0\n", TextFormat::Counted),
            Err(MalformedInput::UnknownState(StateId::from(5)).into())
        );
        assert_eq!(
            parse("1\n2\n1 0\n0\n1\n0 b 1\n", TextFormat::Counted),
            Err(MalformedInput::UnknownSymbol('b').into())
        );
        assert_eq!(
            parse("1\n2\n1 0\n0\n1\n0-1\n", TextFormat::Counted),
            Err(MalformedInput::UnknownSymbol('-').into())
        );
        assert_eq!(
            parse("1\n2\n1 0\n0\n1\na01\n", TextFormat::Counted),
            Err(MalformedInput::MalformedTransition {
                line: 6,
                found: "a01".to_string()
            }
            .into())
        );
        assert_eq!(
            parse("ab c\nq\nq\n-\n", TextFormat::Listed),
            Err(MalformedInput::MalformedSymbol {
                line: 1,
                found: "ab".to_string()
            }
            .into())
        );
        assert_eq!(
            parse("a\nq q\nq\n-\n", TextFormat::Listed),
            Err(MalformedInput::Duplicate("q".to_string()).into())
        );
    }

    #[test]
    fn absurd_state_counts_are_rejected() {
        assert_eq!(
            parse("1\n18446744073709551615\n0\n0\n0\n", TextFormat::Counted),
            Err(MalformedInput::TooManyStates {
                line: 2,
                declared: usize::MAX,
                limit: MAX_DECLARED_STATES
            }
            .into())
        );
        let largest = format!("1\n{MAX_DECLARED_STATES}\n1 0\n0\n0\n");
        assert_eq!(
            parse(&largest, TextFormat::Counted).unwrap().size(),
            MAX_DECLARED_STATES
        );
    }

    #[test]
    fn labels_that_cannot_be_read_back_are_not_written() {
        for label in ["-", "#q", "a b", ""] {
            let aut = Automaton::builder()
                .with_alphabet(['a'])
                .with_states([label])
                .build()
                .unwrap();
            assert_eq!(
                to_listed(&aut),
                Err(MalformedInput::Unwritable(label.to_string()))
            );
        }
        let comment_symbol = Automaton::builder().with_alphabet(['#']).build().unwrap();
        assert_eq!(
            to_listed(&comment_symbol),
            Err(MalformedInput::Unwritable("#".to_string()))
        );

        let dashes = Automaton::builder()
            .with_alphabet(['a'])
            .with_states(["-1", "q-"])
            .with_initial(["-1"])
            .with_transitions([("-1", 'a', "q-")])
            .build()
            .unwrap();
        let text = to_listed(&dashes).unwrap();
        assert_eq!(parse(&text, TextFormat::Listed).unwrap(), dashes);
    }

    #[test]
    fn missing_file() {
        let err = from_path("/does/not/exist.txt", TextFormat::Counted).unwrap_err();
        assert!(matches!(
            err,
            AutomatonError::MalformedInput(MalformedInput::Io(_))
        ));
        assert_eq!("listed".parse::<TextFormat>(), Ok(TextFormat::Listed));
    }
}
