use std::process::ExitCode;

use automaton_engine::prelude::*;

use tracing::{debug, error, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

fn cli() -> clap::Command {
    Command::new("fsa")
    .about("Completes, determinizes, standardizes, minimizes and complements finite automata")
    .subcommand_required(true)
    .arg(
        Arg::new("file")
        .required(true)
        .help("file containing the automaton")
    )
    .arg(
        Arg::new("format")
        .short('f')
        .long("format")
        .value_parser(["counted", "listed"])
        .default_value("counted")
    )
    .arg(
        Arg::new("verbosity")
        .short('v')
        .long("verbosity")
        .num_args(0..=1)
        .require_equals(true)
        .value_parser(["info", "debug", "trace"])
        .default_missing_value("info")
    )
    .arg(
        Arg::new("sink")
        .long("sink")
        .help("label of the sink state added by completion")
        .default_value("P")
    )
    .arg(
        Arg::new("initial")
        .long("initial")
        .help("label of the initial state added by standardization")
        .default_value("I")
    )
    .arg(
        Arg::new("labels")
        .long("labels")
        .help("naming scheme for the states of the subset construction")
        .value_parser(["concatenate", "braced", "interned"])
        .default_value("concatenate")
    )
    .arg(
        Arg::new("max-states")
        .long("max-states")
        .help("abort determinization once it produces more states")
        .value_parser(clap::value_parser!(usize))
    )
    .arg(
        Arg::new("no-color")
        .long("no-color")
        .action(ArgAction::SetTrue)
    )
    .arg(
        Arg::new("output")
        .short('o')
        .long("output")
        .help("write the resulting automaton to this file in the listed format")
    )
    .subcommand(
        Command::new("show")
        .about("prints the automaton and its properties")
    )
    .subcommand(
        Command::new("complete")
        .about("adds a sink state so that every transition is defined")
    )
    .subcommand(
        Command::new("determinize")
        .about("applies the subset construction")
    )
    .subcommand(
        Command::new("standardize")
        .about("ensures a single initial state without incoming transitions")
    )
    .subcommand(
        Command::new("minimize")
        .about("computes the minimal deterministic automaton, determinizing first if needed")
    )
    .subcommand(
        Command::new("complement")
        .about("computes the complement, determinizing first if needed")
    )
    .subcommand(
        Command::new("pipeline")
        .about("completes, determinizes, minimizes and standardizes, printing every stage")
    )
    .subcommand(
        Command::new("accepts")
        .about("checks which of the given words are accepted")
        .arg(Arg::new("words").num_args(1..).required(true))
    )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn options(matches: &ArgMatches) -> Options {
    let get = |id: &str| matches.get_one::<String>(id).cloned().unwrap_or_default();

    let mut options = Options::default()
        .with_sink_label(get("sink"))
        .with_initial_label(get("initial"))
        .with_labels(get("labels").parse().unwrap_or_default());
    if let Some(&limit) = matches.get_one::<usize>("max-states") {
        options = options.with_max_states(limit);
    }
    options
}

fn present(title: &str, aut: &Automaton, style: &TableStyle) {
    println!("=== {title} ===");
    println!("{}", summary(aut));
    println!("{}", transition_table(aut, style));
}

fn deterministic(aut: &Automaton, options: &Options) -> Result<Automaton, AutomatonError> {
    if aut.is_deterministic() {
        Ok(aut.clone())
    } else {
        info!("automaton is not deterministic, determinizing first");
        aut.determinize_with(options)
    }
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let file = matches
        .get_one::<String>("file")
        .ok_or("missing input file")?;
    let format: TextFormat = matches
        .get_one::<String>("format")
        .map(|f| f.parse())
        .transpose()?
        .unwrap_or_default();
    let style = TableStyle {
        colored: !matches.get_flag("no-color"),
    };
    let options = options(matches);
    debug!("running with {options:?}");

    let aut = text::from_path(file, format)?;
    debug!("read automaton with {} states from {file}", aut.size());

    let result = match matches.subcommand() {
        Some(("show", _)) => aut,
        Some(("complete", _)) => aut.complete_with(&options)?,
        Some(("determinize", _)) => aut.determinize_with(&options)?,
        Some(("standardize", _)) => aut.standardize_with(&options)?,
        Some(("minimize", _)) => deterministic(&aut, &options)?.minimize()?,
        Some(("complement", _)) => deterministic(&aut, &options)?.complement()?,
        Some(("pipeline", _)) => {
            present("input", &aut, &style);
            let completed = aut.complete_with(&options)?;
            present("completed", &completed, &style);
            let determinized = completed.determinize_with(&options)?;
            present("determinized", &determinized, &style);
            let minimized = determinized.minimize()?;
            present("minimized", &minimized, &style);
            minimized.standardize_with(&options)?
        }
        Some(("accepts", sub_matches)) => {
            for word in sub_matches.get_many::<String>("words").into_iter().flatten() {
                println!("{word:?}: {}", aut.accepts(word).show());
            }
            return Ok(());
        }
        _ => unreachable!(),
    };

    let title = matches.subcommand_name().unwrap_or("result");
    present(title, &result, &style);

    if let Some(path) = matches.get_one::<String>("output") {
        std::fs::write(path, text::to_listed(&result)?)?;
        info!("wrote resulting automaton to {path}");
    }
    Ok(())
}

pub fn main() -> ExitCode {
    let matches = cli().get_matches();

    setup_logging(&matches);

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn flags_end_up_in_options() {
        let matches = cli().get_matches_from([
            "fsa",
            "automaton.txt",
            "--sink",
            "trap",
            "--labels",
            "braced",
            "--max-states",
            "12",
            "minimize",
        ]);
        let options = options(&matches);
        assert_eq!(options.sink_label, StateId::from("trap"));
        assert_eq!(options.initial_label, StateId::from("I"));
        assert_eq!(options.labels, LabelStrategy::Braced);
        assert_eq!(options.max_states, Some(12));
        assert_eq!(matches.subcommand_name(), Some("minimize"));
    }
}
