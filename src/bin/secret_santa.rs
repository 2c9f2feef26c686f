use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use secret_santa::{random_pairings, Error, ExclusionGraph, Pairing, Solver, SolverConfig};
use std::collections::BTreeMap;
use std::process::ExitCode;

/// Used when no participants are given on the command line.
const DEFAULT_GROUP: [&str; 5] = ["Charlie", "Karen", "Anne", "Bob:Sam", "Sam:Bob"];

fn make_parser() -> Command {
    Command::new("secret-santa")
        .about("Draw secret santa pairings, optionally keeping some people apart")
        .arg(
            Arg::new("participants")
                .value_name("NAME[:EXCLUDED,...]")
                .help("A participant, optionally followed by the people they must not draw")
                .num_args(0..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for reproducible draws")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("max-steps")
                .long("max-steps")
                .help("Give up after this many search steps")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("random")
                .long("random")
                .help("Ignore exclusions and draw a plain random cycle")
                .action(ArgAction::SetTrue),
        )
}

/// Splits `Name:Excluded1,Excluded2` into the participant list and the
/// exclusion map. Entries with a blank name are skipped.
fn parse_participants<'a, I>(specs: I) -> (Vec<String>, BTreeMap<String, Vec<String>>)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut participants = Vec::new();
    let mut exclusions = BTreeMap::new();
    for spec in specs {
        let (name, excluded) = match spec.split_once(':') {
            Some((name, rest)) => (name.trim(), rest),
            None => (spec.trim(), ""),
        };
        if name.is_empty() {
            continue;
        }
        let excluded: Vec<String> = excluded
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
        participants.push(name.to_owned());
        if !excluded.is_empty() {
            exclusions.insert(name.to_owned(), excluded);
        }
    }
    (participants, exclusions)
}

fn draw(matches: &ArgMatches) -> secret_santa::Result<Vec<Pairing<String>>> {
    let specs: Vec<&str> = matches
        .get_many::<String>("participants")
        .map(|values| values.map(String::as_str).collect())
        .unwrap_or_else(|| DEFAULT_GROUP.to_vec());
    let (participants, exclusions) = parse_participants(specs);
    let seed = matches.get_one::<u64>("seed").copied();

    if matches.get_flag("random") {
        let mut rng = match seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        return random_pairings(&participants, &mut rng);
    }

    let mut config = SolverConfig::new();
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(&max_steps) = matches.get_one::<u64>("max-steps") {
        config = config.with_max_steps(max_steps);
    }
    debug!("solver configuration: {:?}", config);

    let graph = ExclusionGraph::from_exclusions(&participants, &exclusions)?;
    Solver::new(config).solve(&graph)
}

fn main() -> ExitCode {
    if std::env::var("SANTA_LOG").is_ok() {
        let e = env_logger::Env::new()
            .filter("SANTA_LOG")
            .write_style("SANTA_LOG_STYLE");
        env_logger::init_from_env(e);
    }

    let matches = make_parser().get_matches();

    match draw(&matches) {
        Ok(pairs) => {
            println!("Pairings:");
            for pair in &pairs {
                println!("  {pair}");
            }
            ExitCode::SUCCESS
        }
        Err(err @ Error::Infeasible) => {
            eprintln!("*** No valid assignment: {err} ***");
            ExitCode::from(2)
        }
        Err(err @ Error::StepBudgetExhausted { .. }) => {
            eprintln!("*** {err} ***");
            ExitCode::from(3)
        }
        Err(err) => {
            eprintln!("invalid participants: {err}");
            ExitCode::from(1)
        }
    }
}
