use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use env_logger::{Builder, Env};
use log::{error, info, LevelFilter};
use serde::Serialize;

use two_opt_tsp::config::{Config, ImprovementPolicy};
use two_opt_tsp::construction::BuilderMethod;
use two_opt_tsp::local_search::{EngineEvent, RunOutcome};
use two_opt_tsp::problem::{City, CitySet};
use two_opt_tsp::session::Session;
use two_opt_tsp::utils::format_distance;
use two_opt_tsp::Result;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Nearest,
    Random,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    First,
    Best,
}

/// Improve a TSP tour with 2-Opt local search.
#[derive(Debug, Parser)]
#[command(name = "two-opt", version)]
struct Cli {
    /// JSON file with an array of `{"name", "x", "y"}` cities; the sample set
    /// is used when omitted
    #[arg(long)]
    cities: Option<PathBuf>,
    /// JSON configuration file; command-line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    method: Option<Method>,
    /// Start city for nearest-neighbor construction
    #[arg(long)]
    start: Option<usize>,
    /// Seed for random construction
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum)]
    policy: Option<Policy>,
    #[arg(long)]
    epsilon: Option<f64>,
    #[arg(long)]
    max_passes: Option<usize>,
    /// Log every event while running pass by pass
    #[arg(long)]
    step: bool,
    /// Write the final tour and statistics as JSON
    #[arg(long)]
    output: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn build_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::new(),
        };

        let method = match self.method {
            Some(method) => Some(method),
            None if self.seed.is_some() => Some(Method::Random),
            None if self.start.is_some() => Some(Method::Nearest),
            None => None,
        };
        match method {
            Some(Method::Nearest) => {
                config.builder = BuilderMethod::NearestNeighbor {
                    start: self.start.unwrap_or(0),
                }
            }
            Some(Method::Random) => config.builder = BuilderMethod::Random { seed: self.seed },
            None => {}
        }

        if let Some(policy) = self.policy {
            config.policy = match policy {
                Policy::First => ImprovementPolicy::FirstImprovement,
                Policy::Best => ImprovementPolicy::BestImprovement,
            };
        }
        if let Some(epsilon) = self.epsilon {
            config.epsilon = epsilon;
        }
        if let Some(max_passes) = self.max_passes {
            config.max_passes = max_passes;
        }

        Ok(config)
    }

    fn load_cities(&self) -> Result<CitySet> {
        match &self.cities {
            Some(path) => {
                let contents = fs::read_to_string(path)?;
                let cities: Vec<City> = serde_json::from_str(&contents)?;
                Ok(CitySet::from(cities))
            }
            None => Ok(CitySet::sample()),
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    cities: &'a [City],
    config: &'a Config,
    outcome: &'a RunOutcome,
}

fn init_logger(level: LevelFilter) {
    Builder::from_env(Env::default().default_filter_or(level.to_string()))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.build_config()?;
    let cities = cli.load_cities()?;
    info!("loaded {} cities", cities.len());

    let mut session = Session::with_cities(cities, config);

    let outcome = if cli.step {
        session.start()?;
        loop {
            let events = session.step()?;
            if events.is_empty() {
                break;
            }
            for event in &events {
                log_event(event);
            }
        }
        session
            .last_outcome()
            .ok_or(two_opt_tsp::Error::NotRunning)?
    } else {
        session.run()?
    };

    let names: Vec<&str> = outcome
        .tour
        .as_slice()
        .iter()
        .filter_map(|&i| session.cities().get(i).map(|city| city.name.as_str()))
        .collect();
    println!("Tour: {}", names.join(" -> "));
    println!("Length: {}", format_distance(outcome.length));
    println!("{}", outcome.statistics.format());

    if let Some(path) = &cli.output {
        let report = Report {
            cities: session.cities().as_slice(),
            config: session.config(),
            outcome: &outcome,
        };
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        info!("wrote report to {}", path.display());
    }

    Ok(())
}

fn log_event(event: &EngineEvent) {
    match event {
        EngineEvent::SwapApplied(swap) => info!(
            "swap at positions {:?}: removed {:?} {:?}, added {:?} {:?}, improved by {:.2}",
            swap.positions,
            swap.edge_removed_1,
            swap.edge_removed_2,
            swap.edge_added_1,
            swap.edge_added_2,
            -swap.delta
        ),
        EngineEvent::PassCompleted { improving } => {
            log::debug!("pass completed, improving: {improving}")
        }
        EngineEvent::RunFinished { statistics, .. } => info!(
            "finished after {} passes and {} swaps",
            statistics.iterations, statistics.swaps
        ),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.log_level());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
