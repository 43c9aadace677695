//! Basic example of stepping through a 2-Opt run.

use two_opt_tsp::config::Config;
use two_opt_tsp::construction::BuilderMethod;
use two_opt_tsp::local_search::EngineEvent;
use two_opt_tsp::session::Session;
use two_opt_tsp::utils::format_distance;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use a random start so there is something to improve
    let config = Config::new().with_builder(BuilderMethod::Random { seed: Some(42) });

    let mut session = Session::new(config);
    session.load_sample_set()?;
    println!("Loaded {} sample cities", session.cities().len());

    session.start()?;

    // Render between swaps the way a front end would
    loop {
        let events = session.step()?;
        if events.is_empty() {
            break;
        }

        for event in events {
            match event {
                EngineEvent::SwapApplied(swap) => println!(
                    "Swap at positions {:?}: improved by {}, tour {:?}",
                    swap.positions,
                    format_distance(-swap.delta),
                    swap.tour_snapshot.as_slice()
                ),
                EngineEvent::PassCompleted { improving: false } => {
                    println!("No more improvements possible")
                }
                EngineEvent::PassCompleted { improving: true } => {}
                EngineEvent::RunFinished { statistics, .. } => {
                    println!("{}", statistics.format())
                }
            }
        }
    }

    if let Some(outcome) = session.last_outcome() {
        let names: Vec<&str> = outcome
            .tour
            .as_slice()
            .iter()
            .filter_map(|&i| session.cities().get(i).map(|city| city.name.as_str()))
            .collect();
        println!("Final tour: {}", names.join(" -> "));
        println!("Final distance: {}", format_distance(outcome.length));
    }

    Ok(())
}
