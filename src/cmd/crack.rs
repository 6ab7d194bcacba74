use crate::cmd::read_input;
use crate::reports;
use clap::Args;
use runeforge::alphabet::{self, Symbol};
use runeforge::api;
use runeforge::config::Config;
use runeforge::optimizer::ProgressCallback;
use runeforge::scorer::Scorer;
use runeforge::RfResult;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Args, Debug, Clone)]
pub struct CrackArgs {
    #[command(flatten)]
    pub config: Config,

    /// Document to attack (`-` for stdin)
    pub input: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// Logs each time any run beats the best fitness seen so far.
struct BestTracker {
    best: Mutex<f32>,
}

impl ProgressCallback for BestTracker {
    fn on_progress(&self, iteration: usize, best_fitness: f32, best_key: &[Symbol]) -> bool {
        if let Ok(mut best) = self.best.lock() {
            if best_fitness > *best {
                *best = best_fitness;
                debug!(
                    "iter {:>6} | best {:>9.2} | key {}",
                    iteration,
                    best_fitness,
                    alphabet::decode(best_key)
                );
            }
        }
        true
    }
}

pub fn run(args: CrackArgs, config: &Config, scorer: Arc<Scorer>) -> RfResult<()> {
    let text = read_input(&args.input)?;
    let tracker = BestTracker {
        best: Mutex::new(f32::NEG_INFINITY),
    };

    let Some(solution) = api::crack(&text, config, scorer, &tracker)? else {
        println!("Nothing to attack: the input holds too few alphabet symbols.");
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
        return Ok(());
    }

    reports::print_period_table(&solution.ranking, config.analysis.top_periods);
    reports::print_solution(&solution);
    Ok(())
}
