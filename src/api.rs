//! End-to-end pipelines built on the engine.

use crate::alphabet::{self, Key, Symbol};
use crate::analysis::{estimate_periods, PeriodScore};
use crate::cipher::{self, Operation};
use crate::config::Config;
use crate::error::{RfResult, RuneForgeError};
use crate::optimizer::{OptimizationOptions, Optimizer, ProgressCallback};
use crate::scorer::{ScoreDetails, Scorer};
use crate::stream::{self, Extraction};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub period: usize,
    pub operation: Operation,
    pub key: Key,
    pub key_text: String,
    pub fitness: f32,
    pub plaintext: String,
    pub rendered: String,
    pub words: Vec<String>,
    pub details: ScoreDetails,
    /// Period ranking the search was planned from (empty for fixed keys).
    pub ranking: Vec<PeriodScore>,
    pub seed: Option<u64>,
    pub runs: usize,
}

fn assemble(
    text: &str,
    extraction: &Extraction,
    key: Key,
    operation: Operation,
    scorer: &Scorer,
) -> RfResult<Solution> {
    let plain = cipher::transform(&extraction.symbols, &key, operation)?;
    let details = scorer.score_details(&plain);

    Ok(Solution {
        period: key.len(),
        operation,
        key_text: alphabet::decode(&key),
        key,
        fitness: details.total,
        plaintext: alphabet::decode(&plain),
        rendered: extraction.render(text, &plain)?,
        words: extraction.words(&plain)?,
        details,
        ranking: Vec::new(),
        seed: None,
        runs: 0,
    })
}

/// Extract, rank periods, seed and search every (period x operation)
/// configuration in parallel, and keep the fittest key. A configured
/// `initial_key` replaces period ranking and seeding.
///
/// Returns `Ok(None)` when the document holds too few symbols to analyse.
pub fn crack<CB: ProgressCallback + ?Sized>(
    text: &str,
    config: &Config,
    scorer: Arc<Scorer>,
    callback: &CB,
) -> RfResult<Option<Solution>> {
    config.search.validate()?;
    let operations = config.analysis.get_operations()?;
    let expected = config.analysis.get_expected_symbol()?;

    let extraction = stream::extract_document(text);
    if extraction.is_empty() {
        warn!("No alphabet symbols found in input");
        return Ok(None);
    }

    let ranking = estimate_periods(&extraction.symbols, config.analysis.max_period);
    let seed = config.search.seed.unwrap_or_else(|| fastrand::u64(..));
    let optimizer = Optimizer::new(scorer.clone(), OptimizationOptions::from(config));

    let jobs = match config.analysis.get_initial_key()? {
        Some(guess) => {
            info!(
                "🔑 {} symbols, starting from key guess {} (period {}), operations {:?}",
                extraction.len(),
                alphabet::decode(&guess),
                guess.len(),
                operations
            );
            optimizer.plan_guess_jobs(&guess, &operations, seed)
        }
        None => {
            if ranking.is_empty() {
                warn!(
                    "Stream of {} symbols is too short for period analysis",
                    extraction.len()
                );
                return Ok(None);
            }
            let periods: Vec<usize> = ranking
                .iter()
                .take(config.analysis.top_periods.max(1))
                .map(|p| p.period)
                .collect();
            info!(
                "🔎 {} symbols, candidate periods {:?}, operations {:?}",
                extraction.len(),
                periods,
                operations
            );
            optimizer.plan_jobs(&extraction.symbols, &periods, &operations, expected, seed)?
        }
    };

    let best = optimizer
        .run_best(&extraction.symbols, &jobs, callback)?
        .ok_or_else(|| RuneForgeError::Validation("No search jobs were planned".to_string()))?;

    info!(
        "🏆 Best: period {} ({}) fitness {:.2}",
        best.period, best.operation, best.outcome.fitness
    );

    let mut solution = assemble(text, &extraction, best.outcome.key, best.operation, &scorer)?;
    solution.ranking = ranking;
    solution.seed = Some(seed);
    solution.runs = jobs.len();
    Ok(Some(solution))
}

/// Applies a fixed key (the keyword-guess configuration) without searching.
pub fn decrypt_with_key(
    text: &str,
    key: &[Symbol],
    operation: Operation,
    scorer: &Scorer,
) -> RfResult<Solution> {
    if key.is_empty() {
        return Err(RuneForgeError::EmptyKey);
    }
    let extraction = stream::extract_document(text);
    assemble(text, &extraction, key.to_vec(), operation, scorer)
}
