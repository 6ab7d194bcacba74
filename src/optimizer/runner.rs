use crate::alphabet::{Key, Symbol};
use crate::analysis::seed_key;
use crate::cipher::Operation;
use crate::config::Config;
use crate::error::{RfResult, RuneForgeError};
use crate::optimizer::{mutation, search, ProgressCallback, SearchOptions, SearchOutcome};
use crate::scorer::Scorer;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub struct OptimizationOptions {
    /// 0 runs on rayon's global pool.
    pub num_threads: usize,
    pub runs_per_config: usize,
    pub search: SearchOptions,
}

impl From<&Config> for OptimizationOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            num_threads: cfg.search.threads,
            runs_per_config: cfg.search.runs_per_config.max(1),
            search: SearchOptions::from(&cfg.search),
        }
    }
}

/// One independent search run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchJob {
    pub period: usize,
    pub operation: Operation,
    pub initial_key: Key,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub job_index: usize,
    pub period: usize,
    pub operation: Operation,
    pub outcome: SearchOutcome,
}

pub struct Optimizer {
    scorer: Arc<Scorer>,
    options: OptimizationOptions,
}

impl Optimizer {
    pub fn new(scorer: Arc<Scorer>, options: OptimizationOptions) -> Self {
        Self { scorer, options }
    }

    /// Expands (period x operation) into `runs_per_config` jobs each. The
    /// first run of a configuration starts from the frequency seed, the rest
    /// from random keys.
    pub fn plan_jobs(
        &self,
        cipher: &[Symbol],
        periods: &[usize],
        operations: &[Operation],
        expected: Symbol,
        base_seed: u64,
    ) -> RfResult<Vec<SearchJob>> {
        let mut jobs = Vec::new();
        let mut rng = fastrand::Rng::with_seed(base_seed);

        for &period in periods {
            for &operation in operations {
                for run in 0..self.options.runs_per_config {
                    let initial_key = if run == 0 {
                        seed_key(cipher, period, operation, expected)?
                    } else {
                        mutation::random_key(period, &mut rng)
                    };
                    jobs.push(SearchJob {
                        period,
                        operation,
                        initial_key,
                        seed: base_seed.wrapping_add(jobs.len() as u64),
                    });
                }
            }
        }

        debug!(
            "Planned {} jobs ({} periods x {} operations x {} runs)",
            jobs.len(),
            periods.len(),
            operations.len(),
            self.options.runs_per_config
        );
        Ok(jobs)
    }

    /// Jobs for a caller-supplied key: its length is the only period, run 0
    /// starts from the key itself and the rest from random keys.
    pub fn plan_guess_jobs(
        &self,
        guess: &[Symbol],
        operations: &[Operation],
        base_seed: u64,
    ) -> Vec<SearchJob> {
        let mut jobs = Vec::new();
        let mut rng = fastrand::Rng::with_seed(base_seed);

        for &operation in operations {
            for run in 0..self.options.runs_per_config {
                let initial_key = if run == 0 {
                    guess.to_vec()
                } else {
                    mutation::random_key(guess.len(), &mut rng)
                };
                jobs.push(SearchJob {
                    period: guess.len(),
                    operation,
                    initial_key,
                    seed: base_seed.wrapping_add(jobs.len() as u64),
                });
            }
        }
        jobs
    }

    /// Runs every job in parallel. Results keep job order.
    pub fn run_all<CB: ProgressCallback + ?Sized>(
        &self,
        cipher: &[Symbol],
        jobs: &[SearchJob],
        callback: &CB,
    ) -> RfResult<Vec<JobResult>> {
        let start = Instant::now();
        let run = || {
            jobs.par_iter()
                .enumerate()
                .map(|(job_index, job)| {
                    let outcome = search(
                        &self.scorer,
                        cipher,
                        &job.initial_key,
                        job.operation,
                        &self.options.search,
                        job.seed,
                        callback,
                    )?;
                    Ok(JobResult {
                        job_index,
                        period: job.period,
                        operation: job.operation,
                        outcome,
                    })
                })
                .collect::<RfResult<Vec<_>>>()
        };

        let results = if self.options.num_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.num_threads)
                .build()
                .map_err(|e| RuneForgeError::Config(format!("Thread pool: {}", e)))?;
            pool.install(run)?
        } else {
            run()?
        };

        info!(
            "⏱️  {} search runs finished in {:.2}s",
            results.len(),
            start.elapsed().as_secs_f32()
        );
        Ok(results)
    }

    /// `run_all` reduced to the single best result.
    pub fn run_best<CB: ProgressCallback + ?Sized>(
        &self,
        cipher: &[Symbol],
        jobs: &[SearchJob],
        callback: &CB,
    ) -> RfResult<Option<JobResult>> {
        let results = self.run_all(cipher, jobs, callback)?;
        Ok(best_of(&results).cloned())
    }
}

/// Highest fitness wins; equal fitness goes to the earlier job.
pub fn best_of(results: &[JobResult]) -> Option<&JobResult> {
    results.iter().reduce(|best, r| {
        if r.outcome.fitness > best.outcome.fitness {
            r
        } else {
            best
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(job_index: usize, fitness: f32) -> JobResult {
        JobResult {
            job_index,
            period: 3,
            operation: Operation::Additive,
            outcome: SearchOutcome {
                key: vec![Symbol::wrap(0); 3],
                fitness,
                iterations: 0,
                restarts: 0,
                accepted: 0,
            },
        }
    }

    #[test]
    fn test_guess_jobs_start_from_guess() {
        let scorer = Arc::new(Scorer::english(Default::default()).unwrap());
        let options = OptimizationOptions {
            num_threads: 0,
            runs_per_config: 3,
            search: SearchOptions::default(),
        };
        let optimizer = Optimizer::new(scorer, options);
        let guess: Key = [2u8, 5, 7].iter().map(|&v| Symbol::wrap(v as i32)).collect();

        let jobs = optimizer.plan_guess_jobs(&guess, &[Operation::Additive, Operation::Beaufort], 40);
        assert_eq!(jobs.len(), 6);
        assert_eq!(jobs[0].initial_key, guess);
        assert_eq!(jobs[3].initial_key, guess);
        assert_eq!(jobs[3].operation, Operation::Beaufort);
        for (i, job) in jobs.iter().enumerate() {
            assert_eq!(job.period, 3);
            assert_eq!(job.initial_key.len(), 3);
            assert_eq!(job.seed, 40 + i as u64);
        }
    }

    #[test]
    fn test_best_of_prefers_earlier_on_tie() {
        let results = vec![result(0, 1.0), result(1, 5.0), result(2, 5.0), result(3, -2.0)];
        assert_eq!(best_of(&results).unwrap().job_index, 1);
        assert!(best_of(&[]).is_none());
    }
}
