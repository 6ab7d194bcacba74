pub mod mutation;
pub mod runner;

pub use self::runner::{JobResult, OptimizationOptions, Optimizer, SearchJob};

use crate::alphabet::{Key, Symbol};
use crate::cipher::{self, Operation};
use crate::config::SearchParams;
use crate::consts::{DEFAULT_ITERATIONS, DEFAULT_RESTART_THRESHOLD};
use crate::error::{RfResult, RuneForgeError};
use crate::scorer::Scorer;
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// Observer for a running search. Returning `false` stops the run after the
/// current iteration; the best key so far is still returned.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, iteration: usize, best_fitness: f32, best_key: &[Symbol]) -> bool;
}

pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_progress(&self, _: usize, _: f32, _: &[Symbol]) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub iterations: usize,
    pub restart_threshold: usize,
    pub perturb_probability: f32,
    pub max_time: Option<Duration>,
    /// Iterations between `on_progress` calls.
    pub report_every: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            restart_threshold: DEFAULT_RESTART_THRESHOLD,
            perturb_probability: 0.7,
            max_time: None,
            report_every: 1_000,
        }
    }
}

impl From<&SearchParams> for SearchOptions {
    fn from(p: &SearchParams) -> Self {
        Self {
            iterations: p.iterations,
            restart_threshold: p.restart_threshold,
            perturb_probability: p.perturb_probability,
            max_time: p.max_time(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub key: Key,
    pub fitness: f32,
    pub iterations: usize,
    pub restarts: usize,
    pub accepted: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Iterating,
    Restarting,
    Done,
}

/// State of one hill-climbing run. Owns its buffers and RNG; shares only the
/// read-only scorer and cipher stream.
pub struct Climber<'a> {
    scorer: &'a Scorer,
    cipher: &'a [Symbol],
    op: Operation,
    opts: &'a SearchOptions,
    rng: Rng,

    pub current_key: Key,
    pub current_fitness: f32,
    pub best_key: Key,
    pub best_fitness: f32,
    pub stall: usize,
    pub phase: Phase,

    pub iteration: usize,
    pub restarts: usize,
    pub accepted: usize,

    candidate: Key,
    plain_buf: Vec<Symbol>,
    text_buf: Vec<u8>,
}

impl<'a> Climber<'a> {
    pub fn new(
        scorer: &'a Scorer,
        cipher: &'a [Symbol],
        initial_key: &[Symbol],
        op: Operation,
        opts: &'a SearchOptions,
        seed: u64,
    ) -> RfResult<Self> {
        if initial_key.is_empty() {
            return Err(RuneForgeError::EmptyKey);
        }

        let mut climber = Self {
            scorer,
            cipher,
            op,
            opts,
            rng: Rng::with_seed(seed),
            current_key: initial_key.to_vec(),
            current_fitness: 0.0,
            best_key: initial_key.to_vec(),
            best_fitness: 0.0,
            stall: 0,
            phase: Phase::Iterating,
            iteration: 0,
            restarts: 0,
            accepted: 0,
            candidate: initial_key.to_vec(),
            plain_buf: Vec::with_capacity(cipher.len()),
            text_buf: Vec::with_capacity(cipher.len() * 2),
        };

        climber.current_fitness = climber.fitness_of_candidate(initial_key);
        climber.best_fitness = climber.current_fitness;
        if cipher.is_empty() {
            climber.phase = Phase::Done;
        }
        Ok(climber)
    }

    fn fitness_of_candidate(&mut self, key: &[Symbol]) -> f32 {
        // Key is non-empty (checked in `new`), so the transform cannot fail.
        if cipher::transform_into(self.cipher, key, self.op, &mut self.plain_buf).is_err() {
            return f32::NEG_INFINITY;
        }
        self.scorer.score_into(&self.plain_buf, &mut self.text_buf)
    }

    fn note_best(&mut self) {
        if self.current_fitness > self.best_fitness {
            self.best_fitness = self.current_fitness;
            self.best_key.copy_from_slice(&self.current_key);
        }
    }

    /// One mutate-and-rescore step.
    pub fn iterate(&mut self) {
        self.candidate.copy_from_slice(&self.current_key);
        mutation::mutate_key(&mut self.candidate, self.opts.perturb_probability, &mut self.rng);

        let candidate = std::mem::take(&mut self.candidate);
        let fitness = self.fitness_of_candidate(&candidate);
        self.candidate = candidate;

        if fitness >= self.current_fitness {
            std::mem::swap(&mut self.current_key, &mut self.candidate);
            self.current_fitness = fitness;
            self.stall = 0;
            self.accepted += 1;
            self.note_best();
        } else {
            self.stall += 1;
        }
        self.iteration += 1;
    }

    /// Fresh random key of the same length; best is kept.
    pub fn restart(&mut self) {
        mutation::randomize_key(&mut self.current_key, &mut self.rng);
        let key = std::mem::take(&mut self.current_key);
        self.current_fitness = self.fitness_of_candidate(&key);
        self.current_key = key;
        self.stall = 0;
        self.restarts += 1;
        self.note_best();
        debug!(
            "restart #{} at iteration {} (best {:.2})",
            self.restarts, self.iteration, self.best_fitness
        );
    }

    /// Advances the state machine by one transition.
    pub fn step(&mut self) -> Phase {
        self.phase = match self.phase {
            Phase::Iterating if self.iteration >= self.opts.iterations => Phase::Done,
            Phase::Iterating => {
                self.iterate();
                if self.stall > self.opts.restart_threshold {
                    Phase::Restarting
                } else {
                    Phase::Iterating
                }
            }
            Phase::Restarting => {
                self.restart();
                Phase::Iterating
            }
            Phase::Done => Phase::Done,
        };
        self.phase
    }

    pub fn finish(self) -> SearchOutcome {
        SearchOutcome {
            key: self.best_key,
            fitness: self.best_fitness,
            iterations: self.iteration,
            restarts: self.restarts,
            accepted: self.accepted,
        }
    }
}

/// Single hill-climbing run with randomized restarts.
///
/// Identical inputs (including `seed`) give identical outcomes unless a
/// wall-clock deadline cuts the run short. An empty stream yields the
/// initial key with fitness 0.
pub fn search<CB: ProgressCallback + ?Sized>(
    scorer: &Scorer,
    cipher: &[Symbol],
    initial_key: &[Symbol],
    op: Operation,
    opts: &SearchOptions,
    seed: u64,
    callback: &CB,
) -> RfResult<SearchOutcome> {
    let mut climber = Climber::new(scorer, cipher, initial_key, op, opts, seed)?;
    let deadline = opts.max_time.map(|t| Instant::now() + t);
    let report_every = opts.report_every.max(1);

    while climber.phase != Phase::Done {
        let before = climber.iteration;
        climber.step();

        if climber.iteration == before {
            continue;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            debug!("deadline reached after {} iterations", climber.iteration);
            break;
        }
        if climber.iteration % report_every == 0
            && !callback.on_progress(climber.iteration, climber.best_fitness, &climber.best_key)
        {
            debug!("search cancelled at iteration {}", climber.iteration);
            break;
        }
    }

    Ok(climber.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet;
    use crate::config::ScoringWeights;

    #[test]
    fn test_restart_follows_stall() {
        let scorer = Scorer::english(ScoringWeights::default()).unwrap();
        let cipher = alphabet::encode("XXXXXXXXXXXXXXXXXXXX");
        let opts = SearchOptions {
            iterations: 200,
            restart_threshold: 5,
            ..SearchOptions::default()
        };
        let key = vec![Symbol::wrap(0); 4];
        let mut c = Climber::new(&scorer, &cipher, &key, Operation::Subtractive, &opts, 3).unwrap();
        while c.step() != Phase::Done {
            assert!(c.stall <= opts.restart_threshold + 1);
        }
        assert_eq!(c.iteration, 200);
        assert!(c.best_fitness >= c.current_fitness);
    }

    #[test]
    fn test_empty_key_rejected() {
        let scorer = Scorer::english(ScoringWeights::default()).unwrap();
        let opts = SearchOptions::default();
        let res = search(&scorer, &[], &[], Operation::Additive, &opts, 1, &NoProgress);
        assert!(matches!(res, Err(RuneForgeError::EmptyKey)));
    }
}
