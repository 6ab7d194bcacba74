//! Index of Coincidence statistics and period ranking.
//!
//! All values are normalised by the alphabet size, so a uniformly random
//! stream scores [`RANDOM_BASELINE`] and language text sits near
//! [`LANGUAGE_BASELINE`]. Thresholds anywhere in the crate use this scale.

use crate::alphabet::Symbol;
use crate::consts::{ALPHABET_SIZE, LANGUAGE_BASELINE, RANDOM_BASELINE};
use crate::error::{RfResult, RuneForgeError};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodScore {
    pub period: usize,
    pub ioc: f64,
}

impl PeriodScore {
    /// Closer to language than to random noise.
    pub fn is_language_like(&self) -> bool {
        self.ioc >= (RANDOM_BASELINE + LANGUAGE_BASELINE) / 2.0
    }
}

/// The residue class `residue` of `stream` modulo `period`.
pub fn coset(stream: &[Symbol], period: usize, residue: usize) -> impl Iterator<Item = Symbol> + '_ {
    stream.iter().copied().skip(residue).step_by(period.max(1))
}

pub fn symbol_counts<I: IntoIterator<Item = Symbol>>(symbols: I) -> [usize; ALPHABET_SIZE] {
    let mut counts = [0usize; ALPHABET_SIZE];
    for s in symbols {
        counts[s.index()] += 1;
    }
    counts
}

fn ioc_from_counts(counts: &[usize; ALPHABET_SIZE]) -> f64 {
    let n: usize = counts.iter().sum();
    if n < 2 {
        return 0.0;
    }
    let coincidences: usize = counts.iter().map(|&f| f * f.saturating_sub(1)).sum();
    coincidences as f64 / (n * (n - 1)) as f64
}

/// Raw IoC: sum f(f-1) / n(n-1), zero below two symbols.
pub fn index_of_coincidence(stream: &[Symbol]) -> f64 {
    ioc_from_counts(&symbol_counts(stream.iter().copied()))
}

pub fn normalized_ioc(stream: &[Symbol]) -> f64 {
    index_of_coincidence(stream) * ALPHABET_SIZE as f64
}

/// Mean normalised IoC over the `period` cosets of `stream`.
pub fn period_ioc(stream: &[Symbol], period: usize) -> RfResult<f64> {
    if period < 2 || period >= stream.len() {
        return Err(RuneForgeError::DegenerateKeyLength {
            period,
            len: stream.len(),
        });
    }
    let total: f64 = (0..period)
        .map(|r| ioc_from_counts(&symbol_counts(coset(stream, period, r))))
        .sum();
    Ok(total / period as f64 * ALPHABET_SIZE as f64)
}

/// Scores every candidate period in `2..=min(max_period, len / 2)` and
/// returns them best first. Ties go to the smaller period. An empty or
/// too-short stream yields an empty ranking.
pub fn estimate_periods(stream: &[Symbol], max_period: usize) -> Vec<PeriodScore> {
    let upper = max_period.min(stream.len() / 2);
    let mut ranked = Vec::new();

    for period in 2..=upper {
        match period_ioc(stream, period) {
            Ok(ioc) => ranked.push(PeriodScore { period, ioc }),
            Err(e) => debug!("skipping period {}: {}", period, e),
        }
    }

    ranked.sort_by(|a, b| b.ioc.total_cmp(&a.ioc).then(a.period.cmp(&b.period)));
    ranked
}
