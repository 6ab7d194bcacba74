//! Frequency-matched starting keys.

use super::coincidence::{coset, symbol_counts};
use crate::alphabet::{Key, Symbol};
use crate::cipher::Operation;
use crate::error::{RfResult, RuneForgeError};

/// Builds a length-`period` key by assuming the most frequent symbol of each
/// coset decrypts (under `op`) to `expected`. Ties resolve to the lowest
/// symbol index. Many positions will be wrong; the result only needs to beat
/// a random start.
pub fn seed_key(stream: &[Symbol], period: usize, op: Operation, expected: Symbol) -> RfResult<Key> {
    if period < 2 || period >= stream.len() {
        return Err(RuneForgeError::DegenerateKeyLength {
            period,
            len: stream.len(),
        });
    }

    let key = (0..period)
        .map(|r| {
            let counts = symbol_counts(coset(stream, period, r));
            let top = most_frequent(&counts);
            op.solve_key(top, expected)
        })
        .collect();
    Ok(key)
}

fn most_frequent(counts: &[usize]) -> Symbol {
    let mut best = 0;
    for (i, &c) in counts.iter().enumerate() {
        if c > counts[best] {
            best = i;
        }
    }
    Symbol::wrap(best as i32)
}
