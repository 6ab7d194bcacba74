/// Number of symbols in the runic alphabet.
pub const ALPHABET_SIZE: usize = 29;

/// Normalised Index of Coincidence of a uniformly random stream.
/// Every IoC value in the crate is scaled by `ALPHABET_SIZE`, so random text sits at 1.0.
pub const RANDOM_BASELINE: f64 = 1.0;

/// Typical normalised IoC of English transliterated into the alphabet.
pub const LANGUAGE_BASELINE: f64 = 1.75;

/// Size of the ASCII bigram weight table (row-major, `a * ASCII_RANGE + b`).
pub const ASCII_RANGE: usize = 128;

/// Bigram weights are log-odds against a uniform 26-letter pair distribution.
pub const UNIFORM_PAIR_SPACE: f32 = 676.0;

/// Default number of iterations for a single search run.
pub const DEFAULT_ITERATIONS: usize = 20_000;

/// Default stall count that triggers a randomized restart.
pub const DEFAULT_RESTART_THRESHOLD: usize = 2_500;
