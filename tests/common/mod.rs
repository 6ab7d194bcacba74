#![allow(dead_code)]

use runeforge::alphabet::{self, Key, Symbol};
use runeforge::cipher::{self, Operation};
use runeforge::config::ScoringWeights;
use runeforge::scorer::Scorer;

pub const SAMPLE: &str = "It was late in the evening when the old keeper of the lighthouse climbed the stairs for the last time. He had watched the sea for forty years and he knew every mood of the water, every change of the wind and every light that passed along the coast. The people of the village said that he never slept, that he could hear a ship in trouble long before anyone could see it, and that he had saved more lives than any man in the history of the harbour. When the new keeper arrived with his bags and his books, the old man showed him the great lamp, the brass instruments and the logbook where each storm was written down in a careful hand. Read this, he said, and learn from those who stood here before you. The sea does not forgive a careless mind, but it rewards a patient one. Then he walked down to the shore, turned once to look at the tower, and was gone into the dark.";

pub const SAMPLE_KEY: [u8; 5] = [11, 4, 23, 7, 19];

pub fn english() -> Scorer {
    Scorer::english(ScoringWeights::default()).expect("embedded model must load")
}

pub fn key(values: &[u8]) -> Key {
    alphabet::symbols_from_values(values).expect("test key in range")
}

/// Produces the cipher stream that `decrypt` turns back into `plain`.
pub fn encrypt(plain: &[Symbol], key: &[Symbol], decrypt: Operation) -> Vec<Symbol> {
    cipher::transform(plain, key, decrypt.inverse()).expect("non-empty key")
}

/// Share of positions where `found` matches `truth` under the best rotation.
pub fn rotated_match(found: &[Symbol], truth: &[Symbol]) -> f64 {
    if found.len() != truth.len() || truth.is_empty() {
        return 0.0;
    }
    let n = truth.len();
    (0..n)
        .map(|r| (0..n).filter(|&i| found[(i + r) % n] == truth[i]).count())
        .max()
        .unwrap_or(0) as f64
        / n as f64
}

/// Glyph rendering of `SAMPLE` with punctuation kept as structure.
pub fn sample_runes() -> String {
    let mut out = String::new();
    for word in SAMPLE.split(' ') {
        if !out.is_empty() {
            out.push('-');
        }
        for (sym, _, _) in alphabet::encode_spans(word) {
            out.push(sym.rune());
        }
        if word.ends_with('.') || word.ends_with(',') {
            out.push('.');
        }
    }
    out
}

/// Re-enciphers every rune of `doc`, leaving structure untouched.
pub fn encrypt_document(doc: &str, key: &[Symbol], decrypt: Operation) -> String {
    let plain = runeforge::stream::extract(doc).symbols;
    let cipher = encrypt(&plain, key, decrypt);
    let mut next = cipher.iter();
    doc.chars()
        .map(|c| match Symbol::from_rune(c) {
            Some(_) => next.next().map(|s| s.rune()).unwrap_or(c),
            None => c,
        })
        .collect()
}
