pub mod builder;
pub mod loader;
pub mod types;

pub use self::builder::ScorerBuildParams;
pub use self::types::ScoreDetails;

use self::builder::bucket;
use self::loader::LanguageData;
use crate::alphabet::{self, Symbol};
use crate::config::ScoringWeights;
use crate::consts::ASCII_RANGE;
use crate::error::RfResult;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct LexiconEntry {
    pub word: Vec<u8>,
    pub weight: f32,
}

/// Language-model fitness over transliterated plaintext. Immutable once
/// built; share it behind an `Arc` across search runs.
#[derive(Debug, Clone)]
pub struct Scorer {
    pub weights: ScoringWeights,

    // --- Bigram table (row-major, `a * ASCII_RANGE + b`) ---
    pub pair_weights: Vec<f32>,
    pub pair_known: Vec<bool>,

    // --- Lexicon (CSR by leading pair) ---
    pub lexicon: Vec<LexiconEntry>,
    pub lexicon_starts: Vec<usize>,

    // --- One-letter lexicon words, indexed by byte ---
    pub letter_weights: Vec<f32>,
    pub has_letters: bool,
}

impl Scorer {
    /// Embedded English model.
    pub fn english(weights: ScoringWeights) -> RfResult<Self> {
        ScorerBuildParams::builder()
            .weights(weights)
            .data(LanguageData::english()?)
            .build()
            .build_scorer()
    }

    pub fn from_data(data: LanguageData, weights: ScoringWeights) -> RfResult<Self> {
        ScorerBuildParams::builder()
            .weights(weights)
            .data(data)
            .build()
            .build_scorer()
    }

    #[inline(always)]
    pub fn pair_weight(&self, a: u8, b: u8) -> f32 {
        if a as usize >= ASCII_RANGE || b as usize >= ASCII_RANGE {
            return self.weights.unseen_bigram_weight * self.weights.bigram_scale;
        }
        self.pair_weights[a as usize * ASCII_RANGE + b as usize]
    }

    #[inline(always)]
    fn bucket_entries(&self, a: u8, b: u8) -> &[LexiconEntry] {
        let idx = bucket(a, b);
        &self.lexicon[self.lexicon_starts[idx]..self.lexicon_starts[idx + 1]]
    }

    pub fn score(&self, plain: &[Symbol]) -> f32 {
        let mut buf = Vec::with_capacity(plain.len() * 2);
        self.score_into(plain, &mut buf)
    }

    /// Hot-path variant: decodes into `buf` (reused across calls).
    #[inline]
    pub fn score_into(&self, plain: &[Symbol], buf: &mut Vec<u8>) -> f32 {
        alphabet::decode_into(plain, buf);
        self.score_text(buf)
    }

    /// Scores already-transliterated text. Bytes outside ASCII count as
    /// unseen pairs and never match a lexicon word.
    pub fn score_text(&self, text: &[u8]) -> f32 {
        let mut total = 0.0;
        if self.has_letters {
            for &c in text.iter().filter(|c| c.is_ascii()) {
                total += self.letter_weights[c as usize];
            }
        }
        for i in 0..text.len().saturating_sub(1) {
            let (a, b) = (text[i], text[i + 1]);
            total += self.pair_weight(a, b);
            if !a.is_ascii() || !b.is_ascii() {
                continue;
            }
            let rest = &text[i..];
            for entry in self.bucket_entries(a, b) {
                if rest.starts_with(&entry.word) {
                    total += entry.weight;
                }
            }
        }
        total
    }

    /// Breakdown used by reports; agrees with [`Scorer::score`] on `total`.
    pub fn score_details(&self, plain: &[Symbol]) -> ScoreDetails {
        let text = alphabet::decode(plain);
        let text = text.as_bytes();

        let mut details = ScoreDetails::default();
        let mut hits: HashMap<usize, usize> = HashMap::new();
        let mut letter_hits: HashMap<u8, usize> = HashMap::new();

        if self.has_letters {
            for &c in text.iter().filter(|c| c.is_ascii()) {
                let w = self.letter_weights[c as usize];
                if w != 0.0 {
                    details.lexicon += w;
                    *letter_hits.entry(c).or_insert(0) += 1;
                }
            }
        }

        for i in 0..text.len().saturating_sub(1) {
            let (a, b) = (text[i], text[i + 1]);
            details.bigram += self.pair_weight(a, b);
            let known = a.is_ascii()
                && b.is_ascii()
                && self.pair_known[a as usize * ASCII_RANGE + b as usize];
            if known {
                details.pairs_seen += 1;
            } else {
                details.pairs_unseen += 1;
            }
            if !a.is_ascii() || !b.is_ascii() {
                continue;
            }

            let idx = bucket(a, b);
            let start = self.lexicon_starts[idx];
            for (j, entry) in self.bucket_entries(a, b).iter().enumerate() {
                if text[i..].starts_with(&entry.word) {
                    details.lexicon += entry.weight;
                    *hits.entry(start + j).or_insert(0) += 1;
                }
            }
        }

        // (word, weight x count, count), heaviest first
        let mut matched: Vec<(String, f32, usize)> = hits
            .into_iter()
            .map(|(i, n)| {
                let e = &self.lexicon[i];
                (String::from_utf8_lossy(&e.word).into_owned(), e.weight * n as f32, n)
            })
            .chain(letter_hits.into_iter().map(|(c, n)| {
                ((c as char).to_string(), self.letter_weights[c as usize] * n as f32, n)
            }))
            .collect();
        matched.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        details.matched_words = matched.into_iter().map(|(w, _, n)| (w, n)).collect();

        details.total = details.bigram + details.lexicon;
        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> Scorer {
        let data = LanguageData {
            bigrams: vec![([b'T', b'H'], 30.0), ([b'H', b'E'], 20.0), ([b'E', b'R'], 10.0)],
            lexicon: vec![("THE".to_string(), Some(5.0)), ("HER".to_string(), None)],
        };
        Scorer::from_data(data, ScoringWeights::default()).unwrap()
    }

    #[test]
    fn test_unseen_pairs_use_default() {
        let s = tiny();
        assert_eq!(s.pair_weight(b'Q', b'Q'), -3.5);
        assert!(s.pair_weight(b'T', b'H') > 0.0);
    }

    #[test]
    fn test_overlapping_words_both_count() {
        let s = tiny();
        let d = s.score_details(&alphabet::encode("THER"));
        // THE (5.0) + HER (3 letters * 1.5)
        assert!((d.lexicon - 9.5).abs() < 1e-4);
        assert_eq!(d.matched_words.len(), 2);
        assert_eq!(d.matched_words[0].0, "THE");
    }

    #[test]
    fn test_details_agree_with_score() {
        let s = tiny();
        let plain = alphabet::encode("THEREHERETHEQ");
        let d = s.score_details(&plain);
        assert!((d.total - s.score(&plain)).abs() < 1e-3);
        assert_eq!(d.pairs_seen + d.pairs_unseen, alphabet::decode(&plain).len() - 1);
    }
}
