use crate::config::ScoringWeights;
use crate::consts::{ASCII_RANGE, UNIFORM_PAIR_SPACE};
use crate::error::{RfResult, RuneForgeError};
use crate::scorer::loader::LanguageData;
use crate::scorer::{LexiconEntry, Scorer};
use std::path::Path;
use tracing::debug;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct ScorerBuildParams {
    #[builder(default)]
    pub weights: ScoringWeights,
    pub data: LanguageData,
}

impl ScorerBuildParams {
    pub fn load_from_disk<P: AsRef<Path>>(
        bigram_path: Option<P>,
        lexicon_path: Option<P>,
        weights: Option<ScoringWeights>,
    ) -> RfResult<Scorer> {
        ScorerBuildParams::builder()
            .weights(weights.unwrap_or_default())
            .data(LanguageData::load(bigram_path, lexicon_path)?)
            .build()
            .build_scorer()
    }

    pub fn build_scorer(self) -> RfResult<Scorer> {
        let weights = self.weights;
        let data = self.data;

        // 1. Bigram log-odds against a uniform pair distribution
        let total: f32 = data.bigrams.iter().map(|(_, c)| c).sum();
        if total.is_nan() || total <= 0.0 {
            return Err(RuneForgeError::Validation(
                "Bigram counts sum to zero".to_string(),
            ));
        }

        let unseen = weights.unseen_bigram_weight * weights.bigram_scale;
        let mut pair_weights = vec![unseen; ASCII_RANGE * ASCII_RANGE];
        let mut pair_known = vec![false; ASCII_RANGE * ASCII_RANGE];
        for ([a, b], count) in &data.bigrams {
            let (a, b) = (*a as usize, *b as usize);
            if a >= ASCII_RANGE || b >= ASCII_RANGE {
                continue;
            }
            let w = (count / total * UNIFORM_PAIR_SPACE).ln() * weights.bigram_scale;
            pair_weights[a * ASCII_RANGE + b] = w;
            pair_known[a * ASCII_RANGE + b] = true;
        }

        // 2. Lexicon: single letters in a per-byte table, longer words
        //    bucketed by leading pair (CSR layout)
        let min_len = weights.lexicon_min_len.max(1);
        let (letters, mut entries): (Vec<LexiconEntry>, Vec<LexiconEntry>) = data
            .lexicon
            .iter()
            .filter(|(w, _)| w.len() >= min_len && w.is_ascii())
            .map(|(w, explicit)| {
                let base = explicit.unwrap_or(w.len() as f32 * weights.lexicon_length_bonus);
                LexiconEntry {
                    word: w.as_bytes().to_vec(),
                    weight: base * weights.lexicon_scale,
                }
            })
            .filter(|e| e.weight != 0.0)
            .partition(|e| e.word.len() == 1);

        let mut letter_weights = vec![0.0f32; ASCII_RANGE];
        for e in &letters {
            letter_weights[e.word[0] as usize] += e.weight;
        }
        let has_letters = letter_weights.iter().any(|w| *w != 0.0);

        entries.sort_by_key(|e| bucket(e.word[0], e.word[1]));

        let mut lexicon_starts = vec![0usize; ASCII_RANGE * ASCII_RANGE + 1];
        for e in &entries {
            lexicon_starts[bucket(e.word[0], e.word[1]) + 1] += 1;
        }
        for i in 1..lexicon_starts.len() {
            lexicon_starts[i] += lexicon_starts[i - 1];
        }

        if pair_weights.iter().any(|w| !w.is_finite())
            || letter_weights.iter().any(|w| !w.is_finite())
            || entries.iter().any(|e| !e.weight.is_finite())
        {
            return Err(RuneForgeError::Validation(
                "Scoring tables contain non-finite weights".to_string(),
            ));
        }

        debug!(
            "Scorer built: {} bigrams, {} lexicon words, {} single letters (min len {})",
            data.bigrams.len(),
            entries.len(),
            letters.len(),
            min_len
        );

        Ok(Scorer {
            weights,
            pair_weights,
            pair_known,
            lexicon: entries,
            lexicon_starts,
            letter_weights,
            has_letters,
        })
    }
}

#[inline(always)]
pub(crate) fn bucket(a: u8, b: u8) -> usize {
    (a as usize & (ASCII_RANGE - 1)) * ASCII_RANGE + (b as usize & (ASCII_RANGE - 1))
}
