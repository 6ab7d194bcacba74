//! Readers for language data: bigram counts and lexicon words.
//!
//! Both formats are headerless TSV. Rows that fail to parse are skipped,
//! and every entry is folded to canonical transliteration.

use crate::alphabet;
use crate::error::{RfResult, RuneForgeError};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const ENGLISH_BIGRAMS: &str = include_str!("../../data/english_bigrams.tsv");
const ENGLISH_LEXICON: &str = include_str!("../../data/lexicon.tsv");

#[derive(Debug, Clone, Default)]
pub struct LanguageData {
    /// Canonical pair -> raw count
    pub bigrams: Vec<([u8; 2], f32)>,
    /// Canonical word, optional explicit weight
    pub lexicon: Vec<(String, Option<f32>)>,
}

impl LanguageData {
    pub fn english() -> RfResult<Self> {
        Ok(Self {
            bigrams: load_bigrams(ENGLISH_BIGRAMS.as_bytes())?,
            lexicon: load_lexicon(ENGLISH_LEXICON.as_bytes())?,
        })
    }

    /// User files where given, embedded English otherwise.
    pub fn load<P: AsRef<Path>>(bigrams: Option<P>, lexicon: Option<P>) -> RfResult<Self> {
        let bigrams = match bigrams {
            Some(p) => {
                info!("📚 Loading bigram weights: {}", p.as_ref().display());
                load_bigrams(File::open(p)?)?
            }
            None => load_bigrams(ENGLISH_BIGRAMS.as_bytes())?,
        };
        let lexicon = match lexicon {
            Some(p) => {
                info!("📖 Loading lexicon: {}", p.as_ref().display());
                load_lexicon(File::open(p)?)?
            }
            None => load_lexicon(ENGLISH_LEXICON.as_bytes())?,
        };
        Ok(Self { bigrams, lexicon })
    }
}

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader)
}

/// `PAIR<TAB>COUNT` rows. Pairs that do not canonicalise to exactly two
/// characters are dropped; aliases merge into their canonical pair.
pub fn load_bigrams<R: Read>(reader: R) -> RfResult<Vec<([u8; 2], f32)>> {
    let mut merged: HashMap<[u8; 2], f32> = HashMap::new();
    let mut skipped = 0;

    for rec in tsv_reader(reader).records().flatten() {
        if rec.len() < 2 {
            skipped += 1;
            continue;
        }
        let pair = alphabet::canonicalize(rec[0].trim());
        let count = match rec[1].trim().parse::<f32>() {
            Ok(v) if v.is_finite() && v > 0.0 => v,
            _ => {
                skipped += 1;
                continue;
            }
        };
        match pair.as_bytes() {
            &[a, b] => *merged.entry([a, b]).or_insert(0.0) += count,
            _ => skipped += 1,
        }
    }

    if merged.is_empty() {
        return Err(RuneForgeError::Validation(
            "Bigram table has no usable rows".to_string(),
        ));
    }

    let mut bigrams: Vec<([u8; 2], f32)> = merged.into_iter().collect();
    bigrams.sort_by(|a, b| a.0.cmp(&b.0));
    debug!("Loaded {} bigrams ({} rows skipped)", bigrams.len(), skipped);
    Ok(bigrams)
}

/// `WORD[<TAB>WEIGHT]` rows. A weight column that is present but
/// unparseable drops the row; duplicates keep their first occurrence.
pub fn load_lexicon<R: Read>(reader: R) -> RfResult<Vec<(String, Option<f32>)>> {
    let mut words: Vec<(String, Option<f32>)> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for rec in tsv_reader(reader).records().flatten() {
        let Some(raw) = rec.get(0) else { continue };
        let word = alphabet::canonicalize(raw.trim());
        if word.is_empty() {
            continue;
        }
        let weight = match rec.get(1).map(str::trim).filter(|s| !s.is_empty()) {
            Some(w) => match w.parse::<f32>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => continue,
            },
            None => None,
        };
        if seen.insert(word.clone()) {
            words.push((word, weight));
        }
    }

    debug!("Loaded {} lexicon words", words.len());
    Ok(words)
}
