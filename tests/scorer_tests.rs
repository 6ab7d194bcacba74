mod common;

use rstest::rstest;
use runeforge::alphabet;
use runeforge::cipher::Operation;
use runeforge::config::ScoringWeights;
use runeforge::scorer::loader::LanguageData;
use runeforge::scorer::{Scorer, ScorerBuildParams};

#[test]
fn test_english_beats_cipher_text() {
    let scorer = common::english();
    let plain = alphabet::encode(common::SAMPLE);
    let cipher = common::encrypt(&plain, &common::key(&common::SAMPLE_KEY), Operation::Subtractive);
    assert!(scorer.score(&plain) > scorer.score(&cipher) + 100.0);
}

#[rstest]
#[case("THE", "XQZ")]
#[case("WITHTHEM", "WQTHTHEM")]
#[case("LIGHTHOUSE", "LIGHTHOUZX")]
fn test_language_outscores_noise(#[case] good: &str, #[case] bad: &str) {
    let scorer = common::english();
    let good = alphabet::encode(good);
    let bad = alphabet::encode(bad);
    assert!(scorer.score(&good) > scorer.score(&bad));
}

#[test]
fn test_score_is_pure() {
    let scorer = common::english();
    let plain = alphabet::encode(common::SAMPLE);
    let a = scorer.score(&plain);
    let mut buf = Vec::new();
    let b = scorer.score_into(&plain, &mut buf);
    let c = scorer.score_into(&plain, &mut buf);
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(scorer.score_text(alphabet::decode(&plain).as_bytes()), a);
}

#[test]
fn test_empty_and_single_symbol_score_zero() {
    let scorer = common::english();
    assert_eq!(scorer.score(&[]), 0.0);
    assert_eq!(scorer.score(&alphabet::encode("F")), 0.0);
}

#[test]
fn test_details_break_down_total() {
    let scorer = common::english();
    let plain = alphabet::encode("THELIGHTHOUSEKEEPER");
    let d = scorer.score_details(&plain);
    assert!((d.total - scorer.score(&plain)).abs() < 1e-3);
    assert!((d.bigram + d.lexicon - d.total).abs() < 1e-3);
    let words: Vec<&str> = d.matched_words.iter().map(|(w, _)| w.as_str()).collect();
    assert!(words.contains(&"THE"), "{:?}", words);
    assert!(words.contains(&"LIGHT"), "{:?}", words);
}

#[test]
fn test_weights_shape_the_score() {
    let plain = alphabet::encode("JXJXJX");
    let harsh = Scorer::english(ScoringWeights {
        unseen_bigram_weight: -10.0,
        ..ScoringWeights::default()
    })
    .unwrap();
    let mild = common::english();
    assert!(harsh.score(&plain) < mild.score(&plain));

    let no_lexicon = Scorer::english(ScoringWeights {
        lexicon_scale: 0.0,
        ..ScoringWeights::default()
    })
    .unwrap();
    assert!(no_lexicon.lexicon.is_empty());
    let text = alphabet::encode("THETHETHE");
    assert!(no_lexicon.score(&text) < mild.score(&text));
}

#[test]
fn test_builder_from_memory() {
    let data = LanguageData {
        bigrams: vec![([b'A', b'B'], 1.0), ([b'B', b'A'], 1.0)],
        lexicon: vec![("ABAB".to_string(), Some(10.0)), ("AB".to_string(), Some(99.0))],
    };
    let scorer = ScorerBuildParams::builder().data(data).build().build_scorer().unwrap();
    // ln(0.5 * 676) per known pair; the two-letter word is below the minimum length
    let expected_pair = (0.5f32 * 676.0).ln();
    let d = scorer.score_details(&alphabet::encode("ABABAB"));
    assert!((d.bigram - 5.0 * expected_pair).abs() < 1e-3);
    assert_eq!(d.matched_words, vec![("ABAB".to_string(), 2)]);
    assert!((d.lexicon - 20.0).abs() < 1e-4);
}

#[test]
fn test_single_letter_words_follow_min_len() {
    let data = || LanguageData {
        bigrams: vec![([b'F', b'A'], 1.0), ([b'A', b'F'], 1.0)],
        lexicon: vec![("A".to_string(), Some(5.0)), ("FAF".to_string(), Some(2.0))],
    };
    let letters = Scorer::from_data(
        data(),
        ScoringWeights {
            lexicon_min_len: 1,
            ..ScoringWeights::default()
        },
    )
    .unwrap();
    assert!(letters.has_letters);

    let faf = alphabet::encode("FAF");
    let d = letters.score_details(&faf);
    assert!((d.lexicon - 7.0).abs() < 1e-4);
    assert_eq!(d.matched_words, vec![("A".to_string(), 1), ("FAF".to_string(), 1)]);
    assert!((d.total - letters.score(&faf)).abs() < 1e-3);

    let d = letters.score_details(&alphabet::encode("AFA"));
    assert_eq!(d.matched_words, vec![("A".to_string(), 2)]);
    assert!((d.lexicon - 10.0).abs() < 1e-4);

    // Default minimum length leaves only the three-letter word
    let words_only = Scorer::from_data(data(), ScoringWeights::default()).unwrap();
    assert!(!words_only.has_letters);
    let d = words_only.score_details(&faf);
    assert_eq!(d.matched_words, vec![("FAF".to_string(), 1)]);
    assert!((d.lexicon - 2.0).abs() < 1e-4);
}

#[test]
fn test_builder_rejects_empty_bigrams() {
    let res = ScorerBuildParams::builder()
        .data(LanguageData::default())
        .build()
        .build_scorer();
    assert!(res.is_err());
}
