mod common;

use rstest::rstest;
use runeforge::alphabet::{self, Symbol};
use runeforge::analysis::coincidence::{normalized_ioc, period_ioc};
use runeforge::analysis::estimate_periods;
use runeforge::cipher::Operation;
use runeforge::consts::{LANGUAGE_BASELINE, RANDOM_BASELINE};
use runeforge::RuneForgeError;

fn random_stream(len: usize, seed: u64) -> Vec<Symbol> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..len).map(|_| Symbol::wrap(rng.u8(0..29) as i32)).collect()
}

#[rstest]
#[case(1)]
#[case(42)]
#[case(2024)]
fn test_random_stream_sits_at_baseline(#[case] seed: u64) {
    let stream = random_stream(3000, seed);
    let ranking = estimate_periods(&stream, 30);
    assert_eq!(ranking.len(), 29);
    for p in &ranking {
        assert!(
            (p.ioc - RANDOM_BASELINE).abs() <= 0.1 * RANDOM_BASELINE,
            "period {} scored {:.3}",
            p.period,
            p.ioc
        );
        assert!(!p.is_language_like());
    }
}

#[test]
fn test_plaintext_is_language_like() {
    let plain = alphabet::encode(common::SAMPLE);
    let ioc = normalized_ioc(&plain);
    assert!(ioc > (RANDOM_BASELINE + LANGUAGE_BASELINE) / 2.0, "ioc {:.3}", ioc);
}

#[test]
fn test_true_period_ranks_high() {
    let plain = alphabet::encode(common::SAMPLE);
    let key = common::key(&common::SAMPLE_KEY);
    let cipher = common::encrypt(&plain, &key, Operation::Subtractive);

    let top: Vec<usize> = estimate_periods(&cipher, 20).iter().take(3).map(|p| p.period).collect();
    assert!(top.iter().any(|p| p % 5 == 0), "top periods {:?}", top);
    assert!(normalized_ioc(&cipher) < 1.3);
}

#[test]
fn test_known_scenario_period_in_top_three() {
    let plain = alphabet::encode("THEQUICKBROWNFOX");
    let cipher = common::encrypt(&plain, &common::key(&[3, 7, 12]), Operation::Additive);
    let ranking = estimate_periods(&cipher, 10);
    // 14 symbols: only periods 2..=7 have a coset partition worth scoring
    assert_eq!(ranking.len(), 6);
    let top: Vec<usize> = ranking.iter().take(3).map(|p| p.period).collect();
    assert!(top.contains(&3), "top periods {:?}", top);
}

#[test]
fn test_ties_prefer_smaller_period() {
    // Every coset holds distinct symbols, so every period scores zero
    let stream: Vec<Symbol> = (0..20).map(Symbol::wrap).collect();
    let ranking = estimate_periods(&stream, 8);
    let periods: Vec<usize> = ranking.iter().map(|p| p.period).collect();
    assert_eq!(periods, vec![2, 3, 4, 5, 6, 7, 8]);
    assert!(ranking.iter().all(|p| p.ioc == 0.0));
}

#[test]
fn test_degenerate_periods() {
    let stream = random_stream(10, 3);
    assert!(matches!(
        period_ioc(&stream, 1),
        Err(RuneForgeError::DegenerateKeyLength { period: 1, len: 10 })
    ));
    assert!(matches!(
        period_ioc(&stream, 10),
        Err(RuneForgeError::DegenerateKeyLength { period: 10, len: 10 })
    ));
    assert!(period_ioc(&stream, 5).is_ok());
}

#[test]
fn test_empty_stream_ranks_nothing() {
    assert!(estimate_periods(&[], 20).is_empty());
    assert!(estimate_periods(&random_stream(3, 1), 20).is_empty());
}
