use crate::alphabet::{Key, Symbol};
use crate::consts::ALPHABET_SIZE;

const NUDGES: [i32; 4] = [-2, -1, 1, 2];

/// Changes exactly one key position and returns its index. With probability
/// `perturb_probability` the symbol is nudged by ±1 or ±2, otherwise it is
/// resampled among the other 28 values. `key` must be non-empty.
#[inline]
pub fn mutate_key(key: &mut [Symbol], perturb_probability: f32, rng: &mut fastrand::Rng) -> usize {
    let pos = rng.usize(0..key.len());
    let current = key[pos];

    key[pos] = if rng.f32() < perturb_probability {
        let delta = NUDGES[rng.usize(0..NUDGES.len())];
        Symbol::wrap(current.value() as i32 + delta)
    } else {
        let mut v = rng.u8(0..(ALPHABET_SIZE as u8 - 1));
        if v >= current.value() {
            v += 1;
        }
        Symbol::wrap(v as i32)
    };
    pos
}

pub fn random_key(len: usize, rng: &mut fastrand::Rng) -> Key {
    (0..len)
        .map(|_| Symbol::wrap(rng.u8(0..ALPHABET_SIZE as u8) as i32))
        .collect()
}

/// Overwrites `key` in place with fresh uniform symbols.
pub fn randomize_key(key: &mut [Symbol], rng: &mut fastrand::Rng) {
    for s in key.iter_mut() {
        *s = Symbol::wrap(rng.u8(0..ALPHABET_SIZE as u8) as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_always_changes_one_position() {
        let mut rng = fastrand::Rng::with_seed(7);
        for p in [0.0, 0.7, 1.0] {
            for _ in 0..500 {
                let before = random_key(5, &mut rng);
                let mut after = before.clone();
                let pos = mutate_key(&mut after, p, &mut rng);
                let diffs: Vec<usize> = (0..5).filter(|&i| before[i] != after[i]).collect();
                assert_eq!(diffs, vec![pos]);
            }
        }
    }
}
