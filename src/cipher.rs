//! Modulo-29 periodic substitution between cipher, key and plain streams.

use crate::alphabet::Symbol;
use crate::error::{RfResult, RuneForgeError};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// How a key symbol combines with an input symbol. Which one "decrypts" a
/// given text is part of the search configuration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// out = in - key
    Subtractive,
    /// out = in + key
    Additive,
    /// out = key - in
    Beaufort,
}

impl Operation {
    #[inline(always)]
    pub fn apply(self, input: Symbol, key: Symbol) -> Symbol {
        let (i, k) = (input.value() as i32, key.value() as i32);
        match self {
            Operation::Subtractive => Symbol::wrap(i - k),
            Operation::Additive => Symbol::wrap(i + k),
            Operation::Beaufort => Symbol::wrap(k - i),
        }
    }

    /// The operation that undoes `self` under the same key.
    pub fn inverse(self) -> Self {
        match self {
            Operation::Subtractive => Operation::Additive,
            Operation::Additive => Operation::Subtractive,
            Operation::Beaufort => Operation::Beaufort,
        }
    }

    /// The key symbol for which `apply(input, key) == output`.
    pub fn solve_key(self, input: Symbol, output: Symbol) -> Symbol {
        let (i, o) = (input.value() as i32, output.value() as i32);
        match self {
            Operation::Subtractive => Symbol::wrap(i - o),
            Operation::Additive => Symbol::wrap(o - i),
            Operation::Beaufort => Symbol::wrap(o + i),
        }
    }
}

#[inline(always)]
fn key_at(key: &[Symbol], i: usize) -> Symbol {
    key[i % key.len()]
}

pub fn transform(stream: &[Symbol], key: &[Symbol], op: Operation) -> RfResult<Vec<Symbol>> {
    let mut out = Vec::with_capacity(stream.len());
    transform_into(stream, key, op, &mut out)?;
    Ok(out)
}

/// Allocation-free variant for hot loops; `out` is cleared first.
#[inline]
pub fn transform_into(
    stream: &[Symbol],
    key: &[Symbol],
    op: Operation,
    out: &mut Vec<Symbol>,
) -> RfResult<()> {
    if key.is_empty() {
        return Err(RuneForgeError::EmptyKey);
    }
    out.clear();
    out.extend(
        stream
            .iter()
            .enumerate()
            .map(|(i, &c)| op.apply(c, key_at(key, i))),
    );
    Ok(())
}

/// Self-check: every operation followed by its inverse must reproduce the
/// input for every symbol/key pair.
pub fn verify_round_trip() -> RfResult<()> {
    let stream: Vec<Symbol> = Symbol::all().collect();
    for op in Operation::iter() {
        for k in Symbol::all() {
            let key = [k, Symbol::wrap(k.value() as i32 * 7 + 3)];
            let forward = transform(&stream, &key, op)?;
            let back = transform(&forward, &key, op.inverse())?;
            if back != stream {
                return Err(RuneForgeError::Validation(format!(
                    "{} does not invert under key {:?}",
                    op, key
                )));
            }
            for (&c, &p) in forward.iter().zip(&stream) {
                let inv = op.inverse();
                let solved = inv.solve_key(c, p);
                if inv.apply(c, solved) != p {
                    return Err(RuneForgeError::Validation(format!(
                        "{} key solving is inconsistent",
                        inv
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_check_passes() {
        verify_round_trip().unwrap();
    }

    #[test]
    fn test_operation_names_parse() {
        assert_eq!("beaufort".parse::<Operation>().unwrap(), Operation::Beaufort);
        assert_eq!("Additive".parse::<Operation>().unwrap(), Operation::Additive);
        assert_eq!(Operation::Subtractive.to_string(), "subtractive");
    }

    #[test]
    fn test_empty_key_rejected() {
        let stream = vec![Symbol::wrap(1)];
        assert!(matches!(
            transform(&stream, &[], Operation::Additive),
            Err(RuneForgeError::EmptyKey)
        ));
    }
}
