//! The 29-symbol runic alphabet and its ASCII transliteration.
//!
//! Symbol order follows the Gematria Primus table: index, rune, canonical
//! transliteration and prime value are fixed for the life of the process.

use crate::consts::ALPHABET_SIZE;
use crate::error::{RfResult, RuneForgeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One glyph of the alphabet, stored as its index in `[0, 29)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Symbol(u8);

/// A repeating shift sequence.
pub type Key = Vec<Symbol>;

struct Glyph {
    rune: char,
    latin: &'static str,
    prime: u32,
}

const GLYPHS: [Glyph; ALPHABET_SIZE] = [
    Glyph { rune: 'ᚠ', latin: "F", prime: 2 },
    Glyph { rune: 'ᚢ', latin: "U", prime: 3 },
    Glyph { rune: 'ᚦ', latin: "TH", prime: 5 },
    Glyph { rune: 'ᚩ', latin: "O", prime: 7 },
    Glyph { rune: 'ᚱ', latin: "R", prime: 11 },
    Glyph { rune: 'ᚳ', latin: "C", prime: 13 },
    Glyph { rune: 'ᚷ', latin: "G", prime: 17 },
    Glyph { rune: 'ᚹ', latin: "W", prime: 19 },
    Glyph { rune: 'ᚻ', latin: "H", prime: 23 },
    Glyph { rune: 'ᚾ', latin: "N", prime: 29 },
    Glyph { rune: 'ᛁ', latin: "I", prime: 31 },
    Glyph { rune: 'ᛄ', latin: "J", prime: 37 },
    Glyph { rune: 'ᛇ', latin: "EO", prime: 41 },
    Glyph { rune: 'ᛈ', latin: "P", prime: 43 },
    Glyph { rune: 'ᛉ', latin: "X", prime: 47 },
    Glyph { rune: 'ᛋ', latin: "S", prime: 53 },
    Glyph { rune: 'ᛏ', latin: "T", prime: 59 },
    Glyph { rune: 'ᛒ', latin: "B", prime: 61 },
    Glyph { rune: 'ᛖ', latin: "E", prime: 67 },
    Glyph { rune: 'ᛗ', latin: "M", prime: 71 },
    Glyph { rune: 'ᛚ', latin: "L", prime: 73 },
    Glyph { rune: 'ᛝ', latin: "NG", prime: 79 },
    Glyph { rune: 'ᛟ', latin: "OE", prime: 83 },
    Glyph { rune: 'ᛞ', latin: "D", prime: 89 },
    Glyph { rune: 'ᚪ', latin: "A", prime: 97 },
    Glyph { rune: 'ᚫ', latin: "AE", prime: 101 },
    Glyph { rune: 'ᚣ', latin: "Y", prime: 103 },
    Glyph { rune: 'ᛡ', latin: "IA", prime: 107 },
    Glyph { rune: 'ᛠ', latin: "EA", prime: 109 },
];

// Accepted on input only; decoding always emits the canonical form.
const ALIASES: [(&str, u8); 4] = [("K", 5), ("V", 1), ("Z", 15), ("IO", 27)];

impl Symbol {
    pub fn new(value: u8) -> RfResult<Self> {
        if (value as usize) < ALPHABET_SIZE {
            Ok(Symbol(value))
        } else {
            Err(RuneForgeError::InvalidSymbol(value))
        }
    }

    /// Reduces any integer into the alphabet (modulo 29).
    #[inline(always)]
    pub fn wrap(value: i32) -> Self {
        Symbol(value.rem_euclid(ALPHABET_SIZE as i32) as u8)
    }

    #[inline(always)]
    pub fn value(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn latin(self) -> &'static str {
        GLYPHS[self.index()].latin
    }

    pub fn rune(self) -> char {
        GLYPHS[self.index()].rune
    }

    pub fn prime(self) -> u32 {
        GLYPHS[self.index()].prime
    }

    pub fn from_rune(c: char) -> Option<Self> {
        GLYPHS
            .iter()
            .position(|g| g.rune == c)
            .map(|i| Symbol(i as u8))
    }

    pub fn all() -> impl Iterator<Item = Symbol> {
        (0..ALPHABET_SIZE as u8).map(Symbol)
    }
}

impl TryFrom<u8> for Symbol {
    type Error = RuneForgeError;

    fn try_from(value: u8) -> RfResult<Self> {
        Symbol::new(value)
    }
}

impl From<Symbol> for u8 {
    fn from(s: Symbol) -> u8 {
        s.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.latin())
    }
}

fn lookup(token: &[u8]) -> Option<Symbol> {
    GLYPHS
        .iter()
        .position(|g| g.latin.as_bytes() == token)
        .map(|i| Symbol(i as u8))
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| alias.as_bytes() == token)
                .map(|&(_, idx)| Symbol(idx))
        })
}

/// Greedy longest-match tokenization of transliterated text.
/// Two-character candidates win over single characters at every position;
/// anything outside the table is dropped.
pub fn encode(text: &str) -> Vec<Symbol> {
    encode_spans(text).into_iter().map(|(sym, _, _)| sym).collect()
}

/// Same as [`encode`], also reporting the byte offset and byte length of
/// the text each symbol was read from.
pub fn encode_spans(text: &str) -> Vec<(Symbol, usize, usize)> {
    let upper: Vec<u8> = text.bytes().map(|b| b.to_ascii_uppercase()).collect();
    let mut out = Vec::with_capacity(upper.len());
    let mut i = 0;

    while i < upper.len() {
        if i + 1 < upper.len() {
            if let Some(sym) = lookup(&upper[i..i + 2]) {
                out.push((sym, i, 2));
                i += 2;
                continue;
            }
        }
        if let Some(sym) = lookup(&upper[i..i + 1]) {
            out.push((sym, i, 1));
        }
        i += 1;
    }
    out
}

pub fn decode(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.latin()).collect()
}

/// Decodes into a reusable byte buffer (cleared first).
#[inline]
pub fn decode_into(symbols: &[Symbol], buf: &mut Vec<u8>) {
    buf.clear();
    for s in symbols {
        buf.extend_from_slice(s.latin().as_bytes());
    }
}

/// Decodes raw symbol values, failing on the first out-of-range value.
pub fn decode_values(values: &[u8]) -> RfResult<String> {
    Ok(decode(&symbols_from_values(values)?))
}

pub fn symbols_from_values(values: &[u8]) -> RfResult<Vec<Symbol>> {
    values.iter().map(|&v| Symbol::new(v)).collect()
}

/// Folds aliases and drops noise: `canonicalize("quick") == "UICC"`.
pub fn canonicalize(text: &str) -> String {
    decode(&encode(text))
}

pub fn to_runes(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.rune()).collect()
}

pub fn gematria_sum(symbols: &[Symbol]) -> u32 {
    symbols.iter().map(|s| s.prime()).sum()
}

/// Parses a key given either as integers ("3,7,12" / "3 7 12")
/// or as a transliterated keyword ("DIUINITY").
pub fn parse_key(text: &str) -> RfResult<Key> {
    let key = if text.bytes().any(|b| b.is_ascii_digit()) {
        let mut key = Vec::new();
        for part in text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
        {
            let value: u8 = part
                .parse()
                .map_err(|_| RuneForgeError::Validation(format!("Bad key element '{}'", part)))?;
            key.push(Symbol::new(value)?);
        }
        key
    } else {
        encode(text)
    };

    if key.is_empty() {
        return Err(RuneForgeError::EmptyKey);
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_consistent() {
        for s in Symbol::all() {
            assert_eq!(Symbol::from_rune(s.rune()), Some(s));
            assert_eq!(encode(s.latin()), vec![s], "glyph {} does not round-trip", s);
        }
    }

    #[test]
    fn test_two_char_tokens_win() {
        let syms = encode("THE");
        assert_eq!(syms.len(), 2);
        assert_eq!(syms[0].latin(), "TH");
        assert_eq!(syms[1].latin(), "E");
    }

    #[test]
    fn test_wrap_is_modular() {
        assert_eq!(Symbol::wrap(-1).value(), 28);
        assert_eq!(Symbol::wrap(29).value(), 0);
        assert_eq!(Symbol::wrap(60).value(), 2);
    }
}
