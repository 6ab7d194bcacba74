//! Splits a raw document into a symbol stream plus the structure around it.

use crate::alphabet::{self, Symbol};
use crate::error::{RfResult, RuneForgeError};
use serde::{Deserialize, Serialize};

/// Structural separators, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BoundaryKind {
    Other,
    Word,
    Clause,
    Line,
    Page,
    Section,
}

impl BoundaryKind {
    pub fn classify(c: char) -> Self {
        match c {
            '-' | ' ' | '\t' => BoundaryKind::Word,
            '.' | ',' | ':' | ';' | '!' | '?' => BoundaryKind::Clause,
            '/' | '\n' | '\r' => BoundaryKind::Line,
            '%' => BoundaryKind::Page,
            '&' | '$' | '§' => BoundaryKind::Section,
            _ => BoundaryKind::Other,
        }
    }
}

/// A collapsed run of structure characters sitting before stream index `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    pub index: usize,
    pub kind: BoundaryKind,
}

/// Where a stream element came from in the original document (byte offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extraction {
    pub symbols: Vec<Symbol>,
    pub positions: Vec<Span>,
    pub boundaries: Vec<Boundary>,
}

#[derive(Default)]
struct BoundaryRun(Option<BoundaryKind>);

impl BoundaryRun {
    fn absorb(&mut self, kind: BoundaryKind) {
        self.0 = Some(self.0.map_or(kind, |k| k.max(kind)));
    }

    fn flush(&mut self, index: usize, out: &mut Vec<Boundary>) {
        if let Some(kind) = self.0.take() {
            out.push(Boundary { index, kind });
        }
    }
}

/// Extracts rune glyphs from a document; every other character is structure.
pub fn extract(text: &str) -> Extraction {
    let mut ex = Extraction::default();
    let mut run = BoundaryRun::default();

    for (offset, c) in text.char_indices() {
        match Symbol::from_rune(c) {
            Some(sym) => {
                run.flush(ex.symbols.len(), &mut ex.boundaries);
                ex.symbols.push(sym);
                ex.positions.push(Span {
                    offset,
                    len: c.len_utf8(),
                });
            }
            None => run.absorb(BoundaryKind::classify(c)),
        }
    }
    run.flush(ex.symbols.len(), &mut ex.boundaries);
    ex
}

/// Extracts from already-transliterated text. Letters the codec drops are
/// noise, not structure.
pub fn extract_latin(text: &str) -> Extraction {
    let mut ex = Extraction::default();
    let mut run = BoundaryRun::default();
    let mut last_end = 0;

    for (sym, offset, len) in alphabet::encode_spans(text) {
        for c in text[last_end..offset].chars() {
            if !c.is_ascii_alphabetic() {
                run.absorb(BoundaryKind::classify(c));
            }
        }
        run.flush(ex.symbols.len(), &mut ex.boundaries);
        ex.symbols.push(sym);
        ex.positions.push(Span { offset, len });
        last_end = offset + len;
    }
    for c in text[last_end..].chars() {
        if !c.is_ascii_alphabetic() {
            run.absorb(BoundaryKind::classify(c));
        }
    }
    run.flush(ex.symbols.len(), &mut ex.boundaries);
    ex
}

/// Picks the runic extractor when the document contains any rune glyph.
pub fn extract_document(text: &str) -> Extraction {
    if text.chars().any(|c| Symbol::from_rune(c).is_some()) {
        extract(text)
    } else {
        extract_latin(text)
    }
}

impl Extraction {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn check_len(&self, plain: &[Symbol]) -> RfResult<()> {
        if plain.len() != self.symbols.len() {
            return Err(RuneForgeError::LengthMismatch {
                expected: self.symbols.len(),
                actual: plain.len(),
            });
        }
        Ok(())
    }

    /// Rebuilds `original` with each glyph replaced by the transliteration of
    /// the matching plaintext symbol. Structure is copied through untouched.
    pub fn render(&self, original: &str, plain: &[Symbol]) -> RfResult<String> {
        self.check_len(plain)?;

        let mut out = String::with_capacity(original.len());
        let mut last = 0;
        for (span, sym) in self.positions.iter().zip(plain) {
            let end = span.offset + span.len;
            let gap = original.get(last..span.offset).ok_or_else(|| {
                RuneForgeError::Validation(format!("Span at {} is outside the document", span.offset))
            })?;
            out.push_str(gap);
            out.push_str(sym.latin());
            last = end;
        }
        out.push_str(original.get(last..).unwrap_or_default());
        Ok(out)
    }

    /// Splits plaintext at every recorded boundary.
    pub fn words(&self, plain: &[Symbol]) -> RfResult<Vec<String>> {
        self.check_len(plain)?;

        let mut words = Vec::new();
        let mut start = 0;
        for b in &self.boundaries {
            if b.index > start {
                words.push(alphabet::decode(&plain[start..b.index]));
            }
            start = start.max(b.index);
        }
        if start < plain.len() {
            words.push(alphabet::decode(&plain[start..]));
        }
        Ok(words)
    }
}
