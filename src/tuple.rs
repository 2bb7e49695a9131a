//! Plaintext/ciphertext/tweak observations.

use std::io::BufRead;

use tracing::debug;

use crate::error::{CrackError, Result};

/// A single `(pt, ct, tw)` observation under the unknown key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuple {
    pub pt: u32,
    pub ct: u32,
    pub tw: u64,
}

impl Tuple {
    pub fn new(pt: u32, ct: u32, tw: u64) -> Self {
        Tuple { pt, ct, tw }
    }

    /// Parse one `%06x %06x %016x` line. Lines that do not match are reported
    /// as a [`CrackError::Parse`] for the caller to skip.
    fn parse_line(line: &str, line_no: usize) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let pt = fields
            .next()
            .ok_or_else(|| CrackError::parse(line_no, "missing plaintext field"))?;
        let ct = fields
            .next()
            .ok_or_else(|| CrackError::parse(line_no, "missing ciphertext field"))?;
        let tw = fields
            .next()
            .ok_or_else(|| CrackError::parse(line_no, "missing tweak field"))?;

        let pt = u32::from_str_radix(pt, 16)
            .map_err(|e| CrackError::parse(line_no, format!("plaintext: {e}")))?;
        let ct = u32::from_str_radix(ct, 16)
            .map_err(|e| CrackError::parse(line_no, format!("ciphertext: {e}")))?;
        let tw = u64::from_str_radix(tw, 16)
            .map_err(|e| CrackError::parse(line_no, format!("tweak: {e}")))?;

        Ok(Tuple::new(pt, ct, tw))
    }
}

/// Ordered collection of loaded tuples, deduplicated at the front.
#[derive(Debug, Default, Clone)]
pub struct TupleStore {
    tuples: Vec<Tuple>,
}

impl TupleStore {
    pub fn new(tuples: Vec<Tuple>) -> Self {
        let mut store = TupleStore { tuples };
        store.dedup_prefix();
        store
    }

    /// Read tuples from `%06x %06x %016x` lines, skipping malformed ones.
    pub fn load<R: BufRead>(reader: R) -> Result<Self> {
        let mut tuples = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match Tuple::parse_line(trimmed, idx + 1) {
                Ok(t) => tuples.push(t),
                Err(e) => debug!(line = idx + 1, error = %e, "skipping malformed tuple line"),
            }
        }
        Ok(TupleStore::new(tuples))
    }

    /// Drop leading duplicate tuples until the first two entries differ, or
    /// the store is exhausted.
    fn dedup_prefix(&mut self) {
        while self.tuples.len() >= 2 && self.tuples[0] == self.tuples[1] {
            self.tuples.remove(0);
        }
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn as_slice(&self) -> &[Tuple] {
        &self.tuples
    }

    /// Require at least two distinct tuples, as the `r <= 5` attacks do.
    pub fn require_distinct_pair(&self, rounds: u32) -> Result<(Tuple, Tuple)> {
        if self.tuples.len() < 2 {
            return Err(CrackError::insufficient_tuples(rounds, self.tuples.len()));
        }
        Ok((self.tuples[0], self.tuples[1]))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tuple> {
        self.tuples.iter()
    }
}
