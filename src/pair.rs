//! Tuple-pair filtering for the 6/7/8-round differential attack.
//!
//! Pairs are the atomic unit the round-6/7/8 worker consumes: two tuples
//! whose tweak and ciphertext differences satisfy a round-specific
//! distinguisher, cheap enough to test over every unordered tuple pair before
//! the expensive guess-and-verify exhaustion begins.

use tracing::info;

use crate::sbox::inv_sub;
use crate::tuple::{Tuple, TupleStore};

/// Bits that a tweak difference must clear to be eligible for the r=6/7/8
/// filters; the one byte left free (bits 24-31) carries the distinguisher.
const TWEAK_DIFF_ZERO_MASK: u64 = 0xffff_ffff_00ff_ffff;

fn tweak_diff_free_byte(delta_tw: u64) -> u8 {
    ((delta_tw >> 24) & 0xff) as u8
}

fn tweak_byte_t5(tw: u64) -> u8 {
    ((tw >> 24) & 0xff) as u8
}

fn tweak_byte_t8(tw: u64) -> u8 {
    (tw & 0xff) as u8
}

fn ct_bytes(ct: u32) -> (u8, u8, u8) {
    (((ct >> 16) & 0xff) as u8, ((ct >> 8) & 0xff) as u8, (ct & 0xff) as u8)
}

/// A tuple pair accepted by the round-6/7/8 filter. For r=8 the pair also
/// carries the restricted set of feasible `k3` bytes derived during filtering.
#[derive(Debug, Clone)]
pub struct Pair {
    pub t1: Tuple,
    pub t2: Tuple,
    pub k3_candidates: Vec<u8>,
}

impl Pair {
    pub(crate) fn new(t1: Tuple, t2: Tuple, k3_candidates: Vec<u8>) -> Self {
        Pair { t1, t2, k3_candidates }
    }

    fn tweak_diff_eligible(&self) -> bool {
        tweak_diff_eligible(self.t1.tw, self.t2.tw)
    }
}

fn tweak_diff_eligible(tw1: u64, tw2: u64) -> bool {
    let delta = tw1 ^ tw2;
    (delta & TWEAK_DIFF_ZERO_MASK) == 0 && tweak_diff_free_byte(delta) != 0
}

/// Ordered collection of qualifying pairs for one attack run.
#[derive(Debug, Default, Clone)]
pub struct PairStore {
    pairs: Vec<Pair>,
}

impl PairStore {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn as_slice(&self) -> &[Pair] {
        &self.pairs
    }

    /// Scan every unordered tuple pair and keep those matching the filter
    /// for `rounds`. For r in {6,7} the store is truncated to the first
    /// surviving pair once one is found; for r=8 every surviving pair with a
    /// non-empty `k3_candidates` set is kept.
    pub fn filter(tuples: &TupleStore, rounds: u32) -> Self {
        let slice = tuples.as_slice();
        let mut pairs = Vec::new();

        'outer: for i in 0..slice.len() {
            for j in (i + 1)..slice.len() {
                let (t1, t2) = (slice[i], slice[j]);
                let pair = match rounds {
                    6 => filter_round6(t1, t2),
                    7 => filter_round7(t1, t2),
                    8 => filter_round8(t1, t2),
                    _ => None,
                };
                if let Some(pair) = pair {
                    pairs.push(pair);
                    if rounds == 6 || rounds == 7 {
                        break 'outer;
                    }
                }
            }
        }

        info!(rounds, survivors = pairs.len(), "pair filter complete");
        PairStore { pairs }
    }
}

fn filter_round6(t1: Tuple, t2: Tuple) -> Option<Pair> {
    if t1.ct != t2.ct {
        return None;
    }
    if !tweak_diff_eligible(t1.tw, t2.tw) {
        return None;
    }
    Some(Pair::new(t1, t2, Vec::new()))
}

fn filter_round7(t1: Tuple, t2: Tuple) -> Option<Pair> {
    if (t1.ct ^ t2.ct) & 0x00ff_00ff != 0 {
        return None;
    }
    if !tweak_diff_eligible(t1.tw, t2.tw) {
        return None;
    }

    let (a1, b1, c1) = ct_bytes(t1.ct);
    let (a2, b2, c2) = ct_bytes(t2.ct);
    let t5_1 = tweak_byte_t5(t1.tw);
    let t5_2 = tweak_byte_t5(t2.tw);

    let lhs = inv_sub(b1) ^ a1 ^ c1 ^ t5_1;
    let rhs = inv_sub(b2) ^ a2 ^ c2 ^ t5_2;
    if lhs != rhs {
        return None;
    }
    Some(Pair::new(t1, t2, Vec::new()))
}

fn filter_round8(t1: Tuple, t2: Tuple) -> Option<Pair> {
    let (a1, b1, c1) = ct_bytes(t1.ct);
    let (a2, b2, c2) = ct_bytes(t2.ct);

    let da = inv_sub(a1) ^ inv_sub(a2);
    let dc = inv_sub(c1) ^ inv_sub(c2);
    let db_chain = inv_sub(b1) ^ inv_sub(b2) ^ a1 ^ a2 ^ c1 ^ c2;
    if da != dc || da != db_chain {
        return None;
    }

    let t5_1 = tweak_byte_t5(t1.tw);
    let t5_2 = tweak_byte_t5(t2.tw);
    let t8_1 = tweak_byte_t8(t1.tw);
    let t8_2 = tweak_byte_t8(t2.tw);
    let target = t5_1 ^ t5_2;

    let mut k3_candidates = Vec::new();
    for k3 in 0..=255u8 {
        let v1 = inv_sub(inv_sub(b1) ^ a1 ^ c1 ^ k3 ^ t8_1);
        let v2 = inv_sub(inv_sub(b2) ^ a2 ^ c2 ^ k3 ^ t8_2);
        if v1 ^ v2 == target {
            k3_candidates.push(k3);
        }
    }

    if k3_candidates.is_empty() {
        return None;
    }
    Some(Pair::new(t1, t2, k3_candidates))
}
