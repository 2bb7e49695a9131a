//! Five-round meet-in-the-middle attack: 2 rounds forward, 3 back.
//!
//! One work unit fixes `(k1, k3)`. For each `k456` value the kernel builds a
//! 256-entry table across `k2` from the two-round-forward side, then probes
//! it from the three-round-backward side across `k7`, joining on an 8-bit
//! differential rather than the 4-round kernel's 16-bit one because only a
//! single byte survives as a free distinguisher this deep into the cipher.
//!
//! Starting `k456` from zero (rather than resuming a stalled run midway)
//! makes every work unit independently exhaustive.

use crate::cipher::{dec3, enc3};
use crate::sbox::inv_sub;
use crate::tuple::Tuple;

#[derive(Debug, Clone, Copy, Default)]
struct Record {
    k2: u8,
    delta: u32,
    next: i32,
}

/// Per-thread working memory for the 5-round kernel.
pub struct Scratch {
    heads: [i32; 256],
    records: [Record; 256],
}

impl Scratch {
    pub fn new() -> Self {
        Scratch { heads: [-1; 256], records: [Record::default(); 256] }
    }
}

impl Default for Scratch {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the 5-round attack for the work unit `k13 = (k1 << 8) | k3`, calling
/// `should_stop` once per `k456` value so a requested shutdown is honored
/// well within the outer `2^24`-iteration span.
pub fn run(
    k13: u16,
    t1: Tuple,
    t2: Tuple,
    scratch: &mut Scratch,
    should_stop: &dyn Fn() -> bool,
    mut on_candidate: impl FnMut(u64),
) {
    let k1 = (k13 >> 8) as u8;
    let k3 = (k13 & 0xff) as u8;

    let r1tw1 = (t1.tw >> 40) as u32;
    let r1tw2 = (t2.tw >> 40) as u32;
    let r2tw1 = ((t1.tw >> 16) & 0xffffff) as u32;
    let r2tw2 = ((t2.tw >> 16) & 0xffffff) as u32;
    let r4tw1 = ((t1.tw >> 32) & 0xffffff) as u32;
    let r4tw2 = ((t2.tw >> 32) & 0xffffff) as u32;
    let r5tw1 = ((t1.tw >> 8) & 0xffffff) as u32;
    let r5tw2 = ((t2.tw >> 8) & 0xffffff) as u32;

    for k456 in 0u32..0x100_0000 {
        if should_stop() {
            return;
        }

        let pkey = (k1 as u64) << 48 | (k3 as u64) << 32 | (k456 as u64) << 8;
        let k345 = ((k3 as u32) << 16) | (k456 >> 8);

        scratch.heads.iter_mut().for_each(|h| *h = -1);
        for k2 in 0u32..256 {
            let k123 = (k1 as u32) << 16 | (k2 << 8) | k3 as u32;
            let v1 = enc3(enc3(t1.pt, k123 ^ r1tw1), k456 ^ r2tw1);
            let v2 = enc3(enc3(t2.pt, k123 ^ r1tw2), k456 ^ r2tw2);
            let delta = v1 ^ v2;
            let addr = (delta & 0xff) as usize;
            scratch.records[k2 as usize] = Record { k2: k2 as u8, delta, next: scratch.heads[addr] };
            scratch.heads[addr] = k2 as i32;
        }

        for k7 in 0u32..256 {
            let k671 = ((k456 & 0xff) << 16) | (k7 << 8) | k1 as u32;
            let v1 = dec3(dec3(t1.ct, k671 ^ r5tw1), k345 ^ r4tw1);
            let v2 = dec3(dec3(t2.ct, k671 ^ r5tw2), k345 ^ r4tw2);

            let mut db = inv_sub(((v1 >> 8) & 0xff) as u8) as u32;
            db ^= inv_sub(((v2 >> 8) & 0xff) as u8) as u32;
            db ^= v1;
            db ^= v2;
            db ^= v1 >> 16;
            db ^= v2 >> 16;
            db &= 0xff;
            let mut da = inv_sub((v1 >> 16) as u8) as u32;
            da ^= inv_sub((v2 >> 16) as u8) as u32;
            da ^= db;
            let mut dc = inv_sub((v1 & 0xff) as u8) as u32;
            dc ^= inv_sub((v2 & 0xff) as u8) as u32;
            dc ^= db;
            let delta = (da << 16) | (db << 8) | dc;
            let addr = (delta & 0xff) as usize;

            let mut idx = scratch.heads[addr];
            while idx != -1 {
                let rec = scratch.records[idx as usize];
                if rec.delta == delta {
                    let key = pkey | k7 as u64 | (rec.k2 as u64) << 40;
                    on_candidate(key);
                }
                idx = rec.next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::encrypt_sodark_3;

    #[test]
    fn the_true_key_satisfies_the_forward_and_backward_differential() {
        let key = 0xc2284a1ce7be2fu64;
        let tw1 = 0x543bd88000017550u64;
        let tw2 = 0x543bd88000017551u64;
        let t1 = Tuple::new(0x54e0cd, encrypt_sodark_3(5, 0x54e0cd, key, tw1), tw1);
        let t2 = Tuple::new(0x111111, encrypt_sodark_3(5, 0x111111, key, tw2), tw2);

        let k1 = ((key >> 48) & 0xff) as u32;
        let k2 = ((key >> 40) & 0xff) as u32;
        let k3 = ((key >> 32) & 0xff) as u32;
        let k456 = (key & 0xffffff) as u32;
        let k7 = (key & 0xff) as u32;

        let r1tw1 = (t1.tw >> 40) as u32;
        let r1tw2 = (t2.tw >> 40) as u32;
        let r2tw1 = ((t1.tw >> 16) & 0xffffff) as u32;
        let r2tw2 = ((t2.tw >> 16) & 0xffffff) as u32;
        let r4tw1 = ((t1.tw >> 32) & 0xffffff) as u32;
        let r4tw2 = ((t2.tw >> 32) & 0xffffff) as u32;
        let r5tw1 = ((t1.tw >> 8) & 0xffffff) as u32;
        let r5tw2 = ((t2.tw >> 8) & 0xffffff) as u32;

        let k123 = k1 << 16 | k2 << 8 | k3;
        let v1 = enc3(enc3(t1.pt, k123 ^ r1tw1), k456 ^ r2tw1);
        let v2 = enc3(enc3(t2.pt, k123 ^ r1tw2), k456 ^ r2tw2);
        let fwd_delta = v1 ^ v2;

        let k345 = (k3 << 16) | (k456 >> 8);
        let k671 = ((k456 & 0xff) << 16) | (k7 << 8) | k1;
        let w1 = dec3(dec3(t1.ct, k671 ^ r5tw1), k345 ^ r4tw1);
        let w2 = dec3(dec3(t2.ct, k671 ^ r5tw2), k345 ^ r4tw2);
        let mut db = inv_sub(((w1 >> 8) & 0xff) as u8) as u32;
        db ^= inv_sub(((w2 >> 8) & 0xff) as u8) as u32;
        db ^= w1;
        db ^= w2;
        db ^= w1 >> 16;
        db ^= w2 >> 16;
        db &= 0xff;
        let mut da = inv_sub((w1 >> 16) as u8) as u32;
        da ^= inv_sub((w2 >> 16) as u8) as u32;
        da ^= db;
        let mut dc = inv_sub((w1 & 0xff) as u8) as u32;
        dc ^= inv_sub((w2 & 0xff) as u8) as u32;
        dc ^= db;
        let bwd_delta = (da << 16) | (db << 8) | dc;

        assert_eq!(fwd_delta, bwd_delta);
    }

    #[test]
    fn should_stop_halts_before_exhausting_the_work_unit() {
        use std::cell::Cell;

        let key = 0xc2284a1ce7be2fu64;
        let tw1 = 0x543bd88000017550u64;
        let tw2 = 0x543bd88000017551u64;
        let t1 = Tuple::new(0x54e0cd, encrypt_sodark_3(5, 0x54e0cd, key, tw1), tw1);
        let t2 = Tuple::new(0x111111, encrypt_sodark_3(5, 0x111111, key, tw2), tw2);
        let k1 = ((key >> 48) & 0xff) as u16;
        let k3 = ((key >> 32) & 0xff) as u16;

        let mut scratch = Scratch::new();
        let calls = Cell::new(0u32);
        let mut found = Vec::new();
        run(
            (k1 << 8) | k3,
            t1,
            t2,
            &mut scratch,
            &|| {
                calls.set(calls.get() + 1);
                calls.get() > 1
            },
            |k| found.push(k),
        );
        assert!(found.is_empty());
    }
}
