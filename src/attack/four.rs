//! Four-round hash-indexed meet-in-the-middle attack.
//!
//! One work unit fixes `(k2, k3)`. An inner table keyed by `(k4, app1^app2)`
//! is built once from the decryption side (`2^16` entries across `k4, k5`)
//! and then probed from the encryption side (`2^16` guesses across `k1, k4`),
//! turning what would be a `2^32` double loop into two `2^16` passes linked
//! by a hash table. The original links survivors with an intrusive pointer
//! list sized to the whole address space; [`Scratch`] keeps the same shape
//! as a flat arena indexed by `i32`, with `-1` standing in for `NULL`.

use crate::cipher::{dec3, enc3};
use crate::sbox::{inv_sub, sub};
use crate::tuple::Tuple;

const TABLE_SIZE: usize = 0x1_0000;

#[derive(Debug, Clone, Copy)]
struct Record {
    k5: u8,
    app1: u8,
    app2: u8,
    bpp1: u8,
    bpp2: u8,
    cpp1: u8,
    cpp2: u8,
    next: i32,
}

impl Default for Record {
    fn default() -> Self {
        Record { k5: 0, app1: 0, app2: 0, bpp1: 0, bpp2: 0, cpp1: 0, cpp2: 0, next: -1 }
    }
}

/// Per-thread working memory for the 4-round kernel, allocated once and
/// reused across every `(k2, k3)` work unit it processes.
pub struct Scratch {
    heads: Vec<i32>,
    records: Vec<Record>,
}

impl Scratch {
    pub fn new() -> Self {
        Scratch { heads: vec![-1; TABLE_SIZE], records: vec![Record::default(); TABLE_SIZE] }
    }
}

impl Default for Scratch {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the 4-round attack for the work unit `k23 = (k2 << 8) | k3`.
pub fn run(k23: u16, t1: Tuple, t2: Tuple, scratch: &mut Scratch, mut on_candidate: impl FnMut(u64)) {
    let k2 = (k23 >> 8) as u8;
    let k3 = (k23 & 0xff) as u8;

    let r1tw1 = (t1.tw >> 40) as u32;
    let r1tw2 = (t2.tw >> 40) as u32;
    let r4tw1 = ((t1.tw >> 32) & 0xffffff) as u32;
    let r4tw2 = ((t2.tw >> 32) & 0xffffff) as u32;
    let tw11 = ((t1.tw >> 56) & 0xff) as u8;
    let tw14 = ((t1.tw >> 32) & 0xff) as u8;
    let tw15 = ((t1.tw >> 24) & 0xff) as u8;
    let tw16 = ((t1.tw >> 16) & 0xff) as u8;
    let tw17 = ((t1.tw >> 8) & 0xff) as u8;
    let tw18 = (t1.tw & 0xff) as u8;
    let tw21 = ((t2.tw >> 56) & 0xff) as u8;
    let tw24 = ((t2.tw >> 32) & 0xff) as u8;
    let tw25 = ((t2.tw >> 24) & 0xff) as u8;
    let tw26 = ((t2.tw >> 16) & 0xff) as u8;
    let tw27 = ((t2.tw >> 8) & 0xff) as u8;
    let tw28 = (t2.tw & 0xff) as u8;

    scratch.heads.iter_mut().for_each(|h| *h = -1);

    for k45 in 0u32..0x1_0000 {
        let k4 = (k45 >> 8) as u8;
        let k5 = (k45 & 0xff) as u8;
        let k345 = ((k3 as u32) << 16) | k45;

        let r31 = dec3(t1.ct, k345 ^ r4tw1);
        let r32 = dec3(t2.ct, k345 ^ r4tw2);
        let (r31a, r31b, r31c) = (((r31 >> 16) & 0xff) as u8, ((r31 >> 8) & 0xff) as u8, (r31 & 0xff) as u8);
        let (r32a, r32b, r32c) = (((r32 >> 16) & 0xff) as u8, ((r32 >> 8) & 0xff) as u8, (r32 & 0xff) as u8);

        let bpp1 = inv_sub(r31b) ^ r31a ^ r31c ^ k2 ^ tw11;
        let bpp2 = inv_sub(r32b) ^ r32a ^ r32c ^ k2 ^ tw21;
        let app1 = inv_sub(r31a) ^ bpp1 ^ tw17;
        let app2 = inv_sub(r32a) ^ bpp2 ^ tw27;
        let cpp1 = inv_sub(r31c) ^ bpp1 ^ tw18;
        let cpp2 = inv_sub(r32c) ^ bpp2 ^ tw28;

        let addr = (k4 as usize) * 256 + (app1 ^ app2) as usize;
        scratch.records[k45 as usize] =
            Record { k5, app1, app2, bpp1, bpp2, cpp1, cpp2, next: scratch.heads[addr] };
        scratch.heads[addr] = k45 as i32;
    }

    for k1 in 0u32..256 {
        let k123 = (k1 << 16) | ((k2 as u32) << 8) | k3 as u32;
        let r11 = enc3(t1.pt, k123 ^ r1tw1);
        let r12 = enc3(t2.pt, k123 ^ r1tw2);
        let r11a = (r11 >> 16) as u8;
        let r11b = ((r11 >> 8) & 0xff) as u8;
        let r12a = (r12 >> 16) as u8;
        let r12b = ((r12 >> 8) & 0xff) as u8;
        let r11c = (r11 & 0xff) as u8;
        let r12c = (r12 & 0xff) as u8;

        for k4 in 0u32..256 {
            let app1 = sub(r11a ^ r11b ^ (k4 as u8) ^ tw14);
            let app2 = sub(r12a ^ r12b ^ (k4 as u8) ^ tw24);
            let mut idx = scratch.heads[(k4 as usize) * 256 + (app1 ^ app2) as usize];
            while idx != -1 {
                let rec = scratch.records[idx as usize];
                let cpp1 = sub(r11b ^ r11c ^ rec.k5 ^ tw15);
                let cpp2 = sub(r12b ^ r12c ^ rec.k5 ^ tw25);
                let k11 = cpp1 ^ rec.cpp1;
                let k12 = cpp2 ^ rec.cpp2;
                let k61 = r11b ^ app1 ^ cpp1 ^ tw16 ^ inv_sub(rec.bpp1);
                let k62 = r12b ^ app2 ^ cpp2 ^ tw26 ^ inv_sub(rec.bpp2);
                let k71 = app1 ^ rec.app1;
                let k72 = app2 ^ rec.app2;
                if k11 == k12 && k61 == k62 && k71 == k72 {
                    let key = (k123 as u64) << 32
                        | (k4 as u64) << 24
                        | (rec.k5 as u64) << 16
                        | (k61 as u64) << 8
                        | k71 as u64;
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
    fn recovers_a_known_key_from_its_work_unit() {
        let key = 0xc2284a1ce7be2fu64;
        let tw1 = 0x543bd88000017550u64;
        let tw2 = 0x543bd88000017551u64;
        let t1 = Tuple::new(0x54e0cd, encrypt_sodark_3(4, 0x54e0cd, key, tw1), tw1);
        let t2 = Tuple::new(0x111111, encrypt_sodark_3(4, 0x111111, key, tw2), tw2);

        let k2 = ((key >> 40) & 0xff) as u16;
        let k3 = ((key >> 32) & 0xff) as u16;
        let k23 = (k2 << 8) | k3;

        let mut scratch = Scratch::new();
        let mut found = Vec::new();
        run(k23, t1, t2, &mut scratch, |k| found.push(k));

        assert!(found.contains(&key));
        for k in &found {
            assert_eq!(encrypt_sodark_3(4, t1.pt, *k, t1.tw), t1.ct);
            assert_eq!(encrypt_sodark_3(4, t2.pt, *k, t2.tw), t2.ct);
        }
    }

    #[test]
    fn scratch_is_reusable_across_consecutive_work_units() {
        let key = 0xc2284a1ce7be2fu64;
        let tw1 = 0x543bd88000017550u64;
        let tw2 = 0x543bd88000017551u64;
        let t1 = Tuple::new(0x54e0cd, encrypt_sodark_3(4, 0x54e0cd, key, tw1), tw1);
        let t2 = Tuple::new(0x111111, encrypt_sodark_3(4, 0x111111, key, tw2), tw2);

        let k2 = ((key >> 40) & 0xff) as u16;
        let k3 = ((key >> 32) & 0xff) as u16;
        let k23 = (k2 << 8) | k3;

        let mut scratch = Scratch::new();
        let mut warm_up = Vec::new();
        run(k23 ^ 1, t1, t2, &mut scratch, |k| warm_up.push(k));

        let mut found = Vec::new();
        run(k23, t1, t2, &mut scratch, |k| found.push(k));
        assert!(found.contains(&key));
    }
}
