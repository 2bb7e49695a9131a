//! Six/seven/eight-round differential-filter attack.
//!
//! One work unit fixes `(k1, k2)`. The kernel walks the full key schedule
//! forward under the guessed bytes, checking a one-byte distinguisher at
//! round 6 before committing to the `k7` search; for r=8 the outer `k3`
//! guess is narrowed ahead of time to [`Pair::k3_candidates`] rather than
//! the full `0..256`, since the pair filter already ruled the rest out.
//!
//! The round count only changes which bytes the distinguisher reads from
//! (`g_nrounds` in the source this is grounded on is a global; here it is
//! the caller's own field), so the same loop body serves all three rounds.

use crate::cipher::encrypt_sodark_3;
use crate::pair::Pair;
use crate::sbox::sub;

/// Run the 6/7/8-round attack for the work unit `k12 = (k1 << 8) | k2`
/// against `pair`, calling `should_stop` once per `k3` guess.
pub fn run(
    rounds: u32,
    k12: u16,
    pair: &Pair,
    should_stop: &dyn Fn() -> bool,
    mut on_candidate: impl FnMut(u64),
) {
    let (t1, t2) = (pair.t1, pair.t2);
    let k1 = (k12 >> 8) as u8;
    let k2 = (k12 & 0xff) as u8;

    let a01 = ((t1.pt >> 16) & 0xff) as u8;
    let a02 = ((t2.pt >> 16) & 0xff) as u8;
    let b01 = ((t1.pt >> 8) & 0xff) as u8;
    let b02 = ((t2.pt >> 8) & 0xff) as u8;
    let c01 = (t1.pt & 0xff) as u8;
    let c02 = (t2.pt & 0xff) as u8;

    let t11 = ((t1.tw >> 56) & 0xff) as u8;
    let t12 = ((t2.tw >> 56) & 0xff) as u8;
    let t21 = ((t1.tw >> 48) & 0xff) as u8;
    let t22 = ((t2.tw >> 48) & 0xff) as u8;
    let t31 = ((t1.tw >> 40) & 0xff) as u8;
    let t32 = ((t2.tw >> 40) & 0xff) as u8;
    let t41 = ((t1.tw >> 32) & 0xff) as u8;
    let t42 = ((t2.tw >> 32) & 0xff) as u8;
    let t51 = ((t1.tw >> 24) & 0xff) as u8;
    let t52 = ((t2.tw >> 24) & 0xff) as u8;
    let t61 = ((t1.tw >> 16) & 0xff) as u8;
    let t62 = ((t2.tw >> 16) & 0xff) as u8;
    let t81 = (t1.tw & 0xff) as u8;
    let t82 = (t2.tw & 0xff) as u8;

    let a11 = sub(a01 ^ b01 ^ k1 ^ t11);
    let a12 = sub(a02 ^ b02 ^ k1 ^ t12);
    let c11 = sub(c01 ^ b01 ^ k2 ^ t21);
    let c12 = sub(c02 ^ b02 ^ k2 ^ t22);

    let k3_range: &[u8] = if rounds == 8 { &pair.k3_candidates } else { &FULL_BYTE_RANGE };

    for &k3 in k3_range {
        if should_stop() {
            return;
        }
        let b11 = sub(a11 ^ b01 ^ c11 ^ k3 ^ t31);
        let b12 = sub(a12 ^ b02 ^ c12 ^ k3 ^ t32);

        for k4 in 0u32..256 {
            let a21 = sub(a11 ^ b11 ^ k4 as u8 ^ t41);
            let a22 = sub(a12 ^ b12 ^ k4 as u8 ^ t42);

            for k5 in 0u32..256 {
                let c21 = sub(c11 ^ b11 ^ k5 as u8 ^ t51);
                let c22 = sub(c12 ^ b12 ^ k5 as u8 ^ t52);

                for k6 in 0u32..256 {
                    let b21 = sub(a21 ^ b11 ^ c21 ^ k6 as u8 ^ t61);
                    let b22 = sub(a22 ^ b12 ^ c22 ^ k6 as u8 ^ t62);
                    let c31 = sub(c21 ^ b21 ^ k1 ^ t81);
                    let c32 = sub(c22 ^ b22 ^ k1 ^ t82);
                    if (c31 ^ c32) != (t51 ^ t52) {
                        continue;
                    }

                    let pkey = (k1 as u64) << 48
                        | (k2 as u64) << 40
                        | (k3 as u64) << 32
                        | (k4 as u64) << 24
                        | (k5 as u64) << 16
                        | (k6 as u64) << 8;
                    for k7 in 0u32..256 {
                        let key = pkey | k7 as u64;
                        if encrypt_sodark_3(rounds, t1.pt, key, t1.tw) == t1.ct
                            && encrypt_sodark_3(rounds, t2.pt, key, t2.tw) == t2.ct
                        {
                            on_candidate(key);
                        }
                    }
                }
            }
        }
    }
}

const FULL_BYTE_RANGE: [u8; 256] = {
    let mut r = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        r[i] = i as u8;
        i += 1;
    }
    r
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple::Tuple;

    fn pair_for(rounds: u32, key: u64, tw1: u64, tw2: u64) -> Pair {
        let pt1 = 0x54e0cd;
        let pt2 = 0x111111;
        let ct1 = encrypt_sodark_3(rounds, pt1, key, tw1);
        let ct2 = encrypt_sodark_3(rounds, pt2, key, tw2);
        let k3_candidates = if rounds == 8 { vec![((key >> 32) & 0xff) as u8] } else { Vec::new() };
        Pair::new(Tuple::new(pt1, ct1, tw1), Tuple::new(pt2, ct2, tw2), k3_candidates)
    }

    #[test]
    fn recovers_a_known_key_at_round_six() {
        let key = 0xc2284a1ce7be2fu64;
        let tw1 = 0x543bd88000017550u64;
        let tw2 = 0x543bd88000017551u64;
        let pair = pair_for(6, key, tw1, tw2);

        let k12 = (((key >> 48) & 0xff) << 8 | (key >> 40) & 0xff) as u16;
        let mut found = Vec::new();
        run(6, k12, &pair, &|| false, |k| found.push(k));
        assert!(found.contains(&key));
    }

    #[test]
    fn round_eight_restricts_to_the_pairs_k3_candidates() {
        let key = 0xc2284a1ce7be2fu64;
        let tw1 = 0x1122_3344_5566_7788u64;
        let tw2 = 0x1122_3312_5566_7789u64;
        let pair = pair_for(8, key, tw1, tw2);
        assert_eq!(pair.k3_candidates, vec![((key >> 32) & 0xff) as u8]);

        let k12 = (((key >> 48) & 0xff) << 8 | (key >> 40) & 0xff) as u16;
        let mut found = Vec::new();
        run(8, k12, &pair, &|| false, |k| found.push(k));
        assert!(found.contains(&key));
    }

    #[test]
    fn should_stop_halts_before_exhausting_k3() {
        let key = 0xc2284a1ce7be2fu64;
        let tw1 = 0x543bd88000017550u64;
        let tw2 = 0x543bd88000017551u64;
        let pair = pair_for(6, key, tw1, tw2);
        let k12 = (((key >> 48) & 0xff) << 8 | (key >> 40) & 0xff) as u16;

        let mut found = Vec::new();
        run(6, k12, &pair, &|| true, |k| found.push(k));
        assert!(found.is_empty());
    }
}
