//! Deterministic tuple generators for tests and benches.
//!
//! Every generator here is seeded, never pulling from the OS RNG, so a
//! fixture built from a given seed reproduces byte-for-byte across runs and
//! machines.

use rand::RngCore;
use rand_chacha::ChaCha8Rng;
use rand::SeedableRng;

use crate::cipher::{decrypt_sodark_3, encrypt_sodark_3, encrypt_sodark_6};
use crate::tuple::Tuple;

/// `count` SoDark-3 tuples under `key`, plaintexts and tweaks drawn from a
/// `ChaCha8Rng` seeded with `seed`.
pub fn random_tuples_3(rounds: u32, key: u64, count: usize, seed: u64) -> Vec<Tuple> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let pt = rng.next_u32() & 0x00ff_ffff;
            let tw = rng.next_u64();
            let ct = encrypt_sodark_3(rounds, pt, key, tw);
            Tuple::new(pt, ct, tw)
        })
        .collect()
}

/// `count` SoDark-6 tuples under `key`.
pub fn random_tuples_6(rounds: u32, key: u64, count: usize, seed: u64) -> Vec<(u64, u64, u64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let pt = rng.next_u64() & 0x0000_ffff_ffff_ffff;
            let tw = rng.next_u64();
            let ct = encrypt_sodark_6(rounds, pt, key, tw);
            (pt, ct, tw)
        })
        .collect()
}

/// Two tuples whose tweaks agree everywhere except bits 24-31 (the "byte 5"
/// the r=6/7/8 pair filter's free byte lives in, counting tweak bytes 1-based
/// from the MSB as the original cipher's round-key derivation does), and
/// whose ciphertexts match exactly, satisfying the r=6 distinguisher.
pub fn tuples_with_free_tweak_byte5(rounds: u32, key: u64, seed: u64) -> (Tuple, Tuple) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    loop {
        let tw1 = rng.next_u64() & !0x0000_0000_ff00_0000;
        let free = (rng.next_u32() & 0xff) as u64;
        if free == 0 {
            continue;
        }
        let tw2 = tw1 | (free << 24);

        let pt1 = rng.next_u32() & 0x00ff_ffff;
        let ct = encrypt_sodark_3(rounds, pt1, key, tw1);
        // Decrypting the shared ciphertext under tw2 yields a pt2 that makes
        // ct1 == ct2 hold exactly, rather than searching for a collision.
        let pt2 = decrypt_sodark_3(rounds, ct, key, tw2);
        let t1 = Tuple::new(pt1, ct, tw1);
        let t2 = Tuple::new(pt2, ct, tw2);
        return (t1, t2);
    }
}

/// Format a SoDark-3 tuple as a `%06x %06x %016x` line, matching
/// [`crate::tuple::TupleStore::load`]'s expected format.
pub fn format_line_3(t: &Tuple) -> String {
    format!("{:06x} {:06x} {:016x}\n", t.pt, t.ct, t.tw)
}

/// Format a SoDark-6 tuple as a `%012x %012x %016x` line.
pub fn format_line_6(pt: u64, ct: u64, tw: u64) -> String {
    format!("{:012x} {:012x} {:016x}\n", pt, ct, tw)
}
