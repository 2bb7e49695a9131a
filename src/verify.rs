//! Candidate verification and result output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::info;

use crate::cipher::encrypt_sodark_3;
use crate::error::Result;
use crate::tuple::Tuple;

/// Re-encrypts every loaded tuple under a candidate key and accepts only if
/// all of them match. Pure with respect to the candidate; holds no state.
pub struct Verifier<'a> {
    rounds: u32,
    tuples: &'a [Tuple],
}

impl<'a> Verifier<'a> {
    pub fn new(rounds: u32, tuples: &'a [Tuple]) -> Self {
        Verifier { rounds, tuples }
    }

    /// `true` iff `key` reproduces every tuple's ciphertext from its
    /// plaintext and tweak, short-circuiting on the first mismatch.
    pub fn verify(&self, key: u64) -> bool {
        self.tuples
            .iter()
            .all(|t| encrypt_sodark_3(self.rounds, t.pt, key, t.tw) == t.ct)
    }
}

/// Append-only output of verified keys, guarded by one lock so concurrent
/// workers never interleave partial lines.
pub struct ResultSink {
    writer: Mutex<BufWriter<File>>,
    keys_found: AtomicU64,
    last_key_found: AtomicU64,
}

impl ResultSink {
    pub fn create(file: File) -> Self {
        ResultSink {
            writer: Mutex::new(BufWriter::new(file)),
            keys_found: AtomicU64::new(0),
            last_key_found: AtomicU64::new(0),
        }
    }

    /// Verify `key` against `tuples` under `rounds` and, if it checks out,
    /// append it to the output file. Returns whether it was accepted.
    pub fn try_emit(&self, rounds: u32, tuples: &[Tuple], key: u64) -> Result<bool> {
        if !Verifier::new(rounds, tuples).verify(key) {
            return Ok(false);
        }
        self.emit_unchecked(key)?;
        Ok(true)
    }

    /// Append `key` without re-verifying it. Used when a caller has already
    /// confirmed the key (e.g. a worker that just ran [`Verifier::verify`]).
    pub fn emit_unchecked(&self, key: u64) -> Result<()> {
        let mut writer = self.writer.lock().expect("result sink lock poisoned");
        writeln!(writer, "{key:014x}")?;
        writer.flush()?;
        drop(writer);
        self.keys_found.fetch_add(1, Ordering::Relaxed);
        self.last_key_found.store(key, Ordering::Relaxed);
        info!(key = format!("{key:014x}"), "verified key");
        Ok(())
    }

    pub fn keys_found(&self) -> u64 {
        self.keys_found.load(Ordering::Relaxed)
    }

    /// The most recently accepted key, or `0` if none has been found yet.
    /// Mirrors the original's `g_lastkeyfound`, read by the progress sampler.
    pub fn last_key_found(&self) -> u64 {
        self.last_key_found.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::encrypt_sodark_3;
    use tempfile::NamedTempFile;

    #[test]
    fn verifier_accepts_correct_key_and_rejects_wrong_one() {
        let key = 0xc2284a1ce7be2f;
        let tw = 0x543bd88000017550;
        let pt = 0x54e0cd;
        let ct = encrypt_sodark_3(3, pt, key, tw);
        let tuples = vec![Tuple::new(pt, ct, tw)];

        let verifier = Verifier::new(3, &tuples);
        assert!(verifier.verify(key));
        assert!(!verifier.verify(key ^ 1));
    }

    #[test]
    fn sink_appends_verified_keys_only() {
        let file = NamedTempFile::new().unwrap();
        let sink = ResultSink::create(file.reopen().unwrap());

        let key = 0xc2284a1ce7be2f;
        let tw = 0x543bd88000017550;
        let pt = 0x54e0cd;
        let ct = encrypt_sodark_3(3, pt, key, tw);
        let tuples = vec![Tuple::new(pt, ct, tw)];

        assert!(sink.try_emit(3, &tuples, key).unwrap());
        assert!(!sink.try_emit(3, &tuples, key ^ 1).unwrap());
        assert_eq!(sink.keys_found(), 1);
        assert_eq!(sink.last_key_found(), key);

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, format!("{key:014x}\n"));
    }

    #[test]
    fn last_key_found_tracks_the_most_recent_acceptance() {
        let file = NamedTempFile::new().unwrap();
        let sink = ResultSink::create(file.reopen().unwrap());
        assert_eq!(sink.last_key_found(), 0);

        let tw = 0x543bd88000017550;
        let pt1 = 0x54e0cd;
        let key1 = 0xc2284a1ce7be2f;
        let ct1 = encrypt_sodark_3(3, pt1, key1, tw);
        assert!(sink.try_emit(3, &[Tuple::new(pt1, ct1, tw)], key1).unwrap());
        assert_eq!(sink.last_key_found(), key1);

        let pt2 = 0x111111;
        let key2 = 0xdeadbeef1234;
        let ct2 = encrypt_sodark_3(3, pt2, key2, tw);
        assert!(sink.try_emit(3, &[Tuple::new(pt2, ct2, tw)], key2).unwrap());
        assert_eq!(sink.last_key_found(), key2);
    }
}
