//! # sodark-cracker
//!
//! Round-reduced key-recovery cryptanalysis for the SoDark-3/SoDark-6
//! tweakable block ciphers (MIL-STD-188-141). Given a handful of known
//! `(plaintext, ciphertext, tweak)` tuples produced under a fixed 56-bit
//! key, recovers that key for attacks reduced to 2 through 8 rounds.
//!
//! ## Layout
//!
//! - [`cipher`] / [`sbox`]: the cipher primitives themselves.
//! - [`tuple`] / [`pair`]: the observations an attack consumes, and the
//!   round-6/7/8 pair filter that narrows them before the expensive search.
//! - [`attack`]: the five kernels, one per round-count bucket.
//! - [`dispatch`] / [`worker`] / [`progress`]: the concurrency layer that
//!   shards a kernel's work across threads and reports on it.
//! - [`verify`]: candidate re-encryption and the append-only result file.
//! - [`run`]: the dependency bundle ([`run::CrackRun`]) tying all of the
//!   above together for one attack invocation.

pub mod attack;
pub mod cipher;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fixtures;
pub mod io;
pub mod pair;
pub mod progress;
pub mod run;
pub mod sbox;
pub mod tuple;
pub mod verify;
pub mod worker;

pub use config::RunConfig;
pub use error::{CrackError, Result};
pub use pair::{Pair, PairStore};
pub use run::CrackRun;
pub use tuple::{Tuple, TupleStore};
pub use verify::ResultSink;
pub use worker::run_crack;
