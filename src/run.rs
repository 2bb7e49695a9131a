//! The dependency bundle passed to every worker, replacing the process-wide
//! globals the original tool relied on.

use crate::config::RunConfig;
use crate::dispatch::Dispatcher;
use crate::pair::PairStore;
use crate::tuple::{Tuple, TupleStore};
use crate::verify::ResultSink;

/// Everything a worker thread needs to run its slice of one attack.
/// Built once in the setup phase, then shared read-only (beyond the
/// dispatcher and sink's own internal locking) across every worker.
pub struct CrackRun {
    pub rounds: u32,
    pub tuples: TupleStore,
    pub pairs: PairStore,
    pub dispatcher: Dispatcher,
    pub sink: ResultSink,
    pub config: RunConfig,
}

impl CrackRun {
    pub fn new(
        rounds: u32,
        tuples: TupleStore,
        pairs: PairStore,
        sink: ResultSink,
        config: RunConfig,
    ) -> Self {
        let num_pairs = if pairs.is_empty() { 1 } else { pairs.len() };
        CrackRun {
            rounds,
            tuples,
            pairs,
            dispatcher: Dispatcher::new(num_pairs),
            sink,
            config,
        }
    }

    /// The two tuples every r<=5 attack operates on directly.
    pub fn primary_pair(&self) -> Option<(Tuple, Tuple)> {
        self.tuples.require_distinct_pair(self.rounds).ok()
    }
}
