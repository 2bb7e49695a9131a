//! Work-unit dispatch shared by every worker thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

const WORK_SPACE: u32 = 0x1_0000;

/// One unit of work handed to a worker: a 16-bit outer guess, plus, for the
/// 6/7/8-round attacks, the index of the tuple pair it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkUnit {
    pub value: u16,
    pub pair_index: Option<usize>,
}

/// Outcome of a dispatch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Unit(WorkUnit),
    Exhausted,
}

#[derive(Debug)]
struct Counters {
    next: u32,
    next_pair: u32,
}

/// Shared work-unit counter, replacing the original's three separate
/// mutexes with one lock around the two counters it actually guards; the
/// shutdown flag is a plain atomic so it can be polled without contention.
pub struct Dispatcher {
    counters: Mutex<Counters>,
    num_pairs: u32,
    exit: AtomicBool,
}

impl Dispatcher {
    pub fn new(num_pairs: usize) -> Self {
        Dispatcher {
            counters: Mutex::new(Counters { next: 0, next_pair: 0 }),
            num_pairs: num_pairs.max(1) as u32,
            exit: AtomicBool::new(false),
        }
    }

    /// Request the next work unit. Safe for any number of concurrent callers.
    pub fn request(&self) -> Dispatch {
        if self.exit.load(Ordering::Relaxed) {
            return Dispatch::Exhausted;
        }

        let mut counters = self.counters.lock().expect("dispatcher lock poisoned");
        if counters.next_pair >= self.num_pairs {
            return Dispatch::Exhausted;
        }

        let pair = counters.next_pair;
        let value = counters.next;
        counters.next += 1;
        if counters.next >= WORK_SPACE {
            counters.next = 0;
            counters.next_pair += 1;
        }

        Dispatch::Unit(WorkUnit {
            value: value as u16,
            pair_index: Some(pair as usize),
        })
    }

    pub fn shutdown(&self) {
        self.exit.store(true, Ordering::Relaxed);
    }

    pub fn is_shutdown(&self) -> bool {
        self.exit.load(Ordering::Relaxed)
    }

    /// `true` once every work unit has been handed out (or a shutdown was
    /// requested), without consuming one. Lets a progress reporter poll
    /// completion without competing with workers for units.
    pub fn is_exhausted(&self) -> bool {
        if self.exit.load(Ordering::Relaxed) {
            return true;
        }
        let counters = self.counters.lock().expect("dispatcher lock poisoned");
        counters.next_pair >= self.num_pairs
    }

    /// A point-in-time read of progress through the work-unit space, for
    /// the progress reporter to log; never blocks a worker's `request`.
    pub fn snapshot(&self) -> Progress {
        let counters = self.counters.lock().expect("dispatcher lock poisoned");
        let done = (counters.next_pair as u64) * (WORK_SPACE as u64) + counters.next as u64;
        let total = (self.num_pairs as u64) * (WORK_SPACE as u64);
        Progress { done, total }
    }
}

/// A point-in-time read of how much of the work-unit space has been handed
/// out. `done`/`total` count individual units, not pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: u64,
    pub total: u64,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.done as f64 / self.total as f64) * 100.0
        }
    }
}
