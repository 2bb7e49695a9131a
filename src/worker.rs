//! The worker pool: spawns one thread per available CPU for r >= 4 and
//! drives each through the dispatcher until the work space is exhausted.
//! r = 2 and r = 3 run on the calling thread instead, since their total
//! work is small enough that spawning a pool would only add overhead.

use std::thread;

use tracing::{info, warn};

use crate::attack::{self, Attack};
use crate::dispatch::Dispatch;
use crate::error::{CrackError, Result};
use crate::progress;
use crate::run::CrackRun;
use crate::tuple::Tuple;

/// Run the attack selected by `run.rounds` to completion (or until an
/// external shutdown is observed), emitting every verified key to the sink.
pub fn run_crack(run: &CrackRun) -> Result<()> {
    let attack = Attack::for_rounds(run.rounds)?;

    if attack.uses_pairs() && run.pairs.is_empty() {
        return Err(CrackError::no_candidate_pairs(run.rounds));
    }

    match attack {
        Attack::Two => run_two_or_three(run, |t1, t2, on_candidate| {
            attack::two::run(t1, t2, on_candidate)
        }),
        Attack::Three => run_two_or_three(run, |t1, t2, on_candidate| {
            attack::three::run(t1, t2, on_candidate)
        }),
        Attack::Four | Attack::Five => run_pooled(run, attack),
        Attack::SixSevenEight(rounds) => run_pooled_pairs(run, rounds),
    }
}

fn run_two_or_three(
    run: &CrackRun,
    kernel: impl Fn(Tuple, Tuple, &mut dyn FnMut(u64)),
) -> Result<()> {
    let (t1, t2) = run
        .primary_pair()
        .ok_or_else(|| CrackError::insufficient_tuples(run.rounds, run.tuples.len()))?;

    let mut emit_err = None;
    kernel(t1, t2, &mut |key| {
        if emit_err.is_some() {
            return;
        }
        match run.sink.try_emit(run.rounds, run.tuples.as_slice(), key) {
            Ok(_) => {}
            Err(e) => emit_err = Some(e),
        }
    });
    if let Some(e) = emit_err {
        return Err(e);
    }

    info!(rounds = run.rounds, keys_found = run.sink.keys_found(), "attack complete");
    Ok(())
}

fn run_pooled(run: &CrackRun, attack: Attack) -> Result<()> {
    let (t1, t2) = run
        .primary_pair()
        .ok_or_else(|| CrackError::insufficient_tuples(run.rounds, run.tuples.len()))?;
    let thread_count = run.config.resolved_thread_count();
    info!(rounds = run.rounds, thread_count, "spawning worker pool");

    thread::scope(|scope| {
        scope.spawn(move || progress::run(&run.dispatcher, &run.sink));

        for _ in 0..thread_count {
            scope.spawn(move || worker_loop(run, attack, t1, t2));
        }
    });

    Ok(())
}

fn worker_loop(run: &CrackRun, attack: Attack, t1: Tuple, t2: Tuple) {
    let mut scratch = attack.new_scratch();
    loop {
        let work = match run.dispatcher.request() {
            Dispatch::Unit(w) => w,
            Dispatch::Exhausted => return,
        };

        let emit = |key: u64| {
            if let Err(e) = run.sink.try_emit(run.rounds, run.tuples.as_slice(), key) {
                warn!(error = %e, "failed to emit candidate key");
            }
        };

        match (&attack, &mut scratch) {
            (Attack::Four, attack::Scratch::Four(s)) => {
                attack::four::run(work.value, t1, t2, s, emit)
            }
            (Attack::Five, attack::Scratch::Five(s)) => attack::five::run(
                work.value,
                t1,
                t2,
                s,
                &|| run.dispatcher.is_shutdown(),
                emit,
            ),
            _ => unreachable!("scratch kind always matches its attack"),
        }
    }
}

fn run_pooled_pairs(run: &CrackRun, rounds: u32) -> Result<()> {
    let thread_count = run.config.resolved_thread_count();
    info!(rounds, thread_count, pairs = run.pairs.len(), "spawning worker pool");

    thread::scope(|scope| {
        scope.spawn(move || progress::run(&run.dispatcher, &run.sink));

        for _ in 0..thread_count {
            scope.spawn(move || pair_worker_loop(run, rounds));
        }
    });

    Ok(())
}

fn pair_worker_loop(run: &CrackRun, rounds: u32) {
    loop {
        let work = match run.dispatcher.request() {
            Dispatch::Unit(w) => w,
            Dispatch::Exhausted => return,
        };
        let pair = &run.pairs.as_slice()[work.pair_index.expect("6/7/8 work units carry a pair index")];

        attack::sixseveneight::run(rounds, work.value, pair, &|| run.dispatcher.is_shutdown(), |key| {
            if let Err(e) = run.sink.try_emit(rounds, run.tuples.as_slice(), key) {
                warn!(error = %e, "failed to emit candidate key");
            }
        });
    }
}
