//! `cracker <rounds> <infile> <outfile>`: recover a 56-bit SoDark key from
//! a file of known `(plaintext, ciphertext, tweak)` tuples.

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sodark_cracker::config::RunConfig;
use sodark_cracker::error::CrackError;
use sodark_cracker::io::{create_output, open_input};
use sodark_cracker::pair::PairStore;
use sodark_cracker::run::CrackRun;
use sodark_cracker::tuple::TupleStore;
use sodark_cracker::verify::ResultSink;
use sodark_cracker::worker::run_crack;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(std::env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.exit_code() == 0 {
                info!(error = %e, "completed with no keys found");
            } else {
                error!(error = %e, "cracker failed");
            }
            eprintln!("{e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(args: Vec<String>) -> sodark_cracker::error::Result<()> {
    let [_, rounds, infile, outfile] = <[String; 4]>::try_from(args).map_err(|_| {
        CrackError::usage("expected exactly 3 arguments: <rounds> <infile> <outfile>")
    })?;

    let rounds: u32 = rounds
        .parse()
        .map_err(|_| CrackError::usage(format!("rounds must be an integer, got {rounds:?}")))?;
    if !(2..=8).contains(&rounds) {
        return Err(CrackError::usage(format!("rounds must be in 2..=8, got {rounds}")));
    }

    let reader = open_input(&infile)?;
    let tuples = TupleStore::load(reader)?;
    info!(rounds, tuples = tuples.len(), infile, "loaded tuples");

    let pairs = if rounds >= 6 {
        let pairs = PairStore::filter(&tuples, rounds);
        if pairs.is_empty() {
            info!(rounds, "no candidate pairs survived the filter");
        }
        pairs
    } else {
        PairStore::default()
    };

    let output = create_output(&outfile)?;
    let sink = ResultSink::create(output);
    let run = CrackRun::new(rounds, tuples, pairs, sink, RunConfig::default());

    run_crack(&run)?;
    info!(keys_found = run.sink.keys_found(), outfile, "run complete");
    Ok(())
}
