//! Periodic progress sampling, replacing the original's polling loop
//! around a redrawn progress bar with a `tracing` event stream.

use std::thread;
use std::time::Duration;

use tracing::info;

use crate::dispatch::Dispatcher;
use crate::verify::ResultSink;

const SAMPLE_INTERVAL: Duration = Duration::from_millis(250);

/// Poll `dispatcher`/`sink` until the dispatcher reports exhausted (or a
/// shutdown was requested), logging a progress event every interval. Meant
/// to be spawned as one more thread inside the same `thread::scope` as the
/// workers it is reporting on; it exits on its own once there is nothing
/// left to report.
pub fn run(dispatcher: &Dispatcher, sink: &ResultSink) {
    loop {
        if dispatcher.is_exhausted() {
            let snapshot = dispatcher.snapshot();
            info!(
                percent = format!("{:.1}", snapshot.percent()),
                keys_found = sink.keys_found(),
                last_key_found = format!("{:014x}", sink.last_key_found()),
                "attack complete"
            );
            return;
        }
        let snapshot = dispatcher.snapshot();
        info!(
            percent = format!("{:.1}", snapshot.percent()),
            done = snapshot.done,
            total = snapshot.total,
            keys_found = sink.keys_found(),
            last_key_found = format!("{:014x}", sink.last_key_found()),
            "progress"
        );
        thread::sleep(SAMPLE_INTERVAL);
    }
}
