// src/engine/runtime.rs

use std::fmt;
use std::io::Write;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::tracker::TrackerState;

use super::core::{PassSummary, Tracker};

/// Totals over a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// State after the last completed pass.
    pub state: TrackerState,
    pub passes: usize,
    pub emitted: usize,
}

impl RunReport {
    fn record(&mut self, summary: &PassSummary) {
        self.passes += 1;
        self.emitted += summary.emitted;
    }
}

/// Drives a [`Tracker`] either once or on a fixed interval.
///
/// Cancellation is only observed between passes: a pass that has started
/// always finishes, including its state write.
pub struct Runtime<W: Write> {
    tracker: Tracker,
    out: W,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl<W: Write> fmt::Debug for Runtime<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("tracker", &self.tracker)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl<W: Write> Runtime<W> {
    pub fn new(
        tracker: Tracker,
        out: W,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            tracker,
            out,
            poll_interval,
            cancel,
        }
    }

    /// Token that stops [`Runtime::run_forever`] after the in-flight pass.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Load the persisted state through the tracker's store.
    pub fn load_state(&self) -> TrackerState {
        self.tracker.load_state()
    }

    /// A single pass.
    pub fn run_once(&mut self, state: TrackerState) -> RunReport {
        let (state, summary) = self.tracker.run_pass(state, &mut self.out);
        let mut report = RunReport {
            state,
            ..RunReport::default()
        };
        report.record(&summary);
        report
    }

    /// Repeat passes until the cancellation token fires.
    pub async fn run_forever(mut self, state: TrackerState) -> RunReport {
        info!(
            dir = ?self.tracker.options().data_dir,
            interval_secs = self.poll_interval.as_secs_f64(),
            "starting continuous csv monitoring"
        );

        let mut report = RunReport {
            state,
            ..RunReport::default()
        };

        while !self.cancel.is_cancelled() {
            let state = std::mem::take(&mut report.state);
            let (state, summary) = self.tracker.run_pass(state, &mut self.out);
            report.state = state;
            report.record(&summary);
            debug!(pass = report.passes, ?summary, "pass complete");

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = sleep(self.poll_interval) => {}
            }
        }

        info!(passes = report.passes, records = report.emitted, "shutting down csv monitoring");
        report
    }
}
