//! Module rendering the outcome of a run

use tracing::{error, info};

use crate::domain::{NORMAL_ERROR_RATE, RunStats, Verdict};

/// Logs the counters of a finished run and returns whether the run is accepted.
pub fn report(stats: &RunStats) -> Verdict {
    let error_rate = stats.error_rate();
    let verdict = stats.verdict();

    match verdict {
        Verdict::Accepted => info!(
            processed = stats.processed,
            errors = stats.errors,
            error_rate,
            "Acceptable error rate. Successful load"
        ),
        Verdict::Rejected => error!(
            processed = stats.processed,
            errors = stats.errors,
            error_rate,
            threshold = NORMAL_ERROR_RATE,
            "High error rate. Failed load"
        ),
    }

    verdict
}
