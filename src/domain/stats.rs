//! Module defining the statistics gathered over one run and the verdict derived from them

use std::fmt;
use std::ops::AddAssign;

/// Runs whose error rate reaches this value are rejected.
pub const NORMAL_ERROR_RATE: f64 = 0.01;

/// Counters of one run.
///
/// `processed` counts records written to the store, `errors` counts lines that failed to parse.
/// Write failures are counted by neither.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub processed: u64,
    pub errors: u64,
}

impl RunStats {
    pub fn new(processed: u64, errors: u64) -> Self {
        Self { processed, errors }
    }

    /// Ratio of parse errors to written records. A run that wrote nothing has a rate of `1.0`.
    pub fn error_rate(&self) -> f64 {
        if self.processed == 0 {
            1.0
        } else {
            self.errors as f64 / self.processed as f64
        }
    }

    pub fn verdict(&self) -> Verdict {
        if self.error_rate() < NORMAL_ERROR_RATE {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }
}

impl AddAssign for RunStats {
    fn add_assign(&mut self, other: Self) {
        self.processed += other.processed;
        self.errors += other.errors;
    }
}

/// Outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "accepted"),
            Verdict::Rejected => write!(f, "rejected"),
        }
    }
}
