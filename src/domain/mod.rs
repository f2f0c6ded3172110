//! Module for the types defining the device domain.

mod record;
mod stats;

pub use record::DeviceRecord;
pub use stats::{NORMAL_ERROR_RATE, RunStats, Verdict};

/// Device-identifier types the loader knows a shard for
pub const DEVICE_TYPES: [&str; 4] = ["idfa", "gaid", "adid", "dvid"];
