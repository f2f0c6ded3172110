mod config;
mod domain;
mod engine;
mod error;
mod input;
mod output;
mod report;
mod store;
mod telemetry;

use std::path::PathBuf;

pub use config::Cli;
pub use domain::{DEVICE_TYPES, DeviceRecord, NORMAL_ERROR_RATE, RunStats, Verdict};
pub use engine::{PipelineConfig, ShardTable, default_workers};
pub use error::Error;
pub use input::parse_line;
pub use output::{UserApps, WriteRecord, encode};
pub use report::report;
pub use store::{DryRunStore, MemcacheStore, Store};
pub use telemetry::{LogConfig, LogFormat, LogOutput, setup_logging};

/// Loads installed-apps log files into a sharded key-value store and returns the counters of the run.
///
/// This is the single entry point of the pipeline. The gzip files in `paths` are read in order, every line is
/// parsed into a [`DeviceRecord`], and each record is written to the shard responsible for its device type under
/// the key `<device_type>:<device_id>`. Reading, parsing and writing run concurrently and are connected by bounded
/// queues sized by `config`.
///
/// # Error handling
///
/// Bad input lines and failed writes do not stop the run. Each of them is reported to the caller-supplied
/// `on_error` callback. Lines that fail to parse are counted in [`RunStats::errors`], records that were written
/// are counted in [`RunStats::processed`] and additionally reported to `on_success`. Use
/// [`RunStats::verdict`] to decide whether the run as a whole is acceptable.
///
/// An input file that cannot be opened or decompressed is fatal: the run is aborted and
/// [`Error::FileAccessFailed`] is returned instead of the counters.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use memc_load::{DryRunStore, Error, PipelineConfig, ShardTable, Verdict, load};
///
/// let files = vec![PathBuf::from("data/appsinstalled/20170929000000.tsv.gz")];
/// let stats = load(
///     &files,
///     &ShardTable::default(),
///     &DryRunStore,
///     &PipelineConfig::default(),
///     |e: Error| eprintln!("skipped: {e}"),
///     |written| println!("saved {written}"),
/// )
/// .unwrap();
/// assert_eq!(stats.verdict(), Verdict::Accepted);
/// ```
pub fn load(
    paths: &[PathBuf],
    shards: &ShardTable,
    store: &impl Store,
    config: &PipelineConfig,
    on_error: impl FnMut(Error) + Send,
    on_success: impl FnMut(WriteRecord) + Send,
) -> Result<RunStats, Error> {
    engine::run_pipeline(paths, shards, store, config, on_error, on_success)
}
