//! Module defining the command line options and the configuration values derived from them

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    engine::{PipelineConfig, ShardTable, default_workers},
    telemetry::{LogConfig, LogFormat, LogOutput},
};

/// Loads installed-apps logs into memcached, sharded by device type.
#[derive(Parser, Debug)]
#[command(name = "memc-load", version, about, long_about = None)]
pub struct Cli {
    /// Glob pattern of the gzip-compressed input files.
    #[arg(long, default_value = "data/appsinstalled/*.tsv.gz")]
    pub pattern: String,

    /// memcached address for `idfa` devices.
    #[arg(long, default_value = "127.0.0.1:33013")]
    pub idfa: String,

    /// memcached address for `gaid` devices.
    #[arg(long, default_value = "127.0.0.1:33014")]
    pub gaid: String,

    /// memcached address for `adid` devices.
    #[arg(long, default_value = "127.0.0.1:33015")]
    pub adid: String,

    /// memcached address for `dvid` devices.
    #[arg(long, default_value = "127.0.0.1:33016")]
    pub dvid: String,

    /// Log destination: `stdout` or a file path.
    #[arg(short = 'l', long = "log-output", default_value = "stdout")]
    pub log_output: LogOutput,

    /// Log line format.
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Log at debug level.
    #[arg(short = 'X', long)]
    pub debug: bool,

    /// Parse and encode everything but do not write to memcached.
    #[arg(long)]
    pub dry: bool,

    /// Number of writer threads.
    #[arg(long, default_value_t = default_workers())]
    pub workers: usize,

    /// Capacity of the queues between the pipeline stages.
    #[arg(long, default_value_t = 1024)]
    pub queue_capacity: usize,

    /// memcached socket timeout in seconds.
    #[arg(long, default_value = "3", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Prefix every fully read input file with a dot so the next run skips it.
    #[arg(long)]
    pub rename_processed: bool,
}

impl Cli {
    pub fn shard_table(&self) -> ShardTable {
        ShardTable::new(&self.idfa, &self.gaid, &self.adid, &self.dvid)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            workers: self.workers,
            queue_capacity: self.queue_capacity,
            rename_processed: self.rename_processed,
        }
    }

    /// Dry runs always log at debug level, showing what would have been written.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            output: self.log_output.clone(),
            format: self.log_format,
            debug: self.debug || self.dry,
        }
    }

    /// Resolves the pattern into the sorted list of input files. Hidden (dot-prefixed) files are not matched.
    pub fn input_files(&self) -> Result<Vec<PathBuf>> {
        let options = glob::MatchOptions {
            require_literal_leading_dot: true,
            ..Default::default()
        };
        let mut files = glob::glob_with(&self.pattern, options)
            .with_context(|| format!("invalid file pattern: {}", self.pattern))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("unable to enumerate files from pattern: {}", self.pattern))?;
        files.sort();
        Ok(files)
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number of seconds"))?;
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|timeout| !timeout.is_zero())
        .ok_or_else(|| format!("`{raw}` is not a positive number of seconds"))
}
