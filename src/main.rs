use anyhow::{Result, bail};
use clap::Parser;
use memc_load::{
    Cli, DryRunStore, Error, MemcacheStore, NORMAL_ERROR_RATE, Verdict, WriteRecord, load, report,
    setup_logging,
};
use tracing::{info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_config())?;
    info!(?cli, "memc-load started");

    let files = cli.input_files()?;
    if files.is_empty() {
        warn!(pattern = %cli.pattern, "no input files match the pattern");
    }

    let shards = cli.shard_table();
    let config = cli.pipeline_config();
    let stats = if cli.dry {
        load(&files, &shards, &DryRunStore, &config, handle_error, handle_written)?
    } else {
        let store = MemcacheStore::new(cli.timeout);
        load(&files, &shards, &store, &config, handle_error, handle_written)?
    };

    match report(&stats) {
        Verdict::Accepted => Ok(()),
        Verdict::Rejected => bail!(
            "high error rate ({:.4} >= {NORMAL_ERROR_RATE}), load failed",
            stats.error_rate()
        ),
    }
}

// Parse errors are bad input, everything else is a problem on our side
fn handle_error(error: Error) {
    if error.is_parse_error() {
        tracing::warn!("{error}")
    } else {
        tracing::error!("{error}")
    }
}

fn handle_written(record: WriteRecord) {
    tracing::debug!("saved to memcache {record}")
}
