//! Module focusing on the way lines and records are orchestrated between the pipeline threads
//!
//! ```text
//! reader thread --lines--> parser (calling thread) --records--> writer threads --> store
//!                                     |                               |
//!                                     +----------> callbacks <--------+
//! ```

use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, SyncSender, sync_channel},
    },
    thread::{Scope, ScopedJoinHandle},
};

use tracing::{debug, info, warn};

use crate::{
    Error,
    domain::{DeviceRecord, RunStats},
    engine::{PipelineConfig, ShardTable, logic::write_record},
    input::{dot_rename, parse_line, read_lines},
    output::WriteRecord,
    store::Store,
};

///
/// Reads all files, parses their lines and writes the resulting records to the store, returning the counters of the run.
///
/// Every stage runs on its own thread and hands its output over through a bounded queue. Records are sharded between
/// the writer threads by their key, so the writes of one device keep the order of the input.
///
/// A file that cannot be read aborts the run: the parser stops dispatching and the writers stop writing as soon as
/// the reader fails, and the read error is returned.
///
pub(crate) fn run_pipeline(
    paths: &[PathBuf],
    shards: &ShardTable,
    store: &impl Store,
    config: &PipelineConfig,
    on_error: impl FnMut(Error) + Send,
    on_success: impl FnMut(WriteRecord) + Send,
) -> Result<RunStats, Error> {
    let num_workers = config.workers.max(1);
    let capacity = config.queue_capacity;
    let aborted = AtomicBool::new(false);
    let aborted = &aborted;

    std::thread::scope(|s| {
        let (success_tx, error_tx) = spawn_callback_handlers(s, on_error, on_success, capacity);

        let (worker_senders, worker_handles) = spawn_writer_threads(
            s,
            shards,
            store,
            success_tx.clone(),
            error_tx.clone(),
            aborted,
            num_workers,
            capacity,
        );

        // The parser keeps a clone for parse errors
        let parser_error_tx = error_tx.clone();

        // Drop originals, writers and callback threads hold their own clones
        drop(success_tx);
        drop(error_tx);

        let (line_tx, line_rx) = sync_channel::<String>(capacity);
        let reader_handle = s.spawn(move || read_files(paths, config.rename_processed, line_tx, aborted));

        let errors = parse_lines(line_rx, &worker_senders, &parser_error_tx, aborted);

        // Signal EOF: drop all senders
        // → writers drain and exit → drop their success/error clones
        // → callback channels close → callback threads exit
        drop(worker_senders);
        drop(parser_error_tx);

        let mut stats = RunStats::new(0, errors);
        for handle in worker_handles {
            stats += handle.join().expect("writer thread does not panic");
        }

        reader_handle.join().expect("reader thread does not panic")?;

        Ok(stats)
    })
}

/// Parser stage: evaluates every line independently and dispatches the records. Returns the number of parse errors.
fn parse_lines(
    lines: Receiver<String>,
    worker_senders: &[SyncSender<DeviceRecord>],
    error_tx: &SyncSender<Error>,
    aborted: &AtomicBool,
) -> u64 {
    let mut errors = 0;

    for line in lines {
        if aborted.load(Ordering::Acquire) {
            warn!("reader failed, stopping dispatch");
            break;
        }
        match parse_line(&line) {
            Some(Ok(record)) => {
                let worker_idx = worker_index(&record, worker_senders.len());

                // Send fails only if the receiver was dropped (writer panicked);
                // the join() in the caller will surface that panic.
                let _ = worker_senders[worker_idx].send(record);
            }
            Some(Err(e)) => {
                errors += 1;
                // Send fails only if the callback thread panicked; surfaced at join().
                let _ = error_tx.send(e);
            }
            None => debug!(line = %line, "line without fields, skipping"),
        }
    }

    errors
}

// All records of one device go to the same writer
fn worker_index(record: &DeviceRecord, num_workers: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    record.device_type.hash(&mut hasher);
    record.device_id.hash(&mut hasher);
    (hasher.finish() % num_workers as u64) as usize
}

/// Reader stage: streams the data lines of all files, in file order.
fn read_files(
    paths: &[PathBuf],
    rename_processed: bool,
    lines: SyncSender<String>,
    aborted: &AtomicBool,
) -> Result<(), Error> {
    for path in paths {
        info!(path = %path.display(), "processing file");

        // raised while `lines` is still open, so the parser sees it before the queue closes
        let file_lines = read_lines(path).inspect_err(|_| aborted.store(true, Ordering::Release))?;

        let mut count = 0u64;
        for line in file_lines {
            if lines.send(line).is_err() {
                // parser is gone, its panic is surfaced by the scope
                return Ok(());
            }
            count += 1;
        }
        info!(path = %path.display(), lines = count, "finished reading file");

        if rename_processed {
            match dot_rename(path) {
                Ok(target) => {
                    info!(from = %path.display(), to = %target.display(), "renamed processed file")
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "unable to rename processed file")
                }
            }
        }
    }
    Ok(())
}

fn spawn_callback_handlers<'s, 'e>(
    s: &'s Scope<'s, 'e>,
    mut on_error: impl FnMut(Error) + Send + 's,
    mut on_success: impl FnMut(WriteRecord) + Send + 's,
    channel_capacity: usize,
) -> (SyncSender<WriteRecord>, SyncSender<Error>) {
    let (success_tx, success_rx) = sync_channel::<WriteRecord>(channel_capacity);
    let (error_tx, error_rx) = sync_channel::<Error>(channel_capacity);

    s.spawn(move || {
        // thread reporting the successful writes
        for record in success_rx {
            on_success(record)
        }
    });

    s.spawn(move || {
        // thread reporting parse and write errors
        for err in error_rx {
            on_error(err)
        }
    });

    (success_tx, error_tx)
}

fn spawn_writer_threads<'s, 'e, S: Store>(
    s: &'s Scope<'s, 'e>,
    shards: &'e ShardTable,
    store: &'e S,
    success_tx: SyncSender<WriteRecord>,
    error_tx: SyncSender<Error>,
    aborted: &'e AtomicBool,
    num_workers: usize,
    channel_capacity: usize,
) -> (
    Vec<SyncSender<DeviceRecord>>,
    Vec<ScopedJoinHandle<'s, RunStats>>,
) {
    let mut worker_senders = Vec::with_capacity(num_workers);
    let mut worker_handles = Vec::with_capacity(num_workers);

    for _ in 0..num_workers {
        let (record_tx, record_rx) = sync_channel::<DeviceRecord>(channel_capacity);
        let stx = success_tx.clone();
        let etx = error_tx.clone();

        let handle = s.spawn(move || write_records(record_rx, shards, store, &stx, &etx, aborted));

        worker_senders.push(record_tx);
        worker_handles.push(handle);
    }

    (worker_senders, worker_handles)
}

/// Writer stage: writes the records of one worker queue in order and counts the successful writes.
fn write_records(
    records: Receiver<DeviceRecord>,
    shards: &ShardTable,
    store: &impl Store,
    success_tx: &SyncSender<WriteRecord>,
    error_tx: &SyncSender<Error>,
    aborted: &AtomicBool,
) -> RunStats {
    let mut stats = RunStats::default();
    for record in records {
        if aborted.load(Ordering::Acquire) {
            break;
        }
        match write_record(&record, shards, store) {
            Ok(written) => {
                stats.processed += 1;
                // Send fails only if the callback thread panicked;
                // the caller's join() on the scope will surface it.
                let _ = success_tx.send(written);
            }
            Err(e) => {
                // write failures are reported but not counted as errors
                let _ = error_tx.send(e);
            }
        }
    }
    stats
}
