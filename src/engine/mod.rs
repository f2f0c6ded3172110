//! Module for the core of the loader: routing records to shards and orchestrating the pipeline stages

mod logic;
mod orchestration;
mod shards;

pub(crate) use orchestration::run_pipeline;
pub use shards::ShardTable;

/// Sizing of the pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of writer threads. At least one writer is always started.
    pub workers: usize,
    /// Capacity of every handoff queue between two stages. A full queue blocks its producer.
    pub queue_capacity: usize,
    /// Hide every fully read input file by prefixing its name with a dot
    pub rename_processed: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: 1024,
            rename_processed: false,
        }
    }
}

/// One writer per available core, keeping one core for the reader and the parser.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1).max(1))
        .unwrap_or(1)
}
