//! Property-based tests: random mixes of good and bad lines, spread over several files and run with
//! varying pipeline sizes, must always produce the same counters and store contents.

use proptest::prelude::*;
use tempfile::TempDir;

use memc_load::{DeviceRecord, Error, PipelineConfig, RunStats, ShardTable, encode, load};

use crate::fixtures::{MemoryStore, write_gz};

/// The kinds of input lines a scenario is built from
#[derive(Debug, Clone, Copy)]
enum LineKind {
    Valid,
    Malformed,
    MissingIdentity,
    InvalidGeo,
    UnknownDeviceType,
}

fn line_kind() -> impl Strategy<Value = LineKind> {
    prop_oneof![
        6 => Just(LineKind::Valid),
        1 => Just(LineKind::Malformed),
        1 => Just(LineKind::MissingIdentity),
        1 => Just(LineKind::InvalidGeo),
        1 => Just(LineKind::UnknownDeviceType),
    ]
}

const DEVICE_TYPES: [&str; 4] = ["idfa", "gaid", "adid", "dvid"];

/// Builds the line with index `i`. Every line uses its own device id.
fn build_line(i: usize, kind: LineKind) -> (String, Option<DeviceRecord>) {
    let device_type = DEVICE_TYPES[i % DEVICE_TYPES.len()];
    let device_id = format!("dev{i:05}");
    match kind {
        LineKind::Valid => {
            let record = DeviceRecord {
                device_type: device_type.to_string(),
                device_id: device_id.clone(),
                lat: i as f64 / 8.0,
                lon: -(i as f64) / 4.0,
                apps: vec![i as u32, 7, 42],
            };
            let line = format!(
                "{device_type}\t{device_id}\t{}\t{}\t{},7,42",
                record.lat, record.lon, i
            );
            (line, Some(record))
        }
        LineKind::Malformed => (format!("{device_type}\t{device_id}\t1.0"), None),
        LineKind::MissingIdentity => (format!("{device_type}\t\t1.0\t2.0\t1"), None),
        LineKind::InvalidGeo => (format!("{device_type}\t{device_id}\tnorth\t2.0\t1"), None),
        LineKind::UnknownDeviceType => (format!("imei\t{device_id}\t1.0\t2.0\t1"), None),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn counters_and_contents_match_the_input(
        kinds in prop::collection::vec(line_kind(), 0..200),
        num_files in 1usize..4,
        workers in 1usize..5,
        queue_capacity in 0usize..8,
    ) {
        let dir = TempDir::new().unwrap();
        let built: Vec<(String, Option<DeviceRecord>)> = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| build_line(i, *kind))
            .collect();

        // round-robin the lines over the files
        let paths: Vec<_> = (0..num_files)
            .map(|f| {
                let content: String = built
                    .iter()
                    .skip(f)
                    .step_by(num_files)
                    .map(|(line, _)| format!("{line}\n"))
                    .collect();
                write_gz(dir.path(), &format!("part{f}.tsv.gz"), &content)
            })
            .collect();

        let store = MemoryStore::default();
        let config = PipelineConfig { workers, queue_capacity, rename_processed: false };
        let mut parse_errors = 0u64;
        let mut write_errors = 0u64;
        let stats = load(
            &paths,
            &ShardTable::default(),
            &store,
            &config,
            |e: Error| if e.is_parse_error() { parse_errors += 1 } else { write_errors += 1 },
            |_| {},
        )
        .unwrap();

        let count = |wanted: fn(&LineKind) -> bool| kinds.iter().filter(|k| wanted(k)).count() as u64;
        let valid = count(|k| matches!(k, LineKind::Valid));
        let unknown = count(|k| matches!(k, LineKind::UnknownDeviceType));
        let invalid = kinds.len() as u64 - valid - unknown;

        prop_assert_eq!(stats, RunStats::new(valid, invalid));
        prop_assert_eq!(parse_errors, invalid);
        prop_assert_eq!(write_errors, unknown);

        let contents = store.contents();
        prop_assert_eq!(contents.len() as u64, valid);
        for record in built.iter().filter_map(|(_, record)| record.as_ref()) {
            prop_assert_eq!(contents.get(&record.key()), Some(&encode(record)));
        }
    }
}
