//! Module reading the gzip-compressed input files line by line

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use tracing::warn;

use crate::error::{Error, file_access_failed};

/// Lines shorter than this are fragments, not records
const MIN_LINE_LEN: usize = 6;

/// Lines containing this marker reference already processed files and are skipped
const PROCESSED_SENTINEL: &str = ".tsv";

/// Opens a gzip file and returns an iterator over its data lines, without trailing newlines.
///
/// Failing to open the file or to decode its gzip header is an error. A read error later in
/// the file is logged and ends the iterator early, keeping the lines produced so far.
pub(crate) fn read_lines(path: &Path) -> Result<impl Iterator<Item = String> + use<>, Error> {
    let file = File::open(path).map_err(|e| file_access_failed(path, e))?;
    let mut reader = BufReader::new(MultiGzDecoder::new(file));

    // the first fill decodes the gzip header
    reader.fill_buf().map_err(|e| file_access_failed(path, e))?;

    let path = path.to_path_buf();
    let lines = reader
        .split(b'\n')
        .map_while(move |chunk| match chunk {
            Ok(bytes) => Some(bytes),
            Err(error) => {
                warn!(path = %path.display(), %error, "read error, skipping the rest of the file");
                None
            }
        })
        .filter_map(|bytes| {
            let line = String::from_utf8_lossy(&bytes);
            let line = line.trim_end_matches('\r');
            is_data_line(line).then(|| line.to_string())
        });
    Ok(lines)
}

fn is_data_line(line: &str) -> bool {
    line.len() >= MIN_LINE_LEN && !line.contains(PROCESSED_SENTINEL)
}

/// Renames `dir/name` to `dir/.name`, hiding the file from later runs using the same glob
pub(crate) fn dot_rename(path: &Path) -> std::io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} has no file name", path.display()),
        )
    })?;
    let mut hidden = std::ffi::OsString::from(".");
    hidden.push(file_name);
    let target = path.with_file_name(hidden);
    std::fs::rename(path, &target)?;
    Ok(target)
}
