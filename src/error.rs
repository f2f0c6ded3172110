//! Module defining the errors which are exposed to the users of the crate

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Line with fewer tab-separated fields than a device record needs
    #[error("malformed line `{line}`: {message}")]
    MalformedLine { line: String, message: String },

    /// Device type or device id is empty
    #[error("missing identity in line `{line}`: dev type or dev id do not present")]
    MissingIdentity { line: String },

    /// Latitude or longitude is not a number
    #[error("invalid geo coords in line `{line}`")]
    InvalidGeo { line: String },

    /// No shard is configured for the device type of a record
    #[error("unknown device type: {device_type}")]
    UnknownShard { device_type: String },

    /// The store rejected the write or could not be reached
    #[error("unable to write key {key} to {address}: {message}")]
    StoreWriteFailed {
        key: String,
        address: String,
        message: String,
    },

    /// An input file could not be opened or decompressed. Fatal for the whole run.
    #[error("unable to read input file {}: {source}", .path.display())]
    FileAccessFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Whether the error is a per-line parse failure, i.e., counted towards the error rate
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedLine { .. } | Error::MissingIdentity { .. } | Error::InvalidGeo { .. }
        )
    }
}

pub(crate) fn malformed_line(line: &str, message: impl Into<String>) -> Error {
    Error::MalformedLine {
        line: excerpt(line),
        message: message.into(),
    }
}

pub(crate) fn missing_identity(line: &str) -> Error {
    Error::MissingIdentity {
        line: excerpt(line),
    }
}

pub(crate) fn invalid_geo(line: &str) -> Error {
    Error::InvalidGeo {
        line: excerpt(line),
    }
}

pub(crate) fn store_write_failed(
    key: impl Into<String>,
    address: impl Into<String>,
    message: impl ToString,
) -> Error {
    Error::StoreWriteFailed {
        key: key.into(),
        address: address.into(),
        message: message.to_string(),
    }
}

pub(crate) fn file_access_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
    Error::FileAccessFailed {
        path: path.into(),
        source,
    }
}

const EXCERPT_LEN: usize = 64;

// Keeps log lines bounded for very long app lists
fn excerpt(line: &str) -> String {
    match line.char_indices().nth(EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => line.to_string(),
    }
}
