//! Module defining how the raw input is turned into validated domain types: the gzip file source
//! producing raw lines and the parser converting each line into a [`DeviceRecord`].

mod source;

pub(crate) use source::{dot_rename, read_lines};

use crate::domain::DeviceRecord;
use crate::error::{Error, invalid_geo, malformed_line, missing_identity};


const FIELD_SEPARATOR: char = '\t';
const APP_SEPARATOR: char = ',';
const NUM_FIELDS: usize = 5;

/// Parses one tab-separated line into a device record.
///
/// Returns `None` for a line without any separator, which carries no record and is not counted
/// as an error. Application ids that are not valid `u32` values are stored as `0`.
pub fn parse_line(line: &str) -> Option<Result<DeviceRecord, Error>> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() == 1 {
        return None;
    }
    Some(parse_fields(line, &fields))
}

fn parse_fields(line: &str, fields: &[&str]) -> Result<DeviceRecord, Error> {
    let [device_type, device_id, lat, lon, raw_apps, ..] = fields else {
        return Err(malformed_line(
            line,
            format!("length is less than {NUM_FIELDS}"),
        ));
    };

    if device_type.is_empty() || device_id.is_empty() {
        return Err(missing_identity(line));
    }

    let (Some(lat), Some(lon)) = (parse_coord(lat), parse_coord(lon)) else {
        return Err(invalid_geo(line));
    };

    Ok(DeviceRecord {
        device_type: device_type.to_string(),
        device_id: device_id.to_string(),
        lat,
        lon,
        apps: parse_apps(raw_apps),
    })
}

// Lossy: an id that does not parse is kept as 0 instead of rejecting the line
fn parse_apps(raw_apps: &str) -> Vec<u32> {
    if raw_apps.is_empty() {
        return Vec::new();
    }
    raw_apps
        .split(APP_SEPARATOR)
        .map(|app| app.parse::<u32>().unwrap_or(0))
        .collect()
}

fn parse_coord(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}
