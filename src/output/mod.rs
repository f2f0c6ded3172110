//! Module defining the value format written to the store and the events reported for successful writes.

use std::fmt;

use prost::Message;

use crate::domain::DeviceRecord;


/// Stored value of a device, mirroring the protobuf schema
///
/// ```protobuf
/// message UserApps {
///     repeated uint32 apps = 1;
///     optional double lat = 2;
///     optional double lon = 3;
/// }
/// ```
#[derive(Clone, PartialEq, Message)]
pub struct UserApps {
    #[prost(uint32, repeated, packed = "false", tag = "1")]
    pub apps: Vec<u32>,
    #[prost(double, optional, tag = "2")]
    pub lat: Option<f64>,
    #[prost(double, optional, tag = "3")]
    pub lon: Option<f64>,
}

impl UserApps {
    pub(crate) fn from_domain(record: &DeviceRecord) -> Self {
        Self {
            apps: record.apps.clone(),
            lat: Some(record.lat),
            lon: Some(record.lon),
        }
    }
}

/// Serializes the value part of a record. The output only depends on the record.
pub fn encode(record: &DeviceRecord) -> Vec<u8> {
    UserApps::from_domain(record).encode_to_vec()
}

/// Public DTO describing a record that was written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub key: String,
    pub address: String,
    pub bytes: usize,
}

impl fmt::Display for WriteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({} bytes)", self.key, self.address, self.bytes)
    }
}
