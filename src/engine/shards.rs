//! Module mapping device types to the store shards responsible for them

use crate::error::Error;

/// Addresses of the four shards, one per known device type. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardTable {
    idfa: String,
    gaid: String,
    adid: String,
    dvid: String,
}

impl ShardTable {
    pub fn new(
        idfa: impl Into<String>,
        gaid: impl Into<String>,
        adid: impl Into<String>,
        dvid: impl Into<String>,
    ) -> Self {
        Self {
            idfa: idfa.into(),
            gaid: gaid.into(),
            adid: adid.into(),
            dvid: dvid.into(),
        }
    }

    /// Returns the address of the shard storing devices of the given type.
    pub fn route(&self, device_type: &str) -> Result<&str, Error> {
        match device_type {
            "idfa" => Ok(&self.idfa),
            "gaid" => Ok(&self.gaid),
            "adid" => Ok(&self.adid),
            "dvid" => Ok(&self.dvid),
            other => Err(Error::UnknownShard {
                device_type: other.to_string(),
            }),
        }
    }
}

impl Default for ShardTable {
    fn default() -> Self {
        Self::new(
            "127.0.0.1:33013",
            "127.0.0.1:33014",
            "127.0.0.1:33015",
            "127.0.0.1:33016",
        )
    }
}
