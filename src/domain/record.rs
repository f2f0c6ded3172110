//! Module defining the normalized representation of one input line

/// A device together with its location and the applications installed on it.
///
/// Constructed by the line parser from exactly one input line. The device type and the
/// device id form the store key, the remaining fields form the stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    pub device_type: String,
    pub device_id: String,
    pub lat: f64,
    pub lon: f64,
    pub apps: Vec<u32>,
}

impl DeviceRecord {
    /// The key under which the record is stored: `<device_type>:<device_id>`
    pub fn key(&self) -> String {
        format!("{}:{}", self.device_type, self.device_id)
    }
}
