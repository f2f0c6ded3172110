//! Module focused on the logic of writing individual records.

use crate::{
    Error,
    domain::DeviceRecord,
    engine::ShardTable,
    output::{WriteRecord, encode},
    store::Store,
};

pub(super) fn write_record(
    record: &DeviceRecord,
    shards: &ShardTable,
    store: &impl Store,
) -> Result<WriteRecord, Error> {
    let address = shards.route(&record.device_type)?;
    let key = record.key();
    let value = encode(record);

    store.set(address, &key, &value)?;

    Ok(WriteRecord {
        key,
        address: address.to_string(),
        bytes: value.len(),
    })
}
