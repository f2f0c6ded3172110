//! Module defining the key-value store the records are written to

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, error, info};

use crate::error::{Error, store_write_failed};

/// A sharded key-value store. Implementations are shared between all writer workers.
pub trait Store: Sync {
    /// Stores `value` under `key` on the shard reachable at `address`.
    fn set(&self, address: &str, key: &str, value: &[u8]) -> Result<(), Error>;
}

/// Writes to memcached, keeping one client per shard address.
///
/// Clients are connected on first use, so an unreachable shard only fails the writes routed to it.
/// A failed connection is remembered and not attempted again during the run.
pub struct MemcacheStore {
    timeout: Duration,
    shards: RwLock<HashMap<String, Shard>>,
}

type Shard = Result<Arc<memcache::Client>, String>;

impl MemcacheStore {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            shards: RwLock::default(),
        }
    }

    fn shard(&self, address: &str) -> Shard {
        cached_or_connect(&self.shards, address, || {
            match memcache::Client::connect(self.connection_url(address)) {
                Ok(client) => {
                    info!(address, "connected to memcached");
                    Ok(Arc::new(client))
                }
                Err(error) => {
                    error!(address, %error, "unable to connect to memcached");
                    Err(error.to_string())
                }
            }
        })
    }

    fn connection_url(&self, address: &str) -> String {
        format!(
            "memcache://{address}?timeout={}&protocol=ascii",
            self.timeout.as_secs_f64()
        )
    }
}

// The lock is not held while connecting. When two writers race on one address, the first inserted value wins.
fn cached_or_connect<T: Clone>(
    cache: &RwLock<HashMap<String, T>>,
    address: &str,
    connect: impl FnOnce() -> T,
) -> T {
    if let Some(value) = cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(address)
    {
        return value.clone();
    }

    let value = connect();
    cache
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(address.to_string())
        .or_insert(value)
        .clone()
}

impl Store for MemcacheStore {
    fn set(&self, address: &str, key: &str, value: &[u8]) -> Result<(), Error> {
        let client = self
            .shard(address)
            .map_err(|message| store_write_failed(key, address, message))?;
        client
            .set(key, value, 0)
            .map_err(|e| store_write_failed(key, address, e))
    }
}

/// Store that writes nothing and only logs what would have been written
#[derive(Debug, Default)]
pub struct DryRunStore;

impl Store for DryRunStore {
    fn set(&self, address: &str, key: &str, value: &[u8]) -> Result<(), Error> {
        debug!(address, key, bytes = value.len(), "dry run, skipping write");
        Ok(())
    }
}
