use crate::profile::ProfileData;
use crate::time;
use rustc_hash::FxHashMap;
use std::sync::Mutex;

/// Freshness horizon for locally stored profile records.
pub const MAX_RECORD_AGE_MILLIS: i64 = 48 * 60 * 60 * 1000;

/// Key suffix for the timestamp record. Record keys always contain exactly six `|`-separated
/// fields, so the suffixed form cannot collide with one.
const TIMESTAMP_SUFFIX: &str = "|updatedAt";

/// String key-value persistence with web local-storage semantics.
///
/// Two records exist per cache key: the JSON-serialized profile under the key itself, and a
/// numeric millisecond timestamp under [`timestamp_key`].
pub trait ProfileStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// In-memory [`ProfileStore`], for hosts without persistent storage and for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<FxHashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("store lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .insert(key.to_string(), value.to_string());
    }
}

pub fn timestamp_key(key: &str) -> String {
    format!("{key}{TIMESTAMP_SUFFIX}")
}

/// Reads the cached record for `key`, applying the freshness policy.
///
/// A record is usable iff it exists, parses, carries a non-empty name, and its stored
/// timestamp is at most 48 hours old. Anything else (corrupt JSON included) is a miss and
/// the caller refetches. `no_cache` forces a miss regardless of age.
pub fn get_cached<S: ProfileStore + ?Sized>(
    store: &S,
    key: &str,
    no_cache: bool,
) -> Option<ProfileData> {
    if no_cache {
        return None;
    }
    let raw = store.get(key)?;
    let record: ProfileData = match serde_json::from_str(&raw) {
        Ok(record) => record,
        Err(err) => {
            tracing::debug!(key, %err, "discarding corrupt cached profile");
            return None;
        }
    };
    if record.profile_name.trim().is_empty() {
        return None;
    }
    let stored_at: i64 = store.get(&timestamp_key(key))?.trim().parse().ok()?;
    if time::now_millis().saturating_sub(stored_at) > MAX_RECORD_AGE_MILLIS {
        tracing::debug!(key, "cached profile is stale");
        return None;
    }
    Some(record)
}

/// Writes `record` and its timestamp, unconditionally overwriting any prior value for `key`.
pub fn put_cached<S: ProfileStore + ?Sized>(
    store: &S,
    key: &str,
    record: &ProfileData,
) -> crate::Result<()> {
    let json = serde_json::to_string(record)?;
    store.set(key, &json);
    store.set(&timestamp_key(key), &time::now_millis().to_string());
    Ok(())
}
