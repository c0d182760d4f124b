pub mod entry;

use entry::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// The key space: string keys mapped to string values.
#[derive(Debug, Default)]
pub struct Database {
    data: HashMap<String, Entry>,
    /// Monotonically increasing version counter, bumped on every write.
    version_seq: u64,
}

impl Database {
    pub fn new() -> Self {
        Database::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(|e| e.value.as_str())
    }

    /// Insert or overwrite a key. Returns the version stamped on the new entry.
    pub fn set(&mut self, key: String, value: String) -> u64 {
        self.version_seq += 1;
        self.data.insert(key, Entry::new(value, self.version_seq));
        self.version_seq
    }

    /// Delete a key. Returns true if it existed.
    pub fn del(&mut self, key: &str) -> bool {
        self.data.remove(key).is_some()
    }

    /// Version of the current entry for `key`, if present.
    pub fn key_version(&self, key: &str) -> Option<u64> {
        self.data.get(key).map(|e| e.version)
    }

    /// Delete `key` only if it still holds the entry written at `version`.
    pub fn expire_if_version(&mut self, key: &str, version: u64) -> bool {
        self.key_version(key) == Some(version) && self.del(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One lock guards every read and write of the key space.
pub type SharedStore = Arc<Mutex<Database>>;

pub fn new_shared_store() -> SharedStore {
    Arc::new(Mutex::new(Database::new()))
}

/// Write `key` and, when `expiry` is given, schedule its deletion.
pub async fn set_with_expiry(
    store: &SharedStore,
    key: String,
    value: String,
    expiry: Option<Duration>,
) {
    let version = {
        let mut db = store.lock().await;
        db.set(key.clone(), value)
    };

    if let Some(delay) = expiry {
        schedule_expiry(store.clone(), key, version, delay);
    }
}

/// Spawn a one-shot task that deletes `key` after `delay`.
///
/// The task is detached from whichever connection scheduled it. It is a no-op
/// if the key was overwritten or deleted in the meantime.
pub fn schedule_expiry(
    store: SharedStore,
    key: String,
    version: u64,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let mut db = store.lock().await;
        if db.expire_if_version(&key, version) {
            debug!("Expired key {key}");
        } else {
            debug!("Skipped stale expiry for {key}");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_overwrite() {
        let mut db = Database::new();
        assert_eq!(db.get("k"), None);

        let v1 = db.set("k".into(), "v1".into());
        assert_eq!(db.get("k"), Some("v1"));

        let v2 = db.set("k".into(), "v2".into());
        assert!(v2 > v1);
        assert_eq!(db.get("k"), Some("v2"));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_del() {
        let mut db = Database::new();
        db.set("k".into(), "v".into());
        assert!(db.del("k"));
        assert!(!db.del("k"));
        assert!(db.is_empty());
    }

    #[test]
    fn test_expire_if_version() {
        let mut db = Database::new();
        let old = db.set("k".into(), "v1".into());
        db.set("k".into(), "v2".into());

        assert!(!db.expire_if_version("k", old));
        assert_eq!(db.get("k"), Some("v2"));

        let current = db.key_version("k").unwrap();
        assert!(db.expire_if_version("k", current));
        assert_eq!(db.get("k"), None);
        assert!(!db.expire_if_version("missing", current));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_fires() {
        let store = new_shared_store();
        set_with_expiry(&store, "k".into(), "v".into(), Some(Duration::from_millis(100))).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.lock().await.get("k"), Some("v"));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.lock().await.get("k"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_supersedes_pending_expiry() {
        let store = new_shared_store();
        set_with_expiry(&store, "k".into(), "v1".into(), Some(Duration::from_millis(100))).await;
        set_with_expiry(&store, "k".into(), "v2".into(), None).await;

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(store.lock().await.get("k"), Some("v2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_expiry_targets_its_own_write() {
        let store = new_shared_store();
        set_with_expiry(&store, "k".into(), "v1".into(), Some(Duration::from_millis(50))).await;
        set_with_expiry(&store, "k".into(), "v2".into(), Some(Duration::from_millis(200))).await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.lock().await.get("k"), Some("v2"));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(store.lock().await.get("k"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_expires_immediately() {
        let store = new_shared_store();
        let version = store.lock().await.set("k".into(), "v".into());
        schedule_expiry(store.clone(), "k".into(), version, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(store.lock().await.get("k"), None);
    }
}
