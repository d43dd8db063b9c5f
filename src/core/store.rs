use crate::config::StoreConfig;
use crate::domain::ports::KeyValue;
use crate::utils::error::{DataError, Result};
use redb::{Database, ReadableTable, TableDefinition};
use std::sync::{Arc, OnceLock};
use tokio::sync::watch;

// Schema version and the auto-increment sequence live beside the records.
const META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("__meta");
const VERSION_KEY: &str = "version";
const SEQUENCE_KEY: &str = "sequence";

#[derive(Debug, Clone, Copy, PartialEq)]
enum OpenState {
    Pending,
    Ready,
    Failed,
}

struct Shared {
    config: StoreConfig,
    db: OnceLock<Database>,
    open_state: watch::Sender<OpenState>,
}

// Handle to a named, versioned embedded store with one named collection.
// Opening happens once, asynchronously, on handle creation; operations
// invoked before the open completes reject with `NotInitialized` instead
// of queuing. Must be created inside a tokio runtime.
pub struct StoreHandle {
    shared: Arc<Shared>,
}

impl StoreHandle {
    pub fn open(config: StoreConfig) -> Self {
        let (open_state, _) = watch::channel(OpenState::Pending);
        let shared = Arc::new(Shared {
            config,
            db: OnceLock::new(),
            open_state,
        });

        let task_shared = Arc::clone(&shared);
        tokio::spawn(async move {
            let config = task_shared.config.clone();
            let opened = tokio::task::spawn_blocking(move || open_database(&config)).await;
            match opened {
                Ok(Ok(db)) => {
                    let _ = task_shared.db.set(db);
                    task_shared.open_state.send_replace(OpenState::Ready);
                    tracing::debug!(
                        "Store ready: {} (collection: {})",
                        task_shared.config.path.display(),
                        task_shared.config.collection
                    );
                }
                Ok(Err(e)) => {
                    task_shared.open_state.send_replace(OpenState::Failed);
                    tracing::error!(
                        "Failed to open store {}: {}",
                        task_shared.config.path.display(),
                        e
                    );
                }
                Err(e) => {
                    task_shared.open_state.send_replace(OpenState::Failed);
                    tracing::error!("Store open task failed: {}", e);
                }
            }
        });

        Self { shared }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    pub fn ready(&self) -> bool {
        self.shared.db.get().is_some()
    }

    // Waits for the open to settle; false means it failed and every
    // operation on this handle will keep rejecting.
    pub async fn ready_wait(&self) -> bool {
        let mut rx = self.shared.open_state.subscribe();
        rx.wait_for(|state| *state != OpenState::Pending)
            .await
            .map(|state| *state == OpenState::Ready)
            .unwrap_or(false)
    }

    pub async fn append(&self, value: &serde_json::Value) -> Result<u64> {
        let db = self.database()?;
        let bytes = serde_json::to_vec(value)?;
        let write_txn = db.begin_write()?;
        let id = {
            let mut meta = write_txn.open_table(META_TABLE)?;
            let next = meta
                .get(SEQUENCE_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(0)
                + 1;
            meta.insert(SEQUENCE_KEY, next)?;
            drop(meta);

            let mut records = write_txn.open_table(self.records_table())?;
            records.insert(next.to_string().as_str(), bytes.as_slice())?;
            next
        };
        write_txn.commit()?;
        Ok(id)
    }

    fn database(&self) -> Result<&Database> {
        self.shared.db.get().ok_or(DataError::NotInitialized)
    }

    fn records_table(&self) -> TableDefinition<'_, &'static str, &'static [u8]> {
        TableDefinition::new(&self.shared.config.collection)
    }
}

impl KeyValue for StoreHandle {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let db = self.database()?;
        let read_txn = db.begin_read()?;
        let records = read_txn.open_table(self.records_table())?;
        match records.get(key)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let db = self.database()?;
        let bytes = serde_json::to_vec(value)?;
        let write_txn = db.begin_write()?;
        {
            let mut records = write_txn.open_table(self.records_table())?;
            records.insert(key, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        let db = self.database()?;
        let write_txn = db.begin_write()?;
        {
            let mut records = write_txn.open_table(self.records_table())?;
            records.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

fn open_database(config: &StoreConfig) -> Result<Database> {
    if let Some(parent) = config.path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::create(&config.path)?;

    let write_txn = db.begin_write()?;
    {
        let mut meta = write_txn.open_table(META_TABLE)?;
        let stored = meta
            .get(VERSION_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        if stored > config.version {
            return Err(DataError::InvalidConfigValueError {
                field: "version".to_string(),
                value: config.version.to_string(),
                reason: format!("Store was created with newer schema version {}", stored),
            });
        }
        if stored < config.version {
            tracing::info!(
                "Upgrading store {} from version {} to {}",
                config.path.display(),
                stored,
                config.version
            );
            meta.insert(VERSION_KEY, config.version)?;
        }

        let records: TableDefinition<&str, &[u8]> = TableDefinition::new(&config.collection);
        write_txn.open_table(records)?;
    }
    write_txn.commit()?;

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> StoreConfig {
        StoreConfig {
            path: dir.path().join("test.redb"),
            collection: "records".to_string(),
            version: 1,
        }
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = StoreHandle::open(test_config(&dir));
        assert!(store.ready_wait().await);

        let value = serde_json::json!({"name": "Item 1", "tags": ["a", "b"]});
        store.put("item-1", &value).await.unwrap();

        let loaded = store.get("item-1").await.unwrap();
        assert_eq!(loaded, Some(value));
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = StoreHandle::open(test_config(&dir));
        assert!(store.ready_wait().await);

        assert_eq!(store.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_del_removes_key() {
        let dir = TempDir::new().unwrap();
        let store = StoreHandle::open(test_config(&dir));
        assert!(store.ready_wait().await);

        let value = serde_json::json!(42);
        store.put("answer", &value).await.unwrap();
        assert_eq!(store.get("answer").await.unwrap(), Some(value));

        store.del("answer").await.unwrap();
        assert_eq!(store.get("answer").await.unwrap(), None);

        // Deleting an absent key is still a success.
        store.del("answer").await.unwrap();
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_value() {
        let dir = TempDir::new().unwrap();
        let store = StoreHandle::open(test_config(&dir));
        assert!(store.ready_wait().await);

        store.put("k", &serde_json::json!("old")).await.unwrap();
        store.put("k", &serde_json::json!("new")).await.unwrap();
        assert_eq!(
            store.get("k").await.unwrap(),
            Some(serde_json::json!("new"))
        );
    }

    #[tokio::test]
    async fn test_append_allocates_sequential_ids() {
        let dir = TempDir::new().unwrap();
        let store = StoreHandle::open(test_config(&dir));
        assert!(store.ready_wait().await);

        let first = store.append(&serde_json::json!({"n": 1})).await.unwrap();
        let second = store.append(&serde_json::json!({"n": 2})).await.unwrap();
        assert_eq!(second, first + 1);

        let loaded = store.get(&second.to_string()).await.unwrap();
        assert_eq!(loaded, Some(serde_json::json!({"n": 2})));
    }

    #[tokio::test]
    async fn test_operations_reject_when_open_failed() {
        // The database path is a directory, so the open task fails and the
        // handle never becomes ready.
        let dir = TempDir::new().unwrap();
        let config = StoreConfig {
            path: dir.path().to_path_buf(),
            collection: "records".to_string(),
            version: 1,
        };
        let store = StoreHandle::open(config);
        assert!(!store.ready_wait().await);
        assert!(!store.ready());

        let err = store.get("k").await.unwrap_err();
        assert!(matches!(err, DataError::NotInitialized));
        let err = store.put("k", &serde_json::json!(1)).await.unwrap_err();
        assert!(matches!(err, DataError::NotInitialized));
        let err = store.del("k").await.unwrap_err();
        assert!(matches!(err, DataError::NotInitialized));
    }

    #[tokio::test]
    async fn test_reopen_at_higher_version_keeps_records() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let store = StoreHandle::open(config.clone());
        assert!(store.ready_wait().await);
        store.put("kept", &serde_json::json!(true)).await.unwrap();
        drop(store);

        let upgraded = StoreConfig {
            version: 2,
            ..config
        };
        let store = StoreHandle::open(upgraded);
        assert!(store.ready_wait().await);
        assert_eq!(
            store.get("kept").await.unwrap(),
            Some(serde_json::json!(true))
        );
    }

    #[tokio::test]
    async fn test_open_rejects_version_regression() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig {
            version: 2,
            ..test_config(&dir)
        };

        let store = StoreHandle::open(config.clone());
        assert!(store.ready_wait().await);
        drop(store);

        let downgraded = StoreConfig {
            version: 1,
            ..config
        };
        let store = StoreHandle::open(downgraded);
        assert!(!store.ready_wait().await);
        assert!(matches!(
            store.get("k").await.unwrap_err(),
            DataError::NotInitialized
        ));
    }
}
