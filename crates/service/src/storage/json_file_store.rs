use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, warn};

use super::DocumentStore;
use crate::errors::ServiceError;

const TEMP_SUFFIX: &str = ".tmp";

/// JSON documents persisted one file per name under a data directory.
///
/// Reads fail open: a missing, unreadable or unparseable file yields the
/// caller's default. Writes go to `<name>.tmp` first and are then renamed
/// over the canonical file, so a reader sees either the old or the new
/// content in full. An interrupted write can leave the temp file behind;
/// the canonical file is untouched in that case.
///
/// Writers to the same name are serialised within this process. There is no
/// cross-process locking: concurrent processes are last-rename-wins.
pub struct JsonFileStore {
    data_dir: PathBuf,
    write_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl JsonFileStore {
    /// Create a store rooted at `data_dir`. The directory is created lazily.
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Arc<Self> {
        Arc::new(Self { data_dir: data_dir.into(), write_locks: DashMap::new() })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Canonical path of the document called `name` (e.g. `courses.json`).
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// In-progress sibling used while writing `name`.
    pub fn temp_path_for(&self, name: &str) -> PathBuf {
        let mut raw: OsString = self.path_for(name).into_os_string();
        raw.push(TEMP_SUFFIX);
        PathBuf::from(raw)
    }

    async fn ensure_dir(&self) -> Result<(), ServiceError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| ServiceError::storage("create directory", &self.data_dir, e))
    }

    /// Load `name`, falling back to `default` when the file is absent or corrupt.
    pub async fn read<T>(&self, name: &str, default: T) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
    {
        self.ensure_dir().await?;
        let path = self.path_for(name);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(resource = name, "no persisted file; using default");
                return Ok(default);
            }
            Err(e) => {
                warn!(resource = name, error = %e, "unreadable file; using default");
                return Ok(default);
            }
        };
        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(resource = name, error = %e, "corrupt JSON; using default");
                Ok(default)
            }
        }
    }

    /// Replace `name` with `value` and return it unchanged.
    pub async fn write<T>(&self, name: &str, value: T) -> Result<T, ServiceError>
    where
        T: Serialize,
    {
        let lock = self.write_locks.entry(name.to_string()).or_default().clone();
        let _guard = lock.lock().await;

        self.ensure_dir().await?;
        let path = self.path_for(name);
        let tmp_path = self.temp_path_for(name);
        let payload = serde_json::to_vec_pretty(&value)?;

        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(|e| ServiceError::storage("create", &tmp_path, e))?;
        file.write_all(&payload)
            .await
            .map_err(|e| ServiceError::storage("write", &tmp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| ServiceError::storage("sync", &tmp_path, e))?;
        drop(file);

        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| ServiceError::storage("rename", &tmp_path, e))?;
        debug!(resource = name, bytes = payload.len(), "resource written");
        Ok(value)
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self, name: &str, default: Value) -> Result<Value, ServiceError> {
        self.read(name, default).await
    }

    async fn save(&self, name: &str, value: Value) -> Result<Value, ServiceError> {
        self.write(name, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> (Arc<JsonFileStore>, PathBuf) {
        let dir = std::env::temp_dir().join(format!("json_file_store_{}", uuid::Uuid::new_v4()));
        (JsonFileStore::new(dir.join("data")), dir)
    }

    #[tokio::test]
    async fn write_then_read_returns_same_value() -> Result<(), anyhow::Error> {
        let (store, root) = temp_store();
        let value = json!([
            { "title": "Graph sparsification", "year": 2021, "authors": ["A", "B"] },
            { "title": "Nested", "meta": { "doi": null, "pages": [1, 2.5] } }
        ]);

        let echoed = store.write("publications.json", value.clone()).await?;
        assert_eq!(echoed, value);
        assert_eq!(store.read("publications.json", json!([])).await?, value);

        let _ = fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_returns_default_and_creates_dir() -> Result<(), anyhow::Error> {
        let (store, root) = temp_store();

        assert_eq!(store.read("courses.json", json!([])).await?, json!([]));
        assert_eq!(store.read("contact.json", json!({})).await?, json!({}));
        assert!(fs::metadata(store.data_dir()).await?.is_dir());
        // only the directory; the file itself is created on first write
        assert!(fs::metadata(store.path_for("courses.json")).await.is_err());

        let _ = fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_to_default() -> Result<(), anyhow::Error> {
        let (store, root) = temp_store();
        fs::create_dir_all(store.data_dir()).await?;
        fs::write(store.path_for("awards.json"), b"{ not json").await?;

        assert_eq!(store.read("awards.json", json!([])).await?, json!([]));

        let _ = fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn typed_read_with_mismatched_shape_falls_back() -> Result<(), anyhow::Error> {
        let (store, root) = temp_store();
        store.write("memberships.json", json!({ "not": "a list" })).await?;

        let names: Vec<String> = store.read("memberships.json", Vec::new()).await?;
        assert!(names.is_empty());

        let _ = fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn writes_pretty_printed_json_and_no_temp_file() -> Result<(), anyhow::Error> {
        let (store, root) = temp_store();
        store.write("contact.json", json!({ "email": "x@example.org" })).await?;

        let text = fs::read_to_string(store.path_for("contact.json")).await?;
        assert_eq!(text, "{\n  \"email\": \"x@example.org\"\n}");
        assert!(fs::metadata(store.temp_path_for("contact.json")).await.is_err());

        let _ = fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn replace_overwrites_without_merging() -> Result<(), anyhow::Error> {
        let (store, root) = temp_store();
        store.write("courses.json", json!([{ "code": "CS101" }, { "code": "CS102" }])).await?;
        store.write("courses.json", json!([{ "code": "CS201" }])).await?;
        let first = fs::read(store.path_for("courses.json")).await?;
        store.write("courses.json", json!([{ "code": "CS201" }])).await?;
        let second = fs::read(store.path_for("courses.json")).await?;

        assert_eq!(first, second);
        assert_eq!(store.read("courses.json", json!([])).await?, json!([{ "code": "CS201" }]));

        let _ = fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn stray_temp_file_does_not_affect_canonical_value() -> Result<(), anyhow::Error> {
        let (store, root) = temp_store();
        let original = json!([{ "name": "IEEE" }]);
        store.write("memberships.json", original.clone()).await?;

        // simulate a writer that died after writing half of the temp file
        fs::write(store.temp_path_for("memberships.json"), b"[{\"name\": \"AC").await?;
        assert_eq!(store.read("memberships.json", json!([])).await?, original);

        // the next successful write replaces the leftover
        let next = json!([{ "name": "ACM" }]);
        store.write("memberships.json", next.clone()).await?;
        assert_eq!(store.read("memberships.json", json!([])).await?, next);

        let _ = fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_leaves_previous_value_intact() -> Result<(), anyhow::Error> {
        let (store, root) = temp_store();
        let original = json!([{ "student": "C. Doe" }]);
        store.write("supervision.json", original.clone()).await?;

        // a directory in the temp slot makes staging fail before the rename
        fs::create_dir_all(store.temp_path_for("supervision.json")).await?;
        let res = store.write("supervision.json", json!([])).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        assert_eq!(store.read("supervision.json", json!([])).await?, original);

        let _ = fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_writers_leave_one_complete_value() -> Result<(), anyhow::Error> {
        let (store, root) = temp_store();
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let value = json!({ "writer": i, "payload": "x".repeat(4096) });
                store.write("contact.json", value).await
            }));
        }
        for h in handles {
            h.await??;
        }

        let value = store.read("contact.json", Value::Null).await?;
        assert!(value.get("writer").and_then(Value::as_u64).is_some());
        assert_eq!(value["payload"].as_str().map(str::len), Some(4096));

        let _ = fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[test]
    fn temp_path_is_suffixed_sibling() {
        let store = JsonFileStore::new("/srv/portfolio/data");
        assert_eq!(store.path_for("awards.json"), PathBuf::from("/srv/portfolio/data/awards.json"));
        assert_eq!(
            store.temp_path_for("awards.json"),
            PathBuf::from("/srv/portfolio/data/awards.json.tmp")
        );
    }
}
