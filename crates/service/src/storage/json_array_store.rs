use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{fs, sync::Mutex};
use tracing::{debug, error, warn};

use crate::errors::ServiceError;

/// A record type that can be kept in a [`JsonArrayStore`].
pub trait StoredRecord: Serialize + DeserializeOwned + Send + Sync {
    /// Rewrite a raw record read from disk before it is decoded.
    fn normalize(_raw: &mut Map<String, Value>) {}
}

/// What was found on disk for a collection.
enum Snapshot<T> {
    Missing,
    /// Decoded records in file order, plus entries that did not decode.
    Records { records: Vec<T>, rejected: Vec<Value> },
    Malformed(String),
}

#[derive(Serialize)]
#[serde(untagged)]
enum Entry<'a, T> {
    Record(&'a T),
    Raw(&'a Value),
}

/// Generic JSON file-backed record collection.
///
/// Persists a `Vec<T>` as one pretty-printed JSON array. Nothing is cached:
/// every call re-reads the file. Mutations are serialized through a per-store
/// lock and written to a sibling temp file that is renamed over the target.
///
/// Array entries that do not decode as `T` are skipped on read with a warning
/// and written back unchanged after them on the next mutation.
pub struct JsonArrayStore<T> {
    collection: &'static str,
    file_path: PathBuf,
    write_lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T: StoredRecord> JsonArrayStore<T> {
    /// Bind a store to `path`. The file itself is not created until the first save.
    pub async fn new<P: Into<PathBuf>>(collection: &'static str, path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }
        Ok(Arc::new(Self {
            collection,
            file_path,
            write_lock: Mutex::new(()),
            _records: PhantomData,
        }))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    async fn snapshot(&self) -> Result<Snapshot<T>, ServiceError> {
        let started = Instant::now();
        let snapshot = match fs::read(&self.file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
                Snapshot::Records { records: Vec::new(), rejected: Vec::new() }
            }
            Ok(bytes) => match serde_json::from_slice::<Vec<Value>>(&bytes) {
                Ok(raw) => self.decode(raw),
                Err(e) => Snapshot::Malformed(e.to_string()),
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Snapshot::Missing,
            Err(e) => return Err(ServiceError::storage(format!("read {}: {e}", self.file_path.display()))),
        };
        common::metrics::observe_store(self.collection, "load", started.elapsed().as_secs_f64());
        Ok(snapshot)
    }

    fn decode(&self, raw: Vec<Value>) -> Snapshot<T> {
        let mut records = Vec::with_capacity(raw.len());
        let mut rejected = Vec::new();
        for (index, mut value) in raw.into_iter().enumerate() {
            if let Value::Object(fields) = &mut value {
                T::normalize(fields);
            }
            match <T as Deserialize>::deserialize(&value) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        collection = self.collection,
                        path = %self.file_path.display(),
                        index,
                        error = %e,
                        "skipping unreadable record"
                    );
                    rejected.push(value);
                }
            }
        }
        Snapshot::Records { records, rejected }
    }

    /// All readable records in file order. A missing file is an empty
    /// collection; so is a malformed one, which is reported with a warning
    /// instead of an error.
    pub async fn load(&self) -> Result<Vec<T>, ServiceError> {
        match self.snapshot().await? {
            Snapshot::Missing => Ok(Vec::new()),
            Snapshot::Records { records, .. } => {
                debug!(collection = self.collection, count = records.len(), "collection loaded");
                Ok(records)
            }
            Snapshot::Malformed(reason) => {
                warn!(
                    collection = self.collection,
                    path = %self.file_path.display(),
                    error = %reason,
                    "malformed collection file; treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the whole collection.
    pub async fn save(&self, records: &[T]) -> Result<(), ServiceError> {
        self.write(records, &[]).await
    }

    async fn write(&self, records: &[T], rejected: &[Value]) -> Result<(), ServiceError> {
        let started = Instant::now();
        let entries: Vec<Entry<'_, T>> = records
            .iter()
            .map(Entry::Record)
            .chain(rejected.iter().map(Entry::Raw))
            .collect();
        let data = serde_json::to_vec_pretty(&entries).map_err(ServiceError::storage)?;
        let tmp = self.temp_path();
        fs::write(&tmp, data)
            .await
            .map_err(|e| ServiceError::storage(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.file_path)
            .await
            .map_err(|e| ServiceError::storage(format!("rename onto {}: {e}", self.file_path.display())))?;
        common::metrics::observe_store(self.collection, "save", started.elapsed().as_secs_f64());
        debug!(
            collection = self.collection,
            count = records.len(),
            kept_unreadable = rejected.len(),
            "collection saved"
        );
        Ok(())
    }

    /// Load, apply `f`, and persist only if `f` succeeds.
    ///
    /// A malformed file is never overwritten: the mutation fails with
    /// `ServiceError::Storage` and the file is left for inspection.
    pub async fn mutate<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let _guard = self.write_lock.lock().await;
        let (mut records, rejected) = match self.snapshot().await? {
            Snapshot::Missing => (Vec::new(), Vec::new()),
            Snapshot::Records { records, rejected } => (records, rejected),
            Snapshot::Malformed(reason) => {
                error!(
                    collection = self.collection,
                    path = %self.file_path.display(),
                    error = %reason,
                    "refusing to rewrite malformed collection file"
                );
                return Err(ServiceError::Storage(format!(
                    "{} store is malformed and was not modified",
                    self.collection
                )));
            }
        };
        let out = f(&mut records)?;
        self.write(&records, &rejected).await?;
        Ok(out)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        body: String,
    }

    impl StoredRecord for Note {
        fn normalize(raw: &mut Map<String, Value>) {
            if let Some(text) = raw.remove("text") {
                raw.entry("body").or_insert(text);
            }
        }
    }

    fn note(id: &str, body: &str) -> Note {
        Note { id: id.into(), body: body.into() }
    }

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("json_array_store_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_loads_empty_and_is_timed() -> Result<(), anyhow::Error> {
        let loads = || {
            common::metrics::STORE_DURATION
                .with_label_values(&["missing_notes", "load"])
                .get_sample_count()
        };
        let before = loads();
        let store = JsonArrayStore::<Note>::new("missing_notes", tmp_path()).await?;
        assert!(store.load().await?.is_empty());
        assert_eq!(loads(), before + 1);
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_round_trips_in_order() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonArrayStore::<Note>::new("notes", &tmp).await?;
        let notes = vec![note("b", "second"), note("a", "first")];
        store.save(&notes).await?;

        let reopened = JsonArrayStore::<Note>::new("notes", &tmp).await?;
        assert_eq!(reopened.load().await?, notes);
        assert!(fs::metadata(store.temp_path()).await.is_err(), "temp file left behind");

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_loads_empty_but_is_not_overwritten() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        fs::write(&tmp, b"{ not json").await?;
        let store = JsonArrayStore::<Note>::new("notes", &tmp).await?;

        assert!(store.load().await?.is_empty());

        let res = store
            .mutate(|records| {
                records.push(note("x", "lost"));
                Ok(())
            })
            .await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        assert_eq!(fs::read(&tmp).await?, b"{ not json");

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_leaves_file_untouched() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonArrayStore::<Note>::new("notes", &tmp).await?;
        store.save(&[note("a", "kept")]).await?;

        let res: Result<(), _> = store
            .mutate(|records| {
                records.clear();
                Err(ServiceError::not_found("nothing to do"))
            })
            .await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        assert_eq!(store.load().await?, vec![note("a", "kept")]);

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_mutations_are_serialized() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonArrayStore::<Note>::new("notes", &tmp).await?;

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .mutate(|records| {
                        records.push(note(&i.to_string(), "n"));
                        Ok(())
                    })
                    .await
            }));
        }
        for h in handles {
            h.await??;
        }
        assert_eq!(store.load().await?.len(), 16);

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_record_is_skipped_and_kept_on_write() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let raw = serde_json::json!([
            {"id": "a", "body": "first"},
            {"id": "b"},
            {"id": "c", "text": "third"}
        ]);
        fs::write(&tmp, serde_json::to_vec(&raw)?).await?;
        let store = JsonArrayStore::<Note>::new("notes", &tmp).await?;

        assert_eq!(store.load().await?, vec![note("a", "first"), note("c", "third")]);

        store
            .mutate(|records| {
                records.push(note("d", "fourth"));
                Ok(())
            })
            .await?;

        let written: Vec<Value> = serde_json::from_slice(&fs::read(&tmp).await?)?;
        assert_eq!(written.len(), 4);
        assert_eq!(written[2], serde_json::json!({"id": "d", "body": "fourth"}));
        assert_eq!(written[3], serde_json::json!({"id": "b"}));
        assert_eq!(store.load().await?.len(), 3);

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }
}
