//! JSON file store
//!
//! Keeps interaction history and session contexts in a single JSON document
//! on disk. Every operation reads the document, and writes replace it through
//! a temporary file and a rename. A process-local mutex orders writes from
//! one process; separate processes are last-write-wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::errors::{Result, TutorError};
use crate::store::{most_recent_first, ContextStore, InteractionStore};
use crate::types::{ContextPatch, ConversationContext, InteractionRecord};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    interactions: BTreeMap<String, Vec<InteractionRecord>>,

    #[serde(default)]
    contexts: BTreeMap<String, ConversationContext>,
}

/// File-backed interaction and context store
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store at `path`, creating the parent directory if needed.
    /// The file itself is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    TutorError::Store(format!("Failed to create store directory: {}", e))
                })?;
            }
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoreDocument> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) if json.trim().is_empty() => Ok(StoreDocument::default()),
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| TutorError::Store(format!("Failed to parse {}: {}", self.path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(e) => Err(TutorError::Store(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save(&self, document: &StoreDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| TutorError::Store(format!("Failed to write store: {}", e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| TutorError::Store(format!("Failed to replace store: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl InteractionStore for JsonFileStore {
    async fn fetch_recent(&self, user_id: &str, limit: usize) -> Result<Vec<InteractionRecord>> {
        let document = self.load().await?;
        Ok(document
            .interactions
            .get(user_id)
            .map(|records| most_recent_first(records, limit))
            .unwrap_or_default())
    }

    async fn append(&self, user_id: &str, record: InteractionRecord) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;
        let records = document.interactions.entry(user_id.to_string()).or_default();
        records.push(record);
        let total = records.len();
        self.save(&document).await?;
        Ok(total)
    }

    async fn count(&self, user_id: &str) -> Result<usize> {
        let document = self.load().await?;
        Ok(document.interactions.get(user_id).map(Vec::len).unwrap_or(0))
    }
}

#[async_trait]
impl ContextStore for JsonFileStore {
    async fn get(&self, session_key: &str) -> Result<Option<ConversationContext>> {
        let document = self.load().await?;
        Ok(document.contexts.get(session_key).cloned())
    }

    async fn upsert(&self, session_key: &str, patch: ContextPatch) -> Result<ConversationContext> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;
        let context = document
            .contexts
            .entry(session_key.to_string())
            .or_default();
        context.apply(patch);
        let stored = context.clone();
        self.save(&document).await?;
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("state.json")).unwrap();
        assert!(store.fetch_recent("u1", 10).await.unwrap().is_empty());
        assert!(ContextStore::get(&store, "u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.append("u1", InteractionRecord::new(2, true, 30.0, 4)).await.unwrap(), 1);
        store
            .upsert("u1", ContextPatch {
                current_topic: Some("OOP".to_string()),
                current_topic_id: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.count("u1").await.unwrap(), 1);
        let context = ContextStore::get(&reopened, "u1").await.unwrap().unwrap();
        assert_eq!(context.current_topic_id, Some(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_appends_report_distinct_totals() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(JsonFileStore::open(dir.path().join("state.json")).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.append("u1", InteractionRecord::new(i, true, 10.0, 5)).await
                })
            })
            .collect();

        let mut totals = Vec::new();
        for handle in handles {
            totals.push(handle.await.unwrap().unwrap());
        }
        totals.sort_unstable();

        assert_eq!(totals, vec![1, 2, 3, 4]);
        assert_eq!(store.count("u1").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_store_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        let err = store.fetch_recent("u1", 10).await.unwrap_err();
        assert!(matches!(err, TutorError::Store(_)));
    }
}
