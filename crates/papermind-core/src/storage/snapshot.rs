//! Conversation snapshots, one JSON file per save.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use crate::conversation::Conversation;

const PREFIX: &str = "conversation_";
const EXTENSION: &str = ".json";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("the conversation is empty, nothing to save")]
    EmptyConversation,

    #[error("snapshot not found: {0}")]
    NotFound(String),

    #[error("snapshot {id} is corrupt: {source}")]
    CorruptData {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("there are no saved conversations to delete")]
    NothingToDelete,

    #[error("invalid snapshot id: {0}")]
    InvalidId(String),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Snapshot identity is its file name, e.g. `conversation_20240501_120000.json`.
///
/// The embedded timestamp has whole-second resolution, so ids sort
/// chronologically and two saves in the same second share an id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(String);

impl SnapshotId {
    pub fn from_timestamp(timestamp: NaiveDateTime) -> Self {
        Self(format!(
            "{}{}{}",
            PREFIX,
            timestamp.format(TIMESTAMP_FORMAT),
            EXTENSION
        ))
    }

    /// Accepts any plain `*.json` file name; anything that could escape the
    /// snapshot directory is rejected.
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        let stem = name.strip_suffix(EXTENSION).unwrap_or_default();
        if stem.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.starts_with('.')
        {
            return Err(StoreError::InvalidId(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Creates the backing location if needed.
    async fn init(&self) -> Result<()>;

    async fn save(&self, conversation: &Conversation) -> Result<SnapshotId>;

    async fn load(&self, id: &SnapshotId) -> Result<Conversation>;

    /// All snapshot ids, newest first.
    async fn list(&self) -> Result<Vec<SnapshotId>>;

    async fn delete(&self, id: &SnapshotId) -> Result<()>;

    /// Removes every snapshot and returns how many were removed.
    async fn delete_all(&self) -> Result<usize>;
}

#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    base_path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Saves under the id derived from `timestamp`. A snapshot already using
    /// that id is overwritten.
    pub async fn save_at(
        &self,
        conversation: &Conversation,
        timestamp: NaiveDateTime,
    ) -> Result<SnapshotId> {
        if conversation.is_empty() {
            return Err(StoreError::EmptyConversation);
        }

        fs::create_dir_all(&self.base_path).await?;

        let id = SnapshotId::from_timestamp(timestamp);
        let path = self.snapshot_path(&id);
        if fs::try_exists(&path).await.unwrap_or(false) {
            log::warn!("[{}] Snapshot saved in the same second, overwriting", id);
        }

        let json = serde_json::to_string(conversation)?;
        fs::write(&path, json).await?;

        log::info!(
            "[{}] Saved conversation with {} messages",
            id,
            conversation.messages.len()
        );
        Ok(id)
    }

    fn snapshot_path(&self, id: &SnapshotId) -> PathBuf {
        self.base_path.join(id.as_str())
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    async fn save(&self, conversation: &Conversation) -> Result<SnapshotId> {
        self.save_at(conversation, Local::now().naive_local()).await
    }

    async fn load(&self, id: &SnapshotId) -> Result<Conversation> {
        let path = self.snapshot_path(id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Err(error) => return Err(error.into()),
        };

        let conversation: Conversation =
            serde_json::from_str(&content).map_err(|source| StoreError::CorruptData {
                id: id.to_string(),
                source,
            })?;

        log::info!(
            "[{}] Loaded conversation with {} messages",
            id,
            conversation.messages.len()
        );
        Ok(conversation)
    }

    async fn list(&self) -> Result<Vec<SnapshotId>> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Ok(id) = SnapshotId::parse(name) {
                ids.push(id);
            }
        }

        ids.sort_unstable_by(|a, b| b.cmp(a));
        Ok(ids)
    }

    async fn delete(&self, id: &SnapshotId) -> Result<()> {
        match fs::remove_file(self.snapshot_path(id)).await {
            Ok(()) => {
                log::info!("[{}] Snapshot deleted", id);
                Ok(())
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn delete_all(&self) -> Result<usize> {
        let ids = self.list().await?;
        if ids.is_empty() {
            return Err(StoreError::NothingToDelete);
        }

        for id in &ids {
            fs::remove_file(self.snapshot_path(id)).await?;
        }

        log::info!("Deleted {} snapshots", ids.len());
        Ok(ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    fn sample_conversation() -> Conversation {
        let mut conversation = Conversation::new();
        conversation.set_document_text("Photosynthesis converts light into energy.");
        conversation.append("What does photosynthesis convert?", "Light into energy.");
        conversation
    }

    #[test]
    fn id_embeds_timestamp() {
        let id = SnapshotId::from_timestamp(at(9, 5, 7));
        assert_eq!(id.as_str(), "conversation_20240501_090507.json");
    }

    #[test]
    fn parse_rejects_paths_and_foreign_files() {
        assert!(SnapshotId::parse("conversation_20240501_090507.json").is_ok());
        assert!(SnapshotId::parse("../secret.json").is_err());
        assert!(SnapshotId::parse("nested\\x.json").is_err());
        assert!(SnapshotId::parse("notes.txt").is_err());
        assert!(SnapshotId::parse(".json").is_err());
    }

    #[tokio::test]
    async fn save_then_load_reconstructs_conversation() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        let conversation = sample_conversation();

        let id = store.save_at(&conversation, at(12, 0, 0)).await.unwrap();
        let loaded = store.load(&id).await.unwrap();

        assert_eq!(loaded, conversation);
    }

    #[tokio::test]
    async fn save_of_empty_conversation_writes_nothing() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("conversations"));

        let result = store.save(&Conversation::new()).await;

        assert!(matches!(result, Err(StoreError::EmptyConversation)));
        assert!(!dir.path().join("conversations").exists());
    }

    #[tokio::test]
    async fn load_tolerates_missing_history() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        let id = SnapshotId::from_timestamp(at(8, 0, 0));
        std::fs::write(
            dir.path().join(id.as_str()),
            r#"{"messages":[{"role":"user","content":"hi"}],"pdf_text":"doc"}"#,
        )
        .unwrap();

        let loaded = store.load(&id).await.unwrap();

        assert_eq!(loaded.messages.len(), 1);
        assert_eq!(loaded.document_text, "doc");
        assert!(loaded.conversation_history.is_empty());
    }

    #[tokio::test]
    async fn load_reports_corrupt_and_missing_snapshots() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        let id = SnapshotId::from_timestamp(at(8, 0, 0));
        std::fs::write(dir.path().join(id.as_str()), r#"{"messages":[]}"#).unwrap();

        assert!(matches!(
            store.load(&id).await,
            Err(StoreError::CorruptData { .. })
        ));

        let missing = SnapshotId::from_timestamp(at(23, 59, 59));
        assert!(matches!(
            store.load(&missing).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_ignores_other_files() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        let conversation = sample_conversation();

        store.save_at(&conversation, at(10, 0, 0)).await.unwrap();
        store.save_at(&conversation, at(12, 0, 0)).await.unwrap();
        store.save_at(&conversation, at(11, 0, 0)).await.unwrap();
        std::fs::write(dir.path().join("readme.txt"), "not a snapshot").unwrap();

        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|id| id.to_string())
            .collect();

        assert_eq!(
            ids,
            vec![
                "conversation_20240501_120000.json",
                "conversation_20240501_110000.json",
                "conversation_20240501_100000.json",
            ]
        );
    }

    #[tokio::test]
    async fn list_of_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("absent"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn same_second_save_overwrites() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        let first = sample_conversation();
        let mut second = sample_conversation();
        second.append("And then?", "Sugar.");

        let id_a = store.save_at(&first, at(12, 0, 0)).await.unwrap();
        let id_b = store.save_at(&second, at(12, 0, 0)).await.unwrap();

        assert_eq!(id_a, id_b);
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(store.load(&id_a).await.unwrap(), second);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_snapshot() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        let conversation = sample_conversation();

        let keep = store.save_at(&conversation, at(10, 0, 0)).await.unwrap();
        let removed = store.save_at(&conversation, at(11, 0, 0)).await.unwrap();
        let keep_bytes = std::fs::read(dir.path().join(keep.as_str())).unwrap();

        store.delete(&removed).await.unwrap();

        assert_eq!(store.list().await.unwrap(), vec![keep.clone()]);
        assert_eq!(
            std::fs::read(dir.path().join(keep.as_str())).unwrap(),
            keep_bytes
        );
        assert!(matches!(
            store.delete(&removed).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_all_empties_store_and_reports_when_nothing_left() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        let conversation = sample_conversation();
        for hour in 1..=3 {
            store.save_at(&conversation, at(hour, 0, 0)).await.unwrap();
        }

        assert_eq!(store.delete_all().await.unwrap(), 3);
        assert!(store.list().await.unwrap().is_empty());
        assert!(matches!(
            store.delete_all().await,
            Err(StoreError::NothingToDelete)
        ));
    }
}
