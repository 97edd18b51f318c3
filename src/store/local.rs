use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::models::{seed_questions, Question};

use super::{merge_remove, merge_upsert, QuestionStore, StoreError, Subscription};

/// File name of the local question collection.
const STORE_FILE: &str = "questions.json";

/// JSON-file-backed store: the "local persistent storage" backend.
///
/// Every operation reads the whole array and mutations rewrite it, the way
/// a browser would round-trip one storage key.
pub struct LocalStore {
    path: PathBuf,
    // Serializes read-modify-write cycles between concurrent callers.
    write_lock: Mutex<()>,
}

impl LocalStore {
    /// Opens the store under `data_dir`, seeding the default question set
    /// on first run.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(STORE_FILE);
        let store = Self {
            path,
            write_lock: Mutex::new(()),
        };
        if !store.path.exists() {
            info!(path = %store.path.display(), "seeding local store");
            store.write(&seed_questions())?;
        }
        Ok(store)
    }

    fn read(&self) -> Result<Vec<Question>, StoreError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, questions: &[Question]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(questions)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[async_trait]
impl QuestionStore for LocalStore {
    async fn fetch_all(&self) -> Result<Vec<Question>, StoreError> {
        self.read()
    }

    async fn upsert(&self, question: Question) -> Result<Question, StoreError> {
        let _guard = self.write_lock.lock().unwrap();
        let mut questions = self.read()?;
        let stored = merge_upsert(&mut questions, question);
        self.write(&questions)?;
        debug!(id = ?stored.id, "upserted question");
        Ok(stored)
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap();
        let mut questions = self.read()?;
        merge_remove(&mut questions, id);
        self.write(&questions)?;
        debug!(id, "removed question");
        Ok(())
    }

    async fn reset_to_defaults(&self) -> Result<Vec<Question>, StoreError> {
        let _guard = self.write_lock.lock().unwrap();
        let questions = seed_questions();
        self.write(&questions)?;
        info!("local store reset to defaults");
        Ok(questions)
    }

    /// The file backend has no change feed: the stream ends immediately,
    /// which callers experience as a no-op unsubscribe. Delivering a
    /// snapshot here would race against optimistic updates made after
    /// the caller's own initial fetch.
    async fn subscribe(&self) -> Result<Subscription, StoreError> {
        let (_tx, rx) = mpsc::unbounded_channel();
        Ok(Subscription::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed_questions;

    fn open_store(dir: &tempfile::TempDir) -> LocalStore {
        LocalStore::open(dir.path()).unwrap()
    }

    #[tokio::test]
    async fn first_run_seeds_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        assert_eq!(store.fetch_all().await.unwrap(), seed_questions());
    }

    #[tokio::test]
    async fn upsert_without_id_assigns_next_numeric() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let mut question = seed_questions()[0].clone();
        question.id = None;
        question.question = "新しい問題".to_string();
        let stored = store.upsert(question).await.unwrap();
        assert_eq!(stored.id.as_deref(), Some("6"));
        assert_eq!(store.fetch_all().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn upsert_replaces_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let mut edited = seed_questions()[1].clone();
        edited.explanation = "改訂版の解説。".to_string();
        store.upsert(edited.clone()).await.unwrap();
        let all = store.fetch_all().await.unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[1], edited);
    }

    #[tokio::test]
    async fn remove_twice_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        store.remove("2").await.unwrap();
        assert_eq!(store.fetch_all().await.unwrap().len(), 4);
        store.remove("2").await.unwrap();
        assert_eq!(store.fetch_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn reset_discards_custom_questions() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        for i in 0..10 {
            let mut q = seed_questions()[0].clone();
            q.id = None;
            q.question = format!("カスタム問題 {i}");
            store.upsert(q).await.unwrap();
        }
        let after = store.reset_to_defaults().await.unwrap();
        assert_eq!(after, seed_questions());
        assert_eq!(store.fetch_all().await.unwrap(), seed_questions());
    }

    #[tokio::test]
    async fn subscription_ends_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let mut sub = store.subscribe().await.unwrap();
        assert!(sub.next().await.is_none());
    }
}
