//! Process-wide holder of the current question set.
//!
//! One `QuestionProvider` is built at startup and injected into the quiz
//! session and the admin editor, so an edit in one is visible in the other
//! without a manual refresh. It owns the backend subscription and the
//! fallback cache, and folds every change (remote snapshot or local
//! optimistic edit) through a single reducer.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::models::{seed_questions, Question};
use crate::store::{
    merge_remove, merge_upsert, FallbackCache, QuestionStore, StoreError,
};

/// Where the current snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Backend,
    Fallback,
}

struct ProviderState {
    questions: Vec<Question>,
    loading: bool,
    source: Source,
}

/// A change folded into the in-memory snapshot. Remote snapshots replace
/// wholesale and therefore always win; optimistic events merge by id.
enum ChangeEvent {
    Snapshot(Vec<Question>),
    Upserted(Question),
    Removed(String),
}

pub struct QuestionProvider {
    store: Option<Arc<dyn QuestionStore>>,
    cache: FallbackCache,
    state: Mutex<ProviderState>,
}

impl QuestionProvider {
    /// Loads the initial collection and, when the backend answered, stays
    /// subscribed to its change notifications for the rest of the process.
    ///
    /// A missing or unreachable backend is absorbed silently: the provider
    /// comes up ready on the cached collection, or on the built-in seed
    /// set when no cache exists yet.
    pub async fn start(
        store: Option<Arc<dyn QuestionStore>>,
        cache: FallbackCache,
    ) -> Arc<Self> {
        let provider = Arc::new(Self {
            store,
            cache,
            state: Mutex::new(ProviderState {
                questions: Vec::new(),
                loading: true,
                source: Source::Fallback,
            }),
        });

        let initial = match &provider.store {
            Some(store) => match store.fetch_all().await {
                Ok(questions) => Some(questions),
                Err(err) => {
                    warn!(%err, "backend unreachable at startup, using fallback");
                    None
                }
            },
            None => None,
        };

        match initial {
            Some(questions) => {
                provider.cache.store(&questions);
                {
                    let mut state = provider.state.lock().unwrap();
                    state.questions = questions;
                    state.loading = false;
                    state.source = Source::Backend;
                }
                Arc::clone(&provider).spawn_subscription();
            }
            None => {
                let questions = provider.cache.load().unwrap_or_else(|| {
                    info!("no cache found, starting from the seed set");
                    let seed = seed_questions();
                    provider.cache.store(&seed);
                    seed
                });
                let mut state = provider.state.lock().unwrap();
                state.questions = questions;
                state.loading = false;
                state.source = Source::Fallback;
            }
        }

        provider
    }

    fn spawn_subscription(self: Arc<Self>) {
        let Some(store) = self.store.clone() else {
            return;
        };
        tokio::spawn(async move {
            match store.subscribe().await {
                Ok(mut subscription) => {
                    while let Some(snapshot) = subscription.next().await {
                        self.apply(ChangeEvent::Snapshot(snapshot));
                    }
                    info!("backend subscription ended");
                }
                Err(err) => warn!(%err, "could not subscribe to backend changes"),
            }
        });
    }

    /// The reducer: folds one change into the snapshot, then mirrors the
    /// result into the fallback cache.
    fn apply(&self, event: ChangeEvent) {
        let mirrored = {
            let mut state = self.state.lock().unwrap();
            match event {
                ChangeEvent::Snapshot(questions) => state.questions = questions,
                ChangeEvent::Upserted(question) => {
                    merge_upsert(&mut state.questions, question);
                }
                ChangeEvent::Removed(id) => merge_remove(&mut state.questions, &id),
            }
            state.questions.clone()
        };
        self.cache.store(&mirrored);
    }

    fn backend(&self) -> Result<Arc<dyn QuestionStore>, StoreError> {
        self.store
            .clone()
            .ok_or_else(|| StoreError::Unavailable("no backend connection".to_string()))
    }

    fn set_loading(&self, loading: bool) {
        self.state.lock().unwrap().loading = loading;
    }

    /// Current in-memory snapshot; never suspends.
    pub fn questions(&self) -> Vec<Question> {
        self.state.lock().unwrap().questions.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    /// True when the collection was served from the cache or seed set
    /// because the backend was unreachable.
    pub fn is_fallback(&self) -> bool {
        self.state.lock().unwrap().source == Source::Fallback
    }

    /// Persists one record and folds it into the snapshot. A backend
    /// failure propagates to the caller and leaves the snapshot untouched.
    pub async fn save_question(&self, question: Question) -> Result<Question, StoreError> {
        let stored = self.backend()?.upsert(question).await?;
        self.apply(ChangeEvent::Upserted(stored.clone()));
        Ok(stored)
    }

    /// Deletes one record by id; same propagation contract as saving.
    pub async fn delete_question(&self, id: &str) -> Result<(), StoreError> {
        self.backend()?.remove(id).await?;
        self.apply(ChangeEvent::Removed(id.to_string()));
        Ok(())
    }

    /// Replaces the collection with the seed set. `is_loading` stays true
    /// for the whole round trip, the one operation the UI shows as a
    /// blocking wait.
    pub async fn reset_questions(&self) -> Result<(), StoreError> {
        let store = self.backend()?;
        self.set_loading(true);
        let result = store.reset_to_defaults().await;
        self.set_loading(false);
        let questions = result?;
        self.apply(ChangeEvent::Snapshot(questions));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LocalStore, Subscription};
    use async_trait::async_trait;

    /// Backend that refuses every operation.
    struct DownStore;

    #[async_trait]
    impl QuestionStore for DownStore {
        async fn fetch_all(&self) -> Result<Vec<Question>, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        async fn upsert(&self, _question: Question) -> Result<Question, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        async fn remove(&self, _id: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        async fn reset_to_defaults(&self) -> Result<Vec<Question>, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        async fn subscribe(&self) -> Result<Subscription, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
    }

    fn cache_in(dir: &tempfile::TempDir) -> FallbackCache {
        FallbackCache::new(dir.path())
    }

    fn local_store(dir: &tempfile::TempDir) -> Arc<dyn QuestionStore> {
        Arc::new(LocalStore::open(dir.path()).unwrap())
    }

    fn down_store() -> Arc<dyn QuestionStore> {
        Arc::new(DownStore)
    }

    #[tokio::test]
    async fn starts_ready_from_backend() {
        let dir = tempfile::tempdir().unwrap();
        let provider = QuestionProvider::start(Some(local_store(&dir)), cache_in(&dir)).await;
        assert!(!provider.is_loading());
        assert!(!provider.is_fallback());
        assert_eq!(provider.questions(), seed_questions());
        // The initial fetch mirrored the cache.
        assert_eq!(cache_in(&dir).load().unwrap(), seed_questions());
    }

    #[tokio::test]
    async fn unreachable_backend_falls_back_to_seed() {
        let dir = tempfile::tempdir().unwrap();
        let provider =
            QuestionProvider::start(Some(down_store()), cache_in(&dir)).await;
        assert!(provider.is_fallback());
        assert_eq!(provider.questions(), seed_questions());
        // Seeding the fallback also wrote the cache.
        assert_eq!(cache_in(&dir).load().unwrap(), seed_questions());
    }

    #[tokio::test]
    async fn unreachable_backend_prefers_cached_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut cached = seed_questions();
        cached.truncate(2);
        cache_in(&dir).store(&cached);
        let provider =
            QuestionProvider::start(Some(down_store()), cache_in(&dir)).await;
        assert!(provider.is_fallback());
        assert_eq!(provider.questions(), cached);
    }

    #[tokio::test]
    async fn save_applies_optimistic_update() {
        let dir = tempfile::tempdir().unwrap();
        let provider = QuestionProvider::start(Some(local_store(&dir)), cache_in(&dir)).await;

        let mut question = seed_questions()[0].clone();
        question.id = None;
        question.question = "追加の問題".to_string();
        let stored = provider.save_question(question).await.unwrap();
        assert_eq!(stored.id.as_deref(), Some("6"));

        let questions = provider.questions();
        assert_eq!(questions.len(), 6);
        assert!(questions.iter().any(|q| q.question == "追加の問題"));
    }

    #[tokio::test]
    async fn failed_save_leaves_snapshot_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let provider =
            QuestionProvider::start(Some(down_store()), cache_in(&dir)).await;
        let before = provider.questions();
        let result = provider.save_question(seed_questions()[0].clone()).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(provider.questions(), before);
    }

    #[tokio::test]
    async fn delete_applies_optimistic_update() {
        let dir = tempfile::tempdir().unwrap();
        let provider = QuestionProvider::start(Some(local_store(&dir)), cache_in(&dir)).await;
        provider.delete_question("4").await.unwrap();
        assert!(provider
            .questions()
            .iter()
            .all(|q| q.id.as_deref() != Some("4")));
    }

    #[tokio::test]
    async fn reset_restores_seed_and_clears_loading() {
        let dir = tempfile::tempdir().unwrap();
        let provider = QuestionProvider::start(Some(local_store(&dir)), cache_in(&dir)).await;
        let mut custom = seed_questions()[0].clone();
        custom.id = None;
        provider.save_question(custom).await.unwrap();

        provider.reset_questions().await.unwrap();
        assert!(!provider.is_loading());
        assert_eq!(provider.questions(), seed_questions());
    }

    #[tokio::test]
    async fn no_backend_save_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let provider = QuestionProvider::start(None, cache_in(&dir)).await;
        let result = provider.save_question(seed_questions()[0].clone()).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
