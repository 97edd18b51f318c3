//! Question persistence.
//!
//! `QuestionStore` is the one seam between the application and its backend:
//! the same CRUD contract covers the local JSON file and the remote sync
//! server. Consumers hold an `Arc<dyn QuestionStore>` and never know which
//! one they got.

mod cache;
mod local;
mod remote;

pub use cache::FallbackCache;
pub use local::LocalStore;
pub use remote::RemoteStore;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::models::Question;

/// Errors from a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend cannot be reached. Callers fall back to the last
    /// locally cached snapshot.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The backend reported a failed operation.
    #[error("backend error: {0}")]
    Backend(String),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed stored data: {0}")]
    Data(#[from] serde_json::Error),
}

/// A stream of full-collection snapshots. Dropping it unsubscribes.
///
/// Backends without live updates deliver a single snapshot and end the
/// stream; the sync server keeps pushing for the life of the connection.
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<Vec<Question>>,
}

impl Subscription {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<Vec<Question>>) -> Self {
        Self { rx }
    }

    /// Next snapshot, or `None` once the backend stops notifying.
    pub async fn next(&mut self) -> Option<Vec<Question>> {
        self.rx.recv().await
    }
}

/// Uniform asynchronous CRUD over a question backend.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// The full current collection.
    async fn fetch_all(&self) -> Result<Vec<Question>, StoreError>;

    /// Writes the full record, replacing any existing record with the same
    /// id; assigns an id when the record has none. Returns the persisted
    /// record.
    async fn upsert(&self, question: Question) -> Result<Question, StoreError>;

    /// Deletes the record with the given id. Deleting a missing id is a
    /// no-op, not an error.
    async fn remove(&self, id: &str) -> Result<(), StoreError>;

    /// Deletes every record and reinserts the built-in seed set.
    async fn reset_to_defaults(&self) -> Result<Vec<Question>, StoreError>;

    /// Registers for full-collection change notifications.
    async fn subscribe(&self) -> Result<Subscription, StoreError>;
}

/// Next id for a record that arrives without one: highest numeric id plus
/// one, so the seed ids "1".."5" continue naturally. Non-numeric ids are
/// kept but don't advance the counter.
pub(crate) fn next_id(questions: &[Question]) -> String {
    let max = questions
        .iter()
        .filter_map(|q| q.id.as_deref())
        .filter_map(|id| id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (max + 1).to_string()
}

/// Merges a record into a collection by id: replace in place on an id
/// match, append otherwise. Returns the stored record, id populated.
pub(crate) fn merge_upsert(questions: &mut Vec<Question>, mut question: Question) -> Question {
    if question.id.is_none() {
        question.id = Some(next_id(questions));
    }
    match questions.iter_mut().find(|q| q.id == question.id) {
        Some(existing) => *existing = question.clone(),
        None => questions.push(question.clone()),
    }
    question
}

/// Removes a record by id; silently keeps the collection unchanged when
/// the id is unknown.
pub(crate) fn merge_remove(questions: &mut Vec<Question>, id: &str) {
    questions.retain(|q| q.id.as_deref() != Some(id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed_questions;

    #[test]
    fn next_id_continues_after_highest_numeric() {
        let questions = seed_questions();
        assert_eq!(next_id(&questions), "6");
    }

    #[test]
    fn next_id_starts_at_one_for_empty_collection() {
        assert_eq!(next_id(&[]), "1");
    }

    #[test]
    fn next_id_ignores_non_numeric_ids() {
        let mut questions = seed_questions();
        questions[0].id = Some("draft".to_string());
        assert_eq!(next_id(&questions), "6");
    }

    #[test]
    fn merge_upsert_replaces_matching_id() {
        let mut questions = seed_questions();
        let mut edited = questions[2].clone();
        edited.question = "書き換え".to_string();
        let stored = merge_upsert(&mut questions, edited.clone());
        assert_eq!(stored, edited);
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[2].question, "書き換え");
    }

    #[test]
    fn merge_upsert_appends_and_assigns_id() {
        let mut questions = seed_questions();
        let mut new = questions[0].clone();
        new.id = None;
        let stored = merge_upsert(&mut questions, new);
        assert_eq!(stored.id.as_deref(), Some("6"));
        assert_eq!(questions.len(), 6);
    }

    #[test]
    fn merge_remove_is_idempotent() {
        let mut questions = seed_questions();
        merge_remove(&mut questions, "3");
        assert_eq!(questions.len(), 4);
        merge_remove(&mut questions, "3");
        assert_eq!(questions.len(), 4);
    }
}
