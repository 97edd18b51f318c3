//! Sync server state: the authoritative collection plus the set of
//! connected clients to fan snapshots out to.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{seed_questions, Question};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::store::StoreError;

/// File name of the server-side collection.
const SERVER_FILE: &str = "server-questions.json";

pub struct ServerState {
    questions: Vec<Question>,
    clients: HashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
    path: PathBuf,
}

impl ServerState {
    /// Loads the collection from `data_dir`, seeding the default set on
    /// first run.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(SERVER_FILE);
        let questions = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            info!(path = %path.display(), "seeding server collection");
            let seed = seed_questions();
            fs::write(&path, serde_json::to_string_pretty(&seed)?)?;
            seed
        };
        Ok(Self {
            questions,
            clients: HashMap::new(),
            path,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn register(&mut self, id: Uuid, sender: mpsc::UnboundedSender<ServerMessage>) {
        self.clients.insert(id, sender);
    }

    pub fn unregister(&mut self, id: &Uuid) {
        self.clients.remove(id);
    }

    pub fn snapshot(&self) -> ServerMessage {
        ServerMessage::Snapshot {
            questions: self.questions.clone(),
        }
    }

    /// Pushes the current collection to every connected client; clients
    /// whose channel is gone are dropped from the set.
    pub fn broadcast_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.clients
            .retain(|_, sender| sender.send(snapshot.clone()).is_ok());
    }

    /// Applies one client request and returns the direct reply. The
    /// second value is true when the collection changed and a snapshot
    /// broadcast is due.
    pub fn apply(&mut self, msg: ClientMessage) -> (ServerMessage, bool) {
        match msg {
            ClientMessage::FetchAll => (self.snapshot(), false),
            ClientMessage::Upsert { question } => {
                let mut next = self.questions.clone();
                let stored = crate::store::merge_upsert(&mut next, question);
                match self.commit(next) {
                    Ok(()) => {
                        debug!(id = ?stored.id, "upserted");
                        (ServerMessage::Upserted { question: stored }, true)
                    }
                    Err(err) => (self.persist_error(err), false),
                }
            }
            ClientMessage::Remove { id } => {
                let mut next = self.questions.clone();
                crate::store::merge_remove(&mut next, &id);
                match self.commit(next) {
                    Ok(()) => {
                        debug!(id, "removed");
                        (ServerMessage::Removed { id }, true)
                    }
                    Err(err) => (self.persist_error(err), false),
                }
            }
            ClientMessage::Reset => match self.commit(seed_questions()) {
                Ok(()) => {
                    info!("collection reset to defaults");
                    (
                        ServerMessage::ResetDone {
                            questions: self.questions.clone(),
                        },
                        true,
                    )
                }
                Err(err) => (self.persist_error(err), false),
            },
        }
    }

    /// Persists the new collection, then makes it current. A failed write
    /// leaves the old collection in place.
    fn commit(&mut self, next: Vec<Question>) -> Result<(), StoreError> {
        fs::write(&self.path, serde_json::to_string_pretty(&next)?)?;
        self.questions = next;
        Ok(())
    }

    fn persist_error(&self, err: StoreError) -> ServerMessage {
        warn!(%err, "persist failed");
        ServerMessage::Error {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_state(dir: &tempfile::TempDir) -> ServerState {
        ServerState::open(dir.path()).unwrap()
    }

    #[test]
    fn first_run_seeds_collection() {
        let dir = tempfile::tempdir().unwrap();
        let state = open_state(&dir);
        assert_eq!(state.questions(), seed_questions());
    }

    #[test]
    fn upsert_assigns_id_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = open_state(&dir);
        let mut question = seed_questions()[0].clone();
        question.id = None;
        let (reply, changed) = state.apply(ClientMessage::Upsert { question });
        assert!(changed);
        match reply {
            ServerMessage::Upserted { question } => {
                assert_eq!(question.id.as_deref(), Some("6"));
            }
            other => panic!("unexpected reply: {other:?}"),
        }
        // A fresh state sees the persisted record.
        assert_eq!(open_state(&dir).questions().len(), 6);
    }

    #[test]
    fn remove_unknown_id_still_acknowledged() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = open_state(&dir);
        let (reply, _) = state.apply(ClientMessage::Remove {
            id: "999".to_string(),
        });
        assert!(matches!(reply, ServerMessage::Removed { .. }));
        assert_eq!(state.questions().len(), 5);
    }

    #[test]
    fn reset_restores_seed() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = open_state(&dir);
        state.apply(ClientMessage::Remove {
            id: "1".to_string(),
        });
        let (reply, changed) = state.apply(ClientMessage::Reset);
        assert!(changed);
        match reply {
            ServerMessage::ResetDone { questions } => {
                assert_eq!(questions, seed_questions());
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn broadcast_prunes_dead_clients() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = open_state(&dir);
        let (alive_tx, mut alive_rx) = mpsc::unbounded_channel();
        let (dead_tx, dead_rx) = mpsc::unbounded_channel();
        drop(dead_rx);
        state.register(Uuid::new_v4(), alive_tx);
        state.register(Uuid::new_v4(), dead_tx);
        state.broadcast_snapshot();
        assert_eq!(state.client_count(), 1);
        assert!(matches!(
            alive_rx.try_recv().unwrap(),
            ServerMessage::Snapshot { .. }
        ));
    }
}
