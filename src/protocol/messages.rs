//! Protocol messages for the question sync server.
//!
//! All messages are serialized as JSON over WebSocket.

use serde::{Deserialize, Serialize};

use crate::models::Question;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Request the full collection.
    FetchAll,

    /// Insert or replace a record; the server assigns an id when the
    /// record has none.
    Upsert { question: Question },

    /// Delete by id. Unknown ids are acknowledged as removed anyway.
    Remove { id: String },

    /// Replace the collection with the built-in seed set.
    Reset,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// The full collection. Sent once on connect, as the `FetchAll`
    /// reply, and broadcast to every client after any change.
    Snapshot { questions: Vec<Question> },

    /// Direct reply to `Upsert` with the persisted record.
    Upserted { question: Question },

    /// Direct reply to `Remove`.
    Removed { id: String },

    /// Direct reply to `Reset` with the new collection.
    ResetDone { questions: Vec<Question> },

    /// The operation could not be applied.
    Error { message: String },
}

/// Default sync server port.
pub const DEFAULT_PORT: u16 = 8931;
