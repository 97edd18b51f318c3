//! Wire protocol shared by the sync server and the remote store client.

mod messages;

pub use messages::{ClientMessage, ServerMessage, DEFAULT_PORT};
