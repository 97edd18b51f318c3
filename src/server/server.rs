//! Headless WebSocket sync server.
//!
//! One task per connection. Every mutation is persisted, acknowledged to
//! the requester, then fanned out to all clients as a fresh snapshot:
//! the live-update feed the remote store subscribes to. Concurrent writes
//! are applied in arrival order, last write wins.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::QuizError;

use super::state::ServerState;

/// Shared server state wrapped in Arc<Mutex> for async access.
type SharedState = Arc<Mutex<ServerState>>;

/// Run the sync server until the process is stopped.
pub async fn run(port: u16, data_dir: &Path) -> Result<(), QuizError> {
    let state = Arc::new(Mutex::new(ServerState::open(data_dir)?));

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "sync server listening");

    serve(listener, state).await
}

async fn serve(listener: TcpListener, state: SharedState) -> Result<(), QuizError> {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(handle_connection(stream, addr, state));
            }
            Err(err) => {
                warn!(%err, "failed to accept connection");
            }
        }
    }
}

/// Handle a single WebSocket connection.
async fn handle_connection(stream: TcpStream, addr: SocketAddr, state: SharedState) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(err) => {
            warn!(%addr, %err, "websocket handshake failed");
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let client_id = Uuid::new_v4();

    // Register and greet with the current collection.
    {
        let mut state = state.lock().await;
        state.register(client_id, tx.clone());
        let _ = tx.send(state.snapshot());
        info!(%client_id, %addr, clients = state.client_count(), "client connected");
    }

    // Forward queued messages onto the socket.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(_) => continue,
            };
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Process incoming requests.
    while let Some(msg) = ws_receiver.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text.to_string(),
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => continue,
        };

        let client_msg: ClientMessage = match serde_json::from_str(&text) {
            Ok(m) => m,
            Err(err) => {
                debug!(%client_id, %err, "ignoring malformed message");
                continue;
            }
        };

        let mut state = state.lock().await;
        let (reply, changed) = state.apply(client_msg);
        let _ = tx.send(reply);
        if changed {
            state.broadcast_snapshot();
        }
    }

    // Connection gone.
    {
        let mut state = state.lock().await;
        state.unregister(&client_id);
        info!(%client_id, clients = state.client_count(), "client disconnected");
    }

    send_task.abort();
}
