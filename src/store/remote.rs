use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::models::Question;
use crate::protocol::{ClientMessage, ServerMessage};

use super::{QuestionStore, StoreError, Subscription};

/// How long to wait for a server reply before reporting the store as
/// unreachable.
const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

/// The reply slot for the one in-flight request. `Snapshot` messages
/// satisfy a fetch; everything else satisfies a mutation, so broadcast
/// snapshots from other clients can never be mistaken for an ack.
enum Pending {
    Fetch(oneshot::Sender<Vec<Question>>),
    Mutation(oneshot::Sender<ServerMessage>),
}

struct Shared {
    pending: StdMutex<Option<Pending>>,
    subscribers: StdMutex<Vec<mpsc::UnboundedSender<Vec<Question>>>>,
}

/// WebSocket client for the question sync server: the "remote document
/// store" backend with live snapshot subscriptions.
pub struct RemoteStore {
    outgoing: mpsc::UnboundedSender<ClientMessage>,
    shared: Arc<Shared>,
    // One request in flight at a time; replies carry no correlation id.
    request_lock: Mutex<()>,
}

impl std::fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStore").finish_non_exhaustive()
    }
}

impl RemoteStore {
    /// Connects to the sync server at `url` (a `ws://host:port` address).
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        debug!(url, "connected to sync server");

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<ClientMessage>();

        // Forward outgoing messages onto the socket.
        tokio::spawn(async move {
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

        let shared = Arc::new(Shared {
            pending: StdMutex::new(None),
            subscribers: StdMutex::new(Vec::new()),
        });

        // Dispatch incoming messages to the reply slot and subscribers.
        let shared_recv = Arc::clone(&shared);
        tokio::spawn(async move {
            while let Some(msg) = ws_receiver.next().await {
                let text = match msg {
                    Ok(Message::Text(text)) => text.to_string(),
                    Ok(Message::Close(_)) => break,
                    Err(err) => {
                        warn!(%err, "sync connection error");
                        break;
                    }
                    _ => continue,
                };

                let server_msg: ServerMessage = match serde_json::from_str(&text) {
                    Ok(m) => m,
                    Err(_) => continue,
                };

                dispatch(&shared_recv, server_msg);
            }

            // Connection gone: wake any waiter and end every subscription.
            shared_recv.pending.lock().unwrap().take();
            shared_recv.subscribers.lock().unwrap().clear();
            debug!("sync connection closed");
        });

        Ok(Self {
            outgoing: tx,
            shared,
            request_lock: Mutex::new(()),
        })
    }

    fn send(&self, msg: ClientMessage) -> Result<(), StoreError> {
        self.outgoing
            .send(msg)
            .map_err(|_| StoreError::Unavailable("connection closed".to_string()))
    }

    async fn await_reply<T>(&self, rx: oneshot::Receiver<T>) -> Result<T, StoreError> {
        match tokio::time::timeout(REPLY_TIMEOUT, rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(StoreError::Unavailable(
                "connection closed".to_string(),
            )),
            Err(_) => {
                self.shared.pending.lock().unwrap().take();
                Err(StoreError::Unavailable(
                    "server reply timed out".to_string(),
                ))
            }
        }
    }

    async fn mutate(&self, msg: ClientMessage) -> Result<ServerMessage, StoreError> {
        let _guard = self.request_lock.lock().await;
        let (tx, rx) = oneshot::channel();
        *self.shared.pending.lock().unwrap() = Some(Pending::Mutation(tx));
        self.send(msg)?;
        match self.await_reply(rx).await? {
            ServerMessage::Error { message } => Err(StoreError::Backend(message)),
            reply => Ok(reply),
        }
    }
}

fn dispatch(shared: &Shared, msg: ServerMessage) {
    match msg {
        ServerMessage::Snapshot { questions } => {
            let fetch_waiter = {
                let mut pending = shared.pending.lock().unwrap();
                match pending.take() {
                    Some(Pending::Fetch(tx)) => Some(tx),
                    other => {
                        *pending = other;
                        None
                    }
                }
            };
            if let Some(tx) = fetch_waiter {
                let _ = tx.send(questions.clone());
            }
            shared
                .subscribers
                .lock()
                .unwrap()
                .retain(|tx| tx.send(questions.clone()).is_ok());
        }
        reply => {
            let waiter = {
                let mut pending = shared.pending.lock().unwrap();
                match pending.take() {
                    Some(Pending::Mutation(tx)) => Some(tx),
                    other => {
                        *pending = other;
                        None
                    }
                }
            };
            match waiter {
                Some(tx) => {
                    let _ = tx.send(reply);
                }
                None => debug!("dropping unmatched server reply"),
            }
        }
    }
}

#[async_trait]
impl QuestionStore for RemoteStore {
    async fn fetch_all(&self) -> Result<Vec<Question>, StoreError> {
        let _guard = self.request_lock.lock().await;
        let (tx, rx) = oneshot::channel();
        *self.shared.pending.lock().unwrap() = Some(Pending::Fetch(tx));
        self.send(ClientMessage::FetchAll)?;
        self.await_reply(rx).await
    }

    async fn upsert(&self, question: Question) -> Result<Question, StoreError> {
        match self.mutate(ClientMessage::Upsert { question }).await? {
            ServerMessage::Upserted { question } => Ok(question),
            reply => Err(StoreError::Backend(format!(
                "unexpected reply to upsert: {reply:?}"
            ))),
        }
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        match self
            .mutate(ClientMessage::Remove { id: id.to_string() })
            .await?
        {
            ServerMessage::Removed { .. } => Ok(()),
            reply => Err(StoreError::Backend(format!(
                "unexpected reply to remove: {reply:?}"
            ))),
        }
    }

    async fn reset_to_defaults(&self) -> Result<Vec<Question>, StoreError> {
        match self.mutate(ClientMessage::Reset).await? {
            ServerMessage::ResetDone { questions } => Ok(questions),
            reply => Err(StoreError::Backend(format!(
                "unexpected reply to reset: {reply:?}"
            ))),
        }
    }

    async fn subscribe(&self) -> Result<Subscription, StoreError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.shared.subscribers.lock().unwrap().push(tx);
        Ok(Subscription::new(rx))
    }
}
