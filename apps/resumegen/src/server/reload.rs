//! The live-reload push socket: client registry, broadcast, and the
//! per-connection pump.
//!
//! Clients never send anything meaningful; the protocol is one literal
//! token pushed server-to-client. A send that fails is the only disconnect
//! signal there is, so failed clients are dropped on the spot.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tracing::info;

/// The literal token that tells a connected page to refresh.
pub(crate) const RELOAD_TOKEN: &str = "reload";

/// Registry of connected live-reload clients, shared between the watcher
/// (broadcast), the shutdown path (close_all), and each connection task.
#[derive(Clone, Default)]
pub(crate) struct ReloadHub {
    clients: Arc<Mutex<HashMap<u64, UnboundedSender<Message>>>>,
    next_id: Arc<AtomicU64>,
}

impl ReloadHub {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn register(&self) -> (u64, UnboundedReceiver<Message>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.clients.lock().await.insert(id, tx);
        (id, rx)
    }

    pub(crate) async fn unregister(&self, id: u64) {
        self.clients.lock().await.remove(&id);
    }

    /// Queues the reload token to every connected client, dropping any
    /// whose channel has gone away.
    pub(crate) async fn broadcast_reload(&self) -> usize {
        let mut clients = self.clients.lock().await;
        clients.retain(|_, tx| tx.send(Message::Text(RELOAD_TOKEN.to_string())).is_ok());
        info!("Broadcasting reload to {} clients", clients.len());
        clients.len()
    }

    /// Tells every client to close and forgets them all. Used on shutdown
    /// so browser tabs fall back to their reconnect timer.
    pub(crate) async fn close_all(&self) {
        let mut clients = self.clients.lock().await;
        for (_, tx) in clients.drain() {
            let _ = tx.send(Message::Close(None));
        }
    }

    pub(crate) async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}

/// Router for the dedicated push-socket listener.
pub(crate) fn ws_router(hub: ReloadHub) -> Router {
    Router::new().route("/", get(ws_handler)).with_state(hub)
}

async fn ws_handler(State(hub): State<ReloadHub>, upgrade: WebSocketUpgrade) -> Response {
    upgrade.on_upgrade(move |socket| client_loop(socket, hub))
}

/// Pumps hub messages out to one client until either side goes away.
async fn client_loop(socket: WebSocket, hub: ReloadHub) {
    info!("Client connected to live reload");
    let (id, mut outbound) = hub.register().await;
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            queued = outbound.recv() => match queued {
                Some(message) => {
                    let closing = matches!(message, Message::Close(_));
                    if sink.send(message).await.is_err() || closing {
                        break;
                    }
                }
                None => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Anything a client sends is ignored.
                Some(Ok(_)) => {}
            },
        }
    }

    hub.unregister(id).await;
    info!("Client disconnected from live reload");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_delivers_reload_token_to_every_client() {
        let hub = ReloadHub::new();
        let (_a, mut rx_a) = hub.register().await;
        let (_b, mut rx_b) = hub.register().await;

        let delivered = hub.broadcast_reload().await;
        assert_eq!(delivered, 2);
        for rx in [&mut rx_a, &mut rx_b] {
            match rx.recv().await {
                Some(Message::Text(token)) => assert_eq!(token, RELOAD_TOKEN),
                other => panic!("expected reload token, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_broadcast_drops_clients_whose_channel_closed() {
        let hub = ReloadHub::new();
        let (_kept, _rx) = hub.register().await;
        let (_gone, rx_gone) = hub.register().await;
        drop(rx_gone);

        assert_eq!(hub.broadcast_reload().await, 1);
        assert_eq!(hub.client_count().await, 1);
    }

    #[tokio::test]
    async fn test_close_all_sends_close_frame_and_clears_registry() {
        let hub = ReloadHub::new();
        let (_id, mut rx) = hub.register().await;

        hub.close_all().await;
        assert!(matches!(rx.recv().await, Some(Message::Close(None))));
        assert_eq!(hub.client_count().await, 0);
    }

    #[tokio::test]
    async fn test_unregister_removes_single_client() {
        let hub = ReloadHub::new();
        let (id, _rx) = hub.register().await;
        assert_eq!(hub.client_count().await, 1);
        hub.unregister(id).await;
        assert_eq!(hub.client_count().await, 0);
    }
}
