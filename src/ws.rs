/// Event channel to the backend: one WebSocket per client id.
///
/// The socket is read-only from the application's point of view. The only
/// frames written back are Pongs. Connection state changes are surfaced as
/// synthetic `connection_status` events on the same channel as real frames,
/// so the reducer sees a single ordered stream. There is no automatic
/// reconnect; when the task ends the status indicator goes red and stays red.
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use crate::protocol::{self, ConnectionStatus, ServerEvent};

pub struct Connection {
    handle: JoinHandle<()>,
}

impl Connection {
    /// Connect `{ws_base}/{client_id}` on a spawned task and forward decoded
    /// events to `tx`. Returns immediately; the first event on the channel
    /// reports whether the connection came up.
    pub fn open(ws_base: &str, client_id: &str, tx: UnboundedSender<ServerEvent>) -> Self {
        let url = format!("{}/{}", ws_base.trim_end_matches('/'), client_id);
        let handle = tokio::spawn(async move {
            run(url, tx).await;
        });
        Self { handle }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(url: String, tx: UnboundedSender<ServerEvent>) {
    let mut ws = match tokio_tungstenite::connect_async(&url).await {
        Ok((ws, _)) => {
            tracing::info!(%url, "event channel connected");
            let _ = tx.send(ServerEvent::ConnectionStatus(ConnectionStatus::Connected));
            ws
        }
        Err(err) => {
            tracing::warn!(%url, error = %err, "event channel connect failed");
            let _ = tx.send(ServerEvent::ConnectionStatus(ConnectionStatus::Error));
            return;
        }
    };

    while let Some(frame) = ws.next().await {
        match frame {
            Ok(Message::Text(raw)) => match protocol::decode_frame(&raw) {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        // Receiver gone — the UI shut down
                        return;
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, frame = %raw, "dropping malformed frame");
                }
            },
            Ok(Message::Ping(payload)) => {
                if ws.send(Message::Pong(payload)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "event channel transport error");
                let _ = tx.send(ServerEvent::ConnectionStatus(ConnectionStatus::Error));
                return;
            }
        }
    }

    tracing::info!("event channel closed");
    let _ = tx.send(ServerEvent::ConnectionStatus(ConnectionStatus::Disconnected));
}
