//! `WebSocket` transport for the viewer push channel.
//!
//! Clients connect to `GET /ws`. Each connection is registered with the
//! [`ClientHub`](crate::broadcast::ClientHub), which immediately queues
//! the current segments for that client alone. From then on the
//! connection forwards its direct messages and every fan-out message as
//! JSON text frames.
//!
//! If a client falls behind on fan-out, lagged messages are skipped and
//! the client resumes from the most recent one.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use spinwheel_types::ServerMessage;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::broadcast::ConnectionState;
use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` viewer connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_viewer(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Drive one connection until the client leaves or a send fails.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let mut conn = state.hub.connect();
    let mut conn_state = ConnectionState::Connected;

    loop {
        tokio::select! {
            // Direct messages first so the initial segment push is
            // delivered before anything queued on fan-out.
            biased;

            direct = conn.direct.recv() => {
                let Some(message) = direct else {
                    break;
                };
                if !forward(&mut socket, &message).await {
                    break;
                }
                if conn_state == ConnectionState::Connected {
                    debug!(conn_id = %conn.id, "Initial segments delivered");
                }
                conn_state = conn_state.delivered();
            }
            result = conn.fanout.recv() => {
                match result {
                    Ok(message) => {
                        if !forward(&mut socket, &message).await {
                            break;
                        }
                        conn_state = conn_state.delivered();
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(conn_id = %conn.id, skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!(conn_id = %conn.id, "Broadcast channel closed, shutting down WebSocket");
                        break;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(conn_id = %conn.id, "WebSocket error: {e}");
                        break;
                    }
                    // Viewers are receive-only.
                    _ => {}
                }
            }
        }
    }

    conn_state = ConnectionState::Disconnected;
    debug!(conn_id = %conn.id, state = ?conn_state, "WebSocket closed");
    state.hub.disconnect(conn.id);
}

/// Send one message as a text frame. Returns `false` once the client is gone.
async fn forward(socket: &mut WebSocket, message: &ServerMessage) -> bool {
    let json = match serde_json::to_string(message) {
        Ok(j) => j,
        Err(e) => {
            warn!(event = message.event_name(), "Failed to serialize push message: {e}");
            return true;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}
