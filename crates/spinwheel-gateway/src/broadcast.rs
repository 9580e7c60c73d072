//! Real-time push to connected viewers.
//!
//! [`BroadcastChannel`] is the capability set the rest of the gateway
//! depends on: fan out to everyone, send to one client, and react to
//! clients arriving and leaving. [`ClientHub`] implements it with a
//! [`tokio::sync::broadcast`] channel for fan-out plus one unbounded
//! queue per client for direct messages. Transports (see [`crate::ws`])
//! call [`ClientHub::connect`] / [`ClientHub::disconnect`] and forward
//! whatever arrives on the two receivers.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use spinwheel_types::{ConnectionId, ServerMessage};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

/// Capacity of the fan-out channel.
///
/// A viewer that falls more than this many messages behind receives a
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest one.
const BROADCAST_CAPACITY: usize = 256;

/// Called once per new connection with its id and a channel to reply on.
pub type ConnectHandler = Box<dyn Fn(ConnectionId, &dyn BroadcastChannel) + Send + Sync>;

/// Called once per closed connection.
pub type DisconnectHandler = Box<dyn Fn(ConnectionId) + Send + Sync>;

/// Errors from targeted sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BroadcastError {
    /// No client with this id is connected.
    #[error("unknown connection: {0}")]
    UnknownConnection(ConnectionId),

    /// The client's transport has already shut down.
    #[error("connection closed: {0}")]
    Closed(ConnectionId),
}

/// Transport-agnostic push channel to viewer clients.
pub trait BroadcastChannel: Send + Sync {
    /// Send `message` to every connected client.
    ///
    /// Returns the number of clients it was queued for; zero when nobody
    /// is connected, which is not an error.
    fn broadcast_all(&self, message: &ServerMessage) -> usize;

    /// Send `message` to a single client.
    fn send_to(&self, client: ConnectionId, message: &ServerMessage) -> Result<(), BroadcastError>;

    /// Register a handler run for every new connection.
    fn on_connect(&self, handler: ConnectHandler);

    /// Register a handler run for every closed connection.
    fn on_disconnect(&self, handler: DisconnectHandler);
}

/// Lifecycle of one viewer connection. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Registered; initial segments not yet delivered.
    Connected,
    /// Initial segments delivered; receiving live pushes.
    Active,
    /// Closed. Terminal.
    Disconnected,
}

impl ConnectionState {
    /// The state after delivering a message to the client.
    pub const fn delivered(self) -> Self {
        match self {
            Self::Connected | Self::Active => Self::Active,
            Self::Disconnected => Self::Disconnected,
        }
    }
}

/// Receivers handed to a transport for one registered client.
#[derive(Debug)]
pub struct ClientConnection {
    /// The client's id.
    pub id: ConnectionId,
    /// Messages addressed to this client only.
    pub direct: mpsc::UnboundedReceiver<Arc<ServerMessage>>,
    /// Messages sent to every client.
    pub fanout: broadcast::Receiver<Arc<ServerMessage>>,
}

/// Registry of connected viewer clients.
pub struct ClientHub {
    fanout: broadcast::Sender<Arc<ServerMessage>>,
    clients: RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<Arc<ServerMessage>>>>,
    connect_handlers: RwLock<Vec<ConnectHandler>>,
    disconnect_handlers: RwLock<Vec<DisconnectHandler>>,
}

impl ClientHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        let (fanout, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            fanout,
            clients: RwLock::new(HashMap::new()),
            connect_handlers: RwLock::new(Vec::new()),
            disconnect_handlers: RwLock::new(Vec::new()),
        }
    }

    /// Register a new client and run the connect handlers for it.
    ///
    /// The client is subscribed to fan-out before any handler runs, so a
    /// handler's direct reply and any concurrent broadcast both reach it.
    pub fn connect(&self) -> ClientConnection {
        let id = ConnectionId::new();
        let (tx, direct) = mpsc::unbounded_channel();
        let fanout = self.fanout.subscribe();

        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, tx);
        info!(conn_id = %id, "Client connected");

        let channel: &dyn BroadcastChannel = self;
        for handler in self
            .connect_handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
        {
            handler(id, channel);
        }

        ClientConnection { id, direct, fanout }
    }

    /// Unregister a client and run the disconnect handlers for it.
    ///
    /// Unknown ids are ignored, so calling this twice is harmless.
    pub fn disconnect(&self, id: ConnectionId) {
        let removed = self
            .clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if !removed {
            return;
        }
        info!(conn_id = %id, "Client disconnected");

        for handler in self
            .disconnect_handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
        {
            handler(id);
        }
    }

    /// Number of registered clients.
    pub fn client_count(&self) -> usize {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for ClientHub {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastChannel for ClientHub {
    fn broadcast_all(&self, message: &ServerMessage) -> usize {
        // send returns Err only when there are zero receivers.
        let receivers = self.fanout.send(Arc::new(message.clone())).unwrap_or(0);
        debug!(event = message.event_name(), receivers, "Broadcast to all clients");
        receivers
    }

    fn send_to(&self, client: ConnectionId, message: &ServerMessage) -> Result<(), BroadcastError> {
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
        let tx = clients
            .get(&client)
            .ok_or(BroadcastError::UnknownConnection(client))?;
        tx.send(Arc::new(message.clone()))
            .map_err(|_closed| BroadcastError::Closed(client))?;
        debug!(conn_id = %client, event = message.event_name(), "Sent to client");
        Ok(())
    }

    fn on_connect(&self, handler: ConnectHandler) {
        self.connect_handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }

    fn on_disconnect(&self, handler: DisconnectHandler) {
        self.disconnect_handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }
}
