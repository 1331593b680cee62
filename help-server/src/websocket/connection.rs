use help_types::{ChatMessage, PairServerMessage, UserId};
use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything the relay writes to a socket. Both variants carry their own
/// wire shape so no extra wrapping is added.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outbound {
    Chat(ChatMessage),
    Pair(PairServerMessage),
}

/// Sending half of one open socket.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    /// User behind the socket, when the client told us.
    pub user_id: Option<UserId>,
    sender: mpsc::UnboundedSender<Outbound>,
}

impl Connection {
    pub fn new(
        id: ConnectionId,
        user_id: Option<UserId>,
    ) -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                id,
                user_id,
                sender,
            },
            receiver,
        )
    }

    pub fn send_message(&self, message: Outbound) -> Result<(), String> {
        self.sender
            .send(message)
            .map_err(|_| "Connection closed".to_string())
    }

    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }
}
