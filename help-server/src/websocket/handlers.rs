use std::sync::Arc;
use tracing::info;

use super::connection::ConnectionId;
use super::relay::{RoomRegistry, RoomTarget};
use help_core::{new_id, now_rfc3339, stamp_room_message};
use help_types::{ChatEnvelope, PairClientMessage};

#[derive(Clone)]
pub struct MessageHandler {
    connection_id: ConnectionId,
    target: RoomTarget,
    registry: Arc<RoomRegistry>,
}

impl MessageHandler {
    pub fn new(connection_id: ConnectionId, target: RoomTarget, registry: Arc<RoomRegistry>) -> Self {
        Self {
            connection_id,
            target,
            registry,
        }
    }

    /// Handle one text frame. An `Err` means the frame was not understood;
    /// the caller logs it and keeps the connection.
    pub async fn handle_text(&self, text: &str) -> Result<(), String> {
        match &self.target {
            RoomTarget::Chat { room_id } => self.handle_chat(room_id, text).await,
            RoomTarget::Pair { .. } => self.handle_pair(text).await,
        }
    }

    async fn handle_chat(&self, room_id: &str, text: &str) -> Result<(), String> {
        let envelope: ChatEnvelope =
            serde_json::from_str(text).map_err(|e| format!("Invalid chat message: {}", e))?;
        if !envelope.is_chat() {
            return Err(format!(
                "Unsupported message type {:?}",
                envelope.kind.unwrap_or_default()
            ));
        }

        let message = stamp_room_message(room_id, envelope);
        self.registry.broadcast_chat(room_id, message).await;
        Ok(())
    }

    async fn handle_pair(&self, text: &str) -> Result<(), String> {
        let message: PairClientMessage =
            serde_json::from_str(text).map_err(|e| format!("Invalid pair message: {}", e))?;

        match message {
            PairClientMessage::CodeChange { code } => {
                self.registry
                    .apply_code_change(self.connection_id, code)
                    .await
            }
            PairClientMessage::ChatMessage { message } => {
                self.registry
                    .broadcast_pair_chat(self.connection_id, new_id(), message, now_rfc3339())
                    .await
            }
        }
        Ok(())
    }

    pub async fn handle_disconnect(&self) {
        info!("Handling disconnect for connection {}", self.connection_id);

        match &self.target {
            RoomTarget::Chat { room_id } => {
                self.registry.leave_chat(room_id, self.connection_id).await
            }
            RoomTarget::Pair { .. } => self.registry.leave_pair(self.connection_id).await,
        }
    }
}
