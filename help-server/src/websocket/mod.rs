use futures_util::{SinkExt, StreamExt};
use help_core::ANONYMOUS_NAME;
use help_types::{HelpError, RoomMember, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

pub mod connection;
pub mod handlers;
pub mod relay;


pub use connection::{Connection, ConnectionId, Outbound};
use handlers::MessageHandler;
pub use relay::{RoomRegistry, RoomTarget};

/// Query value that marks a pair-programming connection.
pub const PAIR_PROGRAMMING: &str = "pair-programming";

/// Decide which room a new socket belongs to from its URL. Pair-programming
/// sockets identify themselves in the query; everything else is routed by
/// the last path segment.
pub fn resolve_target(
    path: &str,
    query: &HashMap<String, String>,
) -> Result<(RoomTarget, Option<UserId>), HelpError> {
    let param = |key: &str| {
        query
            .get(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    if param("type").as_deref() == Some(PAIR_PROGRAMMING) {
        let member = RoomMember {
            id: param("userId").unwrap_or_else(|| format!("user-{}", uuid::Uuid::new_v4())),
            name: param("userName").unwrap_or_else(|| ANONYMOUS_NAME.to_string()),
        };
        let user_id = Some(member.id.clone());
        return Ok((RoomTarget::Pair { member }, user_id));
    }

    let room_id = path
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .ok_or_else(|| HelpError::InvalidInput("Room id is required".to_string()))?;

    Ok((
        RoomTarget::Chat {
            room_id: room_id.to_string(),
        },
        param("userId"),
    ))
}

pub async fn handle_connection(
    websocket: WebSocket,
    target: RoomTarget,
    user_id: Option<UserId>,
    registry: Arc<RoomRegistry>,
) {
    let connection_id = ConnectionId::new();
    info!("New WebSocket connection {} to {:?}", connection_id, target);

    let (mut ws_sender, mut ws_receiver) = websocket.split();

    // Register first so the pair welcome is already queued when the
    // outgoing loop starts.
    let (connection, message_receiver) = Connection::new(connection_id, user_id);
    match &target {
        RoomTarget::Chat { room_id } => registry.join_chat(room_id, connection).await,
        RoomTarget::Pair { member } => registry.join_pair(connection, member.clone()).await,
    }

    let message_handler = MessageHandler::new(connection_id, target, registry.clone());

    // Handle incoming messages
    let incoming_handler = {
        let message_handler = message_handler.clone();

        async move {
            while let Some(result) = ws_receiver.next().await {
                match result {
                    Ok(msg) => handle_message(msg, &message_handler, connection_id).await,
                    Err(e) => {
                        warn!("WebSocket error for {}: {}", connection_id, e);
                        break;
                    }
                }
            }
        }
    };

    // Handle outgoing messages
    let outgoing_handler = async move {
        let mut receiver = message_receiver;

        while let Some(message) = receiver.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize message: {:?}", e);
                    continue;
                }
            };

            if let Err(e) = ws_sender.send(Message::text(json)).await {
                warn!("Failed to send message to {}: {:?}", connection_id, e);
                break;
            }
        }
    };

    tokio::select! {
        _ = incoming_handler => {},
        _ = outgoing_handler => {},
    }

    info!("Connection {} disconnected", connection_id);
    message_handler.handle_disconnect().await;
}

async fn handle_message(msg: Message, message_handler: &MessageHandler, connection_id: ConnectionId) {
    // Pings, pongs and binary frames carry nothing for the relay
    let Ok(text) = msg.to_str() else {
        return;
    };

    if let Err(e) = message_handler.handle_text(text).await {
        warn!("Dropping frame from {}: {}", connection_id, e);
    }
}
