use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{RequestId, SessionId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SessionStatus {
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum MessageKind {
    #[default]
    Text,
    Code,
    Hint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChatMessage {
    pub id: String,
    pub session_id: SessionId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub message: String,
    pub timestamp: String, // ISO 8601 string
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HelpSession {
    pub id: SessionId,
    pub request_id: RequestId,
    pub requester_id: UserId,
    pub helper_id: UserId,
    pub status: SessionStatus,
    pub messages: Vec<ChatMessage>,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewChatMessage {
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionEnd {
    pub rating: Option<u8>,
    pub feedback: Option<String>,
}
