use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Problem, UserId};

/// Frame sent by clients in an ordinary chat room. A missing `type` is read
/// as a chat message.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChatEnvelope {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub sender_id: Option<UserId>,
    pub sender_name: Option<String>,
    pub message: String,
}

impl ChatEnvelope {
    pub fn is_chat(&self) -> bool {
        matches!(self.kind.as_deref(), None | Some("chat"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomMember {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[ts(export)]
pub enum PairClientMessage {
    CodeChange { code: String },
    ChatMessage { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[ts(export)]
pub enum PairServerMessage {
    RoomJoined {
        users: Vec<RoomMember>,
        code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        problem: Option<Problem>,
    },
    UserJoined {
        user: RoomMember,
    },
    UserLeft {
        #[serde(rename = "userId")]
        user_id: UserId,
        #[serde(rename = "userName")]
        user_name: String,
    },
    CodeUpdated {
        code: String,
        #[serde(rename = "userId")]
        user_id: UserId,
        #[serde(rename = "userName")]
        user_name: String,
    },
    ChatMessage {
        id: String,
        #[serde(rename = "userId")]
        user_id: UserId,
        #[serde(rename = "userName")]
        user_name: String,
        message: String,
        timestamp: String,
    },
}
