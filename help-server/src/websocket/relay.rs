use help_types::{ChatMessage, PairServerMessage, Problem, RoomId, RoomMember};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::connection::{Connection, ConnectionId, Outbound};

/// Where a socket was routed when it connected.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomTarget {
    Chat { room_id: RoomId },
    Pair { member: RoomMember },
}

struct PairMember {
    connection: Connection,
    member: RoomMember,
}

/// The collaborative editing room. Members are kept in join order so the
/// roster reads the same for everyone.
struct PairRoom {
    members: Vec<PairMember>,
    code: String,
}

impl PairRoom {
    fn roster(&self) -> Vec<RoomMember> {
        self.members.iter().map(|m| m.member.clone()).collect()
    }

    fn send_to_others(&self, except: ConnectionId, message: PairServerMessage) {
        for member in self
            .members
            .iter()
            .filter(|m| m.connection.id != except)
        {
            deliver(&member.connection, Outbound::Pair(message.clone()));
        }
    }

    fn send_to_all(&self, message: PairServerMessage) {
        for member in &self.members {
            deliver(&member.connection, Outbound::Pair(message.clone()));
        }
    }
}

/// Registry of every live room. Ordinary rooms exist only while they have
/// at least one connection; the pair-programming room always exists.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<RoomId, HashMap<ConnectionId, Connection>>>,
    pair: RwLock<PairRoom>,
    pair_room_id: RoomId,
    pair_problem: Option<Problem>,
}

/// Best effort: closed sockets are skipped, never queued.
fn deliver(connection: &Connection, message: Outbound) -> bool {
    if !connection.is_open() {
        return false;
    }
    match connection.send_message(message) {
        Ok(()) => true,
        Err(e) => {
            debug!("Skipping send to {}: {}", connection.id, e);
            false
        }
    }
}

impl RoomRegistry {
    pub fn new(pair_room_id: impl Into<RoomId>, pair_problem: Option<Problem>) -> Self {
        let code = pair_problem
            .as_ref()
            .and_then(|p| p.starter_code.clone())
            .unwrap_or_default();

        Self {
            rooms: RwLock::new(HashMap::new()),
            pair: RwLock::new(PairRoom {
                members: Vec::new(),
                code,
            }),
            pair_room_id: pair_room_id.into(),
            pair_problem,
        }
    }

    pub fn pair_room_id(&self) -> &str {
        &self.pair_room_id
    }

    pub async fn join_chat(&self, room_id: &str, connection: Connection) {
        let mut rooms = self.rooms.write().await;
        let room = rooms.entry(room_id.to_string()).or_insert_with(|| {
            info!("Room {} created", room_id);
            HashMap::new()
        });
        room.insert(connection.id, connection);
    }

    pub async fn leave_chat(&self, room_id: &str, connection_id: ConnectionId) {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(room_id) else {
            return;
        };
        room.remove(&connection_id);
        if room.is_empty() {
            rooms.remove(room_id);
            info!("Room {} closed", room_id);
        }
    }

    /// Send a stamped chat message to every connection in the room, sender
    /// included. Returns how many sockets it was handed to.
    pub async fn broadcast_chat(&self, room_id: &str, message: ChatMessage) -> usize {
        // Write lock: one broadcast at a time per registry keeps every
        // member's view of a room in the same order.
        let rooms = self.rooms.write().await;
        let Some(room) = rooms.get(room_id) else {
            return 0;
        };
        room.values()
            .filter(|connection| deliver(connection, Outbound::Chat(message.clone())))
            .count()
    }

    /// Add a member to the pair room: the joiner gets the roster, buffer and
    /// problem, then everyone else hears about the joiner.
    pub async fn join_pair(&self, connection: Connection, member: RoomMember) {
        let mut pair = self.pair.write().await;
        let connection_id = connection.id;
        pair.members.push(PairMember {
            connection: connection.clone(),
            member: member.clone(),
        });

        deliver(
            &connection,
            Outbound::Pair(PairServerMessage::RoomJoined {
                users: pair.roster(),
                code: pair.code.clone(),
                problem: self.pair_problem.clone(),
            }),
        );
        pair.send_to_others(connection_id, PairServerMessage::UserJoined { user: member.clone() });

        info!(
            "{} ({}) joined {}, {} member(s)",
            member.name,
            member.id,
            self.pair_room_id,
            pair.members.len()
        );
    }

    pub async fn leave_pair(&self, connection_id: ConnectionId) {
        let mut pair = self.pair.write().await;
        let Some(index) = pair
            .members
            .iter()
            .position(|m| m.connection.id == connection_id)
        else {
            return;
        };
        let left = pair.members.remove(index).member;

        pair.send_to_all(PairServerMessage::UserLeft {
            user_id: left.id.clone(),
            user_name: left.name.clone(),
        });
        info!("{} ({}) left {}", left.name, left.id, self.pair_room_id);
    }

    /// Replace the shared buffer and tell every other member who changed it.
    pub async fn apply_code_change(&self, connection_id: ConnectionId, code: String) {
        let mut pair = self.pair.write().await;
        let Some(author) = pair
            .members
            .iter()
            .find(|m| m.connection.id == connection_id)
            .map(|m| m.member.clone())
        else {
            return;
        };

        pair.code = code.clone();
        pair.send_to_others(
            connection_id,
            PairServerMessage::CodeUpdated {
                code,
                user_id: author.id,
                user_name: author.name,
            },
        );
    }

    pub async fn broadcast_pair_chat(
        &self,
        connection_id: ConnectionId,
        id: String,
        message: String,
        timestamp: String,
    ) {
        let pair = self.pair.write().await;
        let Some(author) = pair
            .members
            .iter()
            .find(|m| m.connection.id == connection_id)
            .map(|m| m.member.clone())
        else {
            return;
        };

        pair.send_to_all(PairServerMessage::ChatMessage {
            id,
            user_id: author.id,
            user_name: author.name,
            message,
            timestamp,
        });
    }

    /// Ordinary rooms with at least one connection, plus the pair room.
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len() + 1
    }

    pub async fn connection_count(&self, room_id: &str) -> usize {
        if room_id == self.pair_room_id {
            return self.pair.read().await.members.len();
        }
        self.rooms
            .read()
            .await
            .get(room_id)
            .map_or(0, HashMap::len)
    }

    pub async fn is_room_active(&self, room_id: &str) -> bool {
        room_id == self.pair_room_id || self.rooms.read().await.contains_key(room_id)
    }

    pub async fn pair_roster(&self) -> Vec<RoomMember> {
        self.pair.read().await.roster()
    }

    pub async fn pair_code(&self) -> String {
        self.pair.read().await.code.clone()
    }

    /// Ids of users with at least one open socket.
    pub async fn online_users(&self) -> HashSet<String> {
        let mut online: HashSet<String> = self
            .rooms
            .read()
            .await
            .values()
            .flat_map(HashMap::values)
            .filter(|connection| connection.is_open())
            .filter_map(|connection| connection.user_id.clone())
            .collect();

        online.extend(
            self.pair
                .read()
                .await
                .members
                .iter()
                .filter(|m| m.connection.is_open())
                .map(|m| m.member.id.clone()),
        );
        online
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use help_types::MessageKind;

    fn member(id: &str) -> RoomMember {
        RoomMember {
            id: id.to_string(),
            name: format!("Name {}", id),
        }
    }

    fn chat(room: &str, body: &str) -> ChatMessage {
        ChatMessage {
            id: "m1".to_string(),
            session_id: room.to_string(),
            sender_id: "anonymous".to_string(),
            sender_name: "Anonymous".to_string(),
            message: body.to_string(),
            timestamp: "2024-03-01T00:00:00Z".to_string(),
            kind: MessageKind::Text,
        }
    }

    #[tokio::test]
    async fn test_chat_room_lifecycle() {
        let registry = RoomRegistry::new("pair-programming", None);
        let (a, mut a_rx) = Connection::new(ConnectionId::new(), Some("u1".to_string()));
        let (b, mut b_rx) = Connection::new(ConnectionId::new(), None);
        let (a_id, b_id) = (a.id, b.id);

        registry.join_chat("abc", a).await;
        registry.join_chat("abc", b).await;
        assert!(registry.is_room_active("abc").await);
        assert_eq!(registry.connection_count("abc").await, 2);
        assert_eq!(registry.room_count().await, 2);

        let delivered = registry.broadcast_chat("abc", chat("abc", "hi")).await;
        assert_eq!(delivered, 2);
        assert!(matches!(a_rx.try_recv(), Ok(Outbound::Chat(m)) if m.message == "hi"));
        assert!(matches!(b_rx.try_recv(), Ok(Outbound::Chat(m)) if m.message == "hi"));

        registry.leave_chat("abc", a_id).await;
        assert!(registry.is_room_active("abc").await);
        registry.leave_chat("abc", b_id).await;
        assert!(!registry.is_room_active("abc").await);
        assert_eq!(registry.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_connections() {
        let registry = RoomRegistry::new("pair-programming", None);
        let (open, mut open_rx) = Connection::new(ConnectionId::new(), None);
        let (closed, closed_rx) = Connection::new(ConnectionId::new(), None);
        drop(closed_rx);

        registry.join_chat("abc", open).await;
        registry.join_chat("abc", closed).await;

        assert_eq!(registry.broadcast_chat("abc", chat("abc", "hi")).await, 1);
        assert!(open_rx.try_recv().is_ok());
        assert_eq!(registry.broadcast_chat("nobody-here", chat("x", "lost")).await, 0);
    }

    #[tokio::test]
    async fn test_pair_join_welcome_then_announce() {
        let problem = Problem {
            id: "two-sum".to_string(),
            title: "Two Sum".to_string(),
            difficulty: help_types::Difficulty::Easy,
            description: String::new(),
            tags: Vec::new(),
            test_cases: Vec::new(),
            solution: None,
            starter_code: Some("function twoSum() {}".to_string()),
        };
        let registry = RoomRegistry::new("pair-programming", Some(problem));
        assert_eq!(registry.pair_code().await, "function twoSum() {}");

        let (a, mut a_rx) = Connection::new(ConnectionId::new(), None);
        let (b, mut b_rx) = Connection::new(ConnectionId::new(), None);
        registry.join_pair(a, member("u1")).await;
        registry.join_pair(b, member("u2")).await;

        // First member: only its own welcome, then the announcement of u2
        match a_rx.try_recv().unwrap() {
            Outbound::Pair(PairServerMessage::RoomJoined { users, code, problem }) => {
                assert_eq!(users, vec![member("u1")]);
                assert_eq!(code, "function twoSum() {}");
                assert_eq!(problem.unwrap().id, "two-sum");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            a_rx.try_recv().unwrap(),
            Outbound::Pair(PairServerMessage::UserJoined { user: member("u2") })
        );

        // Second member sees the full roster and no self-announcement
        match b_rx.try_recv().unwrap() {
            Outbound::Pair(PairServerMessage::RoomJoined { users, .. }) => {
                assert_eq!(users, vec![member("u1"), member("u2")]);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(b_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_code_change_skips_author() {
        let registry = RoomRegistry::new("pair-programming", None);
        let (a, mut a_rx) = Connection::new(ConnectionId::new(), None);
        let (b, mut b_rx) = Connection::new(ConnectionId::new(), None);
        let a_id = a.id;
        registry.join_pair(a, member("u1")).await;
        registry.join_pair(b, member("u2")).await;
        while a_rx.try_recv().is_ok() {}
        while b_rx.try_recv().is_ok() {}

        registry.apply_code_change(a_id, "let x = 1;".to_string()).await;

        assert_eq!(registry.pair_code().await, "let x = 1;");
        assert!(a_rx.try_recv().is_err());
        assert_eq!(
            b_rx.try_recv().unwrap(),
            Outbound::Pair(PairServerMessage::CodeUpdated {
                code: "let x = 1;".to_string(),
                user_id: "u1".to_string(),
                user_name: "Name u1".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_pair_room_survives_last_leave() {
        let registry = RoomRegistry::new("pair-programming", None);
        let (a, _a_rx) = Connection::new(ConnectionId::new(), None);
        let (b, mut b_rx) = Connection::new(ConnectionId::new(), None);
        let (a_id, b_id) = (a.id, b.id);
        registry.join_pair(a, member("u1")).await;
        registry.join_pair(b, member("u2")).await;
        registry.apply_code_change(a_id, "kept".to_string()).await;
        while b_rx.try_recv().is_ok() {}

        registry.leave_pair(a_id).await;
        assert_eq!(
            b_rx.try_recv().unwrap(),
            Outbound::Pair(PairServerMessage::UserLeft {
                user_id: "u1".to_string(),
                user_name: "Name u1".to_string(),
            })
        );

        registry.leave_pair(b_id).await;
        assert!(registry.is_room_active("pair-programming").await);
        assert!(registry.pair_roster().await.is_empty());
        assert_eq!(registry.pair_code().await, "kept");
    }

    #[tokio::test]
    async fn test_online_users() {
        let registry = RoomRegistry::new("pair-programming", None);
        let (a, _a_rx) = Connection::new(ConnectionId::new(), Some("user2".to_string()));
        let (b, _b_rx) = Connection::new(ConnectionId::new(), None);
        let (c, _c_rx) = Connection::new(ConnectionId::new(), None);
        registry.join_chat("abc", a).await;
        registry.join_chat("abc", b).await;
        registry.join_pair(c, member("user5")).await;

        let online = registry.online_users().await;
        assert_eq!(online.len(), 2);
        assert!(online.contains("user2"));
        assert!(online.contains("user5"));
    }
}
