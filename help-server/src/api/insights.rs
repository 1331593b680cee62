//! Read-only views computed from the store: leaderboard, statistics and
//! matchmaking.

use help_core::{
    DEFAULT_MATCH_LIMIT, DEFAULT_PEER_LIMIT, global_stats, now_rfc3339, parse_skill_list,
    rank_helpers, suggest_peers,
};
use help_persistence::Store;
use help_types::{GlobalStats, HelpError, HelperMatch, LeaderboardEntry, PeerMatch};
use serde::Deserialize;
use std::sync::Arc;
use warp::Rejection;

use super::{ApiReply, respond};
use crate::identity::Identity;
use crate::websocket::RoomRegistry;

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SkillQuery {
    pub skills: Option<String>,
    pub limit: Option<String>,
}

/// A missing, zero or non-numeric limit falls back to `default`.
pub fn limit_or(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(default)
}

pub async fn leaderboard(query: LimitQuery, store: Store) -> Result<ApiReply, Rejection> {
    respond(top_entries(&store, limit_or(query.limit.as_deref(), DEFAULT_LEADERBOARD_LIMIT)).await)
}

async fn top_entries(store: &Store, limit: usize) -> Result<Vec<LeaderboardEntry>, HelpError> {
    let mut entries = store.leaderboard.list().await?;
    entries.sort_by_key(|entry| entry.rank);
    entries.truncate(limit);
    Ok(entries)
}

pub async fn global(store: Store, registry: Arc<RoomRegistry>) -> Result<ApiReply, Rejection> {
    respond(compute_global(&store, &registry).await)
}

async fn compute_global(store: &Store, registry: &RoomRegistry) -> Result<GlobalStats, HelpError> {
    let users = store.users.list().await?;
    let requests = store.help_requests.list().await?;
    let sessions = store.sessions.list().await?;
    Ok(global_stats(
        &users,
        &requests,
        &sessions,
        registry.room_count().await,
    ))
}

pub async fn match_by_skills(
    query: SkillQuery,
    identity: Identity,
    store: Store,
    registry: Arc<RoomRegistry>,
) -> Result<ApiReply, Rejection> {
    respond(find_helpers(&store, &registry, &identity, query).await)
}

async fn find_helpers(
    store: &Store,
    registry: &RoomRegistry,
    identity: &Identity,
    query: SkillQuery,
) -> Result<Vec<HelperMatch>, HelpError> {
    let skills = parse_skill_list(query.skills.as_deref().unwrap_or_default())?;
    let users = store.users.list().await?;
    let online = registry.online_users().await;
    rank_helpers(
        &users,
        &identity.user_id,
        &skills,
        limit_or(query.limit.as_deref(), DEFAULT_MATCH_LIMIT),
        &online,
    )
}

pub async fn suggest_peers_for(
    query: LimitQuery,
    identity: Identity,
    store: Store,
    registry: Arc<RoomRegistry>,
) -> Result<ApiReply, Rejection> {
    respond(find_peers(&store, &registry, &identity, query).await)
}

async fn find_peers(
    store: &Store,
    registry: &RoomRegistry,
    identity: &Identity,
    query: LimitQuery,
) -> Result<Vec<PeerMatch>, HelpError> {
    let user = store.users.get(&identity.user_id).await?;
    let users = store.users.list().await?;
    let online = registry.online_users().await;
    Ok(suggest_peers(
        &user,
        &users,
        limit_or(query.limit.as_deref(), DEFAULT_PEER_LIMIT),
        &online,
    ))
}

pub async fn health() -> Result<ApiReply, Rejection> {
    respond(Ok(serde_json::json!({
        "status": "ok",
        "timestamp": now_rfc3339(),
    })))
}
