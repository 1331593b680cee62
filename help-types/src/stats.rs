use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{UserId, UserStats};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GlobalStats {
    pub total_users: u32,
    pub total_sessions: u32,
    pub active_sessions: u32,
    pub problems_solved: u32,
    pub open_requests: u32,
    pub live_rooms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserStatsReport {
    pub user_id: UserId,
    #[serde(flatten)]
    pub stats: UserStats,
    pub sessions_helped: u32,
    pub sessions_requested: u32,
    pub average_session_rating: Option<f64>,
}
