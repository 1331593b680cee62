use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub avatar: String, // initials shown in place of a picture
    pub email: String,
    pub join_date: String,
    #[serde(rename = "currentXP")]
    pub current_xp: u32,
    #[serde(rename = "nextLevelXP")]
    pub next_level_xp: u32,
    pub rank: u32,
    pub total_helped: u32,
    pub rating: f64,
    #[serde(default)]
    pub skill_ratings: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "badges_from_map_or_list")]
    pub badges: BTreeMap<String, Badge>,
    #[serde(default)]
    pub stats: UserStats,
}

impl User {
    /// Proficiency for a tag, treating unrated and zero-rated tags alike.
    pub fn proficiency(&self, tag: &str) -> Option<f64> {
        self.skill_ratings
            .get(tag)
            .copied()
            .filter(|level| *level > 0.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BadgeCollection {
    Map(BTreeMap<String, Badge>),
    List(Vec<Badge>),
}

/// Older data files store badges as a list; those are keyed by badge id.
fn badges_from_map_or_list<'de, D>(deserializer: D) -> Result<BTreeMap<String, Badge>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match BadgeCollection::deserialize(deserializer)? {
        BadgeCollection::Map(badges) => badges,
        BadgeCollection::List(badges) => badges
            .into_iter()
            .map(|badge| (badge.id.clone(), badge))
            .collect(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub earned: String, // ISO 8601 date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserStats {
    pub problems_solved: u32,
    pub help_streak: u32,
    pub avg_response_time: String,
    pub favorite_topics: Vec<String>,
}

/// Fields a client may change on its own profile. Anything else in the
/// request body is rejected during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub email: Option<String>,
    pub skill_ratings: Option<BTreeMap<String, f64>>,
    pub favorite_topics: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub name: String,
    pub avatar: String,
    pub xp: u32,
    pub total_helped: u32,
    pub rating: f64,
}

/// Public subset of a user returned from matchmaking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HelperProfile {
    pub id: UserId,
    pub name: String,
    pub avatar: String,
    pub email: String,
    #[serde(rename = "currentXP")]
    pub current_xp: u32,
    pub total_helped: u32,
    pub overall_rating: f64,
    pub skill_ratings: BTreeMap<String, f64>,
}

impl From<&User> for HelperProfile {
    fn from(user: &User) -> Self {
        HelperProfile {
            id: user.id.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            email: user.email.clone(),
            current_xp: user.current_xp,
            total_helped: user.total_helped,
            overall_rating: user.rating,
            skill_ratings: user.skill_ratings.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HelperMatch {
    pub user: HelperProfile,
    pub skill_match: u32,
    pub average_skill_rating: f64,
    pub matched_skills: u32,
    pub total_required_skills: u32,
    pub is_online: bool,
    pub response_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PeerMatch {
    pub user: HelperProfile,
    pub similarity: f64,
    pub compared_skills: u32,
    pub is_online: bool,
}
