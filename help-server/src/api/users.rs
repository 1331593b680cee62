use help_core::{apply_user_update, user_stats};
use help_persistence::Store;
use help_types::{HelpError, User, UserStatsReport, UserUpdate};
use tracing::info;
use warp::Rejection;

use super::{ApiReply, respond};
use crate::identity::Identity;

pub async fn get_current_user(identity: Identity, store: Store) -> Result<ApiReply, Rejection> {
    respond(store.users.get(&identity.user_id).await)
}

pub async fn update_user(
    user_id: String,
    update: UserUpdate,
    store: Store,
) -> Result<ApiReply, Rejection> {
    respond(apply_update(&store, &user_id, update).await)
}

async fn apply_update(store: &Store, user_id: &str, update: UserUpdate) -> Result<User, HelpError> {
    let user = store
        .users
        .update(user_id, Box::new(move |user: &mut User| apply_user_update(user, update)))
        .await?;
    info!("Updated profile of {}", user.id);
    Ok(user)
}

pub async fn get_user_stats(user_id: String, store: Store) -> Result<ApiReply, Rejection> {
    respond(stats_for(&store, &user_id).await)
}

async fn stats_for(store: &Store, user_id: &str) -> Result<UserStatsReport, HelpError> {
    let user = store.users.get(user_id).await?;
    let sessions = store.sessions.list().await?;
    Ok(user_stats(&user, &sessions))
}
