use help_core::{HelpRequestFilter, accept_request, open_request};
use help_persistence::Store;
use help_types::{HelpError, HelpRequest, HelpSession, NewHelpRequest};
use serde::Deserialize;
use tracing::info;
use warp::Rejection;
use warp::http::StatusCode;

use super::{ApiReply, display_name, reply_with, respond};
use crate::identity::Identity;

#[derive(Debug, Default, Deserialize)]
pub struct HelpRequestQuery {
    pub difficulty: Option<String>,
    pub status: Option<String>,
    pub tags: Option<String>,
}

pub async fn list_help_requests(
    query: HelpRequestQuery,
    store: Store,
) -> Result<ApiReply, Rejection> {
    respond(filtered(&store, query).await)
}

async fn filtered(store: &Store, query: HelpRequestQuery) -> Result<Vec<HelpRequest>, HelpError> {
    let filter = HelpRequestFilter::from_query(
        query.difficulty.as_deref(),
        query.status.as_deref(),
        query.tags.as_deref(),
    )?;
    Ok(filter.apply(store.help_requests.list().await?))
}

pub async fn create_help_request(
    draft: NewHelpRequest,
    identity: Identity,
    store: Store,
) -> Result<ApiReply, Rejection> {
    Ok(reply_with(create(&store, &identity, draft).await, StatusCode::CREATED))
}

async fn create(
    store: &Store,
    identity: &Identity,
    draft: NewHelpRequest,
) -> Result<HelpRequest, HelpError> {
    let requester_name = display_name(store, identity).await;
    let request = open_request(draft, &identity.user_id, &requester_name)?;
    let request = store.help_requests.upsert(request).await?;
    info!(
        "Help request {} opened by {} for {}",
        request.id, request.requester_id, request.problem_title
    );
    Ok(request)
}

pub async fn accept_help_request(
    request_id: String,
    identity: Identity,
    store: Store,
) -> Result<ApiReply, Rejection> {
    respond(accept(&store, &request_id, identity.user_id).await)
}

/// The open check and the move to `matched` happen under one write lock, so
/// two concurrent accepts cannot both succeed.
async fn accept(store: &Store, request_id: &str, helper_id: String) -> Result<HelpSession, HelpError> {
    let mut session = None;
    let slot = &mut session;
    store
        .help_requests
        .update(
            request_id,
            Box::new(move |request: &mut HelpRequest| {
                *slot = Some(accept_request(request, &helper_id)?);
                Ok(())
            }),
        )
        .await?;

    let session = session
        .ok_or_else(|| HelpError::Storage("Accepted request produced no session".to_string()))?;
    store.sessions.upsert(session).await
}
