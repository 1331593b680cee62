use help_core::{complete_request, end_session, post_message, record_help_given};
use help_persistence::Store;
use help_types::{ChatMessage, HelpError, HelpSession, NewChatMessage, SessionEnd, User};
use tracing::{info, warn};
use warp::Rejection;
use warp::hyper::body::Bytes;

use super::{ApiReply, display_name, respond};
use crate::MAX_BODY_BYTES;
use crate::identity::Identity;

pub async fn get_session(session_id: String, store: Store) -> Result<ApiReply, Rejection> {
    respond(store.sessions.get(&session_id).await)
}

pub async fn create_message(
    session_id: String,
    draft: NewChatMessage,
    identity: Identity,
    store: Store,
) -> Result<ApiReply, Rejection> {
    respond(append_message(&store, &session_id, &identity, draft).await)
}

async fn append_message(
    store: &Store,
    session_id: &str,
    identity: &Identity,
    draft: NewChatMessage,
) -> Result<ChatMessage, HelpError> {
    let sender_name = display_name(store, identity).await;
    let sender_id = identity.user_id.clone();

    let mut posted = None;
    let slot = &mut posted;
    store
        .sessions
        .update(
            session_id,
            Box::new(move |session: &mut HelpSession| {
                *slot = Some(post_message(session, &sender_id, &sender_name, draft)?);
                Ok(())
            }),
        )
        .await?;

    posted.ok_or_else(|| HelpError::Storage("Message was not stored".to_string()))
}

pub async fn end_help_session(
    session_id: String,
    body: Bytes,
    store: Store,
) -> Result<ApiReply, Rejection> {
    let result = match parse_end(&body) {
        Ok(end) => finish(&store, &session_id, end).await,
        Err(e) => Err(e),
    };
    respond(result)
}

/// An empty body ends the session without rating or feedback.
fn parse_end(body: &[u8]) -> Result<SessionEnd, HelpError> {
    if body.len() as u64 > MAX_BODY_BYTES {
        return Err(HelpError::InvalidInput("Payload too large".to_string()));
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SessionEnd::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| HelpError::InvalidInput(format!("Invalid request body: {}", e)))
}

/// Complete the session, then its request, then credit the helper. The
/// session is the source of truth; follow-up failures are only logged.
async fn finish(store: &Store, session_id: &str, end: SessionEnd) -> Result<HelpSession, HelpError> {
    let session = store
        .sessions
        .update(session_id, Box::new(move |session: &mut HelpSession| end_session(session, end)))
        .await?;

    if let Err(e) = store
        .help_requests
        .update(&session.request_id, Box::new(complete_request))
        .await
    {
        warn!(
            "Could not complete request {} for session {}: {}",
            session.request_id, session.id, e
        );
    }

    if let Err(e) = store
        .users
        .update(
            &session.helper_id,
            Box::new(|user: &mut User| {
                record_help_given(user);
                Ok(())
            }),
        )
        .await
    {
        warn!("Could not credit helper {}: {}", session.helper_id, e);
    }

    info!("Session {} ended", session.id);
    Ok(session)
}
