use chrono::Utc;
use help_types::{
    ChatEnvelope, ChatMessage, HelpError, HelpRequest, HelpSession, MessageKind, NewChatMessage,
    NewHelpRequest, RequestStatus, SessionEnd, SessionStatus, User, UserUpdate,
};
use tracing::info;
use uuid::Uuid;

pub const ANONYMOUS_ID: &str = "anonymous";
pub const ANONYMOUS_NAME: &str = "Anonymous";

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn required_text(value: Option<String>, field: &str) -> Result<String, HelpError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(HelpError::missing(field)),
    }
}

/// Build a new open help request from a submitted draft.
pub fn open_request(
    draft: NewHelpRequest,
    requester_id: &str,
    requester_name: &str,
) -> Result<HelpRequest, HelpError> {
    let problem_title = required_text(draft.problem_title, "problemTitle")?;
    let difficulty = draft
        .difficulty
        .ok_or_else(|| HelpError::missing("difficulty"))?;
    let message = required_text(draft.message, "message")?;

    Ok(HelpRequest {
        id: new_id(),
        problem_title,
        difficulty,
        requester_id: requester_id.to_string(),
        requester_name: requester_name.to_string(),
        message,
        tags: draft.tags,
        urgent: draft.urgent,
        status: RequestStatus::Open,
        created_at: now_rfc3339(),
        code: draft.code,
        time_stuck: draft.time_stuck,
        attempts: draft.attempts,
    })
}

/// Move an open request to `matched` and create the session for it.
pub fn accept_request(
    request: &mut HelpRequest,
    helper_id: &str,
) -> Result<HelpSession, HelpError> {
    if request.status != RequestStatus::Open {
        return Err(HelpError::InvalidState(
            "Help request is not available".to_string(),
        ));
    }

    request.status = RequestStatus::Matched;
    info!("Help request {} accepted by {}", request.id, helper_id);

    Ok(HelpSession {
        id: new_id(),
        request_id: request.id.clone(),
        requester_id: request.requester_id.clone(),
        helper_id: helper_id.to_string(),
        status: SessionStatus::Active,
        messages: Vec::new(),
        started_at: now_rfc3339(),
        ended_at: None,
        rating: None,
        feedback: None,
    })
}

pub fn complete_request(request: &mut HelpRequest) -> Result<(), HelpError> {
    if request.status != RequestStatus::Matched {
        return Err(HelpError::InvalidState(format!(
            "Help request is {}, not matched",
            request.status
        )));
    }
    request.status = RequestStatus::Completed;
    Ok(())
}

pub fn post_message(
    session: &mut HelpSession,
    sender_id: &str,
    sender_name: &str,
    draft: NewChatMessage,
) -> Result<ChatMessage, HelpError> {
    if session.status != SessionStatus::Active {
        return Err(HelpError::InvalidState("Session is not active".to_string()));
    }
    let body = required_text(draft.message, "message")?;

    let message = ChatMessage {
        id: new_id(),
        session_id: session.id.clone(),
        sender_id: sender_id.to_string(),
        sender_name: sender_name.to_string(),
        message: body,
        timestamp: now_rfc3339(),
        kind: draft.kind,
    };
    session.messages.push(message.clone());
    Ok(message)
}

pub fn end_session(session: &mut HelpSession, end: SessionEnd) -> Result<(), HelpError> {
    if session.status != SessionStatus::Active {
        return Err(HelpError::InvalidState("Session is not active".to_string()));
    }
    if let Some(rating) = end.rating {
        if !(1..=5).contains(&rating) {
            return Err(HelpError::InvalidInput(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
    }

    session.status = SessionStatus::Completed;
    session.ended_at = Some(now_rfc3339());
    session.rating = end.rating;
    session.feedback = end.feedback;
    info!("Session {} completed", session.id);
    Ok(())
}

/// Stamp a chat-room frame with a server id and timestamp. Sender fields
/// default to the anonymous placeholder.
pub fn stamp_room_message(room_id: &str, envelope: ChatEnvelope) -> ChatMessage {
    ChatMessage {
        id: new_id(),
        session_id: room_id.to_string(),
        sender_id: envelope
            .sender_id
            .unwrap_or_else(|| ANONYMOUS_ID.to_string()),
        sender_name: envelope
            .sender_name
            .unwrap_or_else(|| ANONYMOUS_NAME.to_string()),
        message: envelope.message,
        timestamp: now_rfc3339(),
        kind: MessageKind::Text,
    }
}

/// Validate every supplied field first, then merge; a rejected update leaves
/// the user untouched.
pub fn apply_user_update(user: &mut User, update: UserUpdate) -> Result<(), HelpError> {
    for (field, value) in [
        ("name", &update.name),
        ("avatar", &update.avatar),
        ("email", &update.email),
    ] {
        if matches!(value, Some(text) if text.trim().is_empty()) {
            return Err(HelpError::InvalidInput(format!("{} must not be empty", field)));
        }
    }
    if let Some(ratings) = &update.skill_ratings {
        if let Some((tag, _)) = ratings
            .iter()
            .find(|(_, level)| !level.is_finite() || **level < 0.0)
        {
            return Err(HelpError::InvalidInput(format!(
                "Invalid rating for skill {}",
                tag
            )));
        }
    }

    if let Some(name) = update.name {
        user.name = name;
    }
    if let Some(avatar) = update.avatar {
        user.avatar = avatar;
    }
    if let Some(email) = update.email {
        user.email = email;
    }
    if let Some(ratings) = update.skill_ratings {
        user.skill_ratings = ratings;
    }
    if let Some(topics) = update.favorite_topics {
        user.stats.favorite_topics = topics;
    }
    Ok(())
}

pub fn record_help_given(user: &mut User) {
    user.total_helped += 1;
}
