//! REST handlers. Each returns `Ok` with a JSON body and status; domain
//! failures become `{"error": ...}` replies rather than rejections.

pub mod execution;
pub mod help_requests;
pub mod insights;
pub mod problems;
pub mod sessions;
pub mod users;

use help_core::ANONYMOUS_NAME;
use help_persistence::Store;
use help_types::{ApiError, HelpError};
use serde::Serialize;
use std::convert::Infallible;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Rejection, Reply};

use crate::identity::Identity;

pub type ApiReply = WithStatus<Json>;

pub fn status_for(err: &HelpError) -> StatusCode {
    match err {
        HelpError::NotFound(_) => StatusCode::NOT_FOUND,
        HelpError::InvalidState(_) | HelpError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        HelpError::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
        HelpError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_reply(err: &HelpError) -> ApiReply {
    let status = status_for(err);
    if status.is_server_error() {
        error!("Request failed: {}", err);
    }
    warp::reply::with_status(warp::reply::json(&ApiError::from(err)), status)
}

pub fn reply_with<T: Serialize>(result: Result<T, HelpError>, status: StatusCode) -> ApiReply {
    match result {
        Ok(body) => warp::reply::with_status(warp::reply::json(&body), status),
        Err(err) => error_reply(&err),
    }
}

pub fn respond<T: Serialize>(result: Result<T, HelpError>) -> Result<ApiReply, Rejection> {
    Ok(reply_with(result, StatusCode::OK))
}

/// Name to stamp on records the caller creates: the `user-name` header,
/// else the stored profile name, else the anonymous placeholder.
pub async fn display_name(store: &Store, identity: &Identity) -> String {
    if let Some(name) = &identity.user_name {
        return name.clone();
    }
    match store.users.get(&identity.user_id).await {
        Ok(user) => user.name,
        Err(_) => ANONYMOUS_NAME.to_string(),
    }
}

/// Turn warp's own rejections into the same `{"error"}` body domain
/// failures use.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e))
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid query string".to_string())
    } else if err.find::<warp::reject::MissingHeader>().is_some() {
        (StatusCode::BAD_REQUEST, "Missing required header".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported content type".to_string(),
        )
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (
            StatusCode::LENGTH_REQUIRED,
            "Request body with Content-Length is required".to_string(),
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        warn!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ApiError { error: message }),
        status,
    ))
}
