//! Caller identity taken from plain request headers. There is no
//! authentication; the headers are trusted as sent.

use help_core::ANONYMOUS_NAME;
use warp::Filter;

pub const USER_ID_HEADER: &str = "user-id";
pub const USER_NAME_HEADER: &str = "user-name";

#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: String,
    /// Display name from the `user-name` header, if one was sent.
    pub user_name: Option<String>,
}

impl Identity {
    pub fn resolve(user_id: Option<String>, user_name: Option<String>, default_user_id: &str) -> Self {
        Self {
            user_id: non_blank(user_id).unwrap_or_else(|| default_user_id.to_string()),
            user_name: non_blank(user_name),
        }
    }

    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or(ANONYMOUS_NAME)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn with_identity(
    default_user_id: String,
) -> impl Filter<Extract = (Identity,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>(USER_ID_HEADER)
        .and(warp::header::optional::<String>(USER_NAME_HEADER))
        .map(move |user_id, user_name| Identity::resolve(user_id, user_name, &default_user_id))
}
