use help_types::ExecuteRequest;
use std::sync::Arc;
use warp::Rejection;

use super::{ApiReply, respond};
use crate::judge::JudgeClient;

pub async fn execute_code(
    request: ExecuteRequest,
    judge: Arc<JudgeClient>,
) -> Result<ApiReply, Rejection> {
    respond(judge.execute(request).await)
}
