use help_core::ProblemFilter;
use help_persistence::Store;
use help_types::{HelpError, Problem};
use serde::Deserialize;
use warp::Rejection;

use super::{ApiReply, respond};

#[derive(Debug, Default, Deserialize)]
pub struct ProblemQuery {
    pub difficulty: Option<String>,
    pub tags: Option<String>,
}

pub async fn list_problems(query: ProblemQuery, store: Store) -> Result<ApiReply, Rejection> {
    respond(filtered(&store, query).await)
}

async fn filtered(store: &Store, query: ProblemQuery) -> Result<Vec<Problem>, HelpError> {
    let filter = ProblemFilter::from_query(query.difficulty.as_deref(), query.tags.as_deref())?;
    Ok(filter.apply(store.problems.list().await?))
}

pub async fn get_problem(problem_id: String, store: Store) -> Result<ApiReply, Rejection> {
    respond(store.problems.get(&problem_id).await)
}
