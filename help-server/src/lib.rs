use help_persistence::Store;
use std::collections::HashMap;
use std::sync::Arc;
use warp::{Filter, Reply};

use crate::api::help_requests::HelpRequestQuery;
use crate::api::insights::{LimitQuery, SkillQuery};
use crate::api::problems::ProblemQuery;
use crate::config::Config;
use crate::identity::{USER_ID_HEADER, USER_NAME_HEADER, with_identity};
use crate::judge::JudgeClient;
use crate::websocket::RoomRegistry;

pub mod api;
pub mod config;
pub mod identity;
pub mod judge;
pub mod websocket;

pub(crate) const MAX_BODY_BYTES: u64 = 256 * 1024;

fn json_body<T: serde::de::DeserializeOwned + Send>()
-> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

pub fn create_routes(
    store: Store,
    registry: Arc<RoomRegistry>,
    judge: Arc<JudgeClient>,
    config: Config,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let store_filter = warp::any().map({
        let store = store.clone();
        move || store.clone()
    });

    let registry_filter = warp::any().map({
        let registry = registry.clone();
        move || registry.clone()
    });

    let judge_filter = warp::any().map({
        let judge = judge.clone();
        move || judge.clone()
    });

    let identity = with_identity(config.default_user_id);

    // WebSocket endpoint: /ws/<room> or /ws/...?type=pair-programming
    let websocket = warp::path("ws")
        .and(warp::path::tail())
        .and(warp::query::<HashMap<String, String>>())
        .and(warp::ws())
        .and(registry_filter.clone())
        .map(
            |tail: warp::path::Tail,
             query: HashMap<String, String>,
             ws: warp::ws::Ws,
             registry: Arc<RoomRegistry>| {
                match websocket::resolve_target(tail.as_str(), &query) {
                    Ok((target, user_id)) => ws
                        .on_upgrade(move |socket| {
                            websocket::handle_connection(socket, target, user_id, registry)
                        })
                        .into_response(),
                    Err(err) => api::error_reply(&err).into_response(),
                }
            },
        );

    let health = warp::path!("api" / "health")
        .and(warp::get())
        .and_then(api::insights::health);

    // Users
    let current_user = warp::path!("api" / "user" / "me")
        .and(warp::get())
        .and(identity.clone())
        .and(store_filter.clone())
        .and_then(api::users::get_current_user);

    let update_user = warp::path!("api" / "user" / String)
        .and(warp::put())
        .and(json_body())
        .and(store_filter.clone())
        .and_then(api::users::update_user);

    let user_stats = warp::path!("api" / "user" / String / "stats")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(api::users::get_user_stats);

    // Help requests
    let list_requests = warp::path!("api" / "help-requests")
        .and(warp::get())
        .and(warp::query::<HelpRequestQuery>())
        .and(store_filter.clone())
        .and_then(api::help_requests::list_help_requests);

    let create_request = warp::path!("api" / "help-requests")
        .and(warp::post())
        .and(json_body())
        .and(identity.clone())
        .and(store_filter.clone())
        .and_then(api::help_requests::create_help_request);

    let accept_request = warp::path!("api" / "help-requests" / String / "accept")
        .and(warp::post())
        .and(identity.clone())
        .and(store_filter.clone())
        .and_then(api::help_requests::accept_help_request);

    // Sessions
    let get_session = warp::path!("api" / "sessions" / String)
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(api::sessions::get_session);

    let post_message = warp::path!("api" / "sessions" / String / "messages")
        .and(warp::post())
        .and(json_body())
        .and(identity.clone())
        .and(store_filter.clone())
        .and_then(api::sessions::create_message);

    // Rating and feedback are optional, so an absent body is accepted
    let end_session = warp::path!("api" / "sessions" / String / "end")
        .and(warp::put())
        .and(warp::body::bytes())
        .and(store_filter.clone())
        .and_then(api::sessions::end_help_session);

    // Problems
    let list_problems = warp::path!("api" / "problems")
        .and(warp::get())
        .and(warp::query::<ProblemQuery>())
        .and(store_filter.clone())
        .and_then(api::problems::list_problems);

    let get_problem = warp::path!("api" / "problems" / String)
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(api::problems::get_problem);

    // Leaderboard, statistics and matchmaking
    let leaderboard = warp::path!("api" / "leaderboard")
        .and(warp::get())
        .and(warp::query::<LimitQuery>())
        .and(store_filter.clone())
        .and_then(api::insights::leaderboard);

    let global_stats = warp::path!("api" / "stats" / "global")
        .and(warp::get())
        .and(store_filter.clone())
        .and(registry_filter.clone())
        .and_then(api::insights::global);

    let match_skills = warp::path!("api" / "matchmaking" / "skills")
        .and(warp::get())
        .and(warp::query::<SkillQuery>())
        .and(identity.clone())
        .and(store_filter.clone())
        .and(registry_filter.clone())
        .and_then(api::insights::match_by_skills);

    let match_peers = warp::path!("api" / "matchmaking" / "peers")
        .and(warp::get())
        .and(warp::query::<LimitQuery>())
        .and(identity.clone())
        .and(store_filter.clone())
        .and(registry_filter.clone())
        .and_then(api::insights::suggest_peers_for);

    // Code execution
    let execute_code = warp::path!("api" / "execute-code")
        .and(warp::post())
        .and(json_body())
        .and(judge_filter.clone())
        .and_then(api::execution::execute_code);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", USER_ID_HEADER, USER_NAME_HEADER])
        .allow_methods(vec!["GET", "POST", "PUT"]);

    let users = current_user.or(update_user).or(user_stats);
    let help_requests = list_requests.or(create_request).or(accept_request);
    let sessions = get_session.or(post_message).or(end_session);
    let problems = list_problems.or(get_problem);
    let insights = leaderboard.or(global_stats).or(match_skills).or(match_peers);

    websocket
        .or(health)
        .or(users)
        .or(help_requests)
        .or(sessions)
        .or(problems)
        .or(insights)
        .or(execute_code)
        .recover(api::handle_rejection)
        .with(cors)
        .with(warp::log("peer_help"))
}
