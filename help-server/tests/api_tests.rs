
use futures_util::future::join_all;
use serde_json::json;
use test_helpers::*;
use warp::http::StatusCode;
use warp::test::request;

#[tokio::test]
async fn test_health_endpoint() {
    let setup = TestServerSetup::new().await;

    let response = request()
        .method("GET")
        .path("/api/health")
        .reply(&setup.routes())
        .await;

    assert_eq!(response.status(), 200);
    let body = json_body(&response);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_current_user_defaults_to_user1() {
    let setup = TestServerSetup::new().await;
    let routes = setup.routes();

    let response = request().path("/api/user/me").reply(&routes).await;
    assert_eq!(response.status(), 200);
    assert_eq!(json_body(&response)["id"], "user1");
    assert_eq!(json_body(&response)["currentXP"], 2480);

    let response = request()
        .path("/api/user/me")
        .header("user-id", "user2")
        .reply(&routes)
        .await;
    assert_eq!(json_body(&response)["name"], "Sarah Chen");

    let response = request()
        .path("/api/user/me")
        .header("user-id", "ghost")
        .reply(&routes)
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "User not found");
}

#[tokio::test]
async fn test_update_user_allow_list() {
    let setup = TestServerSetup::new().await;
    let routes = setup.routes();

    let response = request()
        .method("PUT")
        .path("/api/user/user1")
        .json(&json!({"name": "Alex T.", "favoriteTopics": ["Graphs"]}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);
    let body = json_body(&response);
    assert_eq!(body["name"], "Alex T.");
    assert_eq!(body["stats"]["favoriteTopics"], json!(["Graphs"]));
    assert_eq!(body["totalHelped"], 134);

    // Fields outside the allow-list are refused
    let response = request()
        .method("PUT")
        .path("/api/user/user1")
        .json(&json!({"totalHelped": 9999}))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 400);
    assert!(json_body(&response)["error"].as_str().is_some());

    let response = request()
        .method("PUT")
        .path("/api/user/ghost")
        .json(&json!({"name": "Nobody"}))
        .reply(&routes)
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "User not found");
}

#[tokio::test]
async fn test_user_stats() {
    let setup = TestServerSetup::new().await;

    let response = request()
        .path("/api/user/user1/stats")
        .reply(&setup.routes())
        .await;
    assert_eq!(response.status(), 200);
    let body = json_body(&response);
    assert_eq!(body["problemsSolved"], 89);
    assert_eq!(body["avgResponseTime"], "2.3 min");
    assert_eq!(body["sessionsHelped"], 0);
}

#[tokio::test]
async fn test_help_request_filters() {
    let setup = TestServerSetup::new().await;
    let routes = setup.routes();

    let all = request().path("/api/help-requests").reply(&routes).await;
    assert_eq!(json_body(&all).as_array().unwrap().len(), 2);

    let easy = request()
        .path("/api/help-requests?difficulty=Easy&status=open")
        .reply(&routes)
        .await;
    let easy = json_body(&easy);
    assert_eq!(easy.as_array().unwrap().len(), 1);
    assert_eq!(easy[0]["id"], "req1");

    let tagged = request()
        .path("/api/help-requests?tags=Dynamic%20Programming,Graph")
        .reply(&routes)
        .await;
    assert_eq!(json_body(&tagged)[0]["id"], "req2");

    let bad = request()
        .path("/api/help-requests?difficulty=Impossible")
        .reply(&routes)
        .await;
    assert_error(&bad, StatusCode::BAD_REQUEST, "Unknown difficulty: Impossible");
}

#[tokio::test]
async fn test_create_help_request() {
    let setup = TestServerSetup::new().await;
    let routes = setup.routes();

    let response = request()
        .method("POST")
        .path("/api/help-requests")
        .header("user-id", "user4")
        .json(&json!({
            "problemTitle": "Valid Parentheses",
            "difficulty": "Easy",
            "message": "Stack keeps overflowing",
            "tags": ["Stack"],
        }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 201);
    let created = json_body(&response);
    assert_eq!(created["status"], "open");
    assert_eq!(created["requesterId"], "user4");
    assert_eq!(created["requesterName"], "Emma Davis");

    let all = request().path("/api/help-requests").reply(&routes).await;
    assert_eq!(json_body(&all).as_array().unwrap().len(), 3);

    let missing = request()
        .method("POST")
        .path("/api/help-requests")
        .json(&json!({"difficulty": "Easy", "message": "help"}))
        .reply(&routes)
        .await;
    assert_error(&missing, StatusCode::BAD_REQUEST, "problemTitle is required");
}

#[tokio::test]
async fn test_accept_then_session_lifecycle() {
    let setup = TestServerSetup::new().await;
    let routes = setup.routes();

    let accepted = request()
        .method("POST")
        .path("/api/help-requests/req1/accept")
        .header("user-id", "user5")
        .reply(&routes)
        .await;
    assert_eq!(accepted.status(), 200);
    let session = json_body(&accepted);
    assert_eq!(session["requestId"], "req1");
    assert_eq!(session["requesterId"], "user3");
    assert_eq!(session["helperId"], "user5");
    assert_eq!(session["status"], "active");
    let session_id = session["id"].as_str().unwrap().to_string();

    // A matched request cannot be accepted again
    let again = request()
        .method("POST")
        .path("/api/help-requests/req1/accept")
        .reply(&routes)
        .await;
    assert_error(&again, StatusCode::BAD_REQUEST, "Help request is not available");

    let matched = request()
        .path("/api/help-requests?status=matched")
        .reply(&routes)
        .await;
    assert_eq!(json_body(&matched)[0]["id"], "req1");

    // Messages append in order
    for body in ["first", "second"] {
        let posted = request()
            .method("POST")
            .path(&format!("/api/sessions/{}/messages", session_id))
            .header("user-id", "user5")
            .header("user-name", "Mike")
            .json(&json!({"message": body}))
            .reply(&routes)
            .await;
        assert_eq!(posted.status(), 200);
        assert_eq!(json_body(&posted)["senderName"], "Mike");
    }
    let fetched = request()
        .path(&format!("/api/sessions/{}", session_id))
        .reply(&routes)
        .await;
    let messages = json_body(&fetched)["messages"].clone();
    assert_eq!(messages[0]["message"], "first");
    assert_eq!(messages[1]["message"], "second");

    // Ending completes the request and credits the helper
    let ended = request()
        .method("PUT")
        .path(&format!("/api/sessions/{}/end", session_id))
        .json(&json!({"rating": 5, "feedback": "Great help"}))
        .reply(&routes)
        .await;
    assert_eq!(ended.status(), 200);
    let ended = json_body(&ended);
    assert_eq!(ended["status"], "completed");
    assert_eq!(ended["rating"], 5);
    assert!(ended["endedAt"].as_str().is_some());

    let completed = request()
        .path("/api/help-requests?status=completed")
        .reply(&routes)
        .await;
    assert_eq!(json_body(&completed)[0]["id"], "req1");

    let helper = request()
        .path("/api/user/me")
        .header("user-id", "user5")
        .reply(&routes)
        .await;
    assert_eq!(json_body(&helper)["totalHelped"], 68);

    let stats = request()
        .path("/api/user/user5/stats")
        .reply(&routes)
        .await;
    assert_eq!(json_body(&stats)["sessionsHelped"], 1);
    assert_eq!(json_body(&stats)["averageSessionRating"], 5.0);

    // Ended sessions take no more messages and cannot be ended twice
    let late = request()
        .method("POST")
        .path(&format!("/api/sessions/{}/messages", session_id))
        .json(&json!({"message": "too late"}))
        .reply(&routes)
        .await;
    assert_error(&late, StatusCode::BAD_REQUEST, "Session is not active");

    let twice = request()
        .method("PUT")
        .path(&format!("/api/sessions/{}/end", session_id))
        .json(&json!({}))
        .reply(&routes)
        .await;
    assert_error(&twice, StatusCode::BAD_REQUEST, "Session is not active");
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let setup = TestServerSetup::new().await;
    let routes = setup.routes();

    let accept = request()
        .method("POST")
        .path("/api/help-requests/nope/accept")
        .reply(&routes)
        .await;
    assert_error(&accept, StatusCode::NOT_FOUND, "Help request not found");

    let session = request().path("/api/sessions/nope").reply(&routes).await;
    assert_error(&session, StatusCode::NOT_FOUND, "Session not found");

    let problem = request().path("/api/problems/nope").reply(&routes).await;
    assert_error(&problem, StatusCode::NOT_FOUND, "Problem not found");

    let route = request().path("/api/nothing-here").reply(&routes).await;
    assert_eq!(route.status(), 404);
    assert!(json_body(&route)["error"].as_str().is_some());
}

#[tokio::test]
async fn test_concurrent_accepts_yield_one_session() {
    let setup = TestServerSetup::new().await;
    let routes = setup.routes();

    let attempts = ["user1", "user2", "user5"].map(|helper| {
        request()
            .method("POST")
            .path("/api/help-requests/req2/accept")
            .header("user-id", helper)
            .reply(&routes)
    });
    let accepted = join_all(attempts)
        .await
        .iter()
        .filter(|response| response.status() == StatusCode::OK)
        .count();
    assert_eq!(accepted, 1);
}

#[tokio::test]
async fn test_problems() {
    let setup = TestServerSetup::new().await;
    let routes = setup.routes();

    let all = request().path("/api/problems").reply(&routes).await;
    assert_eq!(json_body(&all).as_array().unwrap().len(), 3);

    let filtered = request()
        .path("/api/problems?difficulty=Easy&tags=Stack")
        .reply(&routes)
        .await;
    let filtered = json_body(&filtered);
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["id"], "valid-parentheses");

    let unfiltered = request()
        .path("/api/problems?difficulty=All")
        .reply(&routes)
        .await;
    assert_eq!(json_body(&unfiltered).as_array().unwrap().len(), 3);

    // Reads are idempotent
    let first = request().path("/api/problems/two-sum").reply(&routes).await;
    let second = request().path("/api/problems/two-sum").reply(&routes).await;
    assert_eq!(first.status(), 200);
    assert_eq!(first.body(), second.body());
    assert_eq!(json_body(&first)["testCases"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_leaderboard_limit() {
    let setup = TestServerSetup::new().await;
    let routes = setup.routes();

    let all = request().path("/api/leaderboard").reply(&routes).await;
    let all = json_body(&all);
    assert_eq!(all.as_array().unwrap().len(), 3);
    assert_eq!(all[0]["rank"], 1);

    let top = request().path("/api/leaderboard?limit=2").reply(&routes).await;
    let top = json_body(&top);
    assert_eq!(top.as_array().unwrap().len(), 2);
    assert_eq!(top[1]["userId"], "user2");

    // Zero and non-numeric limits use the default
    for limit in ["0", "abc"] {
        let response = request()
            .path(&format!("/api/leaderboard?limit={}", limit))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), 200);
        assert_eq!(json_body(&response).as_array().unwrap().len(), 3);
    }
}

#[tokio::test]
async fn test_end_session_without_body() {
    let setup = TestServerSetup::new().await;
    let routes = setup.routes();

    let accepted = request()
        .method("POST")
        .path("/api/help-requests/req1/accept")
        .header("user-id", "user5")
        .reply(&routes)
        .await;
    let session_id = json_body(&accepted)["id"].as_str().unwrap().to_string();

    let ended = request()
        .method("PUT")
        .path(&format!("/api/sessions/{}/end", session_id))
        .reply(&routes)
        .await;
    assert_eq!(ended.status(), 200);
    let ended = json_body(&ended);
    assert_eq!(ended["status"], "completed");
    assert!(ended.get("rating").is_none());

    let completed = request()
        .path("/api/help-requests?status=completed")
        .reply(&routes)
        .await;
    assert_eq!(json_body(&completed)[0]["id"], "req1");
}

#[tokio::test]
async fn test_end_session_rejects_malformed_body() {
    let setup = TestServerSetup::new().await;
    let routes = setup.routes();

    let accepted = request()
        .method("POST")
        .path("/api/help-requests/req1/accept")
        .reply(&routes)
        .await;
    let session_id = json_body(&accepted)["id"].as_str().unwrap().to_string();

    let ended = request()
        .method("PUT")
        .path(&format!("/api/sessions/{}/end", session_id))
        .body("{ not json")
        .reply(&routes)
        .await;
    assert_eq!(ended.status(), 400);
    assert!(
        json_body(&ended)["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body")
    );

    // The session is still active
    let session = request()
        .path(&format!("/api/sessions/{}", session_id))
        .reply(&routes)
        .await;
    assert_eq!(json_body(&session)["status"], "active");
}

#[tokio::test]
async fn test_json_body_without_length_is_a_client_error() {
    let setup = TestServerSetup::new().await;

    let response = request()
        .method("POST")
        .path("/api/help-requests")
        .reply(&setup.routes())
        .await;
    assert_error(
        &response,
        StatusCode::LENGTH_REQUIRED,
        "Request body with Content-Length is required",
    );
}

#[tokio::test]
async fn test_routes_serve_over_tcp() {
    let setup = TestServerSetup::new().await;
    let (addr, server) = warp::serve(setup.routes()).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    let body: serde_json::Value = reqwest::get(format!("http://{}/api/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_global_stats() {
    let setup = TestServerSetup::new().await;

    let response = request()
        .path("/api/stats/global")
        .reply(&setup.routes())
        .await;
    assert_eq!(response.status(), 200);
    let body = json_body(&response);
    assert_eq!(body["totalUsers"], 5);
    assert_eq!(body["totalSessions"], 0);
    assert_eq!(body["activeSessions"], 0);
    assert_eq!(body["problemsSolved"], 89 + 142 + 23 + 37 + 118);
    assert_eq!(body["openRequests"], 2);
    assert_eq!(body["liveRooms"], 1);
}

#[tokio::test]
async fn test_skill_matchmaking() {
    let setup = TestServerSetup::new().await;
    let routes = setup.routes();

    let response = request()
        .path("/api/matchmaking/skills?skills=Array,%20Hash%20Table")
        .header("user-id", "user3")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);
    let matches = json_body(&response);
    let matches = matches.as_array().unwrap();

    // user3 is the requester; user5 covers both tags
    assert!(matches.iter().all(|m| m["user"]["id"] != "user3"));
    assert_eq!(matches[0]["user"]["id"], "user5");
    assert_eq!(matches[0]["skillMatch"], 100);
    assert_eq!(matches[0]["matchedSkills"], 2);
    assert_eq!(matches[0]["isOnline"], false);
    assert_eq!(matches[0]["responseTime"], "3.0 min");

    let missing = request()
        .path("/api/matchmaking/skills")
        .reply(&routes)
        .await;
    assert_error(&missing, StatusCode::BAD_REQUEST, "Skills parameter is required");

    let blank = request()
        .path("/api/matchmaking/skills?skills=%20,%20")
        .reply(&routes)
        .await;
    assert_error(&blank, StatusCode::BAD_REQUEST, "Skills parameter is required");

    let limited = request()
        .path("/api/matchmaking/skills?skills=Array,Graphs,Strings&limit=1")
        .reply(&routes)
        .await;
    assert_eq!(json_body(&limited).as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_peer_suggestions() {
    let setup = TestServerSetup::new().await;

    let response = request()
        .path("/api/matchmaking/peers?limit=2")
        .header("user-id", "user3")
        .reply(&setup.routes())
        .await;
    assert_eq!(response.status(), 200);
    let peers = json_body(&response);
    let peers = peers.as_array().unwrap();
    assert!(peers.len() <= 2);
    assert!(peers.iter().all(|p| p["user"]["id"] != "user3"));
    assert!(peers.iter().all(|p| p["similarity"].as_f64().unwrap() > 0.0));
}

#[tokio::test]
async fn test_disabled_judge_reports_failure() {
    let setup = TestServerSetup::new().await;
    let routes = setup.routes();

    let response = request()
        .method("POST")
        .path("/api/execute-code")
        .json(&json!({
            "code": "function twoSum(nums, target) { return [0, 1]; }",
            "testCases": [{"input": "[2,7,11,15]\n9", "expected": "[0,1]"}],
        }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 200);
    let body = json_body(&response);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], "Wrong Answer");
    assert_eq!(body["language"], "javascript");
    assert_eq!(body["testCases"][0]["passed"], false);

    // Empty submissions fail the same way while execution is off
    for body in [json!({"code": ""}), json!({"language": "python"})] {
        let empty = request()
            .method("POST")
            .path("/api/execute-code")
            .json(&body)
            .reply(&routes)
            .await;
        assert_eq!(empty.status(), 200);
        let report = json_body(&empty);
        assert_eq!(report["success"], false);
        assert_eq!(report["status"], "Wrong Answer");
    }
}

#[tokio::test]
async fn test_malformed_body_gets_error_shape() {
    let setup = TestServerSetup::new().await;

    let response = request()
        .method("POST")
        .path("/api/help-requests")
        .header("content-type", "application/json")
        .body("{ not json")
        .reply(&setup.routes())
        .await;
    assert_eq!(response.status(), 400);
    assert!(
        json_body(&response)["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body")
    );
}
