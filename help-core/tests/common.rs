#![allow(dead_code)]

use help_types::{
    Difficulty, HelpRequest, HelpSession, RequestStatus, SessionStatus, User, UserStats,
};
use std::collections::BTreeMap;

/// Creates a test user with the given skill ratings
pub fn create_test_user(id: &str, skills: &[(&str, f64)]) -> User {
    User {
        id: id.to_string(),
        name: format!("User {}", id),
        avatar: id.chars().take(2).collect::<String>().to_uppercase(),
        email: format!("{}@test.com", id),
        join_date: "2024-03-01".to_string(),
        current_xp: 100,
        next_level_xp: 1000,
        rank: 1,
        total_helped: 0,
        rating: 4.5,
        skill_ratings: skills
            .iter()
            .map(|(tag, level)| (tag.to_string(), *level))
            .collect::<BTreeMap<_, _>>(),
        badges: BTreeMap::new(),
        stats: UserStats {
            problems_solved: 10,
            help_streak: 2,
            avg_response_time: "2.3 min".to_string(),
            favorite_topics: vec!["Arrays".to_string()],
        },
    }
}

pub fn create_test_request(id: &str, difficulty: Difficulty, tags: &[&str]) -> HelpRequest {
    HelpRequest {
        id: id.to_string(),
        problem_title: format!("Problem {}", id),
        difficulty,
        requester_id: "requester".to_string(),
        requester_name: "Requester".to_string(),
        message: "stuck".to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        urgent: false,
        status: RequestStatus::Open,
        created_at: "2024-03-01T00:00:00Z".to_string(),
        code: None,
        time_stuck: None,
        attempts: None,
    }
}

pub fn create_test_session(id: &str, helper: &str, requester: &str, status: SessionStatus) -> HelpSession {
    HelpSession {
        id: id.to_string(),
        request_id: format!("req-{}", id),
        requester_id: requester.to_string(),
        helper_id: helper.to_string(),
        status,
        messages: Vec::new(),
        started_at: "2024-03-01T00:00:00Z".to_string(),
        ended_at: None,
        rating: None,
        feedback: None,
    }
}

pub fn skills(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}
