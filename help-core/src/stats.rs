use help_types::{
    GlobalStats, HelpRequest, HelpSession, RequestStatus, SessionStatus, User, UserStatsReport,
};

pub fn global_stats(
    users: &[User],
    requests: &[HelpRequest],
    sessions: &[HelpSession],
    live_rooms: usize,
) -> GlobalStats {
    GlobalStats {
        total_users: users.len() as u32,
        total_sessions: sessions.len() as u32,
        active_sessions: sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Active)
            .count() as u32,
        problems_solved: users.iter().map(|u| u.stats.problems_solved).sum(),
        open_requests: requests
            .iter()
            .filter(|r| r.status == RequestStatus::Open)
            .count() as u32,
        live_rooms: live_rooms as u32,
    }
}

pub fn user_stats(user: &User, sessions: &[HelpSession]) -> UserStatsReport {
    let helped: Vec<&HelpSession> = sessions
        .iter()
        .filter(|s| s.helper_id == user.id && s.status == SessionStatus::Completed)
        .collect();
    let requested = sessions
        .iter()
        .filter(|s| s.requester_id == user.id)
        .count();

    let ratings: Vec<f64> = helped
        .iter()
        .filter_map(|s| s.rating)
        .map(f64::from)
        .collect();
    let average_session_rating = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    };

    UserStatsReport {
        user_id: user.id.clone(),
        stats: user.stats.clone(),
        sessions_helped: helped.len() as u32,
        sessions_requested: requested as u32,
        average_session_rating,
    }
}
