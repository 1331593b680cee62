//! Built-in sample data used when no data file is configured.

use help_types::{
    Badge, Difficulty, HelpRequest, LeaderboardEntry, Problem, RequestStatus, TestCase, User,
    UserStats,
};
use std::collections::BTreeMap;

use crate::loader::Seed;

const TWO_SUM_STARTER: &str = "function twoSum(nums, target) {\n  // Your code here\n  \n}\n";

fn ratings(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(tag, level)| (tag.to_string(), *level)).collect()
}

fn topics(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn user(
    id: &str,
    name: &str,
    avatar: &str,
    current_xp: u32,
    rank: u32,
    total_helped: u32,
    rating: f64,
    skills: &[(&str, f64)],
    stats: UserStats,
) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        avatar: avatar.to_string(),
        email: format!("{}@example.com", name.split(' ').next().unwrap_or(id).to_lowercase()),
        join_date: "2024-03-01".to_string(),
        current_xp,
        next_level_xp: 3000,
        rank,
        total_helped,
        rating,
        skill_ratings: ratings(skills),
        badges: BTreeMap::new(),
        stats,
    }
}

fn users() -> BTreeMap<String, User> {
    let mut alex = user(
        "user1",
        "Alex Thompson",
        "AT",
        2480,
        6,
        134,
        4.6,
        &[("Strings", 9.2), ("Arrays", 8.5), ("Trees", 7.8), ("Hash Table", 8.0)],
        UserStats {
            problems_solved: 89,
            help_streak: 12,
            avg_response_time: "2.3 min".to_string(),
            favorite_topics: topics(&["Strings", "Arrays", "Trees"]),
        },
    );
    for badge in [
        Badge {
            id: "badge1".to_string(),
            name: "String Master".to_string(),
            description: "Helped 25+ people with string problems".to_string(),
            earned: "2024-01-15".to_string(),
            icon: None,
        },
        Badge {
            id: "badge2".to_string(),
            name: "Helpful".to_string(),
            description: "Maintained 4.5+ rating for 30 days".to_string(),
            earned: "2024-02-20".to_string(),
            icon: None,
        },
    ] {
        alex.badges.insert(badge.id.clone(), badge);
    }

    let sarah = user(
        "user2",
        "Sarah Chen",
        "SC",
        1890,
        2,
        89,
        4.9,
        &[("Dynamic Programming", 9.5), ("Graphs", 8.7), ("Arrays", 7.5), ("String", 8.2)],
        UserStats {
            problems_solved: 142,
            help_streak: 21,
            avg_response_time: "1.8 min".to_string(),
            favorite_topics: topics(&["Dynamic Programming", "Graphs"]),
        },
    );

    let alex_j = user(
        "user3",
        "Alex Johnson",
        "AJ",
        640,
        14,
        8,
        4.2,
        &[("Array", 4.0), ("Hash Table", 3.5), ("Strings", 5.0)],
        UserStats {
            problems_solved: 23,
            help_streak: 2,
            avg_response_time: "6.5 min".to_string(),
            favorite_topics: topics(&["Array"]),
        },
    );

    let emma = user(
        "user4",
        "Emma Davis",
        "ED",
        910,
        11,
        15,
        4.4,
        &[("String", 5.5), ("Dynamic Programming", 3.0), ("Trees", 6.0)],
        UserStats {
            problems_solved: 37,
            help_streak: 4,
            avg_response_time: "4.1 min".to_string(),
            favorite_topics: topics(&["Trees", "String"]),
        },
    );

    let mike = user(
        "user5",
        "Mike Wilson",
        "MW",
        1650,
        3,
        67,
        4.7,
        &[("Array", 8.8), ("Hash Table", 9.0), ("Graphs", 6.5), ("Stack", 7.2)],
        UserStats {
            problems_solved: 118,
            help_streak: 9,
            avg_response_time: "3.0 min".to_string(),
            favorite_topics: topics(&["Array", "Hash Table", "Stack"]),
        },
    );

    [alex, sarah, alex_j, emma, mike]
        .into_iter()
        .map(|user| (user.id.clone(), user))
        .collect()
}

fn help_requests() -> Vec<HelpRequest> {
    vec![
        HelpRequest {
            id: "req1".to_string(),
            problem_title: "Two Sum".to_string(),
            difficulty: Difficulty::Easy,
            requester_id: "user3".to_string(),
            requester_name: "Alex Johnson".to_string(),
            message: "I'm getting a time limit exceeded error. I think my nested loop approach isn't efficient enough.".to_string(),
            tags: topics(&["Array", "Hash Table"]),
            urgent: false,
            status: RequestStatus::Open,
            created_at: "2024-04-10T09:30:00Z".to_string(),
            code: Some(TWO_SUM_STARTER.to_string()),
            time_stuck: Some("8 minutes".to_string()),
            attempts: Some(4),
        },
        HelpRequest {
            id: "req2".to_string(),
            problem_title: "Longest Palindromic Substring".to_string(),
            difficulty: Difficulty::Medium,
            requester_id: "user4".to_string(),
            requester_name: "Emma Davis".to_string(),
            message: "Having trouble with the dynamic programming approach. My solution works for small inputs but fails for larger ones.".to_string(),
            tags: topics(&["String", "Dynamic Programming"]),
            urgent: true,
            status: RequestStatus::Open,
            created_at: "2024-04-10T10:05:00Z".to_string(),
            code: None,
            time_stuck: Some("15 minutes".to_string()),
            attempts: Some(6),
        },
    ]
}

fn leaderboard() -> Vec<LeaderboardEntry> {
    [
        (1, "user1", "Alex Thompson", "AT", 2480, 134, 4.6),
        (2, "user2", "Sarah Chen", "SC", 1890, 89, 4.9),
        (3, "user5", "Mike Wilson", "MW", 1650, 67, 4.7),
    ]
    .into_iter()
    .map(
        |(rank, user_id, name, avatar, xp, total_helped, rating)| LeaderboardEntry {
            rank,
            user_id: user_id.to_string(),
            name: name.to_string(),
            avatar: avatar.to_string(),
            xp,
            total_helped,
            rating,
        },
    )
    .collect()
}

fn case(input: &str, output: &str) -> TestCase {
    TestCase {
        input: input.to_string(),
        output: output.to_string(),
        description: None,
    }
}

fn problems() -> Vec<Problem> {
    vec![
        Problem {
            id: "two-sum".to_string(),
            title: "Two Sum".to_string(),
            difficulty: Difficulty::Easy,
            description: "Given an array of integers nums and an integer target, return indices of the two numbers such that they add up to target.\n\nYou may assume that each input would have exactly one solution, and you may not use the same element twice.\n\nYou can return the answer in any order.".to_string(),
            tags: topics(&["Array", "Hash Table"]),
            test_cases: vec![
                case("[2,7,11,15]\n9", "[0,1]"),
                case("[3,2,4]\n6", "[1,2]"),
                case("[3,3]\n6", "[0,1]"),
            ],
            solution: None,
            starter_code: Some(TWO_SUM_STARTER.to_string()),
        },
        Problem {
            id: "longest-palindromic-substring".to_string(),
            title: "Longest Palindromic Substring".to_string(),
            difficulty: Difficulty::Medium,
            description: "Given a string s, return the longest palindromic substring in s.".to_string(),
            tags: topics(&["String", "Dynamic Programming"]),
            test_cases: vec![case("\"babad\"", "\"bab\""), case("\"cbbd\"", "\"bb\"")],
            solution: None,
            starter_code: None,
        },
        Problem {
            id: "valid-parentheses".to_string(),
            title: "Valid Parentheses".to_string(),
            difficulty: Difficulty::Easy,
            description: "Given a string s containing just the characters '(', ')', '{', '}', '[' and ']', determine if the input string is valid.".to_string(),
            tags: topics(&["String", "Stack"]),
            test_cases: vec![
                case("\"()\"", "true"),
                case("\"()[]{}\"", "true"),
                case("\"(]\"", "false"),
            ],
            solution: None,
            starter_code: None,
        },
    ]
}

pub fn sample() -> Seed {
    Seed {
        users: users(),
        help_requests: help_requests(),
        leaderboard: leaderboard(),
        problems: problems(),
    }
}
