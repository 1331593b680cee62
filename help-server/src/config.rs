use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::judge::JudgeSettings;

pub const DEFAULT_JUDGE_URL: &str = "https://judge0-ce.p.rapidapi.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// JSON data file; the built-in sample data is used when unset.
    pub data_file: Option<PathBuf>,
    /// Identity assumed when a request carries no `user-id` header.
    pub default_user_id: String,
    pub pair_room_id: String,
    /// Problem whose starter code seeds the pair-programming buffer.
    pub pair_problem_id: String,
    pub judge: JudgeSettings,
}

impl Config {
    pub fn new() -> Self {
        let defaults = Self::default();
        let api_key = var("JUDGE0_API_KEY").filter(|key| !key.trim().is_empty());

        Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: try_load("PORT", defaults.port),
            data_file: var("DATA_FILE").map(PathBuf::from),
            default_user_id: var("DEFAULT_USER_ID").unwrap_or(defaults.default_user_id),
            pair_room_id: var("PAIR_ROOM_ID").unwrap_or(defaults.pair_room_id),
            pair_problem_id: var("PAIR_PROBLEM_ID").unwrap_or(defaults.pair_problem_id),
            judge: JudgeSettings {
                enabled: try_load("CODE_EXECUTION_ENABLED", api_key.is_some()),
                api_url: var("JUDGE0_API_URL").unwrap_or(defaults.judge.api_url),
                api_key,
                poll_interval: Duration::from_millis(try_load(
                    "JUDGE_POLL_INTERVAL_MS",
                    defaults.judge.poll_interval.as_millis() as u64,
                )),
                max_attempts: try_load("JUDGE_MAX_ATTEMPTS", defaults.judge.max_attempts),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            data_file: None,
            default_user_id: "user1".to_string(),
            pair_room_id: "pair-programming".to_string(),
            pair_problem_id: "two-sum".to_string(),
            judge: JudgeSettings {
                enabled: false,
                api_url: DEFAULT_JUDGE_URL.to_string(),
                api_key: None,
                poll_interval: Duration::from_secs(1),
                max_attempts: 10,
            },
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr + Display>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    let Some(raw) = var(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(e) => {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }
    }
}
