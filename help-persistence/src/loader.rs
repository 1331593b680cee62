use anyhow::{Context, Result};
use help_types::{HelpRequest, LeaderboardEntry, Problem, User};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Contents of a data file. Every collection is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Seed {
    pub users: BTreeMap<String, User>,
    pub help_requests: Vec<HelpRequest>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub problems: Vec<Problem>,
}

impl Seed {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read data file {}", path.display()))?;
        let seed: Seed = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse data file {}", path.display()))?;

        info!(
            "Loaded {} users, {} help requests, {} problems from {}",
            seed.users.len(),
            seed.help_requests.len(),
            seed.problems.len(),
            path.display()
        );
        Ok(seed)
    }
}
