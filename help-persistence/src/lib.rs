pub mod loader;
pub mod repositories;
pub mod seed;

pub use loader::Seed;
pub use repositories::{Entity, MemoryRepository, Mutation, Repository};

use help_types::{HelpRequest, HelpSession, LeaderboardEntry, Problem, User};
use std::sync::Arc;

/// Every collection the server works with. Handlers only see the
/// repository trait objects.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn Repository<User>>,
    pub help_requests: Arc<dyn Repository<HelpRequest>>,
    pub sessions: Arc<dyn Repository<HelpSession>>,
    pub problems: Arc<dyn Repository<Problem>>,
    pub leaderboard: Arc<dyn Repository<LeaderboardEntry>>,
}

impl Store {
    pub fn in_memory(seed: Seed) -> Self {
        Self {
            users: Arc::new(MemoryRepository::new(seed.users.into_values().collect())),
            help_requests: Arc::new(MemoryRepository::new(seed.help_requests)),
            sessions: Arc::new(MemoryRepository::<HelpSession>::empty()),
            problems: Arc::new(MemoryRepository::new(seed.problems)),
            leaderboard: Arc::new(MemoryRepository::new(seed.leaderboard)),
        }
    }

    pub fn sample() -> Self {
        Self::in_memory(seed::sample())
    }

    pub fn empty() -> Self {
        Self::in_memory(Seed::default())
    }
}
