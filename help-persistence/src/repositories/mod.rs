pub mod memory;

pub use memory::MemoryRepository;

use async_trait::async_trait;
use help_types::{HelpError, HelpRequest, HelpSession, LeaderboardEntry, Problem, User};

/// A stored record addressable by a string key.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in "not found" messages.
    const KIND: &'static str;

    fn key(&self) -> &str;
}

impl Entity for User {
    const KIND: &'static str = "User";

    fn key(&self) -> &str {
        &self.id
    }
}

impl Entity for HelpRequest {
    const KIND: &'static str = "Help request";

    fn key(&self) -> &str {
        &self.id
    }
}

impl Entity for HelpSession {
    const KIND: &'static str = "Session";

    fn key(&self) -> &str {
        &self.id
    }
}

impl Entity for Problem {
    const KIND: &'static str = "Problem";

    fn key(&self) -> &str {
        &self.id
    }
}

impl Entity for LeaderboardEntry {
    const KIND: &'static str = "Leaderboard entry";

    fn key(&self) -> &str {
        &self.user_id
    }
}

/// In-place edit applied by [`Repository::update`].
pub type Mutation<'a, T> = Box<dyn FnOnce(&mut T) -> Result<(), HelpError> + Send + 'a>;

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn get(&self, key: &str) -> Result<T, HelpError>;

    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<T>, HelpError>;

    /// Insert a record or replace the one with the same key.
    async fn upsert(&self, record: T) -> Result<T, HelpError>;

    /// Apply `mutation` to the record under a single write lock. The stored
    /// record only changes when the mutation returns `Ok`.
    async fn update(&self, key: &str, mutation: Mutation<'_, T>) -> Result<T, HelpError>;
}
