use async_trait::async_trait;
use help_types::HelpError;
use tokio::sync::RwLock;

use super::{Entity, Mutation, Repository};

/// Vec-backed repository. Keeps insertion order so listings match the order
/// records were seeded or created in.
pub struct MemoryRepository<T: Entity> {
    records: RwLock<Vec<T>>,
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn get(&self, key: &str) -> Result<T, HelpError> {
        let records = self.records.read().await;
        records
            .iter()
            .find(|record| record.key() == key)
            .cloned()
            .ok_or_else(|| HelpError::not_found(T::KIND))
    }

    async fn list(&self) -> Result<Vec<T>, HelpError> {
        Ok(self.records.read().await.clone())
    }

    async fn upsert(&self, record: T) -> Result<T, HelpError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|existing| existing.key() == record.key()) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(record)
    }

    async fn update(&self, key: &str, mutation: Mutation<'_, T>) -> Result<T, HelpError> {
        let mut records = self.records.write().await;
        let stored = records
            .iter_mut()
            .find(|record| record.key() == key)
            .ok_or_else(|| HelpError::not_found(T::KIND))?;

        let mut draft = stored.clone();
        mutation(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }
}
