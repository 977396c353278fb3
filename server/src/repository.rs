//! Persistence collaborator consumed by the dispatcher.
//!
//! The dispatcher only relies on the call contract of [`Repository`]. The
//! in-memory implementation backs the demo binary and the tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

pub type EntityId = i64;

/// A persisted record with a server-assigned identifier.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> EntityId;
    fn set_id(&mut self, id: EntityId);
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("entity {0} does not exist")]
    Missing(EntityId),

    #[error("storage failure: {0}")]
    Storage(String),
}

/// Lookup, bulk query and write-with-save operations over one entity type.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn get_by_id(&self, id: EntityId) -> Result<Option<E>, RepositoryError>;

    /// Re-read the backing store, then return every entity.
    async fn get_all_with_refresh(&self) -> Result<Vec<E>, RepositoryError>;

    /// Persist a new entity and return it with its assigned id.
    async fn insert_with_save(&self, entity: E) -> Result<E, RepositoryError>;

    async fn update_with_save(&self, entity: E) -> Result<(), RepositoryError>;

    async fn delete_with_save(&self, entity: E) -> Result<(), RepositoryError>;
}

/// Thread-safe map keyed by id. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct InMemoryRepository<E> {
    entities: RwLock<BTreeMap<EntityId, E>>,
    next_id: AtomicI64,
}

impl<E> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn get_by_id(&self, id: EntityId) -> Result<Option<E>, RepositoryError> {
        Ok(self.entities.read().await.get(&id).cloned())
    }

    async fn get_all_with_refresh(&self) -> Result<Vec<E>, RepositoryError> {
        // Nothing to reload: the map is the store.
        Ok(self.entities.read().await.values().cloned().collect())
    }

    async fn insert_with_save(&self, mut entity: E) -> Result<E, RepositoryError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        entity.set_id(id);
        self.entities.write().await.insert(id, entity.clone());
        Ok(entity)
    }

    async fn update_with_save(&self, entity: E) -> Result<(), RepositoryError> {
        let mut entities = self.entities.write().await;
        let slot = entities
            .get_mut(&entity.id())
            .ok_or(RepositoryError::Missing(entity.id()))?;
        *slot = entity;
        Ok(())
    }

    async fn delete_with_save(&self, entity: E) -> Result<(), RepositoryError> {
        self.entities
            .write()
            .await
            .remove(&entity.id())
            .map(|_| ())
            .ok_or(RepositoryError::Missing(entity.id()))
    }
}
