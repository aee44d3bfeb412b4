use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use super::{Entity, Repository, StoreError, StoreResult};

/// Insertion-ordered repository kept in process memory.
///
/// Used with `STORE_BACKEND=memory` for local runs and by the handler tests.
#[derive(Clone)]
pub struct InMemoryRepository<T> {
    items: Arc<RwLock<Vec<T>>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn list(&self) -> StoreResult<Vec<T>> {
        let items = self
            .items
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(items.clone())
    }

    async fn create(&self, entity: T) -> StoreResult<T> {
        let stored = entity.with_id(Uuid::new_v4().simple().to_string());
        let mut items = self
            .items
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        items.push(stored.clone());
        Ok(stored)
    }
}
