//! Document storage behind a small repository interface.
//!
//! Handlers only see [`Repository<T>`]; the concrete backend is picked once at
//! startup from `STORE_BACKEND`.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

mod memory;
mod mongo;

pub use memory::InMemoryRepository;
pub use mongo::MongoRepository;

/// A record kept in its own collection with a store-generated string id.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    const COLLECTION: &'static str;

    fn with_id(self, id: String) -> Self;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    #[error("failed to decode document: {0}")]
    Decode(#[from] mongodb::bson::de::Error),
    #[error("insert did not return an object id")]
    MissingId,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// All entities, in the order the store returns them.
    async fn list(&self) -> StoreResult<Vec<T>>;

    /// Persists `entity` and returns it with its generated id.
    async fn create(&self, entity: T) -> StoreResult<T>;
}
