use std::marker::PhantomData;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Bson, Document},
    Collection, Database,
};
use tracing::debug;

use super::{Entity, Repository, StoreError, StoreResult};

/// Collection-per-entity repository. Ids are MongoDB object ids exposed as hex strings.
#[derive(Clone, Debug)]
pub struct MongoRepository<T> {
    database: Database,
    _marker: PhantomData<T>,
}

impl<T: Entity> MongoRepository<T> {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: PhantomData,
        }
    }

    fn collection(&self) -> Collection<Document> {
        self.database.collection(T::COLLECTION)
    }
}

fn entity_to_document<T: Entity>(entity: &T) -> StoreResult<Document> {
    let mut doc = bson::to_document(entity)?;
    // _id is assigned by the server
    doc.remove("id");
    doc.remove("_id");
    Ok(doc)
}

fn document_to_entity<T: Entity>(mut doc: Document) -> StoreResult<T> {
    if let Some(id) = doc.remove("_id") {
        let id = match id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s,
            other => other.to_string(),
        };
        doc.insert("id", id);
    }
    Ok(bson::from_document(doc)?)
}

#[async_trait]
impl<T: Entity> Repository<T> for MongoRepository<T> {
    async fn list(&self) -> StoreResult<Vec<T>> {
        let docs: Vec<Document> = self.collection().find(doc! {}).await?.try_collect().await?;
        debug!(collection = T::COLLECTION, count = docs.len(), "listed documents");
        docs.into_iter().map(document_to_entity::<T>).collect()
    }

    async fn create(&self, entity: T) -> StoreResult<T> {
        let doc = entity_to_document(&entity)?;
        let inserted = self.collection().insert_one(doc).await?;
        let id = inserted
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .ok_or(StoreError::MissingId)?;
        debug!(collection = T::COLLECTION, %id, "inserted document");
        Ok(entity.with_id(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::repo_types::Product;
    use mongodb::bson::oid::ObjectId;
    use time::OffsetDateTime;

    fn product() -> Product {
        let now = OffsetDateTime::now_utc();
        Product {
            id: "ignored".into(),
            name: "Mug".into(),
            description: "Ceramic mug".into(),
            price: 9.99,
            stock: 50,
            category: None,
            image_url: Some("https://img.example/mug.png".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn encoding_drops_the_id_field() {
        let doc = entity_to_document(&product()).expect("encode");
        assert!(!doc.contains_key("id"));
        assert!(!doc.contains_key("_id"));
        assert_eq!(doc.get_str("name").unwrap(), "Mug");
        assert_eq!(doc.get_i64("stock").unwrap(), 50);
        assert!(!doc.contains_key("category"));
        assert!(doc.contains_key("imageUrl"));
    }

    #[test]
    fn decoding_maps_object_id_to_hex_id() {
        let original = product();
        let oid = ObjectId::new();
        let mut doc = entity_to_document(&original).expect("encode");
        doc.insert("_id", oid);

        let decoded: Product = document_to_entity(doc).expect("decode");
        assert_eq!(decoded.id, oid.to_hex());
        assert_eq!(decoded.name, original.name);
        assert_eq!(decoded.price, original.price);
        assert_eq!(decoded.created_at, original.created_at);
    }
}
