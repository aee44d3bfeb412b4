use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::store::Entity;

/// Product document as stored in the `products` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64, // >= 0
    pub stock: i64, // >= 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Entity for Product {
    const COLLECTION: &'static str = "products";

    fn with_id(self, id: String) -> Self {
        Self { id, ..self }
    }
}
