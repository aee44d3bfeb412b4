use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;
use time::OffsetDateTime;

use super::repo_types::Product;
use crate::validation::{parse_price, parse_stock};

// Same conversions the validator accepts, so a validated body always deserializes.
fn price_from_json<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let v = Value::deserialize(d)?;
    parse_price(&v).ok_or_else(|| D::Error::custom(format!("invalid price: {v}")))
}

fn stock_from_json<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let v = Value::deserialize(d)?;
    parse_stock(&v).ok_or_else(|| D::Error::custom(format!("invalid stock: {v}")))
}

/// Request body for `POST /products`. Shape checks happen in `validation::validate_product`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "price_from_json")]
    pub price: f64,
    #[serde(deserialize_with = "stock_from_json")]
    pub stock: i64,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl CreateProductRequest {
    pub fn into_product(self, now: OffsetDateTime) -> Product {
        Product {
            id: String::new(),
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            category: self.category,
            image_url: self.image_url,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_product;
    use serde_json::json;

    #[test]
    fn validated_loose_numbers_deserialize() {
        let cases = [
            (json!(1), json!(5.0), 1.0, 5),
            (json!(2.5), json!(1e2), 2.5, 100),
            (json!("9.99"), json!("5"), 9.99, 5),
        ];
        for (price, stock, want_price, want_stock) in cases {
            let body = json!({ "name": "Mug", "description": "x", "price": price, "stock": stock });
            assert!(validate_product(&body).is_ok());
            let req: CreateProductRequest = serde_json::from_value(body).expect("deserialize");
            assert_eq!(req.price, want_price);
            assert_eq!(req.stock, want_stock);
        }
    }

    #[test]
    fn fractional_stock_fails_to_deserialize() {
        let body = json!({ "name": "Mug", "description": "x", "price": 1, "stock": 1.5 });
        assert!(serde_json::from_value::<CreateProductRequest>(body).is_err());
    }
}
