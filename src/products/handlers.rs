use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use super::{dto::CreateProductRequest, repo_types::Product};
use crate::{
    error::ApiError,
    state::AppState,
    validation::{validate_product, FieldError},
};

pub fn product_routes() -> Router<AppState> {
    Router::new().route("/products", get(list_products).post(create_product))
}

#[instrument(skip(state))]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.products.list().await.map_err(|e| {
        error!(error = %e, "list products failed");
        e
    })?;
    Ok(Json(products))
}

#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(body) = payload?;

    if let Err(errors) = validate_product(&body) {
        warn!(count = errors.len(), "product payload rejected");
        return Err(errors.into());
    }
    let request: CreateProductRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::Validation(vec![FieldError::new("body", e.to_string())]))?;

    let product = request.into_product(OffsetDateTime::now_utc());
    let product = state.products.create(product).await.map_err(|e| {
        error!(error = %e, "create product failed");
        e
    })?;

    info!(product_id = %product.id, name = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}
