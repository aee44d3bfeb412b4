use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use super::dto::{CreateUserRequest, PublicUser};
use crate::{
    error::ApiError,
    state::AppState,
    validation::{validate_user, FieldError},
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users).post(create_user))
}

/// Lists users as [`PublicUser`]: the stored document minus `passwordHash`.
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let users = state.users.list().await.map_err(|e| {
        error!(error = %e, "list users failed");
        e
    })?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

/// Responds with the stored user as [`PublicUser`]. Unlike the stored document,
/// the response leaves out `passwordHash`.
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let Json(body) = payload?;

    if let Err(errors) = validate_user(&body) {
        warn!(count = errors.len(), "user payload rejected");
        return Err(errors.into());
    }
    let request: CreateUserRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::Validation(vec![FieldError::new("body", e.to_string())]))?;

    let user = request.into_user(OffsetDateTime::now_utc());
    let user = state.users.create(user).await.map_err(|e| {
        error!(error = %e, "create user failed");
        e
    })?;

    info!(user_id = %user.id, username = %user.username, "user created");
    Ok((StatusCode::CREATED, Json(user.into())))
}
