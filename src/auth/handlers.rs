use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{google::AuthProviderError, identity::Identity, jwt::TokenIssuer},
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/google", get(google_login))
        .route("/auth/google/callback", get(google_callback))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[instrument(skip(state))]
pub async fn google_login(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.identity.authorize_url())
}

#[instrument(skip(state, tokens, params))]
pub async fn google_callback(
    State(state): State<AppState>,
    State(tokens): State<TokenIssuer>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<TokenResponse>, ApiError> {
    if let Some(reason) = params.error {
        warn!(%reason, "google consent denied");
        return Err(AuthProviderError::Denied(reason).into());
    }
    let code = params.code.ok_or(AuthProviderError::MissingCode)?;

    let profile = state.identity.exchange_code(&code).await.map_err(|e| {
        error!(error = %e, "google code exchange failed");
        e
    })?;
    let identity = Identity::from_profile(profile).map_err(|e| {
        warn!(error = %e, "google profile rejected");
        e
    })?;

    let google_id = identity.google_id.clone();
    let token = tokens.issue(identity).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        e
    })?;

    info!(%google_id, "google login completed");
    Ok(Json(TokenResponse { token }))
}
