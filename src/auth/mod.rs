use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod google;
pub mod handlers;
pub mod identity;
pub mod jwt;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
