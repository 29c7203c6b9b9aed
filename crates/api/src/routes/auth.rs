//! Routes mounted at `/auth`.

use axum::routing::get;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// GET /me    current user profile (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(auth::me))
}
