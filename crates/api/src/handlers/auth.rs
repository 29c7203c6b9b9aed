//! Handlers for the `/auth` resource.
//!
//! Token issuance, refresh, and logout all live with the external
//! identity provider; the only local surface is the current-user lookup.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use questlog_core::error::CoreError;
use questlog_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/auth/me
///
/// The caller's provisioned profile. The extractor has already verified
/// the token and upserted the row, so this is a plain lookup.
pub async fn me(user: CurrentUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let profile = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;

    Ok(Json(DataResponse { data: profile }))
}
