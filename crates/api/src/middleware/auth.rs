//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use questlog_core::error::CoreError;
use questlog_core::roles;
use questlog_core::types::DbId;
use questlog_db::models::user::ProvisionUser;
use questlog_db::repositories::UserRepo;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a bearer token in the
/// `Authorization` header.
///
/// Verification is delegated to the configured identity provider; on
/// success the local user record is provisioned/refreshed from the
/// claims. Use this as an extractor parameter in any handler that
/// requires authentication:
///
/// ```ignore
/// async fn my_handler(user: CurrentUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The user's internal database id.
    pub user_id: DbId,
    /// The identity provider's subject id.
    pub subject: String,
    /// Role name carried in the claims (defaults to `user`).
    pub role: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = state.identity.verify_token(token).await.map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        // Provision-on-login: the first verified request creates the local
        // record, later ones keep the profile in sync with the claims.
        let role = claims
            .role
            .clone()
            .filter(|r| roles::is_valid_role(r))
            .unwrap_or_else(|| roles::DEFAULT_ROLE.to_string());

        let user = UserRepo::provision(
            &state.pool,
            &ProvisionUser {
                subject: claims.sub.clone(),
                email: claims.email.clone().unwrap_or_default(),
                display_name: claims.name.clone().unwrap_or_default(),
                role,
            },
        )
        .await?;

        Ok(CurrentUser {
            user_id: user.id,
            subject: user.subject,
            role: user.role,
        })
    }
}
