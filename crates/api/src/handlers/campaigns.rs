//! Handlers for the `/campaigns` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use questlog_core::error::CoreError;
use questlog_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use questlog_core::types::DbId;
use questlog_db::models::campaign::{CreateCampaign, UpdateCampaign};
use questlog_db::repositories::CampaignRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::PageParams;
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/campaigns
///
/// List the caller's campaigns, newest first.
pub async fn list(
    user: CurrentUser,
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(page.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(page.offset);

    let campaigns =
        CampaignRepo::list_for_user(&state.pool, user.user_id, limit, offset).await?;

    Ok(Json(DataResponse { data: campaigns }))
}

/// POST /api/v1/campaigns
pub async fn create(
    user: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCampaign>,
) -> AppResult<impl IntoResponse> {
    let violations = input.check();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let campaign = CampaignRepo::create(&state.pool, user.user_id, &input).await?;

    tracing::info!(campaign_id = %campaign.id, user_id = %user.user_id, "Campaign created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: campaign })))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_by_id(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let campaign = super::resolve_campaign(&state, id, &user).await?;
    Ok(Json(DataResponse { data: campaign }))
}

/// PUT /api/v1/campaigns/{id}
pub async fn update(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaign>,
) -> AppResult<impl IntoResponse> {
    let violations = input.check();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let campaign = CampaignRepo::update(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))?;

    Ok(Json(DataResponse { data: campaign }))
}

/// DELETE /api/v1/campaigns/{id}
///
/// Deletes the campaign and, through foreign-key cascades, every child
/// entity. Returns 204 No Content.
pub async fn delete(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = CampaignRepo::delete(&state.pool, id, user.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }));
    }

    tracing::info!(campaign_id = %id, user_id = %user.user_id, "Campaign deleted");

    Ok(StatusCode::NO_CONTENT)
}
