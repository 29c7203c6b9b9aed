//! Handlers for campaign-scoped timeline events.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use questlog_core::error::CoreError;
use questlog_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use questlog_core::types::DbId;
use questlog_db::models::timeline_event::{CreateTimelineEvent, UpdateTimelineEvent};
use questlog_db::repositories::TimelineEventRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::PageParams;
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/campaigns/{campaign_id}/timeline-events
pub async fn list(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(page): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let limit = clamp_limit(page.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(page.offset);
    let events =
        TimelineEventRepo::list_by_campaign(&state.pool, campaign_id, limit, offset).await?;

    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/campaigns/{campaign_id}/timeline-events
///
/// Related character/location id lists are stored as-is; dangling ids in
/// those lists degrade to no-ops when the UI resolves them.
pub async fn create(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateTimelineEvent>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let violations = input.check();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let event = TimelineEventRepo::create(&state.pool, campaign_id, &input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/v1/campaigns/{campaign_id}/timeline-events/{id}
pub async fn get_by_id(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let event = TimelineEventRepo::find_by_id(&state.pool, campaign_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TimelineEvent",
            id,
        }))?;

    Ok(Json(DataResponse { data: event }))
}

/// PUT /api/v1/campaigns/{campaign_id}/timeline-events/{id}
pub async fn update(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateTimelineEvent>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let violations = input.check();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let event = TimelineEventRepo::update(&state.pool, campaign_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TimelineEvent",
            id,
        }))?;

    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/campaigns/{campaign_id}/timeline-events/{id}
pub async fn delete(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let deleted = TimelineEventRepo::delete(&state.pool, campaign_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "TimelineEvent",
            id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}
