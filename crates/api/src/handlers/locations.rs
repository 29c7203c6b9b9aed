//! Handlers for campaign-scoped locations.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use questlog_core::error::CoreError;
use questlog_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use questlog_core::types::DbId;
use questlog_db::models::location::{CreateLocation, UpdateLocation};
use questlog_db::repositories::LocationRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::PageParams;
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A parent reference must point at a location of the same campaign.
async fn check_parent_ref(
    state: &AppState,
    campaign_id: DbId,
    parent_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(parent_id) = parent_id {
        if !LocationRepo::belongs_to_campaign(&state.pool, campaign_id, parent_id).await? {
            return Err(AppError::BadRequest(
                "parent_id does not reference a location in this campaign".into(),
            ));
        }
    }
    Ok(())
}

/// GET /api/v1/campaigns/{campaign_id}/locations
pub async fn list(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(page): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let limit = clamp_limit(page.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(page.offset);
    let locations =
        LocationRepo::list_by_campaign(&state.pool, campaign_id, limit, offset).await?;

    Ok(Json(DataResponse { data: locations }))
}

/// POST /api/v1/campaigns/{campaign_id}/locations
pub async fn create(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateLocation>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let violations = input.check();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }
    check_parent_ref(&state, campaign_id, input.parent_id).await?;

    let location = LocationRepo::create(&state.pool, campaign_id, &input).await?;

    tracing::info!(location_id = %location.id, campaign_id = %campaign_id, "Location created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: location })))
}

/// GET /api/v1/campaigns/{campaign_id}/locations/{id}
pub async fn get_by_id(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let location = LocationRepo::find_by_id(&state.pool, campaign_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id,
        }))?;

    Ok(Json(DataResponse { data: location }))
}

/// PUT /api/v1/campaigns/{campaign_id}/locations/{id}
pub async fn update(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateLocation>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let violations = input.check();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }
    if input.parent_id == Some(id) {
        return Err(AppError::BadRequest(
            "a location cannot be its own parent".into(),
        ));
    }
    check_parent_ref(&state, campaign_id, input.parent_id).await?;

    let location = LocationRepo::update(&state.pool, campaign_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id,
        }))?;

    Ok(Json(DataResponse { data: location }))
}

/// DELETE /api/v1/campaigns/{campaign_id}/locations/{id}
///
/// Child locations and entity references survive with a nulled ref.
pub async fn delete(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let deleted = LocationRepo::delete(&state.pool, campaign_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}
