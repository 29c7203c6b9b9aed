//! Handlers for campaign-scoped items.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use questlog_core::error::CoreError;
use questlog_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use questlog_core::types::DbId;
use questlog_db::models::item::{CreateItem, UpdateItem};
use questlog_db::repositories::{CharacterRepo, ItemRepo, LocationRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::PageParams;
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Owner and location refs must stay inside the campaign.
async fn check_refs(
    state: &AppState,
    campaign_id: DbId,
    owner_id: Option<DbId>,
    location_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(owner_id) = owner_id {
        if !CharacterRepo::belongs_to_campaign(&state.pool, campaign_id, owner_id).await? {
            return Err(AppError::BadRequest(
                "owner_id does not reference a character in this campaign".into(),
            ));
        }
    }
    if let Some(location_id) = location_id {
        if !LocationRepo::belongs_to_campaign(&state.pool, campaign_id, location_id).await? {
            return Err(AppError::BadRequest(
                "location_id does not reference a location in this campaign".into(),
            ));
        }
    }
    Ok(())
}

/// GET /api/v1/campaigns/{campaign_id}/items
pub async fn list(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(page): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let limit = clamp_limit(page.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(page.offset);
    let items = ItemRepo::list_by_campaign(&state.pool, campaign_id, limit, offset).await?;

    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/campaigns/{campaign_id}/items
pub async fn create(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateItem>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let violations = input.check();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }
    check_refs(&state, campaign_id, input.owner_id, input.location_id).await?;

    let item = ItemRepo::create(&state.pool, campaign_id, &input).await?;

    tracing::info!(item_id = %item.id, campaign_id = %campaign_id, "Item created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// GET /api/v1/campaigns/{campaign_id}/items/{id}
pub async fn get_by_id(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let item = ItemRepo::find_by_id(&state.pool, campaign_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;

    Ok(Json(DataResponse { data: item }))
}

/// PUT /api/v1/campaigns/{campaign_id}/items/{id}
pub async fn update(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateItem>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let violations = input.check();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }
    check_refs(&state, campaign_id, input.owner_id, input.location_id).await?;

    let item = ItemRepo::update(&state.pool, campaign_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;

    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/campaigns/{campaign_id}/items/{id}
pub async fn delete(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let deleted = ItemRepo::delete(&state.pool, campaign_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Item", id }));
    }

    Ok(StatusCode::NO_CONTENT)
}
