//! Handlers for campaign-scoped character relationships.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use questlog_core::error::CoreError;
use questlog_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use questlog_core::types::DbId;
use questlog_db::models::relationship::{CreateRelationship, UpdateRelationship};
use questlog_db::repositories::{CharacterRepo, RelationshipRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::PageParams;
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/campaigns/{campaign_id}/relationships
pub async fn list(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(page): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let limit = clamp_limit(page.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(page.offset);
    let relationships =
        RelationshipRepo::list_by_campaign(&state.pool, campaign_id, limit, offset).await?;

    Ok(Json(DataResponse { data: relationships }))
}

/// POST /api/v1/campaigns/{campaign_id}/relationships
///
/// Both endpoints must be characters of this campaign; the (from, to)
/// pair is unique and a self-edge is a validation error.
pub async fn create(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateRelationship>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let violations = input.check();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    for (field, character_id) in [("from_id", input.from_id), ("to_id", input.to_id)] {
        if !CharacterRepo::belongs_to_campaign(&state.pool, campaign_id, character_id).await? {
            return Err(AppError::BadRequest(format!(
                "{field} does not reference a character in this campaign"
            )));
        }
    }

    let relationship = RelationshipRepo::create(&state.pool, campaign_id, &input).await?;

    tracing::info!(
        relationship_id = %relationship.id,
        campaign_id = %campaign_id,
        "Relationship created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: relationship })))
}

/// GET /api/v1/campaigns/{campaign_id}/relationships/{id}
pub async fn get_by_id(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let relationship = RelationshipRepo::find_by_id(&state.pool, campaign_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Relationship",
            id,
        }))?;

    Ok(Json(DataResponse { data: relationship }))
}

/// PUT /api/v1/campaigns/{campaign_id}/relationships/{id}
pub async fn update(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateRelationship>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let violations = input.check();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let relationship = RelationshipRepo::update(&state.pool, campaign_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Relationship",
            id,
        }))?;

    Ok(Json(DataResponse { data: relationship }))
}

/// DELETE /api/v1/campaigns/{campaign_id}/relationships/{id}
pub async fn delete(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let deleted = RelationshipRepo::delete(&state.pool, campaign_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Relationship",
            id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}
