//! Handlers for campaign-scoped characters.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use questlog_core::error::CoreError;
use questlog_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use questlog_core::types::DbId;
use questlog_db::models::character::{CreateCharacter, UpdateCharacter};
use questlog_db::repositories::{CharacterRepo, LocationRepo, RelationshipRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::PageParams;
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Reject a `location_id` that does not belong to the campaign.
async fn check_location_ref(
    state: &AppState,
    campaign_id: DbId,
    location_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(location_id) = location_id {
        if !LocationRepo::belongs_to_campaign(&state.pool, campaign_id, location_id).await? {
            return Err(AppError::BadRequest(
                "location_id does not reference a location in this campaign".into(),
            ));
        }
    }
    Ok(())
}

/// GET /api/v1/campaigns/{campaign_id}/characters
pub async fn list(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(page): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let limit = clamp_limit(page.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(page.offset);
    let characters =
        CharacterRepo::list_by_campaign(&state.pool, campaign_id, limit, offset).await?;

    Ok(Json(DataResponse { data: characters }))
}

/// POST /api/v1/campaigns/{campaign_id}/characters
pub async fn create(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateCharacter>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let violations = input.check();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }
    check_location_ref(&state, campaign_id, input.location_id).await?;

    let character = CharacterRepo::create(&state.pool, campaign_id, &input).await?;

    tracing::info!(character_id = %character.id, campaign_id = %campaign_id, "Character created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: character })))
}

/// GET /api/v1/campaigns/{campaign_id}/characters/{id}
pub async fn get_by_id(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let character = CharacterRepo::find_by_id(&state.pool, campaign_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;

    Ok(Json(DataResponse { data: character }))
}

/// GET /api/v1/campaigns/{campaign_id}/characters/{id}/relationships
///
/// Every relationship touching the character, in either direction.
pub async fn relationships(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    if !CharacterRepo::belongs_to_campaign(&state.pool, campaign_id, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }));
    }

    let edges = RelationshipRepo::list_for_character(&state.pool, campaign_id, id).await?;
    Ok(Json(DataResponse { data: edges }))
}

/// PUT /api/v1/campaigns/{campaign_id}/characters/{id}
pub async fn update(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateCharacter>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let violations = input.check();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }
    check_location_ref(&state, campaign_id, input.location_id).await?;

    let character = CharacterRepo::update(&state.pool, campaign_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;

    Ok(Json(DataResponse { data: character }))
}

/// DELETE /api/v1/campaigns/{campaign_id}/characters/{id}
///
/// Relationships involving the character cascade away with it.
pub async fn delete(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let deleted = CharacterRepo::delete(&state.pool, campaign_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}
