//! Handlers for campaign-scoped quests.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use questlog_core::error::CoreError;
use questlog_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use questlog_core::types::DbId;
use questlog_db::models::quest::{CreateQuest, UpdateQuest};
use questlog_db::repositories::{CharacterRepo, QuestRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::PageParams;
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn check_giver_ref(
    state: &AppState,
    campaign_id: DbId,
    giver_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(giver_id) = giver_id {
        if !CharacterRepo::belongs_to_campaign(&state.pool, campaign_id, giver_id).await? {
            return Err(AppError::BadRequest(
                "giver_id does not reference a character in this campaign".into(),
            ));
        }
    }
    Ok(())
}

/// GET /api/v1/campaigns/{campaign_id}/quests
pub async fn list(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(page): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let limit = clamp_limit(page.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(page.offset);
    let quests = QuestRepo::list_by_campaign(&state.pool, campaign_id, limit, offset).await?;

    Ok(Json(DataResponse { data: quests }))
}

/// POST /api/v1/campaigns/{campaign_id}/quests
pub async fn create(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateQuest>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let violations = input.check();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }
    check_giver_ref(&state, campaign_id, input.giver_id).await?;

    let quest = QuestRepo::create(&state.pool, campaign_id, &input).await?;

    tracing::info!(quest_id = %quest.id, campaign_id = %campaign_id, "Quest created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: quest })))
}

/// GET /api/v1/campaigns/{campaign_id}/quests/{id}
pub async fn get_by_id(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let quest = QuestRepo::find_by_id(&state.pool, campaign_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quest", id }))?;

    Ok(Json(DataResponse { data: quest }))
}

/// PUT /api/v1/campaigns/{campaign_id}/quests/{id}
pub async fn update(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateQuest>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let violations = input.check();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }
    check_giver_ref(&state, campaign_id, input.giver_id).await?;

    let quest = QuestRepo::update(&state.pool, campaign_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quest", id }))?;

    Ok(Json(DataResponse { data: quest }))
}

/// DELETE /api/v1/campaigns/{campaign_id}/quests/{id}
pub async fn delete(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let deleted = QuestRepo::delete(&state.pool, campaign_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Quest", id }));
    }

    Ok(StatusCode::NO_CONTENT)
}
