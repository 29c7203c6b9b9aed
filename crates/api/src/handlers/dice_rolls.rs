//! Handlers for the campaign dice-roll log.
//!
//! Rolls are resolved server-side: the client submits an expression, the
//! server parses it, rolls with a thread-local RNG, and appends the
//! outcome to the log. Logged rolls are immutable.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use questlog_core::dice::DiceExpression;
use questlog_core::error::CoreError;
use questlog_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use questlog_core::types::DbId;
use questlog_db::models::dice_roll::{CreateDiceRoll, RollRequest};
use questlog_db::repositories::{CharacterRepo, DiceRollRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::PageParams;
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/campaigns/{campaign_id}/dice-rolls
pub async fn list(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(page): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let limit = clamp_limit(page.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(page.offset);
    let rolls = DiceRollRepo::list_by_campaign(&state.pool, campaign_id, limit, offset).await?;

    Ok(Json(DataResponse { data: rolls }))
}

/// POST /api/v1/campaigns/{campaign_id}/dice-rolls/roll
///
/// Parse the expression, roll it, and persist the outcome.
pub async fn roll(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<RollRequest>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let mut violations = input.check();
    let expression = match DiceExpression::parse(&input.expression) {
        Ok(expression) if violations.is_empty() => expression,
        Ok(_) => return Err(AppError::Validation(violations)),
        Err(e) => {
            violations.push("expression", e.to_string());
            return Err(AppError::Validation(violations));
        }
    };

    if let Some(character_id) = input.character_id {
        if !CharacterRepo::belongs_to_campaign(&state.pool, campaign_id, character_id).await? {
            return Err(AppError::BadRequest(
                "character_id does not reference a character in this campaign".into(),
            ));
        }
    }

    let outcome = expression.roll(&mut rand::rng());

    let roll = DiceRollRepo::create(
        &state.pool,
        campaign_id,
        &CreateDiceRoll {
            character_id: input.character_id,
            expression: expression.canonical(),
            rolls: outcome.rolls,
            modifier: outcome.modifier,
            total: outcome.total,
            purpose: input.purpose.unwrap_or_default(),
        },
    )
    .await?;

    tracing::debug!(
        roll_id = %roll.id,
        campaign_id = %campaign_id,
        expression = %roll.expression,
        total = roll.total,
        "Dice rolled",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: roll })))
}

/// GET /api/v1/campaigns/{campaign_id}/dice-rolls/{id}
pub async fn get_by_id(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let roll = DiceRollRepo::find_by_id(&state.pool, campaign_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DiceRoll",
            id,
        }))?;

    Ok(Json(DataResponse { data: roll }))
}

/// DELETE /api/v1/campaigns/{campaign_id}/dice-rolls/{id}
pub async fn delete(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((campaign_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let deleted = DiceRollRepo::delete(&state.pool, campaign_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "DiceRoll",
            id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}
