//! Handlers for campaign-scoped search.
//!
//! Free-text search substring-matches name/title and description/content
//! per entity type; tag search returns the entities carrying an exact
//! tag. Both cap results per type and use database-default ordering.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use questlog_core::search::contains_pattern;
use questlog_core::types::DbId;
use questlog_db::models::search::{SearchParams, SearchResults, TagSearchParams};
use questlog_db::repositories::SearchRepo;

use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/campaigns/{campaign_id}/search?q=
///
/// Queries shorter than the minimum length return empty results rather
/// than an error, so a search box can fire on every keystroke.
pub async fn text(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let results = match contains_pattern(&params.q) {
        Some(pattern) => SearchRepo::search_text(&state.pool, campaign_id, &pattern).await?,
        None => SearchResults::default(),
    };

    tracing::debug!(
        campaign_id = %campaign_id,
        query = %params.q,
        hits = results.total(),
        "Search executed",
    );

    Ok(Json(DataResponse { data: results }))
}

/// GET /api/v1/campaigns/{campaign_id}/search/tags?tag=
pub async fn tags(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(params): Query<TagSearchParams>,
) -> AppResult<impl IntoResponse> {
    super::resolve_campaign(&state, campaign_id, &user).await?;

    let tag = params.tag.trim();
    let results = if tag.is_empty() {
        SearchResults::default()
    } else {
        SearchRepo::search_tag(&state.pool, campaign_id, tag).await?
    };

    Ok(Json(DataResponse { data: results }))
}
