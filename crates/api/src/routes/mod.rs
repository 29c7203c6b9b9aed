pub mod auth;
pub mod campaign;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/me                                          current user (auth required)
///
/// /campaigns                                        list, create
/// /campaigns/import/validate                        import envelope check
/// /campaigns/{campaign_id}                          get, update, delete
/// /campaigns/{campaign_id}/search                   substring search
/// /campaigns/{campaign_id}/search/tags              tag search
/// /campaigns/{campaign_id}/export                   export (json | csv)
///
/// /campaigns/{campaign_id}/characters               list, create
/// /campaigns/{campaign_id}/characters/{id}          get, update, delete
/// /campaigns/{campaign_id}/characters/{id}/relationships   edges
/// /campaigns/{campaign_id}/locations[/{id}]         CRUD
/// /campaigns/{campaign_id}/items[/{id}]             CRUD
/// /campaigns/{campaign_id}/notes[/{id}]             CRUD
/// /campaigns/{campaign_id}/relationships[/{id}]     CRUD
/// /campaigns/{campaign_id}/timeline-events[/{id}]   CRUD
/// /campaigns/{campaign_id}/quests[/{id}]            CRUD
/// /campaigns/{campaign_id}/maps[/{id}]              list, create, get, delete
/// /campaigns/{campaign_id}/dice-rolls               list
/// /campaigns/{campaign_id}/dice-rolls/roll          roll + log
/// /campaigns/{campaign_id}/dice-rolls/{id}          get, delete
/// ```
///
/// Every route requires a bearer token; the extractor rejects missing or
/// invalid tokens with 401 before any handler runs.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/campaigns", campaign::router())
}
