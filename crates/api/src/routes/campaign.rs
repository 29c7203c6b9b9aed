//! Route definitions for campaigns and their child resources.
//!
//! Every child resource lives under `/{campaign_id}/...`; the handlers
//! resolve the campaign against the caller before touching children.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{
    campaigns, characters, dice_rolls, export, items, locations, maps, notes, quests,
    relationships, search, timeline_events,
};
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// GET    /                                          list
/// POST   /                                          create
/// POST   /import/validate                           import envelope check
/// GET    /{campaign_id}                             get
/// PUT    /{campaign_id}                             update
/// DELETE /{campaign_id}                             delete (cascades)
/// GET    /{campaign_id}/search                      substring search
/// GET    /{campaign_id}/search/tags                 tag search
/// GET    /{campaign_id}/export                      export (json | csv)
/// POST   /{campaign_id}/dice-rolls/roll             roll dice
/// GET    /{campaign_id}/characters/{id}/relationships  edges for character
/// <crud> /{campaign_id}/<children>[/{id}]           child entity CRUD
/// ```
pub fn router() -> Router<AppState> {
    let character_routes = Router::new()
        .route("/", get(characters::list).post(characters::create))
        .route(
            "/{id}",
            get(characters::get_by_id)
                .put(characters::update)
                .delete(characters::delete),
        )
        .route("/{id}/relationships", get(characters::relationships));

    let location_routes = Router::new()
        .route("/", get(locations::list).post(locations::create))
        .route(
            "/{id}",
            get(locations::get_by_id)
                .put(locations::update)
                .delete(locations::delete),
        );

    let item_routes = Router::new()
        .route("/", get(items::list).post(items::create))
        .route(
            "/{id}",
            get(items::get_by_id).put(items::update).delete(items::delete),
        );

    let note_routes = Router::new()
        .route("/", get(notes::list).post(notes::create))
        .route(
            "/{id}",
            get(notes::get_by_id).put(notes::update).delete(notes::delete),
        );

    let relationship_routes = Router::new()
        .route("/", get(relationships::list).post(relationships::create))
        .route(
            "/{id}",
            get(relationships::get_by_id)
                .put(relationships::update)
                .delete(relationships::delete),
        );

    let timeline_event_routes = Router::new()
        .route("/", get(timeline_events::list).post(timeline_events::create))
        .route(
            "/{id}",
            get(timeline_events::get_by_id)
                .put(timeline_events::update)
                .delete(timeline_events::delete),
        );

    let quest_routes = Router::new()
        .route("/", get(quests::list).post(quests::create))
        .route(
            "/{id}",
            get(quests::get_by_id).put(quests::update).delete(quests::delete),
        );

    let map_routes = Router::new()
        .route("/", get(maps::list).post(maps::create))
        .route(
            "/{id}",
            get(maps::get_by_id).put(maps::update).delete(maps::delete),
        );

    let dice_roll_routes = Router::new()
        .route("/", get(dice_rolls::list))
        .route("/roll", post(dice_rolls::roll))
        .route(
            "/{id}",
            get(dice_rolls::get_by_id).delete(dice_rolls::delete),
        );

    Router::new()
        .route("/", get(campaigns::list).post(campaigns::create))
        .route("/import/validate", post(export::validate_import))
        .route(
            "/{campaign_id}",
            get(campaigns::get_by_id)
                .put(campaigns::update)
                .delete(campaigns::delete),
        )
        .route("/{campaign_id}/search", get(search::text))
        .route("/{campaign_id}/search/tags", get(search::tags))
        .route("/{campaign_id}/export", get(export::export))
        .nest("/{campaign_id}/characters", character_routes)
        .nest("/{campaign_id}/locations", location_routes)
        .nest("/{campaign_id}/items", item_routes)
        .nest("/{campaign_id}/notes", note_routes)
        .nest("/{campaign_id}/relationships", relationship_routes)
        .nest("/{campaign_id}/timeline-events", timeline_event_routes)
        .nest("/{campaign_id}/quests", quest_routes)
        .nest("/{campaign_id}/maps", map_routes)
        .nest("/{campaign_id}/dice-rolls", dice_roll_routes)
}
