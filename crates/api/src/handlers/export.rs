//! Campaign export and import-validation handlers.
//!
//! JSON exports produce a portable envelope (`meta`, `campaign`, one
//! array per included entity type). CSV exports produce one document per
//! entity type, returned as a filename → text object. Import validation
//! checks envelope shape only.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use questlog_core::export::{
    csv_document, validate_import_envelope, ExportMeta, COLLECTION_KEYS, EXPORT_SOURCE,
    EXPORT_VERSION,
};
use questlog_core::types::DbId;
use questlog_db::models::campaign::Campaign;
use questlog_db::repositories::{
    CharacterRepo, DiceRollRepo, ItemRepo, LocationRepo, MapRepo, NoteRepo, QuestRepo,
    RelationshipRepo, TimelineEventRepo,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Row ceiling per collection in one export.
const MAX_EXPORT_ROWS: i64 = 10_000;

/// Query parameters for `GET /campaigns/{id}/export`.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// `json` (default) or `csv`.
    pub format: Option<String>,
    /// Comma-separated collection names; defaults to all of them.
    pub include: Option<String>,
}

/// GET /api/v1/campaigns/{campaign_id}/export
pub async fn export(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(query): Query<ExportQuery>,
) -> AppResult<impl IntoResponse> {
    let campaign = super::resolve_campaign(&state, campaign_id, &user).await?;
    let include = parse_include(query.include.as_deref())?;

    let format = query.format.as_deref().unwrap_or("json");
    let body = match format {
        "json" => export_json(&state, &campaign, &include).await?,
        "csv" => export_csv(&state, &campaign, &include).await?,
        other => {
            return Err(AppError::BadRequest(format!(
                "unsupported export format: {other}"
            )))
        }
    };

    tracing::info!(
        campaign_id = %campaign_id,
        format = %format,
        collections = include.len(),
        "Campaign exported",
    );

    Ok(Json(DataResponse { data: body }))
}

/// POST /api/v1/campaigns/import/validate
///
/// Shape check only: required keys present, collections are arrays. The
/// content of the records is not validated.
pub async fn validate_import(
    _user: CurrentUser,
    Json(envelope): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let report = validate_import_envelope(&envelope);
    Ok(Json(DataResponse { data: report }))
}

// ---------------------------------------------------------------------------
// Include-list parsing
// ---------------------------------------------------------------------------

fn parse_include(raw: Option<&str>) -> AppResult<Vec<&'static str>> {
    let Some(raw) = raw else {
        return Ok(COLLECTION_KEYS.to_vec());
    };

    let mut include = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match COLLECTION_KEYS.iter().find(|&&k| k == name) {
            Some(&key) => {
                if !include.contains(&key) {
                    include.push(key);
                }
            }
            None => {
                return Err(AppError::BadRequest(format!(
                    "unknown collection in include list: {name}"
                )))
            }
        }
    }
    Ok(include)
}

// ---------------------------------------------------------------------------
// JSON export
// ---------------------------------------------------------------------------

async fn export_json(
    state: &AppState,
    campaign: &Campaign,
    include: &[&'static str],
) -> AppResult<serde_json::Value> {
    let meta = ExportMeta {
        version: EXPORT_VERSION.to_string(),
        exported_at: Utc::now(),
        source: EXPORT_SOURCE.to_string(),
    };

    let mut envelope = serde_json::Map::new();
    envelope.insert("meta".into(), to_value(&meta)?);
    envelope.insert("campaign".into(), to_value(campaign)?);

    let pool = &state.pool;
    let id = campaign.id;
    for &key in include {
        let value = match key {
            "characters" => to_value(
                &CharacterRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?,
            )?,
            "locations" => to_value(
                &LocationRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?,
            )?,
            "items" => to_value(&ItemRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?)?,
            "notes" => to_value(&NoteRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?)?,
            "relationships" => to_value(
                &RelationshipRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?,
            )?,
            "timeline_events" => to_value(
                &TimelineEventRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?,
            )?,
            "quests" => to_value(&QuestRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?)?,
            "maps" => to_value(&MapRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?)?,
            "dice_rolls" => to_value(
                &DiceRollRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?,
            )?,
            _ => unreachable!("include list is pre-validated"),
        };
        envelope.insert(key.into(), value);
    }

    Ok(serde_json::Value::Object(envelope))
}

fn to_value<T: serde::Serialize>(value: &T) -> AppResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::InternalError(format!("export serialization failed: {e}")))
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

fn join_tags(tags: &[String]) -> String {
    tags.join(";")
}

fn opt_id(id: &Option<DbId>) -> String {
    id.map(|v| v.to_string()).unwrap_or_default()
}

async fn export_csv(
    state: &AppState,
    campaign: &Campaign,
    include: &[&'static str],
) -> AppResult<serde_json::Value> {
    let mut files: BTreeMap<String, String> = BTreeMap::new();

    files.insert(
        "campaign.csv".into(),
        csv_document(
            &["id", "name", "description"],
            &[vec![
                campaign.id.to_string(),
                campaign.name.clone(),
                campaign.description.clone(),
            ]],
        ),
    );

    let pool = &state.pool;
    let id = campaign.id;
    for &key in include {
        let document = match key {
            "characters" => {
                let rows = CharacterRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?;
                csv_document(
                    &["id", "name", "kind", "race", "class", "location_id", "description", "tags"],
                    &rows
                        .iter()
                        .map(|c| {
                            vec![
                                c.id.to_string(),
                                c.name.clone(),
                                c.kind.clone(),
                                c.race.clone(),
                                c.class.clone(),
                                opt_id(&c.location_id),
                                c.description.clone(),
                                join_tags(&c.tags.0),
                            ]
                        })
                        .collect::<Vec<_>>(),
                )
            }
            "locations" => {
                let rows = LocationRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?;
                csv_document(
                    &["id", "name", "kind", "parent_id", "description", "tags"],
                    &rows
                        .iter()
                        .map(|l| {
                            vec![
                                l.id.to_string(),
                                l.name.clone(),
                                l.kind.clone(),
                                opt_id(&l.parent_id),
                                l.description.clone(),
                                join_tags(&l.tags.0),
                            ]
                        })
                        .collect::<Vec<_>>(),
                )
            }
            "items" => {
                let rows = ItemRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?;
                csv_document(
                    &["id", "name", "kind", "owner_id", "location_id", "description", "tags"],
                    &rows
                        .iter()
                        .map(|i| {
                            vec![
                                i.id.to_string(),
                                i.name.clone(),
                                i.kind.clone(),
                                opt_id(&i.owner_id),
                                opt_id(&i.location_id),
                                i.description.clone(),
                                join_tags(&i.tags.0),
                            ]
                        })
                        .collect::<Vec<_>>(),
                )
            }
            "notes" => {
                let rows = NoteRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?;
                csv_document(
                    &["id", "title", "content", "tags"],
                    &rows
                        .iter()
                        .map(|n| {
                            vec![
                                n.id.to_string(),
                                n.title.clone(),
                                n.content.clone(),
                                join_tags(&n.tags.0),
                            ]
                        })
                        .collect::<Vec<_>>(),
                )
            }
            "relationships" => {
                let rows =
                    RelationshipRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?;
                csv_document(
                    &["id", "from_id", "to_id", "kind", "description"],
                    &rows
                        .iter()
                        .map(|r| {
                            vec![
                                r.id.to_string(),
                                r.from_id.to_string(),
                                r.to_id.to_string(),
                                r.kind.clone(),
                                r.description.clone(),
                            ]
                        })
                        .collect::<Vec<_>>(),
                )
            }
            "timeline_events" => {
                let rows =
                    TimelineEventRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?;
                csv_document(
                    &["id", "title", "event_date", "session_number", "kind", "description", "tags"],
                    &rows
                        .iter()
                        .map(|e| {
                            vec![
                                e.id.to_string(),
                                e.title.clone(),
                                e.event_date.clone(),
                                e.session_number.map(|n| n.to_string()).unwrap_or_default(),
                                e.kind.clone(),
                                e.description.clone(),
                                join_tags(&e.tags.0),
                            ]
                        })
                        .collect::<Vec<_>>(),
                )
            }
            "quests" => {
                let rows = QuestRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?;
                csv_document(
                    &["id", "title", "status", "giver_id", "description", "tags"],
                    &rows
                        .iter()
                        .map(|q| {
                            vec![
                                q.id.to_string(),
                                q.title.clone(),
                                q.status.clone(),
                                opt_id(&q.giver_id),
                                q.description.clone(),
                                join_tags(&q.tags.0),
                            ]
                        })
                        .collect::<Vec<_>>(),
                )
            }
            "maps" => {
                let rows = MapRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?;
                csv_document(
                    &["id", "name", "image_url", "location_id", "description", "tags"],
                    &rows
                        .iter()
                        .map(|m| {
                            vec![
                                m.id.to_string(),
                                m.name.clone(),
                                m.image_url.clone(),
                                opt_id(&m.location_id),
                                m.description.clone(),
                                join_tags(&m.tags.0),
                            ]
                        })
                        .collect::<Vec<_>>(),
                )
            }
            "dice_rolls" => {
                let rows = DiceRollRepo::list_by_campaign(pool, id, MAX_EXPORT_ROWS, 0).await?;
                csv_document(
                    &["id", "character_id", "expression", "modifier", "total", "purpose"],
                    &rows
                        .iter()
                        .map(|d| {
                            vec![
                                d.id.to_string(),
                                opt_id(&d.character_id),
                                d.expression.clone(),
                                d.modifier.to_string(),
                                d.total.to_string(),
                                d.purpose.clone(),
                            ]
                        })
                        .collect::<Vec<_>>(),
                )
            }
            _ => unreachable!("include list is pre-validated"),
        };
        files.insert(format!("{key}.csv"), document);
    }

    to_value(&files)
}
