//! Repository for the `timeline_events` table.

use questlog_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::timeline_event::{CreateTimelineEvent, TimelineEvent, UpdateTimelineEvent};

const COLUMNS: &str = "id, campaign_id, title, event_date, session_number, kind, character_ids, \
                       location_ids, description, tags, created_at, updated_at";

/// Provides CRUD operations for timeline events.
pub struct TimelineEventRepo;

impl TimelineEventRepo {
    /// Insert a new timeline event, returning the created row.
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &CreateTimelineEvent,
    ) -> Result<TimelineEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO timeline_events
                (campaign_id, title, event_date, session_number, kind, character_ids,
                 location_ids, description, tags)
             VALUES ($1, $2, COALESCE($3, ''), $4, COALESCE($5, ''),
                     COALESCE($6, '[]'::jsonb), COALESCE($7, '[]'::jsonb),
                     COALESCE($8, ''), COALESCE($9, '[]'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimelineEvent>(&query)
            .bind(campaign_id)
            .bind(&input.title)
            .bind(&input.event_date)
            .bind(input.session_number)
            .bind(&input.kind)
            .bind(input.character_ids.clone().map(Json))
            .bind(input.location_ids.clone().map(Json))
            .bind(&input.description)
            .bind(input.tags.clone().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Find a timeline event by id within a campaign.
    pub async fn find_by_id(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
    ) -> Result<Option<TimelineEvent>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM timeline_events WHERE id = $1 AND campaign_id = $2");
        sqlx::query_as::<_, TimelineEvent>(&query)
            .bind(id)
            .bind(campaign_id)
            .fetch_optional(pool)
            .await
    }

    /// List a campaign's timeline events, by session then insertion order.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TimelineEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM timeline_events
             WHERE campaign_id = $1
             ORDER BY session_number ASC NULLS LAST, created_at ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, TimelineEvent>(&query)
            .bind(campaign_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a timeline event. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
        input: &UpdateTimelineEvent,
    ) -> Result<Option<TimelineEvent>, sqlx::Error> {
        let query = format!(
            "UPDATE timeline_events SET
                title = COALESCE($3, title),
                event_date = COALESCE($4, event_date),
                session_number = COALESCE($5, session_number),
                kind = COALESCE($6, kind),
                character_ids = COALESCE($7, character_ids),
                location_ids = COALESCE($8, location_ids),
                description = COALESCE($9, description),
                tags = COALESCE($10, tags)
             WHERE id = $1 AND campaign_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimelineEvent>(&query)
            .bind(id)
            .bind(campaign_id)
            .bind(&input.title)
            .bind(&input.event_date)
            .bind(input.session_number)
            .bind(&input.kind)
            .bind(input.character_ids.clone().map(Json))
            .bind(input.location_ids.clone().map(Json))
            .bind(&input.description)
            .bind(input.tags.clone().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete a timeline event. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, campaign_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM timeline_events WHERE id = $1 AND campaign_id = $2")
            .bind(id)
            .bind(campaign_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
