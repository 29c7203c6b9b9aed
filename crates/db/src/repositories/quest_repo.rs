//! Repository for the `quests` table.

use questlog_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::quest::{CreateQuest, Quest, UpdateQuest};

const COLUMNS: &str =
    "id, campaign_id, title, status, giver_id, description, tags, created_at, updated_at";

/// Provides CRUD operations for quests.
pub struct QuestRepo;

impl QuestRepo {
    /// Insert a new quest, returning the created row.
    ///
    /// If `status` is `None`, defaults to `open`.
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &CreateQuest,
    ) -> Result<Quest, sqlx::Error> {
        let query = format!(
            "INSERT INTO quests (campaign_id, title, status, giver_id, description, tags)
             VALUES ($1, $2, COALESCE($3, 'open'), $4, COALESCE($5, ''), COALESCE($6, '[]'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(campaign_id)
            .bind(&input.title)
            .bind(&input.status)
            .bind(input.giver_id)
            .bind(&input.description)
            .bind(input.tags.clone().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Find a quest by id within a campaign.
    pub async fn find_by_id(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
    ) -> Result<Option<Quest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quests WHERE id = $1 AND campaign_id = $2");
        sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .bind(campaign_id)
            .fetch_optional(pool)
            .await
    }

    /// List a campaign's quests, newest first.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Quest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quests
             WHERE campaign_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(campaign_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a quest. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
        input: &UpdateQuest,
    ) -> Result<Option<Quest>, sqlx::Error> {
        let query = format!(
            "UPDATE quests SET
                title = COALESCE($3, title),
                status = COALESCE($4, status),
                giver_id = COALESCE($5, giver_id),
                description = COALESCE($6, description),
                tags = COALESCE($7, tags)
             WHERE id = $1 AND campaign_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .bind(campaign_id)
            .bind(&input.title)
            .bind(&input.status)
            .bind(input.giver_id)
            .bind(&input.description)
            .bind(input.tags.clone().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete a quest. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, campaign_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quests WHERE id = $1 AND campaign_id = $2")
            .bind(id)
            .bind(campaign_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
