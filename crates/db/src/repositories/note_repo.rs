//! Repository for the `notes` table.

use questlog_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::note::{CreateNote, Note, UpdateNote};

const COLUMNS: &str = "id, campaign_id, title, content, tags, created_at, updated_at";

/// Provides CRUD operations for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a new note, returning the created row.
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &CreateNote,
    ) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (campaign_id, title, content, tags)
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, '[]'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(campaign_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.tags.clone().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Find a note by id within a campaign.
    pub async fn find_by_id(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1 AND campaign_id = $2");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(campaign_id)
            .fetch_optional(pool)
            .await
    }

    /// List a campaign's notes, newest first.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE campaign_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(campaign_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a note. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
        input: &UpdateNote,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                tags = COALESCE($5, tags)
             WHERE id = $1 AND campaign_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(campaign_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.tags.clone().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete a note. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, campaign_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND campaign_id = $2")
            .bind(id)
            .bind(campaign_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
