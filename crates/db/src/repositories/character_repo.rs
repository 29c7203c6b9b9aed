//! Repository for the `characters` table.

use questlog_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::character::{Character, CreateCharacter, UpdateCharacter};

const COLUMNS: &str = "id, campaign_id, name, kind, race, class, location_id, description, tags, \
                       created_at, updated_at";

/// Provides CRUD operations for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character, returning the created row.
    ///
    /// If `kind` is `None`, defaults to `npc`.
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &CreateCharacter,
    ) -> Result<Character, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters (campaign_id, name, kind, race, class, location_id, description, tags)
             VALUES ($1, $2, COALESCE($3, 'npc'), COALESCE($4, ''), COALESCE($5, ''), $6,
                     COALESCE($7, ''), COALESCE($8, '[]'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(campaign_id)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(&input.race)
            .bind(&input.class)
            .bind(input.location_id)
            .bind(&input.description)
            .bind(input.tags.clone().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Find a character by id within a campaign.
    pub async fn find_by_id(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1 AND campaign_id = $2");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(campaign_id)
            .fetch_optional(pool)
            .await
    }

    /// List a campaign's characters, ordered by name ascending.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters
             WHERE campaign_id = $1
             ORDER BY name ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(campaign_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a character. Only non-`None` fields in `input` are applied.
    ///
    /// `location_id` cannot be cleared through this path; delete the
    /// location instead (the FK nulls it).
    pub async fn update(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET
                name = COALESCE($3, name),
                kind = COALESCE($4, kind),
                race = COALESCE($5, race),
                class = COALESCE($6, class),
                location_id = COALESCE($7, location_id),
                description = COALESCE($8, description),
                tags = COALESCE($9, tags)
             WHERE id = $1 AND campaign_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(campaign_id)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(&input.race)
            .bind(&input.class)
            .bind(input.location_id)
            .bind(&input.description)
            .bind(input.tags.clone().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete a character. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, campaign_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters WHERE id = $1 AND campaign_id = $2")
            .bind(id)
            .bind(campaign_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check that a character exists inside the given campaign.
    ///
    /// Used to validate cross-references (relationship endpoints, item
    /// owners, quest givers) before insertion.
    pub async fn belongs_to_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let exists: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM characters WHERE id = $1 AND campaign_id = $2",
        )
        .bind(id)
        .bind(campaign_id)
        .fetch_optional(pool)
        .await?;
        Ok(exists.is_some())
    }
}
