//! Repository for the `locations` table.

use questlog_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::location::{CreateLocation, Location, UpdateLocation};

const COLUMNS: &str =
    "id, campaign_id, name, kind, parent_id, description, tags, created_at, updated_at";

/// Provides CRUD operations for locations plus tree helpers.
pub struct LocationRepo;

impl LocationRepo {
    /// Insert a new location, returning the created row.
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &CreateLocation,
    ) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (campaign_id, name, kind, parent_id, description, tags)
             VALUES ($1, $2, COALESCE($3, ''), $4, COALESCE($5, ''), COALESCE($6, '[]'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(campaign_id)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(input.parent_id)
            .bind(&input.description)
            .bind(input.tags.clone().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Find a location by id within a campaign.
    pub async fn find_by_id(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE id = $1 AND campaign_id = $2");
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(campaign_id)
            .fetch_optional(pool)
            .await
    }

    /// List a campaign's locations, ordered by name ascending.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations
             WHERE campaign_id = $1
             ORDER BY name ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(campaign_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a location. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET
                name = COALESCE($3, name),
                kind = COALESCE($4, kind),
                parent_id = COALESCE($5, parent_id),
                description = COALESCE($6, description),
                tags = COALESCE($7, tags)
             WHERE id = $1 AND campaign_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(campaign_id)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(input.parent_id)
            .bind(&input.description)
            .bind(input.tags.clone().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete a location. Children keep existing with a nulled parent
    /// (FK `ON DELETE SET NULL`). Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, campaign_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1 AND campaign_id = $2")
            .bind(id)
            .bind(campaign_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check that a location exists inside the given campaign.
    ///
    /// Used to validate parent references and cross-entity location refs.
    pub async fn belongs_to_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM locations WHERE id = $1 AND campaign_id = $2")
                .bind(id)
                .bind(campaign_id)
                .fetch_optional(pool)
                .await?;
        Ok(exists.is_some())
    }
}
