//! Repository for the `maps` table.

use questlog_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::map::{CreateMap, Map, UpdateMap};

const COLUMNS: &str =
    "id, campaign_id, name, image_url, location_id, description, tags, created_at, updated_at";

/// Provides CRUD operations for maps.
pub struct MapRepo;

impl MapRepo {
    /// Insert a new map, returning the created row.
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &CreateMap,
    ) -> Result<Map, sqlx::Error> {
        let query = format!(
            "INSERT INTO maps (campaign_id, name, image_url, location_id, description, tags)
             VALUES ($1, $2, COALESCE($3, ''), $4, COALESCE($5, ''), COALESCE($6, '[]'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Map>(&query)
            .bind(campaign_id)
            .bind(&input.name)
            .bind(&input.image_url)
            .bind(input.location_id)
            .bind(&input.description)
            .bind(input.tags.clone().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Find a map by id within a campaign.
    pub async fn find_by_id(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
    ) -> Result<Option<Map>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maps WHERE id = $1 AND campaign_id = $2");
        sqlx::query_as::<_, Map>(&query)
            .bind(id)
            .bind(campaign_id)
            .fetch_optional(pool)
            .await
    }

    /// List a campaign's maps, ordered by name ascending.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Map>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maps
             WHERE campaign_id = $1
             ORDER BY name ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Map>(&query)
            .bind(campaign_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a map. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
        input: &UpdateMap,
    ) -> Result<Option<Map>, sqlx::Error> {
        let query = format!(
            "UPDATE maps SET
                name = COALESCE($3, name),
                image_url = COALESCE($4, image_url),
                location_id = COALESCE($5, location_id),
                description = COALESCE($6, description),
                tags = COALESCE($7, tags)
             WHERE id = $1 AND campaign_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Map>(&query)
            .bind(id)
            .bind(campaign_id)
            .bind(&input.name)
            .bind(&input.image_url)
            .bind(input.location_id)
            .bind(&input.description)
            .bind(input.tags.clone().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete a map. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, campaign_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM maps WHERE id = $1 AND campaign_id = $2")
            .bind(id)
            .bind(campaign_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
