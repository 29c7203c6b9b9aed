//! Repository for the `items` table.

use questlog_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::item::{CreateItem, Item, UpdateItem};

const COLUMNS: &str = "id, campaign_id, name, kind, owner_id, location_id, description, tags, \
                       created_at, updated_at";

/// Provides CRUD operations for items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item, returning the created row.
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &CreateItem,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items (campaign_id, name, kind, owner_id, location_id, description, tags)
             VALUES ($1, $2, COALESCE($3, ''), $4, $5, COALESCE($6, ''), COALESCE($7, '[]'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(campaign_id)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(input.owner_id)
            .bind(input.location_id)
            .bind(&input.description)
            .bind(input.tags.clone().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Find an item by id within a campaign.
    pub async fn find_by_id(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1 AND campaign_id = $2");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(campaign_id)
            .fetch_optional(pool)
            .await
    }

    /// List a campaign's items, ordered by name ascending.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE campaign_id = $1
             ORDER BY name ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(campaign_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update an item. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                name = COALESCE($3, name),
                kind = COALESCE($4, kind),
                owner_id = COALESCE($5, owner_id),
                location_id = COALESCE($6, location_id),
                description = COALESCE($7, description),
                tags = COALESCE($8, tags)
             WHERE id = $1 AND campaign_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(campaign_id)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(input.owner_id)
            .bind(input.location_id)
            .bind(&input.description)
            .bind(input.tags.clone().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Delete an item. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, campaign_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1 AND campaign_id = $2")
            .bind(id)
            .bind(campaign_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
