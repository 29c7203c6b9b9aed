//! Repository for the `relationships` table.

use questlog_core::types::DbId;
use sqlx::PgPool;

use crate::models::relationship::{CreateRelationship, Relationship, UpdateRelationship};

const COLUMNS: &str =
    "id, campaign_id, from_id, to_id, kind, description, created_at, updated_at";

/// Provides CRUD operations for character relationships.
pub struct RelationshipRepo;

impl RelationshipRepo {
    /// Insert a new relationship, returning the created row.
    ///
    /// A duplicate (from, to) pair violates `uq_relationships_from_to`
    /// and surfaces as a conflict.
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &CreateRelationship,
    ) -> Result<Relationship, sqlx::Error> {
        let query = format!(
            "INSERT INTO relationships (campaign_id, from_id, to_id, kind, description)
             VALUES ($1, $2, $3, COALESCE($4, ''), COALESCE($5, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(campaign_id)
            .bind(input.from_id)
            .bind(input.to_id)
            .bind(&input.kind)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a relationship by id within a campaign.
    pub async fn find_by_id(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
    ) -> Result<Option<Relationship>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM relationships WHERE id = $1 AND campaign_id = $2");
        sqlx::query_as::<_, Relationship>(&query)
            .bind(id)
            .bind(campaign_id)
            .fetch_optional(pool)
            .await
    }

    /// List a campaign's relationships, oldest first.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Relationship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM relationships
             WHERE campaign_id = $1
             ORDER BY created_at ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(campaign_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List every relationship touching a character, in either direction.
    pub async fn list_for_character(
        pool: &PgPool,
        campaign_id: DbId,
        character_id: DbId,
    ) -> Result<Vec<Relationship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM relationships
             WHERE campaign_id = $1 AND (from_id = $2 OR to_id = $2)
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(campaign_id)
            .bind(character_id)
            .fetch_all(pool)
            .await
    }

    /// Update a relationship's kind/description. Endpoints are immutable.
    pub async fn update(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
        input: &UpdateRelationship,
    ) -> Result<Option<Relationship>, sqlx::Error> {
        let query = format!(
            "UPDATE relationships SET
                kind = COALESCE($3, kind),
                description = COALESCE($4, description)
             WHERE id = $1 AND campaign_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(id)
            .bind(campaign_id)
            .bind(&input.kind)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a relationship. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, campaign_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM relationships WHERE id = $1 AND campaign_id = $2")
            .bind(id)
            .bind(campaign_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
