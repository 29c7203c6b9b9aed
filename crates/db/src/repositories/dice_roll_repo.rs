//! Repository for the `dice_rolls` table.

use questlog_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::dice_roll::{CreateDiceRoll, DiceRoll};

const COLUMNS: &str = "id, campaign_id, character_id, expression, rolls, modifier, total, \
                       purpose, created_at";

/// Provides append/list/delete for the dice roll log.
pub struct DiceRollRepo;

impl DiceRollRepo {
    /// Append a resolved roll to the log, returning the created row.
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &CreateDiceRoll,
    ) -> Result<DiceRoll, sqlx::Error> {
        let query = format!(
            "INSERT INTO dice_rolls
                (campaign_id, character_id, expression, rolls, modifier, total, purpose)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DiceRoll>(&query)
            .bind(campaign_id)
            .bind(input.character_id)
            .bind(&input.expression)
            .bind(Json(&input.rolls))
            .bind(input.modifier)
            .bind(input.total)
            .bind(&input.purpose)
            .fetch_one(pool)
            .await
    }

    /// Find a roll by id within a campaign.
    pub async fn find_by_id(
        pool: &PgPool,
        campaign_id: DbId,
        id: DbId,
    ) -> Result<Option<DiceRoll>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dice_rolls WHERE id = $1 AND campaign_id = $2");
        sqlx::query_as::<_, DiceRoll>(&query)
            .bind(id)
            .bind(campaign_id)
            .fetch_optional(pool)
            .await
    }

    /// List a campaign's rolls, newest first.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DiceRoll>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dice_rolls
             WHERE campaign_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, DiceRoll>(&query)
            .bind(campaign_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete a logged roll. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, campaign_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dice_rolls WHERE id = $1 AND campaign_id = $2")
            .bind(id)
            .bind(campaign_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
