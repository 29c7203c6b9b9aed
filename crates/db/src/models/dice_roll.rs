//! Dice roll log model and DTOs.
//!
//! Dice rolls are an append-only log: created (by rolling), listed, and
//! deleted, never updated.

use questlog_core::types::{DbId, Timestamp};
use questlog_core::validation::{self, Violations};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A dice roll row from the `dice_rolls` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DiceRoll {
    pub id: DbId,
    pub campaign_id: DbId,
    pub character_id: Option<DbId>,
    /// Canonical `NdS+M` spelling of what was rolled.
    pub expression: String,
    pub rolls: Json<Vec<i64>>,
    pub modifier: i64,
    pub total: i64,
    pub purpose: String,
    pub created_at: Timestamp,
}

/// Request to roll dice and log the outcome.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RollRequest {
    /// `NdS+M` expression, e.g. `2d6` or `1d20+5`.
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub expression: String,
    pub character_id: Option<DbId>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub purpose: Option<String>,
}

impl RollRequest {
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        validation::require_non_blank(&mut out, "expression", &self.expression);
        out
    }
}

/// Fully-resolved roll ready for insertion.
#[derive(Debug, Clone)]
pub struct CreateDiceRoll {
    pub character_id: Option<DbId>,
    pub expression: String,
    pub rolls: Vec<i64>,
    pub modifier: i64,
    pub total: i64,
    pub purpose: String,
}
