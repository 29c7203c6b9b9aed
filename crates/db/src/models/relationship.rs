//! Relationship entity model and DTOs.
//!
//! A relationship is a directed edge between two characters of the same
//! campaign. The pair (from, to) is unique; self-edges are rejected both
//! here and by a CHECK constraint.

use questlog_core::types::{DbId, Timestamp};
use questlog_core::validation::{self, Violations};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A relationship row from the `relationships` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Relationship {
    pub id: DbId,
    pub campaign_id: DbId,
    pub from_id: DbId,
    pub to_id: DbId,
    pub kind: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new relationship.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRelationship {
    pub from_id: DbId,
    pub to_id: DbId,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub kind: Option<String>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
}

impl CreateRelationship {
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        if self.from_id == self.to_id {
            out.push("to_id", "must differ from from_id");
        }
        out
    }
}

/// DTO for updating an existing relationship. Endpoints are immutable;
/// only the kind and description can change.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRelationship {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub kind: Option<String>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
}

impl UpdateRelationship {
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        out
    }
}
