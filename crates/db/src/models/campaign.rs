//! Campaign entity model and DTOs.

use questlog_core::types::{DbId, Timestamp};
use questlog_core::validation::{self, Violations};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A campaign row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new campaign.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCampaign {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub name: String,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
}

impl CreateCampaign {
    /// Full validation: derive rules plus blank-name check.
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        validation::require_non_blank(&mut out, "name", &self.name);
        out
    }
}

/// DTO for updating an existing campaign. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCampaign {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
}

impl UpdateCampaign {
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        if let Some(name) = &self.name {
            validation::require_non_blank(&mut out, "name", name);
        }
        out
    }
}
