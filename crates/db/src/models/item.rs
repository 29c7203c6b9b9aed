//! Item entity model and DTOs.

use questlog_core::types::{DbId, Timestamp};
use questlog_core::validation::{self, Violations};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// An item row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    pub kind: String,
    /// Owning character, if any.
    pub owner_id: Option<DbId>,
    pub location_id: Option<DbId>,
    pub description: String,
    pub tags: Json<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateItem {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub name: String,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub kind: Option<String>,
    pub owner_id: Option<DbId>,
    pub location_id: Option<DbId>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CreateItem {
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        validation::require_non_blank(&mut out, "name", &self.name);
        if let Some(tags) = &self.tags {
            validation::check_tags(&mut out, "tags", tags);
        }
        out
    }
}

/// DTO for updating an existing item. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateItem {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub kind: Option<String>,
    pub owner_id: Option<DbId>,
    pub location_id: Option<DbId>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateItem {
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        if let Some(name) = &self.name {
            validation::require_non_blank(&mut out, "name", name);
        }
        if let Some(tags) = &self.tags {
            validation::check_tags(&mut out, "tags", tags);
        }
        out
    }
}
