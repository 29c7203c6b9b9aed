//! Location entity model and DTOs.
//!
//! Locations form a tree within a campaign via `parent_id`. Deleting a
//! parent nulls its children's reference rather than cascading.

use questlog_core::types::{DbId, Timestamp};
use questlog_core::validation::{self, Violations};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A location row from the `locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    pub kind: String,
    pub parent_id: Option<DbId>,
    pub description: String,
    pub tags: Json<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocation {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub name: String,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub kind: Option<String>,
    /// Must reference a location in the same campaign (checked by the handler).
    pub parent_id: Option<DbId>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CreateLocation {
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

/// DTO for updating an existing location. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLocation {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub kind: Option<String>,
    pub parent_id: Option<DbId>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateLocation {
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
