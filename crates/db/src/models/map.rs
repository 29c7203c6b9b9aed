//! Map entity model and DTOs.

use questlog_core::types::{DbId, Timestamp};
use questlog_core::validation::{self, Violations};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A map row from the `maps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Map {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    /// Where the rendered map image lives (object storage or static URL).
    pub image_url: String,
    pub location_id: Option<DbId>,
    pub description: String,
    pub tags: Json<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new map.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMap {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub name: String,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub image_url: Option<String>,
    pub location_id: Option<DbId>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CreateMap {
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

/// DTO for updating an existing map. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMap {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub image_url: Option<String>,
    pub location_id: Option<DbId>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateMap {
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
