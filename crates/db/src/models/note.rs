//! Note entity model and DTOs.

use questlog_core::types::{DbId, Timestamp};
use questlog_core::validation::{self, Violations};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A note row from the `notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub campaign_id: DbId,
    pub title: String,
    pub content: String,
    pub tags: Json<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new note.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNote {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub title: String,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CreateNote {
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        validation::require_non_blank(&mut out, "title", &self.title);
        if let Some(tags) = &self.tags {
            validation::check_tags(&mut out, "tags", tags);
        }
        out
    }
}

/// DTO for updating an existing note. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateNote {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateNote {
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        if let Some(title) = &self.title {
            validation::require_non_blank(&mut out, "title", title);
        }
        if let Some(tags) = &self.tags {
            validation::check_tags(&mut out, "tags", tags);
        }
        out
    }
}
