//! Quest entity model and DTOs.

use questlog_core::entities::QuestStatus;
use questlog_core::types::{DbId, Timestamp};
use questlog_core::validation::{self, Violations};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A quest row from the `quests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quest {
    pub id: DbId,
    pub campaign_id: DbId,
    pub title: String,
    /// Lowercase [`QuestStatus`] spelling.
    pub status: String,
    /// Quest-giving character, if any.
    pub giver_id: Option<DbId>,
    pub description: String,
    pub tags: Json<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new quest.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuest {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub title: String,
    /// Defaults to `open` if omitted.
    pub status: Option<String>,
    pub giver_id: Option<DbId>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CreateQuest {
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        validation::require_non_blank(&mut out, "title", &self.title);
        if let Some(status) = &self.status {
            validation::check_one_of(&mut out, "status", status, QuestStatus::ALL);
        }
        if let Some(tags) = &self.tags {
            validation::check_tags(&mut out, "tags", tags);
        }
        out
    }
}

/// DTO for updating an existing quest. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuest {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub title: Option<String>,
    pub status: Option<String>,
    pub giver_id: Option<DbId>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateQuest {
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        if let Some(title) = &self.title {
            validation::require_non_blank(&mut out, "title", title);
        }
        if let Some(status) = &self.status {
            validation::check_one_of(&mut out, "status", status, QuestStatus::ALL);
        }
        if let Some(tags) = &self.tags {
            validation::check_tags(&mut out, "tags", tags);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_rejected() {
        let input = CreateQuest {
            title: "Find the sunsword".to_string(),
            status: Some("paused".to_string()),
            giver_id: None,
            description: None,
            tags: None,
        };
        assert!(input.check().0.contains_key("status"));
    }
}
