//! Timeline event entity model and DTOs.

use questlog_core::types::{DbId, Timestamp};
use questlog_core::validation::{self, Violations};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// Upper bound on session numbers; purely a sanity limit.
const MAX_SESSION_NUMBER: i64 = 100_000;

/// A timeline event row from the `timeline_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimelineEvent {
    pub id: DbId,
    pub campaign_id: DbId,
    pub title: String,
    /// Free-form in-world date ("3rd of Mirtul, 1491 DR").
    pub event_date: String,
    pub session_number: Option<i32>,
    pub kind: String,
    pub character_ids: Json<Vec<DbId>>,
    pub location_ids: Json<Vec<DbId>>,
    pub description: String,
    pub tags: Json<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new timeline event.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTimelineEvent {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub title: String,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub event_date: Option<String>,
    pub session_number: Option<i32>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub kind: Option<String>,
    pub character_ids: Option<Vec<DbId>>,
    pub location_ids: Option<Vec<DbId>>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CreateTimelineEvent {
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        validation::require_non_blank(&mut out, "title", &self.title);
        if let Some(n) = self.session_number {
            validation::check_range(&mut out, "session_number", n as i64, 0, MAX_SESSION_NUMBER);
        }
        if let Some(tags) = &self.tags {
            validation::check_tags(&mut out, "tags", tags);
        }
        out
    }
}

/// DTO for updating an existing timeline event. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTimelineEvent {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub event_date: Option<String>,
    pub session_number: Option<i32>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub kind: Option<String>,
    pub character_ids: Option<Vec<DbId>>,
    pub location_ids: Option<Vec<DbId>>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateTimelineEvent {
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        if let Some(title) = &self.title {
            validation::require_non_blank(&mut out, "title", title);
        }
        if let Some(n) = self.session_number {
            validation::check_range(&mut out, "session_number", n as i64, 0, MAX_SESSION_NUMBER);
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
    fn negative_session_number_is_rejected() {
        let input = CreateTimelineEvent {
            title: "The feast".to_string(),
            event_date: None,
            session_number: Some(-1),
            kind: None,
            character_ids: None,
            location_ids: None,
            description: None,
            tags: None,
        };
        assert!(input.check().0.contains_key("session_number"));
    }
}
