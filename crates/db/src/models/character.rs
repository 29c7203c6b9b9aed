//! Character entity model and DTOs.

use questlog_core::entities::CharacterKind;
use questlog_core::types::{DbId, Timestamp};
use questlog_core::validation::{self, Violations};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A character row from the `characters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    /// Lowercase [`CharacterKind`] spelling.
    pub kind: String,
    pub race: String,
    pub class: String,
    pub location_id: Option<DbId>,
    pub description: String,
    pub tags: Json<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new character.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCharacter {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub name: String,
    /// Defaults to `npc` if omitted.
    pub kind: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub race: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub class: Option<String>,
    pub location_id: Option<DbId>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CreateCharacter {
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        validation::require_non_blank(&mut out, "name", &self.name);
        if let Some(kind) = &self.kind {
            validation::check_one_of(&mut out, "kind", kind, CharacterKind::ALL);
        }
        if let Some(tags) = &self.tags {
            validation::check_tags(&mut out, "tags", tags);
        }
        out
    }
}

/// DTO for updating an existing character. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCharacter {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub name: Option<String>,
    pub kind: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub race: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub class: Option<String>,
    pub location_id: Option<DbId>,
    #[validate(length(max = 10000, message = "must be at most 10000 characters"))]
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateCharacter {
    pub fn check(&self) -> Violations {
        let mut out = Violations::new();
        if let Err(errors) = self.validate() {
            out.absorb(errors);
        }
        if let Some(name) = &self.name {
            validation::require_non_blank(&mut out, "name", name);
        }
        if let Some(kind) = &self.kind {
            validation::check_one_of(&mut out, "kind", kind, CharacterKind::ALL);
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

    fn minimal(name: &str) -> CreateCharacter {
        CreateCharacter {
            name: name.to_string(),
            kind: None,
            race: None,
            class: None,
            location_id: None,
            description: None,
            tags: None,
        }
    }

    #[test]
    fn missing_name_is_reported() {
        let violations = minimal("").check();
        assert!(violations.0.contains_key("name"));
    }

    #[test]
    fn unknown_kind_is_reported() {
        let mut input = minimal("Strahd");
        input.kind = Some("lich".to_string());
        let violations = input.check();
        assert!(violations.0.contains_key("kind"));
    }

    #[test]
    fn known_kind_passes() {
        let mut input = minimal("Strahd");
        input.kind = Some("villain".to_string());
        assert!(input.check().is_empty());
    }

    #[test]
    fn bad_tags_are_reported() {
        let mut input = minimal("Strahd");
        input.tags = Some(vec!["undead".to_string(), "".to_string()]);
        assert!(input.check().0.contains_key("tags"));
    }
}
