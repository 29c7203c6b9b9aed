//! Wire types for the questlog API.
//!
//! Records mirror the server's JSON shapes; drafts mirror the create/
//! update request bodies with everything optional left out via
//! `skip_serializing_if` so partial updates stay partial.

use questlog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

fn is_none<T>(v: &Option<T>) -> bool {
    v.is_none()
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: DbId,
    pub subject: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Campaign {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Character {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    pub kind: String,
    pub race: String,
    pub class: String,
    pub location_id: Option<DbId>,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    pub kind: String,
    pub parent_id: Option<DbId>,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    pub kind: String,
    pub owner_id: Option<DbId>,
    pub location_id: Option<DbId>,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Note {
    pub id: DbId,
    pub campaign_id: DbId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Relationship {
    pub id: DbId,
    pub campaign_id: DbId,
    pub from_id: DbId,
    pub to_id: DbId,
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineEvent {
    pub id: DbId,
    pub campaign_id: DbId,
    pub title: String,
    pub event_date: String,
    pub session_number: Option<i32>,
    pub kind: String,
    #[serde(default)]
    pub character_ids: Vec<DbId>,
    #[serde(default)]
    pub location_ids: Vec<DbId>,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Quest {
    pub id: DbId,
    pub campaign_id: DbId,
    pub title: String,
    pub status: String,
    pub giver_id: Option<DbId>,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapRecord {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    pub image_url: String,
    pub location_id: Option<DbId>,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiceRoll {
    pub id: DbId,
    pub campaign_id: DbId,
    pub character_id: Option<DbId>,
    pub expression: String,
    pub rolls: Vec<i64>,
    pub modifier: i64,
    pub total: i64,
    pub purpose: String,
    pub created_at: Timestamp,
}

/// One lightweight search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: DbId,
    pub name: String,
    pub snippet: String,
}

/// Per-entity-type search results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub characters: Vec<SearchHit>,
    #[serde(default)]
    pub locations: Vec<SearchHit>,
    #[serde(default)]
    pub items: Vec<SearchHit>,
    #[serde(default)]
    pub notes: Vec<SearchHit>,
    #[serde(default)]
    pub timeline_events: Vec<SearchHit>,
    #[serde(default)]
    pub quests: Vec<SearchHit>,
    #[serde(default)]
    pub maps: Vec<SearchHit>,
}

/// Result of validating an export envelope for re-import.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportValidationReport {
    pub is_valid: bool,
    pub collections: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct CampaignDraft {
    pub name: String,
    #[serde(skip_serializing_if = "is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CharacterDraft {
    pub name: String,
    #[serde(skip_serializing_if = "is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub race: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub location_id: Option<DbId>,
    #[serde(skip_serializing_if = "is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LocationDraft {
    pub name: String,
    #[serde(skip_serializing_if = "is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub parent_id: Option<DbId>,
    #[serde(skip_serializing_if = "is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemDraft {
    pub name: String,
    #[serde(skip_serializing_if = "is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub owner_id: Option<DbId>,
    #[serde(skip_serializing_if = "is_none")]
    pub location_id: Option<DbId>,
    #[serde(skip_serializing_if = "is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NoteDraft {
    pub title: String,
    #[serde(skip_serializing_if = "is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationshipDraft {
    pub from_id: DbId,
    pub to_id: DbId,
    #[serde(skip_serializing_if = "is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TimelineEventDraft {
    pub title: String,
    #[serde(skip_serializing_if = "is_none")]
    pub event_date: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub session_number: Option<i32>,
    #[serde(skip_serializing_if = "is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub character_ids: Option<Vec<DbId>>,
    #[serde(skip_serializing_if = "is_none")]
    pub location_ids: Option<Vec<DbId>>,
    #[serde(skip_serializing_if = "is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QuestDraft {
    pub title: String,
    #[serde(skip_serializing_if = "is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub giver_id: Option<DbId>,
    #[serde(skip_serializing_if = "is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MapDraft {
    pub name: String,
    #[serde(skip_serializing_if = "is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub location_id: Option<DbId>,
    #[serde(skip_serializing_if = "is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RollDraft {
    /// `NdS+M` expression, e.g. `2d6` or `1d20+5`.
    pub expression: String,
    #[serde(skip_serializing_if = "is_none")]
    pub character_id: Option<DbId>,
    #[serde(skip_serializing_if = "is_none")]
    pub purpose: Option<String>,
}
