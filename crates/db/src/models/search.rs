//! Search result types shared by the search repository and API handlers.

use questlog_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Query parameters for `GET /campaigns/{id}/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// Free-text query; substring-matched against name/title and
    /// description/content fields.
    pub q: String,
}

/// Query parameters for `GET /campaigns/{id}/search/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct TagSearchParams {
    /// Exact tag to look up.
    pub tag: String,
}

/// One lightweight search hit.
///
/// `name` carries the entity's name or title; `snippet` the matched
/// description/content field (possibly empty).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: DbId,
    pub name: String,
    pub snippet: String,
}

/// Per-entity-type search results, each list capped independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub characters: Vec<SearchHit>,
    pub locations: Vec<SearchHit>,
    pub items: Vec<SearchHit>,
    pub notes: Vec<SearchHit>,
    pub timeline_events: Vec<SearchHit>,
    pub quests: Vec<SearchHit>,
    pub maps: Vec<SearchHit>,
}

impl SearchResults {
    /// Total hits across all entity types.
    pub fn total(&self) -> usize {
        self.characters.len()
            + self.locations.len()
            + self.items.len()
            + self.notes.len()
            + self.timeline_events.len()
            + self.quests.len()
            + self.maps.len()
    }
}
