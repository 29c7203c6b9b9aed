//! Substring and tag search across a campaign's entities.
//!
//! Each entity type is queried independently with its own
//! [`RESULTS_PER_TYPE`] cap and database-default ordering; no relevance
//! ranking is attempted.

use questlog_core::search::RESULTS_PER_TYPE;
use questlog_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::search::{SearchHit, SearchResults};

/// Executes campaign-scoped searches.
pub struct SearchRepo;

impl SearchRepo {
    /// Substring search with a pre-escaped `%term%` pattern (see
    /// `questlog_core::search::contains_pattern`).
    pub async fn search_text(
        pool: &PgPool,
        campaign_id: DbId,
        pattern: &str,
    ) -> Result<SearchResults, sqlx::Error> {
        let characters = Self::hits(
            pool,
            "SELECT id, name, description AS snippet FROM characters
             WHERE campaign_id = $1 AND (name ILIKE $2 OR description ILIKE $2)
             LIMIT $3",
            campaign_id,
            pattern,
        )
        .await?;

        let locations = Self::hits(
            pool,
            "SELECT id, name, description AS snippet FROM locations
             WHERE campaign_id = $1 AND (name ILIKE $2 OR description ILIKE $2)
             LIMIT $3",
            campaign_id,
            pattern,
        )
        .await?;

        let items = Self::hits(
            pool,
            "SELECT id, name, description AS snippet FROM items
             WHERE campaign_id = $1 AND (name ILIKE $2 OR description ILIKE $2)
             LIMIT $3",
            campaign_id,
            pattern,
        )
        .await?;

        let notes = Self::hits(
            pool,
            "SELECT id, title AS name, content AS snippet FROM notes
             WHERE campaign_id = $1 AND (title ILIKE $2 OR content ILIKE $2)
             LIMIT $3",
            campaign_id,
            pattern,
        )
        .await?;

        let timeline_events = Self::hits(
            pool,
            "SELECT id, title AS name, description AS snippet FROM timeline_events
             WHERE campaign_id = $1 AND (title ILIKE $2 OR description ILIKE $2)
             LIMIT $3",
            campaign_id,
            pattern,
        )
        .await?;

        let quests = Self::hits(
            pool,
            "SELECT id, title AS name, description AS snippet FROM quests
             WHERE campaign_id = $1 AND (title ILIKE $2 OR description ILIKE $2)
             LIMIT $3",
            campaign_id,
            pattern,
        )
        .await?;

        let maps = Self::hits(
            pool,
            "SELECT id, name, description AS snippet FROM maps
             WHERE campaign_id = $1 AND (name ILIKE $2 OR description ILIKE $2)
             LIMIT $3",
            campaign_id,
            pattern,
        )
        .await?;

        Ok(SearchResults {
            characters,
            locations,
            items,
            notes,
            timeline_events,
            quests,
            maps,
        })
    }

    /// Exact-tag search via JSONB containment on each entity's `tags`.
    pub async fn search_tag(
        pool: &PgPool,
        campaign_id: DbId,
        tag: &str,
    ) -> Result<SearchResults, sqlx::Error> {
        let needle = Json(vec![tag.to_string()]);

        let characters = Self::tag_hits(
            pool,
            "SELECT id, name, description AS snippet FROM characters
             WHERE campaign_id = $1 AND tags @> $2
             LIMIT $3",
            campaign_id,
            &needle,
        )
        .await?;

        let locations = Self::tag_hits(
            pool,
            "SELECT id, name, description AS snippet FROM locations
             WHERE campaign_id = $1 AND tags @> $2
             LIMIT $3",
            campaign_id,
            &needle,
        )
        .await?;

        let items = Self::tag_hits(
            pool,
            "SELECT id, name, description AS snippet FROM items
             WHERE campaign_id = $1 AND tags @> $2
             LIMIT $3",
            campaign_id,
            &needle,
        )
        .await?;

        let notes = Self::tag_hits(
            pool,
            "SELECT id, title AS name, content AS snippet FROM notes
             WHERE campaign_id = $1 AND tags @> $2
             LIMIT $3",
            campaign_id,
            &needle,
        )
        .await?;

        let timeline_events = Self::tag_hits(
            pool,
            "SELECT id, title AS name, description AS snippet FROM timeline_events
             WHERE campaign_id = $1 AND tags @> $2
             LIMIT $3",
            campaign_id,
            &needle,
        )
        .await?;

        let quests = Self::tag_hits(
            pool,
            "SELECT id, title AS name, description AS snippet FROM quests
             WHERE campaign_id = $1 AND tags @> $2
             LIMIT $3",
            campaign_id,
            &needle,
        )
        .await?;

        let maps = Self::tag_hits(
            pool,
            "SELECT id, name, description AS snippet FROM maps
             WHERE campaign_id = $1 AND tags @> $2
             LIMIT $3",
            campaign_id,
            &needle,
        )
        .await?;

        Ok(SearchResults {
            characters,
            locations,
            items,
            notes,
            timeline_events,
            quests,
            maps,
        })
    }

    // ---- private helpers ----

    async fn hits(
        pool: &PgPool,
        query: &str,
        campaign_id: DbId,
        pattern: &str,
    ) -> Result<Vec<SearchHit>, sqlx::Error> {
        sqlx::query_as::<_, SearchHit>(query)
            .bind(campaign_id)
            .bind(pattern)
            .bind(RESULTS_PER_TYPE)
            .fetch_all(pool)
            .await
    }

    async fn tag_hits(
        pool: &PgPool,
        query: &str,
        campaign_id: DbId,
        needle: &Json<Vec<String>>,
    ) -> Result<Vec<SearchHit>, sqlx::Error> {
        sqlx::query_as::<_, SearchHit>(query)
            .bind(campaign_id)
            .bind(needle)
            .bind(RESULTS_PER_TYPE)
            .fetch_all(pool)
            .await
    }
}
