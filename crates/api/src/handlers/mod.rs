//! Request handlers, one module per resource.

pub mod auth;
pub mod campaigns;
pub mod characters;
pub mod dice_rolls;
pub mod export;
pub mod items;
pub mod locations;
pub mod maps;
pub mod notes;
pub mod quests;
pub mod relationships;
pub mod search;
pub mod timeline_events;

use questlog_core::error::CoreError;
use questlog_core::types::DbId;
use questlog_db::models::campaign::Campaign;
use questlog_db::repositories::CampaignRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// `limit`/`offset` query parameters accepted by every list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Resolve a campaign by id, restricted to the caller.
///
/// A campaign owned by someone else is indistinguishable from a missing
/// one: both return 404, so ids cannot be probed across users.
pub async fn resolve_campaign(
    state: &AppState,
    campaign_id: DbId,
    user: &CurrentUser,
) -> AppResult<Campaign> {
    CampaignRepo::find_for_user(&state.pool, campaign_id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }))
}
