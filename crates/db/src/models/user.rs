//! Local user record, provisioned from identity-provider claims.

use questlog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A user row from the `users` table.
///
/// The `subject` column is the identity provider's stable subject id;
/// everything else is refreshed from token claims on each request.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub subject: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Profile fields extracted from verified token claims.
#[derive(Debug, Clone)]
pub struct ProvisionUser {
    pub subject: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
}
