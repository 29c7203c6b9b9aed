//! Repository for the `users` table.

use questlog_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{ProvisionUser, User};

const COLUMNS: &str = "id, subject, email, display_name, role, created_at, updated_at";

/// Provides provisioning and lookup for identity-provider users.
pub struct UserRepo;

impl UserRepo {
    /// Insert or refresh the local record for a verified subject.
    ///
    /// Called on every authenticated request: the first verified login
    /// creates the row, later requests keep email/display-name in sync
    /// with the provider's claims.
    pub async fn provision(pool: &PgPool, input: &ProvisionUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (subject, email, display_name, role)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_users_subject
             DO UPDATE SET email = $2, display_name = $3, role = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.subject)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by the identity provider's subject id.
    pub async fn find_by_subject(
        pool: &PgPool,
        subject: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE subject = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(subject)
            .fetch_optional(pool)
            .await
    }
}
