//! Repository for the `available_models` capability registry.
//!
//! This is a passive presence table, not a membership protocol. Heartbeats
//! upsert `last_seen`; listings filter by a freshness threshold at query
//! time. A crashed worker simply stops refreshing and ages out -- nothing
//! ever signals "down".

use sqlx::PgPool;

use crate::models::registry::AvailableModel;

/// Column list for `available_models` queries.
const COLUMNS: &str = "name, last_seen";

/// Provides heartbeat upserts and freshness-filtered listings.
pub struct RegistryRepo;

impl RegistryRepo {
    /// Record a heartbeat for `name`, creating the row if absent.
    ///
    /// Idempotent; the only effect is refreshing `last_seen`.
    pub async fn heartbeat(pool: &PgPool, name: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO available_models (name, last_seen) VALUES ($1, NOW()) \
             ON CONFLICT (name) DO UPDATE SET last_seen = NOW()",
        )
        .bind(name)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List capabilities seen within the last `threshold_secs` seconds.
    ///
    /// The boundary is inclusive: a capability heartbeated exactly
    /// `threshold_secs` ago is still listed.
    pub async fn list_available(
        pool: &PgPool,
        threshold_secs: u64,
    ) -> Result<Vec<AvailableModel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM available_models \
             WHERE last_seen >= NOW() - make_interval(secs => $1) \
             ORDER BY name"
        );
        sqlx::query_as::<_, AvailableModel>(&query)
            .bind(threshold_secs as f64)
            .fetch_all(pool)
            .await
    }
}
