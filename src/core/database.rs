use crate::core::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use std::time::Duration;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let statement_timeout_secs = config.statement_timeout_secs;

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .after_connect(move |conn, _meta| {
            // Applied once per pooled connection; bounds every statement,
            // including the row-locking grouping/deletion transactions.
            Box::pin(async move {
                let stmt = format!("SET statement_timeout = '{}s'", statement_timeout_secs);
                conn.execute(stmt.as_str()).await?;
                Ok(())
            })
        })
        .connect(&config.url)
        .await
}
