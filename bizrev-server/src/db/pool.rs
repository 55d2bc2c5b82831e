//! PostgreSQL pool for the record store
//!
//! Both limits are explicit: how many connections may be open, and how long
//! a statement waits for one before failing with `PoolTimedOut`. A
//! connection goes back to the pool as soon as its statement finishes.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How long a statement may wait for a free connection.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Connect with the default limits.
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/bizrev").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS, DEFAULT_ACQUIRE_TIMEOUT).await
}

/// Connect, holding at most `max_connections` and failing any statement that
/// waits longer than `acquire_timeout` for one.
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(max_connections, ?acquire_timeout, "connecting to database");
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    // Run with: DATABASE_URL=postgres://... cargo test -p bizrev-server -- --ignored
    fn database_url() -> String {
        std::env::var("DATABASE_URL").expect("DATABASE_URL required")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn acquire_gives_up_when_pool_is_exhausted() {
        let pool = create_pool_with_options(&database_url(), 1, Duration::from_millis(200))
            .await
            .expect("pool creation failed");

        let _held = pool.acquire().await.expect("first acquire failed");
        let err = pool.acquire().await.unwrap_err();
        assert!(matches!(err, sqlx::Error::PoolTimedOut));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn released_connection_is_reused() {
        let pool = create_pool_with_options(&database_url(), 1, Duration::from_millis(200))
            .await
            .expect("pool creation failed");

        drop(pool.acquire().await.expect("first acquire failed"));
        pool.acquire().await.expect("connection was not returned");
        assert_eq!(pool.size(), 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_never_exceeds_max_connections() {
        let pool = create_pool_with_options(&database_url(), 2, DEFAULT_ACQUIRE_TIMEOUT)
            .await
            .expect("pool creation failed");

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    sqlx::query("SELECT pg_sleep(0.05)").execute(&pool).await.map(|_| ())
                })
            })
            .collect();
        for task in tasks {
            task.await.expect("task panicked").expect("query failed");
        }

        assert!(pool.size() <= 2);
    }
}
