//! Database migrations for the businesses and reviews tables
//!
//! The tables are deliberately unrelated at the database level: no foreign
//! keys and no cascading deletes.

use sqlx::PgPool;

use super::DbError;

/// Run all migrations. Safe to call on every start.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS businesses (
            id BIGSERIAL PRIMARY KEY,
            owner_id BIGINT NOT NULL,
            name VARCHAR(50) NOT NULL,
            street_address VARCHAR(100) NOT NULL,
            city VARCHAR(50) NOT NULL,
            state VARCHAR(2) NOT NULL,
            zip_code VARCHAR(5) NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL,
            business_id BIGINT NOT NULL,
            stars BIGINT NOT NULL CHECK (stars >= 0 AND stars <= 5),
            review_text VARCHAR(1000)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Filtered reads
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_businesses_owner ON businesses(owner_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_user ON reviews(user_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_business ON reviews(business_id)")
        .execute(pool)
        .await?;

    // Backstop for the handler's read-then-insert uniqueness check
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_reviews_user_business \
         ON reviews(user_id, business_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Migrations complete");
    Ok(())
}
