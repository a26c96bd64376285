use sqlx::PgPool;
use std::sync::Arc;

pub type DatabasePool = Arc<PgPool>;

pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    // sqlx negotiates TLS from the URL; hosted Postgres needs sslmode=require.
    let pool = PgPool::connect(database_url).await?;

    if database_url.contains("sslmode=require") || database_url.contains("sslmode=prefer") {
        tracing::info!("Database connection configured to use TLS");
    } else if !database_url.contains("localhost") && !database_url.contains("127.0.0.1") {
        tracing::warn!(
            "Connecting to remote database without explicit sslmode. Consider adding sslmode=require"
        );
    }

    Ok(pool)
}

pub async fn new_pool(database_url: &str) -> anyhow::Result<DatabasePool> {
    let pool = create_pool(database_url).await?;
    Ok(Arc::new(pool))
}

/// One row per user, one JSONB column per top-level document section, plus `extra` for
/// top-level keys outside those sections.
pub async fn init_financial_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS financial_data (
            user_id BIGINT PRIMARY KEY,
            profile JSONB DEFAULT '{}',
            settings JSONB DEFAULT '{}',
            capital JSONB DEFAULT '{}',
            monthly_cash_flow JSONB DEFAULT '[]',
            expenses_from_savings JSONB DEFAULT '[]',
            daily_income_tracker JSONB DEFAULT '[]',
            extra JSONB DEFAULT '{}',
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Tables created before top-level extra keys were stored.
    sqlx::query("ALTER TABLE financial_data ADD COLUMN IF NOT EXISTS extra JSONB DEFAULT '{}'")
        .execute(pool)
        .await?;

    tracing::info!("Financial tables initialized (PostgreSQL)");
    Ok(())
}
