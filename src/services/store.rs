//! Record store: one financial document per identity, loaded whole and saved whole.
//!
//! Two backends sit behind the same calls: pretty-printed JSON files (`user_{id}.json`)
//! and a PostgreSQL table with one JSONB column per document section. The relational
//! backend keeps a short-lived document cache in front of its reads.
//!
//! There is no locking and no version check. Two writers racing on the same user both
//! load, both save, and the last save wins.

use serde_json::{json, Value};
use sqlx::Row;
use std::path::PathBuf;

use crate::config::{Config, StorageBackend};
use crate::database::{self, DatabasePool};
use crate::errors::StoreError;
use crate::models::{FinancialDocument, Identity, UserId};
use crate::services::cache::DocumentCache;

type Result<T> = std::result::Result<T, StoreError>;

#[derive(Clone, Debug)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn document_path(&self, user_id: UserId) -> PathBuf {
        self.data_dir.join(format!("user_{}.json", user_id))
    }

    pub async fn load(&self, user_id: UserId) -> Result<FinancialDocument> {
        let path = self.document_path(user_id);
        if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read_to_string(&path).await?;
            return Ok(serde_json::from_str(&raw)?);
        }

        tracing::info!("Creating default financial data for user {}", user_id);
        let default_data = FinancialDocument::new_default();
        if let Err(e) = self.save(user_id, &default_data).await {
            tracing::error!("Error saving default financial data for user {}: {}", user_id, e);
        }
        Ok(default_data)
    }

    pub async fn save(&self, user_id: UserId, data: &FinancialDocument) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        let path = self.document_path(user_id);
        let json = serde_json::to_string_pretty(data)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: DatabasePool,
    cache: DocumentCache,
}

impl PgStore {
    pub fn new(pool: DatabasePool, cache: DocumentCache) -> Self {
        Self { pool, cache }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    pub fn cache_key(user_id: UserId) -> String {
        format!("financial_data:{}", user_id)
    }

    pub async fn load(&self, user_id: UserId) -> Result<FinancialDocument> {
        let cache_key = Self::cache_key(user_id);
        if let Some(cached) = self.cache.get(&cache_key).await {
            tracing::debug!("Cache hit for {}", cache_key);
            return Ok(cached);
        }
        tracing::debug!("Cache miss for {}", cache_key);

        let row = sqlx::query(
            r#"
            SELECT profile, settings, capital, monthly_cash_flow,
                   expenses_from_savings, daily_income_tracker, extra
            FROM financial_data WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&*self.pool)
        .await?;

        match row {
            Some(row) => {
                let column = |name: &str| -> Result<Value> {
                    Ok(row.try_get::<Option<Value>, _>(name)?.unwrap_or(Value::Null))
                };
                let mut raw = json!({
                    "profile": column("profile")?,
                    "settings": column("settings")?,
                    "capital": column("capital")?,
                    "monthly_cash_flow": column("monthly_cash_flow")?,
                    "expenses_from_savings": column("expenses_from_savings")?,
                    "daily_income_tracker": column("daily_income_tracker")?,
                });
                if let (Value::Object(root), Value::Object(extra)) = (&mut raw, column("extra")?) {
                    for (key, value) in extra {
                        root.entry(key).or_insert(value);
                    }
                }
                strip_nulls(&mut raw);
                let data: FinancialDocument = serde_json::from_value(raw)?;
                self.cache.insert(cache_key, data.clone()).await;
                Ok(data)
            }
            None => {
                tracing::info!("Creating default financial data for user {}", user_id);
                let default_data = FinancialDocument::new_default();
                if let Err(e) = self.save(user_id, &default_data).await {
                    tracing::error!(
                        "Error saving default financial data for user {}: {}",
                        user_id,
                        e
                    );
                }
                Ok(default_data)
            }
        }
    }

    pub async fn save(&self, user_id: UserId, data: &FinancialDocument) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO financial_data
            (user_id, profile, settings, capital, monthly_cash_flow,
             expenses_from_savings, daily_income_tracker, extra, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, CURRENT_TIMESTAMP)
            ON CONFLICT (user_id)
            DO UPDATE SET
                profile = EXCLUDED.profile,
                settings = EXCLUDED.settings,
                capital = EXCLUDED.capital,
                monthly_cash_flow = EXCLUDED.monthly_cash_flow,
                expenses_from_savings = EXCLUDED.expenses_from_savings,
                daily_income_tracker = EXCLUDED.daily_income_tracker,
                extra = EXCLUDED.extra,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(user_id)
        .bind(sqlx::types::Json(&data.profile))
        .bind(sqlx::types::Json(&data.settings))
        .bind(sqlx::types::Json(&data.capital))
        .bind(sqlx::types::Json(&data.monthly_cash_flow))
        .bind(sqlx::types::Json(&data.expenses_from_savings))
        .bind(sqlx::types::Json(&data.daily_income_tracker))
        .bind(sqlx::types::Json(&data.extra))
        .execute(&*self.pool)
        .await?;

        let removed = self.cache.invalidate_matching(&user_id.to_string()).await;
        tracing::debug!("Invalidated {} cache entries for user {}", removed, user_id);
        Ok(())
    }
}

/// SQL NULL sections behave like missing keys so serde defaults apply.
fn strip_nulls(raw: &mut Value) {
    if let Value::Object(map) = raw {
        map.retain(|_, v| !v.is_null());
    }
}

/// The configured backend. Callers never branch on which one is active.
#[derive(Clone)]
pub enum RecordStore {
    Json(JsonStore),
    Postgres(PgStore),
}

impl RecordStore {
    /// Resolve the backend from config; connects and bootstraps the table for Postgres.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        match &config.storage {
            StorageBackend::Json { data_dir } => {
                tracing::info!("Using JSON document storage at {}", data_dir.display());
                Ok(RecordStore::Json(JsonStore::new(data_dir.clone())))
            }
            StorageBackend::Postgres { database_url } => {
                tracing::info!("Using PostgreSQL document storage");
                let pool = database::new_pool(database_url).await?;
                database::init_financial_tables(&pool).await?;
                let cache = DocumentCache::new(config.cache_ttl);
                Ok(RecordStore::Postgres(PgStore::new(pool, cache)))
            }
        }
    }

    /// Returns the stored document, creating and persisting the default shape on first
    /// access. Guests get their session data (or a fresh default) and nothing is written.
    pub async fn load(&self, identity: &Identity) -> Result<FinancialDocument> {
        let user_id = match identity {
            Identity::Guest(session) => {
                return Ok(session
                    .data
                    .clone()
                    .unwrap_or_else(FinancialDocument::new_default));
            }
            Identity::User(user_id) => *user_id,
        };

        let loaded = match self {
            RecordStore::Json(store) => store.load(user_id).await,
            RecordStore::Postgres(store) => store.load(user_id).await,
        };
        if let Err(e) = &loaded {
            tracing::error!("Error loading financial data for {}: {}", identity, e);
        }
        loaded
    }

    /// Full overwrite. A no-op for guests, whose data lives in their session.
    pub async fn save(&self, identity: &Identity, data: &FinancialDocument) -> Result<()> {
        let user_id = match identity {
            Identity::Guest(session) => {
                tracing::debug!("Skipping save for guest session {}", session.id);
                return Ok(());
            }
            Identity::User(user_id) => *user_id,
        };

        let saved = match self {
            RecordStore::Json(store) => store.save(user_id, data).await,
            RecordStore::Postgres(store) => store.save(user_id, data).await,
        };
        if let Err(e) = &saved {
            tracing::error!("Error saving financial data for {}: {}", identity, e);
        }
        saved
    }
}
