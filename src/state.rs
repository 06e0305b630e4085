use crate::config::AppConfig;
use crate::db;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Self::from_config(config).await
    }

    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let db = db::connect(&config.database).await?;
        Ok(Self {
            db,
            config: Arc::new(config),
        })
    }

    /// In-memory store with the schema already applied and no frontend bundle.
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        use crate::config::DatabaseTarget;

        let config = AppConfig {
            database: DatabaseTarget::Memory,
            host: "127.0.0.1".into(),
            port: 0,
            static_dir: "does-not-exist".into(),
        };
        let state = Self::from_config(config)
            .await
            .expect("in-memory database should open");
        db::sync_schema(&state.db)
            .await
            .expect("schema sync should succeed");
        state
    }
}
