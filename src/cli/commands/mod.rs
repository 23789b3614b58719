pub mod migrate;
pub mod serve;
pub mod user;

use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgStore, Store};

/// Connect to Postgres, creating the tables first when configured to
pub(crate) async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the database")?;

    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await.context("failed to create tables")?;
    }

    Ok(Arc::new(PgStore::new(pool)))
}
