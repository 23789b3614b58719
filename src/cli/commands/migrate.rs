use anyhow::Context;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::config;
use crate::database::{schema, DatabaseManager};

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config().database)
        .await
        .context("failed to connect to the database")?;

    DatabaseManager::migrate(&pool).await.context("failed to create tables")?;

    output_success(
        &output_format,
        "Database schema is up to date",
        Some(serde_json::json!({ "statements": schema::STATEMENTS.len() })),
    )
}
