use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use crate::config::config;
use crate::database::{InMemoryStore, Store};
use crate::state::AppState;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides CAT_COLLECTOR_PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Keep everything in memory instead of Postgres")]
    pub memory: bool,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = config().clone();
    tracing::info!("Starting Cat Collector in {:?} mode", config.environment);

    if let Some(port) = args.port {
        config.server.port = port;
    }

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let store: Arc<dyn Store> = if args.memory {
        tracing::warn!("Using the in-memory store; data is lost on exit");
        Arc::new(InMemoryStore::new())
    } else {
        super::connect_store(&config).await?
    };

    let bind_addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let app = crate::app(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Cat Collector listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
