use anyhow::{Context, Result};
use plancal_core::PlanCalConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plancal_server::app;
use plancal_server::state::{AppState, EventStore};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plancal_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PlanCalConfig::load()?;

    let store = match config.seed_path() {
        Some(path) => EventStore::from_seed_file(&path)
            .with_context(|| format!("Could not load seed file {}", path.display()))?,
        None => EventStore::default(),
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Could not bind {}", config.bind_addr))?;
    tracing::info!("plancal-server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app(AppState::new(store)))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
