mod api;
mod middleware;

use std::sync::Arc;

use rhi_engine::{EngineSettings, RhiEngine};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = rhi_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let registry = Arc::new(rhi_core::load_indicators(&config.indicators_path)?);
    tracing::info!(
        path = %config.indicators_path.display(),
        components = registry.components().len(),
        indicators = registry.indicators().len(),
        "loaded indicator catalog"
    );

    let today = rhi_engine::resolve_today(&config);
    let store = rhi_engine::build_store(&config, &registry, today)?;
    let snapshot = Arc::new(store.snapshot());

    let engine = Arc::new(RhiEngine::new(
        registry,
        EngineSettings::from_app_config(&config),
    ));

    let state = AppState {
        engine,
        snapshot: Arc::clone(&snapshot),
        driver_limit: config.driver_limit,
        as_of: config.as_of_date,
    };
    let app = build_app(state, &config.frontend_origin);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        env = %config.env,
        addr = %config.bind_addr,
        store_version = snapshot.version(),
        observations = snapshot.observation_count(),
        "rhi-server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
