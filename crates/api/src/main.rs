use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use advisorhub_api::app::{build_app, AppServices};
use advisorhub_api::config::Config;
use advisorhub_auth::Hs256Jwt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let _log_guard = advisorhub_observability::init(&config.observability())?;

    let jwt = Hs256Jwt::new(config.jwt_secret().as_bytes(), config.jwt_expiration);

    let services = match config.database_url.as_deref() {
        Some(url) => {
            let pool = advisorhub_infra::postgres::connect(url, config.db_max_connections)
                .await
                .context("failed to connect to database")?;
            tracing::info!("connected to PostgreSQL");
            AppServices::postgres(pool, jwt)
                .await
                .context("failed to prepare database schema")?
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            AppServices::in_memory(jwt)
        }
    };

    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
