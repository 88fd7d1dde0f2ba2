use std::{future::IntoFuture, net::SocketAddr, sync::Arc, time::Duration};

use tokio::{signal, sync::Notify};

mod app;
mod applications;
mod auth;
mod config;
mod db;
mod error;
mod jobs;
mod response;
mod state;
mod timestamp;

#[cfg(test)]
mod testing;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "jobboard=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let grace = config.server.shutdown_grace();

    let app_state = AppState::init(config).await?;
    sqlx::migrate!("./migrations").run(&app_state.db).await?;

    let app = app::build_app(app_state);

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let draining = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&draining)))
        .into_future();

    tokio::select! {
        res = server => res?,
        _ = force_close_after(draining, grace) => {
            tracing::warn!(grace_secs = grace.as_secs(), "in-flight requests still running; forcing shutdown");
        }
    }

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM and wakes the force-close timer.
async fn shutdown_signal(draining: Arc<Notify>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
        _ = ctrl_c => tracing::info!("received Ctrl+C, draining connections"),
        _ = terminate => tracing::info!("received SIGTERM, draining connections"),
    }
    draining.notify_one();
}

async fn force_close_after(draining: Arc<Notify>, grace: Duration) {
    draining.notified().await;
    tokio::time::sleep(grace).await;
}
