//! Application startup and lifecycle management.
//!
//! Startup is strictly sequential: the database must answer a ping before
//! the HTTP listener is bound.

use crate::config::{RecordConfig, SERVICE_NAME};
use crate::services::MongoDb;
use crate::{build_router, AppState};
use service_core::error::AppError;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connects to MongoDB and binds the HTTP listener.
    ///
    /// Any failure here is fatal to the caller; nothing is retried.
    pub async fn build(config: RecordConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb).await?;

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(service = SERVICE_NAME, port, "Server listening");

        Ok(Self {
            port,
            listener,
            state: AppState::new(db),
        })
    }

    /// Port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &mongodb::Database {
        self.state.db.database()
    }

    /// Serves requests until SIGINT or SIGTERM, then drains in-flight requests.
    pub async fn run_until_stopped(self) -> Result<(), AppError> {
        let router = build_router(self.state);

        tracing::info!(
            port = self.port,
            "Server is ready and accepting connections"
        );

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Service shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
