//! Router assembly and serving.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use warden_auth::{AuthConfig, AuthLayer, TokenValidator};

use crate::routes::{AppState, router};

/// Every route behind the auth layer.
pub fn app<V: TokenValidator>(state: AppState, validator: Arc<V>, auth: AuthConfig) -> Router {
    if !auth.enabled {
        tracing::warn!("Authentication disabled; requests carry no session");
    }
    router(state).layer(AuthLayer::new(validator, auth))
}

/// Bind `addr` and serve `app` until Ctrl-C.
pub async fn serve(app: Router, addr: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Could not listen for shutdown signal");
        return;
    }
    tracing::info!("Shutting down");
}
