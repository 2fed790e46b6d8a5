//! Listener binding and graceful shutdown.

use crate::config::ServerConfig;
use axum::Router;
use log::{info, warn};
use tokio::net::TcpListener;

/// Binds `config.socket_addr()` and serves `router` until Ctrl-C.
pub async fn serve(config: &ServerConfig, router: Router) -> std::io::Result<()> {
    let address = config.socket_addr();
    let listener = TcpListener::bind(&address).await?;
    info!("event=server_start module=http status=ok addr=http://{address}/");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=http status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=server_signal module=http status=error error_code=signal_failed error={err}");
        std::future::pending::<()>().await;
    }
}
