//! Decision service lifecycle

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::Result;
use crate::routes::routes;
use crate::PolicyHandle;

/// Serve decisions on `bind` until `shutdown` resolves, then release the
/// policy.
pub async fn run(handle: PolicyHandle, bind: SocketAddr, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
    let handle = Arc::new(handle);
    let (addr, server) = warp::serve(routes(handle.clone())).try_bind_with_graceful_shutdown(bind, shutdown)?;

    tracing::info!(%addr, policy = %handle.describe(), "decision service listening");
    server.await;
    tracing::info!("decision service stopped");

    match Arc::try_unwrap(handle) {
        Ok(handle) => handle.shutdown(),
        Err(shared) => tracing::warn!(
            references = Arc::strong_count(&shared),
            "policy still referenced after shutdown"
        ),
    }
    Ok(())
}

/// Resolves on Ctrl-C
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
