use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace, warn};

use crate::config::AppConfig;
use crate::router::create_router;
use crate::schemas::AppState;
use crate::store::{ConnectionProvider, StoreConnector};

pub async fn serve(config: AppConfig) -> Result<()> {
    trace!("Entering serve function");
    info!("User account service starting up");
    debug!("Store: {}", config.store.redacted_url());
    debug!("Bind address: {}", config.server.bind_address);
    debug!("Strict errors: {}", config.server.strict_errors);

    // Connections are opened per request; this only reports the store's state early
    trace!("Probing store");
    let connector = StoreConnector::new(&config.store)?;
    match connector.acquire().await {
        Ok(connection) => {
            debug!("Store reachable at start-up");
            connector.release(connection).await;
        }
        Err(e) => {
            warn!("Store not reachable at start-up, requests will fail until it is: {}", e);
        }
    }

    trace!("Creating application router");
    let state = AppState::new(Arc::new(connector), config.server.strict_errors);
    let app = create_router(state);
    debug!("Router created successfully");

    let bind_address = &config.server.bind_address;
    info!("Starting server on {}", bind_address);
    let listener = match TcpListener::bind(bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("User account API running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    trace!("Starting axum server");
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
