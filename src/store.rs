//! Per-request access to the relational store.
//!
//! Every request acquires its own connection through a [`ConnectionProvider`]
//! and hands it back with [`ConnectionProvider::release`] when it is done.
//! Nothing is shared between requests apart from the provider itself.

use crate::config::{ConfigError, StoreConfig};
use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, trace, warn};

/// Failures raised by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The connection could not be opened or did not answer a ping.
    #[error("Store unreachable: {0}")]
    Unreachable(#[source] DbErr),

    /// A statement failed while executing or while reading its rows.
    #[error("Store operation '{operation}' failed: {source}")]
    OperationFailed {
        operation: &'static str,
        #[source]
        source: DbErr,
    },

    #[error("No user account with id {0}")]
    NotFound(i64),
}

impl StoreError {
    pub fn operation(operation: &'static str) -> impl FnOnce(DbErr) -> StoreError {
        move |source| StoreError::OperationFailed { operation, source }
    }
}

/// Supplies live store connections to request handlers.
#[async_trait]
pub trait ConnectionProvider: Send + Sync + Debug {
    /// Opens a connection and verifies it answers before returning it.
    async fn acquire(&self) -> Result<DatabaseConnection, StoreError>;

    /// Gives a connection back once the request is finished with it.
    async fn release(&self, connection: DatabaseConnection) {
        if let Err(e) = connection.close().await {
            warn!("Failed to close store connection: {}", e);
        }
    }
}

/// Opens a fresh, single-connection pool per acquisition using fixed
/// coordinates supplied at start-up.
#[derive(Debug, Clone)]
pub struct StoreConnector {
    url: String,
    redacted_url: String,
    connect_timeout: Duration,
}

impl StoreConnector {
    pub fn new(config: &StoreConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            url: config.connection_url()?,
            redacted_url: config.redacted_url(),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        })
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.url.clone());
        options
            .max_connections(1)
            .connect_timeout(self.connect_timeout)
            .sqlx_logging(false);
        options
    }
}

#[async_trait]
impl ConnectionProvider for StoreConnector {
    async fn acquire(&self) -> Result<DatabaseConnection, StoreError> {
        trace!("Opening store connection to {}", self.redacted_url);

        let connection = Database::connect(self.connect_options())
            .await
            .map_err(|e| {
                error!(
                    "Failed to open store connection to {}: {}",
                    self.redacted_url,
                    e
                );
                StoreError::Unreachable(e)
            })?;

        if let Err(e) = connection.ping().await {
            error!("Store did not answer ping: {}", e);
            if let Err(close_err) = connection.close().await {
                debug!("Closing unresponsive connection also failed: {}", close_err);
            }
            return Err(StoreError::Unreachable(e));
        }

        debug!("Store connection established");
        Ok(connection)
    }
}

/// Hands out clones of one long-lived connection and never closes it.
///
/// Used where the store lives in-process, e.g. an in-memory SQLite database
/// that would vanish if its only connection were closed.
#[derive(Debug, Clone)]
pub struct SharedConnection {
    connection: DatabaseConnection,
}

impl SharedConnection {
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl ConnectionProvider for SharedConnection {
    async fn acquire(&self) -> Result<DatabaseConnection, StoreError> {
        self.connection
            .ping()
            .await
            .map_err(StoreError::Unreachable)?;
        Ok(self.connection.clone())
    }

    async fn release(&self, _connection: DatabaseConnection) {}
}
