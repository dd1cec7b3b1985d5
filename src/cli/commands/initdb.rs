use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, error, info, trace};

use crate::config::StoreConfig;

pub async fn init_database(store: &StoreConfig) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");
    debug!("Store: {}", store.redacted_url());

    let db: DatabaseConnection = match Database::connect(store.connection_url()?).await {
        Ok(connection) => {
            info!("Successfully connected to database");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", store.redacted_url(), e);
            return Err(e.into());
        }
    };

    info!("Running database migrations");
    match Migrator::up(&db, None).await {
        Ok(_) => {
            info!("Database migrations completed successfully");
        }
        Err(e) => {
            error!("Failed to run database migrations: {}", e);
            return Err(e.into());
        }
    }

    if let Err(e) = db.close().await {
        debug!("Closing migration connection failed: {}", e);
    }

    info!("Database initialization completed successfully!");
    Ok(())
}
