#[cfg(test)]
pub mod test_utils {
    use crate::router::create_router;
    use crate::schemas::AppState;
    use crate::store::{ConnectionProvider, SharedConnection, StoreError};
    use async_trait::async_trait;
    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use model::entities::user_account;
    use sea_orm::{Database, DatabaseConnection, DbErr};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// A record with every field filled in; the id is left for the store.
    pub fn sample_account(id_number: &str, full_name: &str, role: &str) -> user_account::Model {
        user_account::Model {
            id: 0,
            id_number: id_number.to_string(),
            full_name: full_name.to_string(),
            username: full_name.to_lowercase().replace(' ', "."),
            password: "x".to_string(),
            section: "S1".to_string(),
            role: role.to_string(),
        }
    }

    /// Wraps a provider and counts how often a connection was acquired.
    #[derive(Debug)]
    pub struct CountingProvider {
        inner: SharedConnection,
        acquisitions: AtomicUsize,
    }

    impl CountingProvider {
        pub fn new(connection: DatabaseConnection) -> Self {
            Self {
                inner: SharedConnection::new(connection),
                acquisitions: AtomicUsize::new(0),
            }
        }

        pub fn acquisitions(&self) -> usize {
            self.acquisitions.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConnectionProvider for CountingProvider {
        async fn acquire(&self) -> Result<DatabaseConnection, StoreError> {
            self.acquisitions.fetch_add(1, Ordering::SeqCst);
            self.inner.acquire().await
        }

        async fn release(&self, connection: DatabaseConnection) {
            self.inner.release(connection).await
        }
    }

    /// A store that can never be reached.
    #[derive(Debug, Default)]
    pub struct UnreachableProvider;

    #[async_trait]
    impl ConnectionProvider for UnreachableProvider {
        async fn acquire(&self) -> Result<DatabaseConnection, StoreError> {
            Err(StoreError::Unreachable(DbErr::Conn(sea_orm::RuntimeErr::Internal(
                "connection refused".to_string(),
            ))))
        }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    ///
    /// # Returns
    ///
    /// A guard that will clean up the subscriber when dropped.
    pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create AppState backed by a fresh in-memory database
    pub async fn setup_test_app_state(strict_errors: bool) -> AppState {
        let db = setup_test_db().await;
        AppState::new(Arc::new(SharedConnection::new(db)), strict_errors)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        create_router(setup_test_app_state(false).await)
    }

    /// Create axum app whose provider reports how many connections were taken
    pub async fn setup_counting_app() -> (Router, Arc<CountingProvider>) {
        let provider = Arc::new(CountingProvider::new(setup_test_db().await));
        let state = AppState::new(provider.clone(), false);
        (create_router(state), provider)
    }

    /// Create axum app whose store is down
    pub fn setup_unreachable_app() -> Router {
        create_router(AppState::new(Arc::new(UnreachableProvider), false))
    }
}
