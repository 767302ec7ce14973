//! Connection pool and migrations.

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::TRACING_TARGET;
use crate::error::{PgError, PgResult};

/// Embedded schema migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Database connection configuration.
#[derive(Debug, Clone)]
pub struct PgConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum pooled connections.
    pub max_connections: usize,
}

impl PgConfig {
    /// Creates a configuration with the default pool size.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 16,
        }
    }
}

/// Pooled PostgreSQL client.
#[derive(Clone)]
pub struct PgClient {
    pool: Pool<AsyncPgConnection>,
}

impl PgClient {
    /// Creates a connection pool from configuration.
    pub fn connect(config: &PgConfig) -> PgResult<Self> {
        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);

        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .build()
            .map_err(|e| PgError::Pool(e.to_string()))?;

        tracing::info!(
            target: TRACING_TARGET,
            max_connections = %config.max_connections,
            "Database pool initialized"
        );

        Ok(Self { pool })
    }

    /// Checks out a connection from the pool.
    pub async fn get_connection(&self) -> PgResult<Object<AsyncPgConnection>> {
        self.pool
            .get()
            .await
            .map_err(|e| PgError::Pool(e.to_string()))
    }
}

impl std::fmt::Debug for PgClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgClient")
            .field("status", &self.pool.status())
            .finish()
    }
}

/// Applies all pending migrations.
///
/// The migration harness is synchronous, so the async connection is
/// wrapped and driven on a blocking task.
pub async fn run_pending_migrations(database_url: &str) -> PgResult<()> {
    let connection = AsyncPgConnection::establish(database_url)
        .await
        .map_err(|e| PgError::Connection(e.to_string()))?;
    let mut wrapper: AsyncConnectionWrapper<AsyncPgConnection> =
        AsyncConnectionWrapper::from(connection);

    tokio::task::spawn_blocking(move || {
        let applied = wrapper
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| PgError::Migration(e.to_string()))?;

        tracing::info!(
            target: TRACING_TARGET,
            applied = %applied.len(),
            "Applied pending migrations"
        );

        Ok(())
    })
    .await
    .map_err(|e| PgError::Migration(e.to_string()))?
}
