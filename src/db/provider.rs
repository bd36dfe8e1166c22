//! Connection provider.
//!
//! A single, explicitly constructed provider owns both database access paths:
//! a lazily created pooled handle used for introspection, and per-call raw
//! connections used by the execution gateway so every statement runs in its
//! own transaction boundary.
//!
//! The pooled handle is guarded by a `OnceCell`: at most one live pool per
//! process, created on first access. Only success is cached - a failed
//! creation (missing settings, unreachable server) is retried on the next
//! access.

use crate::error::{DbResult, ServerError};
use sqlx::Connection;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPool, PgPoolOptions, PgSslMode};
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::timeout;
use tracing::{debug, info};

/// Maximum connections in the pooled handle.
const POOL_MAX_CONNECTIONS: u32 = 10;

/// Discrete connection settings, taken from the process environment.
#[derive(Debug, Clone)]
pub struct DbSettings {
    pub host: Option<String>,
    pub port: u16,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub connect_timeout: Duration,
}

impl DbSettings {
    /// Validate that all required settings are present and non-empty.
    ///
    /// Returns the names of the missing environment variables on failure so
    /// the error message tells the operator exactly what to set.
    fn validated(&self) -> DbResult<(&str, &str, &str, &str)> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.trim().is_empty())
        }

        let host = present(&self.host);
        let database = present(&self.database);
        let user = present(&self.user);
        let password = present(&self.password);

        match (host, database, user, password) {
            (Some(host), Some(database), Some(user), Some(password)) => {
                Ok((host, database, user, password))
            }
            _ => {
                let mut missing = Vec::new();
                if host.is_none() {
                    missing.push("DB_HOST");
                }
                if database.is_none() {
                    missing.push("DB_NAME");
                }
                if user.is_none() {
                    missing.push("DB_USER");
                }
                if password.is_none() {
                    missing.push("DB_PASSWORD");
                }
                Err(ServerError::configuration(format!(
                    "Missing required database environment variables: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

/// Process-wide database access component.
///
/// Constructed once at startup and shared by reference (`Arc`) with every
/// tool handler.
#[derive(Debug)]
pub struct ConnectionProvider {
    settings: DbSettings,
    pool: OnceCell<PgPool>,
}

impl ConnectionProvider {
    /// Create a new provider. No connection is attempted until first use.
    pub fn new(settings: DbSettings) -> Self {
        Self {
            settings,
            pool: OnceCell::new(),
        }
    }

    /// Build the discrete connection options for a fresh, non-pooled
    /// connection. The target database requires an encrypted channel, so
    /// `sslmode=require` is always set.
    pub fn connect_options(&self) -> DbResult<PgConnectOptions> {
        let (host, database, user, password) = self.settings.validated()?;

        Ok(PgConnectOptions::new()
            .host(host)
            .port(self.settings.port)
            .database(database)
            .username(user)
            .password(password)
            .ssl_mode(PgSslMode::Require))
    }

    /// Get the pooled handle, creating it on first call.
    ///
    /// The pool validates liveness before each checkout
    /// (`test_before_acquire`), so a dead connection is replaced
    /// transparently rather than handed to a caller.
    pub async fn pool(&self) -> DbResult<&PgPool> {
        self.pool
            .get_or_try_init(|| async {
                let options = self.connect_options()?;
                info!(
                    host = self.settings.host.as_deref().unwrap_or_default(),
                    database = self.settings.database.as_deref().unwrap_or_default(),
                    "Creating database connection pool"
                );
                let pool = PgPoolOptions::new()
                    .max_connections(POOL_MAX_CONNECTIONS)
                    .acquire_timeout(self.settings.connect_timeout)
                    .test_before_acquire(true)
                    .connect_with(options)
                    .await?;
                Ok(pool)
            })
            .await
    }

    /// Open a fresh connection for a single statement.
    ///
    /// The execution gateway uses this so each statement gets its own
    /// transaction boundary; the connection is closed when the call ends.
    pub async fn raw_connection(&self) -> DbResult<PgConnection> {
        let options = self.connect_options()?;
        debug!("Opening raw connection for statement execution");
        match timeout(self.settings.connect_timeout, PgConnection::connect_with(&options)).await {
            Ok(result) => result.map_err(ServerError::from),
            Err(_) => Err(ServerError::driver(
                format!(
                    "Timed out connecting to the database after {}s",
                    self.settings.connect_timeout.as_secs()
                ),
                None,
            )),
        }
    }

    /// Run a lightweight round-trip on the pooled handle.
    pub async fn ping(&self) -> DbResult<()> {
        let pool = self.pool().await?;
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(pool)
            .await?;
        Ok(())
    }

    /// Close the pooled handle if it was created.
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            info!("Closing database connection pool");
            pool.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(
        host: Option<&str>,
        db: Option<&str>,
        user: Option<&str>,
        password: Option<&str>,
    ) -> DbSettings {
        DbSettings {
            host: host.map(String::from),
            port: 5432,
            database: db.map(String::from),
            user: user.map(String::from),
            password: password.map(String::from),
            connect_timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_connect_options_with_complete_settings() {
        let provider = ConnectionProvider::new(settings(
            Some("localhost"),
            Some("store"),
            Some("agent"),
            Some("secret"),
        ));
        assert!(provider.connect_options().is_ok());
    }

    #[test]
    fn test_missing_settings_name_every_variable() {
        let provider = ConnectionProvider::new(settings(None, None, Some("agent"), None));
        let err = provider.connect_options().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DB_HOST"));
        assert!(msg.contains("DB_NAME"));
        assert!(msg.contains("DB_PASSWORD"));
        assert!(!msg.contains("DB_USER"));
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let provider = ConnectionProvider::new(settings(
            Some(""),
            Some("store"),
            Some("agent"),
            Some("secret"),
        ));
        let err = provider.connect_options().unwrap_err();
        assert!(matches!(err, ServerError::Configuration { .. }));
        assert!(err.to_string().contains("DB_HOST"));
    }

    #[tokio::test]
    async fn test_pool_creation_failure_is_not_cached() {
        let provider = ConnectionProvider::new(settings(None, None, None, None));
        // Both calls must fail with the same configuration error: a failed
        // creation leaves the OnceCell empty so the next access retries.
        assert!(matches!(
            provider.pool().await,
            Err(ServerError::Configuration { .. })
        ));
        assert!(matches!(
            provider.pool().await,
            Err(ServerError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_raw_connection_requires_configuration() {
        let provider = ConnectionProvider::new(settings(None, None, None, None));
        assert!(matches!(
            provider.raw_connection().await,
            Err(ServerError::Configuration { .. })
        ));
    }
}
