//! PostgreSQL client implementation
//!
//! Connection pooling over deadpool-postgres with optional TLS.

use crate::config::schema::PostgreSQLConfig;
use crate::domain::{Result, SinkError};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

/// PostgreSQL client for Chainsink
///
/// Each call checks a connection out of the pool, applies the configured
/// statement timeout and runs one statement.
pub struct PostgreSQLClient {
    pool: Pool,
    statement_timeout_seconds: u64,
    safe_connection_string: String,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// No connection is opened until the first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string or TLS setup is invalid, or
    /// the pool cannot be built.
    pub async fn new(config: &PostgreSQLConfig) -> Result<Self> {
        let raw = config.connection_string.expose_secret();
        let mut pg_config: tokio_postgres::Config = raw.parse().map_err(|e| {
            SinkError::Configuration(format!("Invalid PostgreSQL connection string: {}", e))
        })?;
        pg_config.connect_timeout(Duration::from_secs(config.connection_timeout_seconds));

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = match config.ssl_mode.as_str() {
            "disable" => {
                pg_config.ssl_mode(SslMode::Disable);
                Manager::from_config(pg_config, NoTls, manager_config)
            }
            mode => {
                pg_config.ssl_mode(if mode == "require" {
                    SslMode::Require
                } else {
                    SslMode::Prefer
                });
                Manager::from_config(pg_config, tls_connector()?, manager_config)
            }
        };

        let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| SinkError::Database(format!("Failed to create connection pool: {}", e)))?;

        let safe_connection_string = redact_connection_string(raw);
        tracing::debug!(
            target_db = %safe_connection_string,
            max_connections = config.max_connections,
            ssl_mode = %config.ssl_mode,
            "PostgreSQL pool created"
        );

        Ok(Self {
            pool,
            statement_timeout_seconds: config.statement_timeout_seconds,
            safe_connection_string,
        })
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| SinkError::Database(format!("Connection test failed: {}", e)))?;

        tracing::info!(
            target_db = %self.safe_connection_string,
            "PostgreSQL connection test successful"
        );
        Ok(())
    }

    /// Get a connection from the pool with the statement timeout applied
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        let client = self.pool.get().await.map_err(|e| {
            SinkError::Database(format!("Failed to get connection from pool: {}", e))
        })?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.statement_timeout_seconds * 1000
        );
        client
            .batch_execute(&timeout_query)
            .await
            .map_err(|e| SinkError::Database(format!("Failed to set statement timeout: {}", e)))?;

        Ok(client)
    }

    /// Execute a query and return rows
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn query(&self, query: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>> {
        let client = self.get_connection().await?;

        client
            .query(query, params)
            .await
            .map_err(|e| SinkError::Database(format!("Query failed: {}", e)))
    }

    /// Execute a statement and return the number of affected rows
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn execute(&self, statement: &str, params: &[&(dyn ToSql + Sync)]) -> Result<u64> {
        let client = self.get_connection().await?;

        let prepared = client
            .prepare_cached(statement)
            .await
            .map_err(|e| SinkError::Database(format!("Failed to prepare statement: {}", e)))?;

        client
            .execute(&prepared, params)
            .await
            .map_err(|e| SinkError::Database(format!("Statement execution failed: {}", e)))
    }

    /// Connection string with the password removed, safe for logs
    pub fn connection_string_safe(&self) -> &str {
        &self.safe_connection_string
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

fn tls_connector() -> Result<MakeTlsConnector> {
    let connector = TlsConnector::builder()
        .build()
        .map_err(|e| SinkError::Configuration(format!("Failed to build TLS connector: {}", e)))?;
    Ok(MakeTlsConnector::new(connector))
}

/// Replace the password of a URL-style connection string with `***`
///
/// Key/value connection strings cannot be parsed reliably, so they are
/// replaced entirely.
pub fn redact_connection_string(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            if parsed.password().is_some() && parsed.set_password(Some("***")).is_err() {
                return "postgresql://***".to_string();
            }
            parsed.to_string()
        }
        Err(_) => "postgresql://***".to_string(),
    }
}
