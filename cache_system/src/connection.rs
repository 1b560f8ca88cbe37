//! Redis connection factory
//!
//! Opens the client for the configured server and shares one lazily created
//! multiplexed connection between templates and caches.

use crate::errors::CacheError;
use config::RedisConfig;
use redis::Client;
use redis::aio::MultiplexedConnection;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Source of Redis connections
#[derive(Clone)]
pub struct ConnectionFactory {
    client: Arc<Client>,
    connection_timeout: Duration,
    client_name: Option<String>,
    connection_pool: Arc<RwLock<Option<MultiplexedConnection>>>,
}

impl Debug for ConnectionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connection_status = match self.connection_pool.try_read() {
            Ok(pool) => {
                if pool.is_some() {
                    "connected"
                } else {
                    "no_connection"
                }
            }
            Err(_) => "lock_busy",
        };

        f.debug_struct("ConnectionFactory")
            .field("connection_timeout", &self.connection_timeout)
            .field("client_name", &self.client_name)
            .field("connected", &connection_status)
            .finish()
    }
}

impl ConnectionFactory {
    /// Create a factory for the configured server
    ///
    /// No connection is opened until the first command runs.
    pub fn new(config: &RedisConfig) -> Result<Self, CacheError> {
        let client = Client::open(config.connection_url().as_str())?;

        Ok(Self {
            client: Arc::new(client),
            connection_timeout: Duration::from_millis(config.connection_timeout_ms),
            client_name: config.client_name.clone(),
            connection_pool: Arc::new(RwLock::new(None)),
        })
    }

    /// Get or create the shared connection
    pub async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        if let Some(connection) = self.connection_pool.read().await.as_ref() {
            return Ok(connection.clone());
        }

        let mut pool = self.connection_pool.write().await;

        // Another task may have connected while we waited for the lock
        if let Some(connection) = pool.as_ref() {
            return Ok(connection.clone());
        }

        let mut connection = tokio::time::timeout(
            self.connection_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| CacheError::Timeout)??;

        if let Some(name) = &self.client_name {
            let _: () = redis::cmd("CLIENT")
                .arg("SETNAME")
                .arg(name)
                .query_async(&mut connection)
                .await?;
        }

        tracing::debug!(timeout = ?self.connection_timeout, "Opened Redis connection");
        *pool = Some(connection.clone());
        Ok(connection)
    }

    /// Drop the shared connection so the next command reconnects
    pub async fn reset(&self) {
        self.connection_pool.write().await.take();
    }

    /// Ping Redis to check connectivity
    pub async fn ping(&self) -> Result<String, CacheError> {
        let mut conn = self.connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong)
    }

    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }
}
