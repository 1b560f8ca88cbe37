//! Named cache regions
//!
//! A region stores values under `"{prefix}{name}::{key}"` using the
//! manager's value serializer.

use crate::connection::ConnectionFactory;
use crate::errors::CacheError;
use crate::params::RedisCacheConfiguration;
use crate::serializer::RedisSerializer;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use type_registry::{AnyValue, CacheValue};

/// Cache region operations
#[async_trait]
pub trait Cache: Send + Sync {
    fn name(&self) -> &str;

    /// Read an entry; a miss and a cached null both return `None`
    async fn get(&self, key: &str) -> Result<Option<AnyValue>, CacheError>;

    /// Write an entry; `None` stores a null marker when the region allows it
    async fn put(&self, key: &str, value: Option<&AnyValue>) -> Result<(), CacheError>;

    /// Remove an entry, returns whether it existed
    async fn evict(&self, key: &str) -> Result<bool, CacheError>;

    /// Remove every entry of the region, returns the number removed
    async fn clear(&self) -> Result<usize, CacheError>;
}

/// Redis-backed cache region
pub struct RedisCache {
    name: String,
    config: RedisCacheConfiguration,
    connection_factory: ConnectionFactory,
    serializer: Arc<dyn RedisSerializer<AnyValue>>,
}

impl Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish()
    }
}

impl RedisCache {
    pub fn new(
        name: impl Into<String>,
        config: RedisCacheConfiguration,
        connection_factory: ConnectionFactory,
        serializer: Arc<dyn RedisSerializer<AnyValue>>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            connection_factory,
            serializer,
        }
    }

    pub fn config(&self) -> &RedisCacheConfiguration {
        &self.config
    }

    /// Redis key for an entry of this region
    pub fn cache_key(&self, key: &str) -> String {
        self.config.cache_key(&self.name, key)
    }

    /// Read an entry as a concrete type
    pub async fn get_as<T: CacheValue>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let Some(value) = self.get(key).await? else {
            return Ok(None);
        };

        let found = value.type_name();
        value
            .downcast::<T>()
            .map(Some)
            .ok_or_else(|| CacheError::UnexpectedType {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
                found,
            })
    }

    /// Return the cached entry or compute, store and return it
    ///
    /// An entry of another type counts as a miss and is overwritten.
    pub async fn get_or_insert_with<T, F, Fut>(&self, key: &str, loader: F) -> Result<T, CacheError>
    where
        T: CacheValue + Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CacheError>>,
    {
        if let Some(cached) = self.get(key).await?.and_then(AnyValue::downcast::<T>) {
            return Ok(cached);
        }

        let value = loader().await?;
        self.put(key, Some(&AnyValue::new(value.clone()))).await?;
        Ok(value)
    }
}

#[async_trait]
impl Cache for RedisCache {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<AnyValue>, CacheError> {
        let cache_key = self.cache_key(key);
        let mut conn = self.connection_factory.connection().await?;

        let raw: Option<Vec<u8>> = conn.get(&cache_key).await?;
        tracing::trace!(cache = %self.name, key = %cache_key, hit = raw.is_some(), "Cache lookup");
        Ok(self.serializer.deserialize(raw.as_deref())?)
    }

    async fn put(&self, key: &str, value: Option<&AnyValue>) -> Result<(), CacheError> {
        if value.is_none() && !self.config.cache_null_values {
            return Err(CacheError::NullValueNotAllowed(self.name.clone()));
        }

        let cache_key = self.cache_key(key);
        let bytes = self.serializer.serialize(value)?;
        let mut conn = self.connection_factory.connection().await?;

        match self.config.ttl_seconds() {
            Some(ttl) => {
                let _: () = conn.set_ex(&cache_key, &bytes, ttl).await?;
            }
            None => {
                let _: () = conn.set(&cache_key, &bytes).await?;
            }
        }
        Ok(())
    }

    async fn evict(&self, key: &str) -> Result<bool, CacheError> {
        let cache_key = self.cache_key(key);
        let mut conn = self.connection_factory.connection().await?;

        let deleted: i32 = conn.del(&cache_key).await?;
        Ok(deleted > 0)
    }

    async fn clear(&self) -> Result<usize, CacheError> {
        if !self.config.use_prefix {
            // without a prefix the pattern would match the whole database
            return Err(CacheError::General(format!(
                "cache '{}' has no key prefix and cannot be cleared",
                self.name
            )));
        }

        let pattern = self.config.clear_pattern(&self.name);
        let mut conn = self.connection_factory.connection().await?;

        let keys: Vec<String> = conn.keys(&pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: usize = conn.del(keys).await?;
        tracing::debug!(cache = %self.name, deleted, "Cleared cache");
        Ok(deleted)
    }
}
