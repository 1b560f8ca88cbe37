//! Redis template
//!
//! Typed access to Redis strings and hashes. Keys and values go through
//! pluggable serializers before they reach the connection.

use crate::connection::ConnectionFactory;
use crate::errors::CacheError;
use crate::serializer::{RedisSerializer, StringRedisSerializer, TypedJsonSerializer};
use redis::AsyncCommands;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use type_registry::{AnyValue, TypeRegistry};

/// Redis operations over typed keys and values
pub struct RedisTemplate<K, V> {
    connection_factory: ConnectionFactory,
    key_serializer: Arc<dyn RedisSerializer<K>>,
    value_serializer: Arc<dyn RedisSerializer<V>>,
    hash_key_serializer: Arc<dyn RedisSerializer<K>>,
    hash_value_serializer: Arc<dyn RedisSerializer<V>>,
}

impl<K, V> Clone for RedisTemplate<K, V> {
    fn clone(&self) -> Self {
        Self {
            connection_factory: self.connection_factory.clone(),
            key_serializer: Arc::clone(&self.key_serializer),
            value_serializer: Arc::clone(&self.value_serializer),
            hash_key_serializer: Arc::clone(&self.hash_key_serializer),
            hash_value_serializer: Arc::clone(&self.hash_value_serializer),
        }
    }
}

impl<K, V> Debug for RedisTemplate<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisTemplate")
            .field("key_type", &std::any::type_name::<K>())
            .field("value_type", &std::any::type_name::<V>())
            .field("connection_factory", &self.connection_factory)
            .finish()
    }
}

impl RedisTemplate<String, AnyValue> {
    /// String keys and type-tagged JSON values
    pub fn with_defaults(connection_factory: ConnectionFactory, registry: Arc<TypeRegistry>) -> Self {
        Self::new(
            connection_factory,
            Arc::new(StringRedisSerializer),
            Arc::new(TypedJsonSerializer::<AnyValue>::new(registry)),
        )
    }
}

impl<K, V> RedisTemplate<K, V> {
    /// Create a template; hash fields and hash values reuse the key and value serializers
    pub fn new(
        connection_factory: ConnectionFactory,
        key_serializer: Arc<dyn RedisSerializer<K>>,
        value_serializer: Arc<dyn RedisSerializer<V>>,
    ) -> Self {
        Self {
            connection_factory,
            hash_key_serializer: Arc::clone(&key_serializer),
            hash_value_serializer: Arc::clone(&value_serializer),
            key_serializer,
            value_serializer,
        }
    }

    pub fn with_key_serializer(mut self, serializer: Arc<dyn RedisSerializer<K>>) -> Self {
        self.key_serializer = serializer;
        self
    }

    pub fn with_value_serializer(mut self, serializer: Arc<dyn RedisSerializer<V>>) -> Self {
        self.value_serializer = serializer;
        self
    }

    pub fn with_hash_key_serializer(mut self, serializer: Arc<dyn RedisSerializer<K>>) -> Self {
        self.hash_key_serializer = serializer;
        self
    }

    pub fn with_hash_value_serializer(mut self, serializer: Arc<dyn RedisSerializer<V>>) -> Self {
        self.hash_value_serializer = serializer;
        self
    }

    pub fn connection_factory(&self) -> &ConnectionFactory {
        &self.connection_factory
    }

    pub fn key_serializer(&self) -> &Arc<dyn RedisSerializer<K>> {
        &self.key_serializer
    }

    pub fn value_serializer(&self) -> &Arc<dyn RedisSerializer<V>> {
        &self.value_serializer
    }

    pub fn hash_key_serializer(&self) -> &Arc<dyn RedisSerializer<K>> {
        &self.hash_key_serializer
    }

    pub fn hash_value_serializer(&self) -> &Arc<dyn RedisSerializer<V>> {
        &self.hash_value_serializer
    }

    fn raw_key(&self, key: &K) -> Result<Vec<u8>, CacheError> {
        let raw = self.key_serializer.serialize(Some(key))?;
        if raw.is_empty() {
            return Err(CacheError::InvalidKey("key serialized to an empty string".into()));
        }
        Ok(raw)
    }

    fn raw_hash_key(&self, field: &K) -> Result<Vec<u8>, CacheError> {
        let raw = self.hash_key_serializer.serialize(Some(field))?;
        if raw.is_empty() {
            return Err(CacheError::InvalidKey("hash field serialized to an empty string".into()));
        }
        Ok(raw)
    }

    /// Store a value
    pub async fn set(&self, key: &K, value: &V) -> Result<(), CacheError> {
        let raw_key = self.raw_key(key)?;
        let raw_value = self.value_serializer.serialize(Some(value))?;
        let mut conn = self.connection_factory.connection().await?;

        let _: () = conn.set(&raw_key, &raw_value).await?;
        Ok(())
    }

    /// Store a value that expires after `ttl` seconds
    pub async fn set_with_ttl(&self, key: &K, value: &V, ttl: u64) -> Result<(), CacheError> {
        if ttl == 0 {
            return Err(CacheError::InvalidTtl(ttl));
        }
        let raw_key = self.raw_key(key)?;
        let raw_value = self.value_serializer.serialize(Some(value))?;
        let mut conn = self.connection_factory.connection().await?;

        let _: () = conn.set_ex(&raw_key, &raw_value, ttl).await?;
        Ok(())
    }

    /// Read a value, `None` when the key is missing or holds the empty encoding
    pub async fn get(&self, key: &K) -> Result<Option<V>, CacheError> {
        let raw_key = self.raw_key(key)?;
        let mut conn = self.connection_factory.connection().await?;

        let raw: Option<Vec<u8>> = conn.get(&raw_key).await?;
        Ok(self.value_serializer.deserialize(raw.as_deref())?)
    }

    /// Delete a key, returns whether it existed
    pub async fn delete(&self, key: &K) -> Result<bool, CacheError> {
        let raw_key = self.raw_key(key)?;
        let mut conn = self.connection_factory.connection().await?;

        let deleted: i32 = conn.del(&raw_key).await?;
        Ok(deleted > 0)
    }

    pub async fn has_key(&self, key: &K) -> Result<bool, CacheError> {
        let raw_key = self.raw_key(key)?;
        let mut conn = self.connection_factory.connection().await?;

        let exists: bool = conn.exists(&raw_key).await?;
        Ok(exists)
    }

    /// Set a key's time to live, returns whether the key exists
    pub async fn expire(&self, key: &K, ttl: u64) -> Result<bool, CacheError> {
        let seconds = i64::try_from(ttl)
            .ok()
            .filter(|seconds| *seconds > 0)
            .ok_or(CacheError::InvalidTtl(ttl))?;
        let raw_key = self.raw_key(key)?;
        let mut conn = self.connection_factory.connection().await?;

        let updated: bool = conn.expire(&raw_key, seconds).await?;
        Ok(updated)
    }

    /// Remaining time to live in seconds: -1 without expiry, -2 when missing
    pub async fn ttl(&self, key: &K) -> Result<i64, CacheError> {
        let raw_key = self.raw_key(key)?;
        let mut conn = self.connection_factory.connection().await?;

        let ttl: i64 = conn.ttl(&raw_key).await?;
        Ok(ttl)
    }

    pub async fn hash_put(&self, key: &K, field: &K, value: &V) -> Result<(), CacheError> {
        let raw_key = self.raw_key(key)?;
        let raw_field = self.raw_hash_key(field)?;
        let raw_value = self.hash_value_serializer.serialize(Some(value))?;
        let mut conn = self.connection_factory.connection().await?;

        let _: () = conn.hset(&raw_key, &raw_field, &raw_value).await?;
        Ok(())
    }

    pub async fn hash_get(&self, key: &K, field: &K) -> Result<Option<V>, CacheError> {
        let raw_key = self.raw_key(key)?;
        let raw_field = self.raw_hash_key(field)?;
        let mut conn = self.connection_factory.connection().await?;

        let raw: Option<Vec<u8>> = conn.hget(&raw_key, &raw_field).await?;
        Ok(self.hash_value_serializer.deserialize(raw.as_deref())?)
    }

    pub async fn hash_delete(&self, key: &K, field: &K) -> Result<bool, CacheError> {
        let raw_key = self.raw_key(key)?;
        let raw_field = self.raw_hash_key(field)?;
        let mut conn = self.connection_factory.connection().await?;

        let removed: i32 = conn.hdel(&raw_key, &raw_field).await?;
        Ok(removed > 0)
    }

    /// All fields of a hash; fields or values holding the empty encoding are skipped
    pub async fn hash_entries(&self, key: &K) -> Result<HashMap<K, V>, CacheError>
    where
        K: Eq + Hash,
    {
        let raw_key = self.raw_key(key)?;
        let mut conn = self.connection_factory.connection().await?;

        let raw: HashMap<Vec<u8>, Vec<u8>> = conn.hgetall(&raw_key).await?;
        let mut entries = HashMap::with_capacity(raw.len());
        for (raw_field, raw_value) in raw {
            let field = self.hash_key_serializer.deserialize(Some(raw_field.as_slice()))?;
            let value = self.hash_value_serializer.deserialize(Some(raw_value.as_slice()))?;
            if let (Some(field), Some(value)) = (field, value) {
                entries.insert(field, value);
            }
        }
        Ok(entries)
    }
}
