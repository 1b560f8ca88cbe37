//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::cache::{Cache, RedisCache};
pub use crate::connection::ConnectionFactory;
pub use crate::errors::{CacheError, SerializationError};
pub use crate::manager::{CacheManager, CacheManagerBuilder};
pub use crate::params::RedisCacheConfiguration;
pub use crate::serializer::{RedisSerializer, StringRedisSerializer, TypedJsonSerializer};
pub use crate::template::RedisTemplate;

// Re-export centralized config
pub use config::{CacheConfig, RedisConfig};

// Cached value types
pub use type_registry::{type_tag, AnyValue, CacheValue, TypeRegistry, TypeTagged};

// Common external dependencies
pub use async_trait::async_trait;
pub use redis;
pub use serde::{Deserialize, Serialize};
pub use serde_json;
pub use tokio;
