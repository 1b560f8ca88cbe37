//! Cache system for Redis-based caching
//!
//! This crate provides Redis value codecs, a typed Redis template and a
//! cache manager handing out named cache regions.

pub mod cache;
pub mod connection;
pub mod errors;
pub mod manager;
pub mod params;
pub mod prelude;
pub mod serializer;
pub mod template;

// Re-export centralized config
pub use config::{CacheConfig, RedisConfig};

pub use cache::{Cache, RedisCache};
pub use connection::ConnectionFactory;
pub use errors::{CacheError, SerializationError};
pub use manager::{CacheManager, CacheManagerBuilder};
pub use params::RedisCacheConfiguration;
pub use serializer::{RedisSerializer, StringRedisSerializer, TypedJsonSerializer};
pub use template::RedisTemplate;
