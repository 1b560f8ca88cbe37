//! Convenience re-exports for common CacheHaus usage
//!
//! This prelude module re-exports the most commonly used items from the CacheHaus crates,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use cachehaus::prelude::*;
//!
//! // Now you have access to the context, templates, caches and value types
//! ```

// Core CacheHaus components
pub use crate::core::{CacheHaus, CacheHausBuilder, DefaultRedisTemplate, DEFAULT_TEMPLATE_NAME};
pub use crate::errors::CacheHausError;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, ConfigError, RedisConfig};

// Re-export cache system, which also brings the value types and serde
pub use cache_system::prelude::*;

// Common external dependencies
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;
