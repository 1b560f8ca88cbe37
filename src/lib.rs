//! # CacheHaus
//!
//! Redis wiring for Rust applications: a type-preserving JSON value codec,
//! a typed Redis template and a cache manager handing out named regions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cachehaus::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! pub struct User {
//!     pub id: Uuid,
//!     pub name: String,
//! }
//!
//! type_tag!(User => "app.User");
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig {
//!         redis: RedisConfig::new("localhost".to_string(), 6379, 0),
//!         cache: CacheConfig::default().with_time_to_live(600),
//!     };
//!
//!     let cachehaus = CacheHaus::builder(config)
//!         .register_type::<User>()?
//!         .build()?;
//!
//!     let user = User { id: Uuid::new_v4(), name: "John Doe".to_string() };
//!
//!     let template = cachehaus.redis_template()?;
//!     template.set(&"user:1".to_string(), &AnyValue::new(user.clone())).await?;
//!
//!     let stored = template.get(&"user:1".to_string()).await?;
//!     assert_eq!(stored.and_then(|v| v.downcast::<User>()), Some(user));
//!
//!     let users = cachehaus.cache_manager().cache("users");
//!     let user = users
//!         .get_or_insert_with("2", || async {
//!             Ok(User { id: Uuid::new_v4(), name: "Jane Doe".to_string() })
//!         })
//!         .await?;
//!     println!("Cached user: {}", user.name);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::{CacheHaus, CacheHausBuilder, DefaultRedisTemplate, DEFAULT_TEMPLATE_NAME};
pub use errors::CacheHausError;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, RedisConfig};

// Re-export internal crates used by the public API
pub use cache_system;
pub use type_registry;

// Re-export external dependencies used in public API
pub use async_trait;
pub use tokio;
