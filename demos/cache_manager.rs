//! # Cache Manager Example
//!
//! This example demonstrates named cache regions:
//! - Loading configuration from cachehaus.toml (or defaults)
//! - Per-region settings
//! - Read-through loading with cache hits vs misses
//! - Null values and eviction
//!
//! Requires a Redis server on localhost:6379.

use cachehaus::prelude::*;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub display_name: String,
    pub email: String,
}

type_tag!(UserProfile => "demo.UserProfile");

async fn load_profile(id: u64) -> Result<UserProfile, CacheError> {
    // stands in for a slow database query
    tokio::time::sleep(Duration::from_millis(200)).await;
    Ok(UserProfile {
        id,
        display_name: format!("User {}", id),
        email: format!("user{}@example.com", id),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cachehaus=info,cache_system=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("🚀 CacheHaus Cache Manager Example");
    println!("==================================");

    let config = AppConfig::load().unwrap_or_else(|e| {
        println!("ℹ️  Using default configuration ({})", e);
        AppConfig {
            redis: RedisConfig::default(),
            cache: CacheConfig::default()
                .with_time_to_live(600)
                .with_key_prefix("demo:".to_string())
                .with_cache_names(vec!["profiles".to_string()]),
        }
    });

    let connection_factory = ConnectionFactory::new(&config.redis)?;
    let cache_manager = CacheManager::builder(connection_factory.clone())
        .cache_defaults((&config.cache).into())
        .initial_cache_names(config.cache.cache_names.clone())
        .with_cache_configuration(
            "sessions",
            RedisCacheConfiguration::from(&config.cache)
                .entry_ttl(Duration::from_secs(30))
                .disable_caching_null_values(),
        )
        .type_registry({
            let mut registry = TypeRegistry::with_defaults();
            registry.register::<UserProfile>()?;
            std::sync::Arc::new(registry)
        })
        .build();

    let cachehaus = CacheHaus::builder(config)
        .register_type::<UserProfile>()?
        .connection_factory(connection_factory)
        .cache_manager(cache_manager)
        .build()?;

    if let Err(e) = cachehaus.health_check().await {
        println!("❌ Redis connection failed: {}", e);
        println!("💡 Please start Redis: docker run -d --name redis -p 6379:6379 redis:7-alpine");
        return Ok(());
    }

    let manager = cachehaus.cache_manager();
    println!("🗄️  Cache regions: {:?}", manager.cache_names());

    // 1. Read-through loading
    println!("\n🔍 Cache hits vs misses");
    let profiles = manager.cache("profiles");
    profiles.evict("7").await?;
    for attempt in 1..=2 {
        let start = Instant::now();
        let profile = profiles.get_or_insert_with("7", || load_profile(7)).await?;
        println!(
            "  attempt {}: {} in {:?}",
            attempt,
            profile.display_name,
            start.elapsed()
        );
    }

    // 2. Null values
    println!("\n∅ Null values");
    profiles.put("missing", None).await?;
    println!("  profiles/missing -> {:?}", profiles.get("missing").await?);

    let sessions = manager.cache("sessions");
    match sessions.put("missing", None).await {
        Err(CacheError::NullValueNotAllowed(name)) => {
            println!("  '{}' does not accept null values", name)
        }
        other => println!("  unexpected result: {:?}", other),
    }

    // 3. Eviction
    println!("\n🧹 Clearing regions");
    println!("  profiles: {} entries removed", profiles.clear().await?);
    println!("  sessions: {} entries removed", sessions.clear().await?);

    Ok(())
}
