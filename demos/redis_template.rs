//! # Redis Template Example
//!
//! This example demonstrates the default Redis template:
//! - Building a CacheHaus context from configuration
//! - Registering an application type with its type tag
//! - Storing values of different types and reading them back as the same types
//! - Expiry and hash operations
//!
//! Requires a Redis server on localhost:6379, or REDIS_URL.

use cachehaus::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub tags: Vec<String>,
}

type_tag!(Product => "demo.Product");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cachehaus=debug,cache_system=debug,type_registry=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("🚀 CacheHaus Redis Template Example");
    println!("===================================");

    let redis = match std::env::var("REDIS_URL") {
        Ok(url) => RedisConfig::from_url(url),
        Err(_) => RedisConfig::new("localhost".to_string(), 6379, 0),
    };
    let config = AppConfig {
        redis,
        cache: CacheConfig::default(),
    };

    let cachehaus = CacheHaus::builder(config)
        .register_type::<Product>()?
        .build()?;

    if let Err(e) = cachehaus.health_check().await {
        println!("❌ Redis connection failed: {}", e);
        println!("💡 Please start Redis: docker run -d --name redis -p 6379:6379 redis:7-alpine");
        return Ok(());
    }
    println!("✅ Redis connection healthy");
    println!("📚 Registered type tags: {:?}", cachehaus.type_registry().tags());

    let template = cachehaus.redis_template()?;

    // 1. Values of different types under one template
    println!("\n📦 Storing values");
    let product = Product {
        id: Uuid::new_v4(),
        name: "Mechanical keyboard".to_string(),
        price_cents: 12900,
        tags: vec!["hardware".to_string(), "input".to_string()],
    };
    template
        .set(&"demo:product".to_string(), &AnyValue::new(product.clone()))
        .await?;
    template
        .set(&"demo:visits".to_string(), &AnyValue::new(42i64))
        .await?;
    template
        .set(&"demo:seen_at".to_string(), &AnyValue::new(Utc::now()))
        .await?;

    for key in ["demo:product", "demo:visits", "demo:seen_at"] {
        if let Some(value) = template.get(&key.to_string()).await? {
            println!("  {} -> {} ({})", key, value.type_tag(), value.type_name());
        }
    }

    let stored = template.get(&"demo:product".to_string()).await?;
    assert_eq!(stored.and_then(|v| v.downcast::<Product>()), Some(product));
    println!("✅ Product read back as Product");

    // 2. Expiry
    println!("\n⏱️  Expiry");
    template
        .set_with_ttl(&"demo:token".to_string(), &AnyValue::new("abc123".to_string()), 30)
        .await?;
    println!("  demo:token ttl = {}s", template.ttl(&"demo:token".to_string()).await?);

    // 3. Hashes
    println!("\n🗂️  Hash operations");
    let cart = "demo:cart".to_string();
    template
        .hash_put(&cart, &"keyboard".to_string(), &AnyValue::new(1i64))
        .await?;
    template
        .hash_put(&cart, &"note".to_string(), &AnyValue::new("gift wrap".to_string()))
        .await?;
    for (field, value) in template.hash_entries(&cart).await? {
        println!("  {} -> {:?}", field, value);
    }

    for key in ["demo:product", "demo:visits", "demo:seen_at", "demo:token", "demo:cart"] {
        template.delete(&key.to_string()).await?;
    }
    println!("\n🧹 Cleaned up demo keys");

    Ok(())
}
