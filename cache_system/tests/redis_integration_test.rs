//! Integration tests against a live Redis server
//!
//! Set REDIS_URL (e.g. redis://localhost:6379) to run them; without it every
//! test returns early.

use cache_system::prelude::*;
use rand::Rng;
use rand::distr::Alphanumeric;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    name: String,
    age: u32,
}

type_tag!(Profile => "test.Profile");

fn redis_config() -> Option<RedisConfig> {
    std::env::var("REDIS_URL").ok().map(RedisConfig::from_url)
}

fn random_key(prefix: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    format!("{}:{}", prefix, suffix)
}

fn registry() -> Arc<TypeRegistry> {
    let mut registry = TypeRegistry::with_defaults();
    registry.register::<Profile>().unwrap();
    Arc::new(registry)
}

fn profile() -> Profile {
    Profile {
        name: "a".to_string(),
        age: 1,
    }
}

#[tokio::test]
async fn test_template_value_round_trip() {
    let Some(config) = redis_config() else { return };
    let factory = ConnectionFactory::new(&config).unwrap();
    let template = RedisTemplate::with_defaults(factory, registry());

    let key = random_key("template");
    template.set(&key, &AnyValue::new(profile())).await.unwrap();

    let stored = template.get(&key).await.unwrap().unwrap();
    assert_eq!(stored.downcast::<Profile>(), Some(profile()));

    assert!(template.has_key(&key).await.unwrap());
    assert_eq!(template.ttl(&key).await.unwrap(), -1);
    assert!(template.delete(&key).await.unwrap());
    assert!(template.get(&key).await.unwrap().is_none());
    assert_eq!(template.ttl(&key).await.unwrap(), -2);
}

#[tokio::test]
async fn test_template_expiry() {
    let Some(config) = redis_config() else { return };
    let factory = ConnectionFactory::new(&config).unwrap();
    let template = RedisTemplate::with_defaults(factory, registry());

    let key = random_key("template");
    template
        .set_with_ttl(&key, &AnyValue::new("short".to_string()), 60)
        .await
        .unwrap();
    let ttl = template.ttl(&key).await.unwrap();
    assert!(ttl > 0 && ttl <= 60);

    assert!(template.expire(&key, 120).await.unwrap());
    assert!(template.ttl(&key).await.unwrap() > 60);

    template.delete(&key).await.unwrap();
    assert!(!template.expire(&key, 10).await.unwrap());
}

#[tokio::test]
async fn test_template_hash_operations() {
    let Some(config) = redis_config() else { return };
    let factory = ConnectionFactory::new(&config).unwrap();
    let template = RedisTemplate::with_defaults(factory, registry());

    let key = random_key("hash");
    let name = "name".to_string();
    let count = "count".to_string();

    template
        .hash_put(&key, &name, &AnyValue::new(profile()))
        .await
        .unwrap();
    template
        .hash_put(&key, &count, &AnyValue::new(3i64))
        .await
        .unwrap();

    let stored = template.hash_get(&key, &name).await.unwrap().unwrap();
    assert_eq!(stored.downcast_ref::<Profile>(), Some(&profile()));

    let entries = template.hash_entries(&key).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[&count].downcast_ref::<i64>(), Some(&3));

    assert!(template.hash_delete(&key, &count).await.unwrap());
    assert!(!template.hash_delete(&key, &count).await.unwrap());
    template.delete(&key).await.unwrap();
}

#[tokio::test]
async fn test_unregistered_type_is_a_deserialization_error() {
    let Some(config) = redis_config() else { return };
    let factory = ConnectionFactory::new(&config).unwrap();
    let writer = RedisTemplate::with_defaults(factory.clone(), registry());
    let reader = RedisTemplate::with_defaults(factory, Arc::new(TypeRegistry::with_defaults()));

    let key = random_key("template");
    writer.set(&key, &AnyValue::new(profile())).await.unwrap();

    let err = reader.get(&key).await.unwrap_err();
    assert!(matches!(
        err,
        CacheError::Serialization(SerializationError::Deserialization(_))
    ));
    writer.delete(&key).await.unwrap();
}

#[tokio::test]
async fn test_cache_manager_regions() {
    let Some(config) = redis_config() else { return };
    let factory = ConnectionFactory::new(&config).unwrap();
    let region = random_key("region");

    let manager = CacheManager::builder(factory)
        .type_registry(registry())
        .cache_defaults(RedisCacheConfiguration::default().entry_ttl(Duration::from_secs(60)))
        .build();
    let cache = manager.cache(&region);

    cache.put("1", Some(&AnyValue::new(profile()))).await.unwrap();
    cache.put("2", Some(&AnyValue::new(2i64))).await.unwrap();
    cache.put("3", None).await.unwrap();

    assert_eq!(cache.get_as::<Profile>("1").await.unwrap(), Some(profile()));
    assert!(matches!(
        cache.get_as::<Profile>("2").await,
        Err(CacheError::UnexpectedType { .. })
    ));
    assert!(cache.get("3").await.unwrap().is_none());
    assert!(cache.get("missing").await.unwrap().is_none());

    assert!(cache.evict("2").await.unwrap());
    assert_eq!(cache.clear().await.unwrap(), 2);
    assert!(cache.get("1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_or_insert_with_loads_once() {
    let Some(config) = redis_config() else { return };
    let factory = ConnectionFactory::new(&config).unwrap();
    let manager = CacheManager::builder(factory).type_registry(registry()).build();
    let cache = manager.cache(&random_key("loader"));

    let loaded = cache
        .get_or_insert_with("p", || async { Ok(profile()) })
        .await
        .unwrap();
    assert_eq!(loaded, profile());

    let cached = cache
        .get_or_insert_with("p", || async {
            Err::<Profile, _>(CacheError::General("loader must not run on a hit".into()))
        })
        .await
        .unwrap();
    assert_eq!(cached, profile());

    cache.clear().await.unwrap();
}
