//! Integration tests for the CacheHaus context wiring
//!
//! None of these tests need a running Redis server: the context never
//! connects until a command is issued.

use cachehaus::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub total_cents: i64,
    pub items: Vec<String>,
}

type_tag!(Order => "shop.Order");

fn app_config() -> AppConfig {
    AppConfig {
        redis: RedisConfig::new("localhost".to_string(), 6379, 0),
        cache: CacheConfig::default(),
    }
}

fn order() -> Order {
    Order {
        id: Uuid::nil(),
        total_cents: 1250,
        items: vec!["book".to_string(), "pen".to_string()],
    }
}

#[test]
fn test_default_wiring() {
    let cachehaus = CacheHaus::new(app_config()).unwrap();

    assert_eq!(cachehaus.list_templates(), vec![DEFAULT_TEMPLATE_NAME]);
    assert!(cachehaus.redis_template().is_ok());
    assert!(cachehaus.type_registry().contains("string"));
    assert!(!cachehaus.type_registry().contains("shop.Order"));
    assert!(cachehaus.cache_manager().cache_names().is_empty());
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = app_config();
    config.redis.port = 0;

    let err = CacheHaus::new(config).unwrap_err();
    assert!(matches!(err, CacheHausError::Config(_)));
}

#[test]
fn test_registered_types_reach_the_default_template() {
    let cachehaus = CacheHaus::builder(app_config())
        .register_type::<Order>()
        .unwrap()
        .build()
        .unwrap();
    let template = cachehaus.redis_template().unwrap();

    let bytes = template
        .value_serializer()
        .serialize(Some(&AnyValue::new(order())))
        .unwrap();
    let stored: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(stored["@type"], "shop.Order");
    assert_eq!(stored["total_cents"], 1250);

    let decoded = template
        .value_serializer()
        .deserialize(Some(bytes.as_slice()))
        .unwrap()
        .unwrap();
    assert_eq!(decoded.downcast::<Order>(), Some(order()));
}

#[test]
fn test_configured_caches_are_created_eagerly() {
    let mut config = app_config();
    config.cache = CacheConfig::default()
        .with_time_to_live(120)
        .with_key_prefix("shop:".to_string())
        .with_cache_names(vec!["orders".to_string(), "carts".to_string()]);

    let cachehaus = CacheHaus::new(config).unwrap();
    let manager = cachehaus.cache_manager();

    assert_eq!(manager.cache_names(), vec!["carts", "orders"]);
    assert_eq!(manager.defaults().ttl, Some(Duration::from_secs(120)));

    let orders = manager.get_cache("orders").unwrap();
    assert_eq!(orders.cache_key("7"), "shop:orders::7");
}

#[test]
fn test_template_registry() {
    let mut cachehaus = CacheHaus::new(app_config()).unwrap();
    let factory = cachehaus.connection_factory().clone();

    let strings = RedisTemplate::<String, String>::new(
        factory.clone(),
        Arc::new(StringRedisSerializer),
        Arc::new(StringRedisSerializer),
    );
    cachehaus
        .register_template("stringRedisTemplate".to_string(), strings)
        .unwrap();
    assert_eq!(
        cachehaus.list_templates(),
        vec![DEFAULT_TEMPLATE_NAME, "stringRedisTemplate"]
    );
    assert!(
        cachehaus
            .get_template::<String, String>("stringRedisTemplate")
            .is_ok()
    );

    // same name twice
    let again = RedisTemplate::<String, String>::new(
        factory,
        Arc::new(StringRedisSerializer),
        Arc::new(StringRedisSerializer),
    );
    let err = cachehaus
        .register_template("stringRedisTemplate".to_string(), again)
        .unwrap_err();
    assert!(matches!(err, CacheHausError::TemplateAlreadyRegistered(name) if name == "stringRedisTemplate"));

    // wrong key/value types
    let err = cachehaus
        .get_template::<String, String>(DEFAULT_TEMPLATE_NAME)
        .unwrap_err();
    assert!(matches!(err, CacheHausError::TemplateNotFound(_)));

    cachehaus.unregister_template("stringRedisTemplate").unwrap();
    assert!(matches!(
        cachehaus.unregister_template("stringRedisTemplate"),
        Err(CacheHausError::TemplateNotFound(_))
    ));
}

/// Codec that stores plain JSON without a type tag
#[derive(Debug)]
struct UntaggedSerializer;

impl RedisSerializer<AnyValue> for UntaggedSerializer {
    fn serialize(&self, value: Option<&AnyValue>) -> Result<Vec<u8>, SerializationError> {
        match value {
            None => Ok(Vec::new()),
            Some(value) => value
                .as_value()
                .to_json()
                .and_then(|json| serde_json::to_vec(&json))
                .map_err(|e| SerializationError::Serialization(e.to_string())),
        }
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<AnyValue>, SerializationError> {
        match bytes {
            None | Some([]) => Ok(None),
            Some(bytes) => serde_json::from_slice::<serde_json::Value>(bytes)
                .map(|value| Some(AnyValue::new(value)))
                .map_err(|e| SerializationError::Deserialization(e.to_string())),
        }
    }
}

#[test]
fn test_value_serializer_override() {
    let cachehaus = CacheHaus::builder(app_config())
        .value_serializer(Arc::new(UntaggedSerializer))
        .build()
        .unwrap();

    let template = cachehaus.redis_template().unwrap();
    let bytes = template
        .value_serializer()
        .serialize(Some(&AnyValue::new("plain".to_string())))
        .unwrap();
    assert_eq!(bytes, br#""plain""#.to_vec());

    let hash_bytes = template
        .hash_value_serializer()
        .serialize(Some(&AnyValue::new(json!({"a": 1}))))
        .unwrap();
    assert_eq!(hash_bytes, br#"{"a":1}"#.to_vec());
}

#[test]
fn test_component_overrides() {
    let registry = Arc::new(TypeRegistry::with_defaults());
    let factory = ConnectionFactory::new(&RedisConfig::from_url("redis://127.0.0.1:6380/2")).unwrap();

    let manager = CacheManager::builder(factory.clone())
        .type_registry(Arc::clone(&registry))
        .initial_cache_names(["custom"])
        .build();
    let template = RedisTemplate::with_defaults(factory.clone(), registry);

    let cachehaus = CacheHaus::builder(app_config())
        .connection_factory(factory)
        .cache_manager(manager)
        .redis_template(template)
        .build()
        .unwrap();

    assert_eq!(cachehaus.cache_manager().cache_names(), vec!["custom"]);
    assert!(cachehaus.redis_template().is_ok());
}
