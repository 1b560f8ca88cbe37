//! Core CacheHaus functionality
//!
//! This module contains the CacheHaus context: it owns the Redis connection
//! factory, the type registry, the default Redis template and the cache
//! manager, and keeps further templates by name.

use cache_system::{CacheManager, ConnectionFactory, RedisSerializer, RedisTemplate, TypedJsonSerializer};
use config::AppConfig;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use type_registry::{AnyValue, CacheValue, TypeRegistry, TypeTagged};

use crate::errors::CacheHausError;

/// Name under which the default template is registered
pub const DEFAULT_TEMPLATE_NAME: &str = "redisTemplate";

/// Template with string keys and type-tagged JSON values
pub type DefaultRedisTemplate = RedisTemplate<String, AnyValue>;

/// Main CacheHaus context that wires Redis access for an application
pub struct CacheHaus {
    config: AppConfig,
    connection_factory: ConnectionFactory,
    type_registry: Arc<TypeRegistry>,
    cache_manager: Arc<CacheManager>,
    templates: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for CacheHaus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheHaus")
            .field("connection_factory", &self.connection_factory)
            .field("type_registry", &self.type_registry)
            .field("cache_manager", &self.cache_manager)
            .field("templates", &self.list_templates())
            .finish()
    }
}

impl CacheHaus {
    /// Create a context with every component in its default form
    ///
    /// No connection is opened here; the first Redis command connects.
    pub fn new(config: AppConfig) -> Result<Self, CacheHausError> {
        Self::builder(config).build()
    }

    pub fn builder(config: AppConfig) -> CacheHausBuilder {
        CacheHausBuilder::new(config)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn connection_factory(&self) -> &ConnectionFactory {
        &self.connection_factory
    }

    pub fn type_registry(&self) -> &Arc<TypeRegistry> {
        &self.type_registry
    }

    pub fn cache_manager(&self) -> &Arc<CacheManager> {
        &self.cache_manager
    }

    /// The template registered as `redisTemplate`
    pub fn redis_template(&self) -> Result<&DefaultRedisTemplate, CacheHausError> {
        self.get_template(DEFAULT_TEMPLATE_NAME)
    }

    /// Register a template with a given name
    pub fn register_template<K, V>(
        &mut self,
        name: String,
        template: RedisTemplate<K, V>,
    ) -> Result<(), CacheHausError>
    where
        K: 'static,
        V: 'static,
    {
        if self.templates.contains_key(&name) {
            return Err(CacheHausError::TemplateAlreadyRegistered(name));
        }

        crate::debug_log!(template = %name, "Registering Redis template");
        self.templates.insert(name, Box::new(template));
        Ok(())
    }

    /// Get a registered template by name
    ///
    /// A template registered with other key or value types is reported as not found.
    pub fn get_template<K, V>(&self, name: &str) -> Result<&RedisTemplate<K, V>, CacheHausError>
    where
        K: 'static,
        V: 'static,
    {
        self.templates
            .get(name)
            .and_then(|template| template.downcast_ref::<RedisTemplate<K, V>>())
            .ok_or_else(|| CacheHausError::TemplateNotFound(name.to_string()))
    }

    /// List all registered template names
    pub fn list_templates(&self) -> Vec<&String> {
        let mut names: Vec<&String> = self.templates.keys().collect();
        names.sort();
        names
    }

    /// Remove a template by name
    pub fn unregister_template(&mut self, name: &str) -> Result<(), CacheHausError> {
        self.templates
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CacheHausError::TemplateNotFound(name.to_string()))
    }

    /// Check Redis connection health
    pub async fn health_check(&self) -> Result<(), CacheHausError> {
        let _reply = self.connection_factory.ping().await?;
        crate::trace_log!(reply = %_reply, "Redis health check");
        Ok(())
    }
}

/// Builder for [`CacheHaus`]
///
/// Every component that is not supplied is created with its default wiring.
pub struct CacheHausBuilder {
    config: AppConfig,
    connection_factory: Option<ConnectionFactory>,
    type_registry: Option<TypeRegistry>,
    value_serializer: Option<Arc<dyn RedisSerializer<AnyValue>>>,
    redis_template: Option<DefaultRedisTemplate>,
    cache_manager: Option<CacheManager>,
}

impl CacheHausBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            connection_factory: None,
            type_registry: None,
            value_serializer: None,
            redis_template: None,
            cache_manager: None,
        }
    }

    pub fn connection_factory(mut self, connection_factory: ConnectionFactory) -> Self {
        self.connection_factory = Some(connection_factory);
        self
    }

    /// Replace the type registry, including its built-in tags
    pub fn type_registry(mut self, registry: TypeRegistry) -> Self {
        self.type_registry = Some(registry);
        self
    }

    /// Add a value type to the registry
    pub fn register_type<T>(mut self) -> Result<Self, CacheHausError>
    where
        T: TypeTagged + CacheValue + DeserializeOwned,
    {
        self.type_registry
            .get_or_insert_with(TypeRegistry::with_defaults)
            .register::<T>()?;
        Ok(self)
    }

    /// Value codec used by the default template and the default cache manager
    pub fn value_serializer(mut self, serializer: Arc<dyn RedisSerializer<AnyValue>>) -> Self {
        self.value_serializer = Some(serializer);
        self
    }

    pub fn redis_template(mut self, template: DefaultRedisTemplate) -> Self {
        self.redis_template = Some(template);
        self
    }

    pub fn cache_manager(mut self, cache_manager: CacheManager) -> Self {
        self.cache_manager = Some(cache_manager);
        self
    }

    pub fn build(self) -> Result<CacheHaus, CacheHausError> {
        self.config.validate()?;

        let connection_factory = match self.connection_factory {
            Some(factory) => factory,
            None => ConnectionFactory::new(&self.config.redis)?,
        };
        let type_registry = Arc::new(self.type_registry.unwrap_or_else(TypeRegistry::with_defaults));
        let value_serializer = self.value_serializer.unwrap_or_else(|| {
            Arc::new(TypedJsonSerializer::<AnyValue>::new(Arc::clone(&type_registry)))
        });

        let redis_template = self.redis_template.unwrap_or_else(|| {
            crate::debug_log!("Using default Redis template");
            RedisTemplate::with_defaults(connection_factory.clone(), Arc::clone(&type_registry))
                .with_value_serializer(Arc::clone(&value_serializer))
                .with_hash_value_serializer(Arc::clone(&value_serializer))
        });

        let cache_manager = self.cache_manager.unwrap_or_else(|| {
            crate::debug_log!("Using default cache manager");
            CacheManager::builder(connection_factory.clone())
                .cache_defaults((&self.config.cache).into())
                .initial_cache_names(self.config.cache.cache_names.iter().cloned())
                .value_serializer(Arc::clone(&value_serializer))
                .build()
        });

        tracing::debug!(
            tags = type_registry.len(),
            caches = cache_manager.cache_names().len(),
            "CacheHaus context ready"
        );

        let mut context = CacheHaus {
            config: self.config,
            connection_factory,
            type_registry,
            cache_manager: Arc::new(cache_manager),
            templates: HashMap::new(),
        };
        context.register_template(DEFAULT_TEMPLATE_NAME.to_string(), redis_template)?;
        Ok(context)
    }
}
