//! Cache manager implementation
//!
//! This module provides the CacheManager that hands out named Redis cache
//! regions, creating them on first use.

use crate::cache::RedisCache;
use crate::connection::ConnectionFactory;
use crate::params::RedisCacheConfiguration;
use crate::serializer::{RedisSerializer, TypedJsonSerializer};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, PoisonError, RwLock};
use type_registry::{AnyValue, TypeRegistry};

/// Redis-based cache manager
pub struct CacheManager {
    connection_factory: ConnectionFactory,
    defaults: RedisCacheConfiguration,
    configurations: HashMap<String, RedisCacheConfiguration>,
    serializer: Arc<dyn RedisSerializer<AnyValue>>,
    caches: RwLock<HashMap<String, Arc<RedisCache>>>,
}

impl Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("defaults", &self.defaults)
            .field("caches", &self.cache_names())
            .finish()
    }
}

impl CacheManager {
    /// Manager with default cache settings and the built-in type registry
    pub fn from_connection_factory(connection_factory: ConnectionFactory) -> Self {
        Self::builder(connection_factory).build()
    }

    pub fn builder(connection_factory: ConnectionFactory) -> CacheManagerBuilder {
        CacheManagerBuilder::new(connection_factory)
    }

    /// Get a cache region, creating it with its configured or default settings
    pub fn cache(&self, name: &str) -> Arc<RedisCache> {
        if let Some(cache) = self.get_cache(name) {
            return cache;
        }

        let mut caches = self.caches.write().unwrap_or_else(PoisonError::into_inner);
        caches
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(cache = name, "Creating cache");
                Arc::new(self.create_cache(name))
            })
            .clone()
    }

    /// Get an existing cache region
    pub fn get_cache(&self, name: &str) -> Option<Arc<RedisCache>> {
        self.caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Names of all created regions, sorted
    pub fn cache_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Settings applied to regions without their own configuration
    pub fn defaults(&self) -> &RedisCacheConfiguration {
        &self.defaults
    }

    pub fn connection_factory(&self) -> &ConnectionFactory {
        &self.connection_factory
    }

    fn create_cache(&self, name: &str) -> RedisCache {
        let config = self
            .configurations
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.defaults.clone());

        RedisCache::new(
            name,
            config,
            self.connection_factory.clone(),
            Arc::clone(&self.serializer),
        )
    }
}

/// Builder for [`CacheManager`]
pub struct CacheManagerBuilder {
    connection_factory: ConnectionFactory,
    defaults: RedisCacheConfiguration,
    configurations: HashMap<String, RedisCacheConfiguration>,
    initial_names: Vec<String>,
    serializer: Option<Arc<dyn RedisSerializer<AnyValue>>>,
    registry: Option<Arc<TypeRegistry>>,
}

impl CacheManagerBuilder {
    pub fn new(connection_factory: ConnectionFactory) -> Self {
        Self {
            connection_factory,
            defaults: RedisCacheConfiguration::default(),
            configurations: HashMap::new(),
            initial_names: Vec::new(),
            serializer: None,
            registry: None,
        }
    }

    pub fn cache_defaults(mut self, defaults: RedisCacheConfiguration) -> Self {
        self.defaults = defaults;
        self
    }

    /// Regions created eagerly with the default settings
    pub fn initial_cache_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initial_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Region created eagerly with its own settings
    pub fn with_cache_configuration(
        mut self,
        name: impl Into<String>,
        config: RedisCacheConfiguration,
    ) -> Self {
        self.configurations.insert(name.into(), config);
        self
    }

    /// Replace the value serializer of every region
    pub fn value_serializer(mut self, serializer: Arc<dyn RedisSerializer<AnyValue>>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    /// Registry used by the default value serializer
    pub fn type_registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> CacheManager {
        let serializer = self.serializer.unwrap_or_else(|| {
            let registry = self
                .registry
                .unwrap_or_else(|| Arc::new(TypeRegistry::with_defaults()));
            Arc::new(TypedJsonSerializer::<AnyValue>::new(registry))
        });

        let manager = CacheManager {
            connection_factory: self.connection_factory,
            defaults: self.defaults,
            configurations: self.configurations,
            serializer,
            caches: RwLock::new(HashMap::new()),
        };

        let configured: Vec<String> = manager.configurations.keys().cloned().collect();
        for name in self.initial_names.iter().chain(configured.iter()) {
            manager.cache(name);
        }

        manager
    }
}
