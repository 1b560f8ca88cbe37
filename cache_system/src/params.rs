//! Cache region parameters
//!
//! This module defines the per-cache settings: expiration, null handling
//! and how entry keys are built.

use config::CacheConfig;
use std::time::Duration;

/// Separator between the cache name and the entry key
pub const CACHE_KEY_SEPARATOR: &str = "::";

/// Settings applied to every entry of one cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisCacheConfiguration {
    /// Entry expiration; `None` or a zero duration keeps entries until evicted
    pub ttl: Option<Duration>,
    /// Store the empty encoding for `None` instead of rejecting it
    pub cache_null_values: bool,
    /// Extra prefix placed before the cache name
    pub key_prefix: Option<String>,
    /// When false, entry keys are written to Redis unchanged
    pub use_prefix: bool,
}

impl Default for RedisCacheConfiguration {
    fn default() -> Self {
        Self {
            ttl: None,
            cache_null_values: true,
            key_prefix: None,
            use_prefix: true,
        }
    }
}

impl RedisCacheConfiguration {
    pub fn entry_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn disable_caching_null_values(mut self) -> Self {
        self.cache_null_values = false;
        self
    }

    pub fn prefix_cache_name_with(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn disable_key_prefix(mut self) -> Self {
        self.use_prefix = false;
        self
    }

    /// Redis key of `key` inside the cache `cache_name`
    pub fn cache_key(&self, cache_name: &str, key: &str) -> String {
        if !self.use_prefix {
            return key.to_string();
        }
        format!(
            "{}{}{}{}",
            self.key_prefix.as_deref().unwrap_or_default(),
            cache_name,
            CACHE_KEY_SEPARATOR,
            key
        )
    }

    /// TTL in whole seconds, at least one; `None` when entries never expire
    pub(crate) fn ttl_seconds(&self) -> Option<u64> {
        self.ttl
            .filter(|ttl| !ttl.is_zero())
            .map(|ttl| ttl.as_secs().max(1))
    }

    /// `KEYS` pattern matching every entry of the cache `cache_name`
    pub(crate) fn clear_pattern(&self, cache_name: &str) -> String {
        format!(
            "{}{}{}*",
            escape_glob(self.key_prefix.as_deref().unwrap_or_default()),
            escape_glob(cache_name),
            CACHE_KEY_SEPARATOR
        )
    }
}

fn escape_glob(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl From<&CacheConfig> for RedisCacheConfiguration {
    fn from(config: &CacheConfig) -> Self {
        Self {
            ttl: config.time_to_live_seconds.map(Duration::from_secs),
            cache_null_values: config.cache_null_values,
            key_prefix: config.key_prefix.clone(),
            use_prefix: config.use_key_prefix,
        }
    }
}
