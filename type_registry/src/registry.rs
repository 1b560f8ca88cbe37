//! Type registry
//!
//! Maps a type tag to the function that rebuilds the tagged value. The
//! table is filled once at startup and then shared read-only.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;
use tracing::debug;

use crate::errors::RegistryError;
use crate::types::{AnyValue, CacheValue, TypeTagged};

type Decoder = fn(Value) -> serde_json::Result<AnyValue>;

struct Registration {
    decoder: Decoder,
    type_id: TypeId,
    type_name: &'static str,
}

fn decode_as<T>(payload: Value) -> serde_json::Result<AnyValue>
where
    T: CacheValue + DeserializeOwned,
{
    serde_json::from_value::<T>(payload).map(AnyValue::new)
}

/// Registry of decodable cache value types
#[derive(Default)]
pub struct TypeRegistry {
    entries: HashMap<&'static str, Registration>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in scalar, JSON, UUID and timestamp tags
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert::<String>();
        registry.insert::<bool>();
        registry.insert::<i64>();
        registry.insert::<u64>();
        registry.insert::<f64>();
        registry.insert::<serde_json::Value>();
        registry.insert::<uuid::Uuid>();
        registry.insert::<chrono::DateTime<chrono::Utc>>();
        registry
    }

    /// Register a type under its tag
    ///
    /// Registering the same type twice is a no-op. Binding a tag that is
    /// already taken by another type is an error.
    pub fn register<T>(&mut self) -> Result<&mut Self, RegistryError>
    where
        T: TypeTagged + CacheValue + DeserializeOwned,
    {
        if let Some(existing) = self.entries.get(T::TYPE_TAG) {
            if existing.type_id != TypeId::of::<T>() {
                return Err(RegistryError::DuplicateTag {
                    tag: T::TYPE_TAG,
                    existing: existing.type_name,
                    requested: std::any::type_name::<T>(),
                });
            }
            return Ok(self);
        }

        self.insert::<T>();
        Ok(self)
    }

    fn insert<T>(&mut self)
    where
        T: TypeTagged + CacheValue + DeserializeOwned,
    {
        debug!(tag = T::TYPE_TAG, "Registering cache value type");
        self.entries.insert(
            T::TYPE_TAG,
            Registration {
                decoder: decode_as::<T>,
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
            },
        );
    }

    /// Rebuild the value for a tag from its JSON payload
    pub fn decode(&self, tag: &str, payload: Value) -> Result<AnyValue, RegistryError> {
        let registration = self
            .entries
            .get(tag)
            .ok_or_else(|| RegistryError::UnknownTag(tag.to_string()))?;

        #[cfg(feature = "debug-logging")]
        tracing::trace!(tag, type_name = registration.type_name, "Decoding tagged value");

        (registration.decoder)(payload).map_err(|source| RegistryError::Decode {
            tag: tag.to_string(),
            source,
        })
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Rust type name bound to a tag
    pub fn type_name(&self, tag: &str) -> Option<&'static str> {
        self.entries.get(tag).map(|entry| entry.type_name)
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.entries.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_tag;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Account {
        name: String,
        age: u32,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Impostor {
        name: String,
    }

    type_tag! {
        Account => "test.Account",
        Impostor => "test.Account",
    }

    #[test]
    fn test_defaults_are_registered() {
        let registry = TypeRegistry::with_defaults();
        assert_eq!(
            registry.tags(),
            vec!["bool", "datetime", "f64", "i64", "json", "string", "u64", "uuid"]
        );
        assert_eq!(registry.type_name("string"), Some(std::any::type_name::<String>()));
    }

    #[test]
    fn test_register_and_decode() {
        let mut registry = TypeRegistry::new();
        registry.register::<Account>().unwrap();

        let value = registry
            .decode("test.Account", json!({"name": "a", "age": 1}))
            .unwrap();

        assert_eq!(
            value.downcast::<Account>(),
            Some(Account {
                name: "a".to_string(),
                age: 1
            })
        );
    }

    #[test]
    fn test_register_same_type_twice() {
        let mut registry = TypeRegistry::new();
        registry
            .register::<Account>()
            .unwrap()
            .register::<Account>()
            .unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_conflicting_tag_is_rejected() {
        let mut registry = TypeRegistry::new();
        registry.register::<Account>().unwrap();

        let err = registry.register::<Impostor>().unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTag { tag: "test.Account", .. }));
        // the first binding survives
        assert!(registry.decode("test.Account", json!({"name": "a", "age": 1})).is_ok());
    }

    #[test]
    fn test_unknown_tag() {
        let registry = TypeRegistry::with_defaults();
        let err = registry.decode("test.Missing", json!({})).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownTag(tag) if tag == "test.Missing"));
    }

    #[test]
    fn test_payload_not_matching_type() {
        let mut registry = TypeRegistry::new();
        registry.register::<Account>().unwrap();

        let err = registry.decode("test.Account", json!({"name": 5})).unwrap_err();
        assert!(matches!(err, RegistryError::Decode { .. }));
    }

    #[test]
    fn test_empty_registry() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains("string"));
    }
}
