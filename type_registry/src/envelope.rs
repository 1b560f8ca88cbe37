//! Tagged JSON envelope
//!
//! Objects carry their tag inline: `{"@type":"app.User","name":"a"}`.
//! Everything else is wrapped: `{"@type":"string","@value":"a"}`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::RegistryError;
use crate::registry::TypeRegistry;
use crate::types::{AnyValue, CacheValue, TypeTagged};

pub const TYPE_KEY: &str = "@type";
pub const VALUE_KEY: &str = "@value";

/// Attach a type tag to a JSON value
pub fn embed_tag(tag: &str, value: Value) -> Value {
    match value {
        Value::Object(mut map) if !map.contains_key(TYPE_KEY) && !map.contains_key(VALUE_KEY) => {
            map.insert(TYPE_KEY.to_string(), Value::String(tag.to_string()));
            Value::Object(map)
        }
        other => {
            let mut map = Map::with_capacity(2);
            map.insert(TYPE_KEY.to_string(), Value::String(tag.to_string()));
            map.insert(VALUE_KEY.to_string(), other);
            Value::Object(map)
        }
    }
}

/// Separate the type tag from its payload
pub fn split_tag(value: Value) -> Result<(String, Value), RegistryError> {
    let Value::Object(mut map) = value else {
        return Err(RegistryError::MissingTag);
    };

    let tag = match map.remove(TYPE_KEY) {
        Some(Value::String(tag)) => tag,
        _ => return Err(RegistryError::MissingTag),
    };

    if map.len() == 1
        && let Some(inner) = map.remove(VALUE_KEY)
    {
        return Ok((tag, inner));
    }

    Ok((tag, Value::Object(map)))
}

/// Values that can be written to and read from the tagged envelope
///
/// Concrete types only accept their own tag. `AnyValue` resolves the tag
/// through the registry and accepts every registered type.
pub trait TaggedValue: Sized + Send + Sync + 'static {
    fn to_tagged_json(&self) -> serde_json::Result<Value>;

    fn from_tagged_json(value: Value, registry: &TypeRegistry) -> Result<Self, RegistryError>;
}

impl TaggedValue for AnyValue {
    fn to_tagged_json(&self) -> serde_json::Result<Value> {
        let payload = self.as_value().to_json()?;
        Ok(embed_tag(self.type_tag(), payload))
    }

    fn from_tagged_json(value: Value, registry: &TypeRegistry) -> Result<Self, RegistryError> {
        let (tag, payload) = split_tag(value)?;
        registry.decode(&tag, payload)
    }
}

impl<T> TaggedValue for T
where
    T: TypeTagged + CacheValue + DeserializeOwned,
{
    fn to_tagged_json(&self) -> serde_json::Result<Value> {
        Ok(embed_tag(T::TYPE_TAG, self.to_json()?))
    }

    fn from_tagged_json(value: Value, _registry: &TypeRegistry) -> Result<Self, RegistryError> {
        let (tag, payload) = split_tag(value)?;
        if tag != T::TYPE_TAG {
            return Err(RegistryError::TagMismatch {
                expected: T::TYPE_TAG,
                found: tag,
            });
        }
        serde_json::from_value(payload).map_err(|source| RegistryError::Decode { tag, source })
    }
}
