use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use type_registry::{TaggedValue, TypeRegistry};

use super::RedisSerializer;
use crate::errors::SerializationError;

/// JSON codec that records the concrete type of every value
///
/// `TypedJsonSerializer<AnyValue>` stores values of any registered type and
/// reads them back as their original type. `TypedJsonSerializer<T>` for a
/// concrete `T` only accepts payloads tagged as `T`.
pub struct TypedJsonSerializer<T> {
    registry: Arc<TypeRegistry>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: TaggedValue> TypedJsonSerializer<T> {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            _marker: PhantomData,
        }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }
}

impl<T> Clone for TypedJsonSerializer<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedJsonSerializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedJsonSerializer")
            .field("value_type", &std::any::type_name::<T>())
            .field("registered_tags", &self.registry.len())
            .finish()
    }
}

impl<T: TaggedValue> RedisSerializer<T> for TypedJsonSerializer<T> {
    fn serialize(&self, value: Option<&T>) -> Result<Vec<u8>, SerializationError> {
        let Some(value) = value else {
            return Ok(Vec::new());
        };

        let json = value
            .to_tagged_json()
            .map_err(|e| SerializationError::Serialization(e.to_string()))?;
        let bytes =
            serde_json::to_vec(&json).map_err(|e| SerializationError::Serialization(e.to_string()))?;

        #[cfg(feature = "debug-logging")]
        tracing::trace!(bytes = bytes.len(), "Serialized tagged value");

        Ok(bytes)
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<T>, SerializationError> {
        let bytes = match bytes {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Ok(None),
        };

        let text = std::str::from_utf8(bytes)
            .map_err(|e| SerializationError::Deserialization(format!("invalid UTF-8: {}", e)))?;
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| SerializationError::Deserialization(format!("invalid JSON: {}", e)))?;

        T::from_tagged_json(json, &self.registry)
            .map(Some)
            .map_err(|e| SerializationError::Deserialization(e.to_string()))
    }
}
