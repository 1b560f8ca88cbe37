//! Redis value codecs
//!
//! A serializer turns a value into the bytes stored in Redis and back.
//! `None` always maps to the empty byte string and the empty byte string
//! always reads back as `None`.

mod json;
mod string;

pub use json::TypedJsonSerializer;
pub use string::StringRedisSerializer;

use crate::errors::SerializationError;

/// Two-way mapping between a value and its stored bytes
pub trait RedisSerializer<T>: Send + Sync {
    fn serialize(&self, value: Option<&T>) -> Result<Vec<u8>, SerializationError>;

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<T>, SerializationError>;
}
