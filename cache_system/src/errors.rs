//! Error types for cache operations
//!
//! This module defines all error types that can occur
//! during serialization, cache operations and Redis interactions.

use thiserror::Error;

/// Value codec errors
///
/// Raised by serializers and passed through unchanged, never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Cannot serialize value: {0}")]
    Serialization(String),

    #[error("Cannot deserialize value: {0}")]
    Deserialization(String),
}

/// Cache system errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    ConnectionError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Cache operation timeout")]
    Timeout,

    #[error("Invalid TTL value: {0}")]
    InvalidTtl(u64),

    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    #[error("Cache '{0}' does not allow null values")]
    NullValueNotAllowed(String),

    #[error("Cached value for '{key}' is {found}, expected {expected}")]
    UnexpectedType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("General cache error: {0}")]
    General(String),
}
