//! Error types for the CacheHaus crate
//!
//! This module contains all error types that can be returned by CacheHaus operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheHausError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache_system::CacheError),

    #[error("Type registry error: {0}")]
    Registry(#[from] type_registry::RegistryError),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template already registered: {0}")]
    TemplateAlreadyRegistered(String),
}
