//! Type tags for cached values
//!
//! This crate maps stable type tags to decoder functions so that a value
//! stored as JSON can be rebuilt as its concrete Rust type.
//! It is shared by the cache serializers and the application context.

pub mod envelope;
pub mod errors;
pub mod registry;
pub mod types;

pub use envelope::{embed_tag, split_tag, TaggedValue, TYPE_KEY, VALUE_KEY};
pub use errors::RegistryError;
pub use registry::TypeRegistry;
pub use types::{AnyValue, CacheValue, TypeTagged};
