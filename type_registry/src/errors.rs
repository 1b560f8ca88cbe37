//! Error types for the type registry

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Type tag '{tag}' is bound to {existing}, cannot bind it to {requested}")]
    DuplicateTag {
        tag: &'static str,
        existing: &'static str,
        requested: &'static str,
    },

    #[error("Unknown type tag: {0}")]
    UnknownTag(String),

    #[error("Encoded value has no type tag")]
    MissingTag,

    #[error("Type tag mismatch: expected '{expected}', found '{found}'")]
    TagMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("Failed to decode value tagged '{tag}': {source}")]
    Decode {
        tag: String,
        #[source]
        source: serde_json::Error,
    },
}
