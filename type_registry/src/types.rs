//! Cached value types
//!
//! A storable value is any serializable type with a stable tag. The tag is
//! written next to the JSON payload and picks the decoder on read.

use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::fmt::Debug;

/// Stable name of a cached type, written into every encoded value
pub trait TypeTagged {
    const TYPE_TAG: &'static str;
}

/// Declare type tags for one or more types
///
/// ```rust
/// use type_registry::{type_tag, TypeTagged};
///
/// #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
/// struct Session {
///     user_id: i64,
/// }
///
/// type_tag!(Session => "app.Session");
/// assert_eq!(Session::TYPE_TAG, "app.Session");
/// ```
#[macro_export]
macro_rules! type_tag {
    ($($ty:ty => $tag:literal),* $(,)?) => {
        $(
            impl $crate::TypeTagged for $ty {
                const TYPE_TAG: &'static str = $tag;
            }
        )*
    };
}

type_tag! {
    String => "string",
    bool => "bool",
    i64 => "i64",
    u64 => "u64",
    f64 => "f64",
    serde_json::Value => "json",
    uuid::Uuid => "uuid",
    chrono::DateTime<chrono::Utc> => "datetime",
}

/// Object-safe view of a storable value
///
/// Implemented for every `TypeTagged` type that can be serialized,
/// deserialized, cloned and compared. `dyn CacheValue` is the "any value" slot of a cache.
pub trait CacheValue: Any + Debug + Send + Sync {
    fn type_tag(&self) -> &'static str;

    /// Short Rust type name, used in error messages
    fn type_name(&self) -> &'static str;

    fn to_json(&self) -> serde_json::Result<serde_json::Value>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn clone_boxed(&self) -> Box<dyn CacheValue>;

    fn eq_dyn(&self, other: &dyn CacheValue) -> bool;
}

impl<T> CacheValue for T
where
    T: TypeTagged + Serialize + DeserializeOwned + Clone + PartialEq + Debug + Send + Sync + 'static,
{
    fn type_tag(&self) -> &'static str {
        T::TYPE_TAG
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    /// Fails for values whose JSON form does not read back as the same value
    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        let json = serde_json::to_value(self)?;

        // NaN and infinities are written as null
        if contains_null(&json) && serde_json::from_value::<T>(json.clone()).ok().as_ref() != Some(self) {
            return Err(serde_json::Error::custom(format!(
                "{} has no lossless JSON form (non-finite float?)",
                std::any::type_name::<T>()
            )));
        }
        Ok(json)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_boxed(&self) -> Box<dyn CacheValue> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn CacheValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }
}

fn contains_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().any(contains_null),
        Value::Object(map) => map.values().any(contains_null),
        _ => false,
    }
}

/// Owned value of any registered type
///
/// The concrete type is kept at runtime, so a value read back from the
/// cache can be downcast to the type it was written as.
#[derive(Debug)]
pub struct AnyValue(Box<dyn CacheValue>);

impl AnyValue {
    pub fn new<T: CacheValue>(value: T) -> Self {
        Self(Box::new(value))
    }

    pub fn from_boxed(value: Box<dyn CacheValue>) -> Self {
        Self(value)
    }

    pub fn type_tag(&self) -> &'static str {
        self.0.type_tag()
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    pub fn is<T: CacheValue>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    pub fn downcast_ref<T: CacheValue>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Take the concrete value out, `None` when it has another type
    pub fn downcast<T: CacheValue>(self) -> Option<T> {
        self.0.into_any().downcast::<T>().ok().map(|value| *value)
    }

    pub fn as_value(&self) -> &dyn CacheValue {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> Box<dyn CacheValue> {
        self.0
    }
}

impl Clone for AnyValue {
    fn clone(&self) -> Self {
        Self(self.0.clone_boxed())
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_dyn(other.0.as_ref())
    }
}

impl<T: CacheValue> From<T> for AnyValue {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
