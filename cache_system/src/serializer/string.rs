use super::RedisSerializer;
use crate::errors::SerializationError;

/// Plain UTF-8 codec, used for keys and hash fields
#[derive(Debug, Clone, Copy, Default)]
pub struct StringRedisSerializer;

impl StringRedisSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl RedisSerializer<String> for StringRedisSerializer {
    fn serialize(&self, value: Option<&String>) -> Result<Vec<u8>, SerializationError> {
        Ok(value.map(|text| text.as_bytes().to_vec()).unwrap_or_default())
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<String>, SerializationError> {
        match bytes {
            Some(bytes) if !bytes.is_empty() => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|e| SerializationError::Deserialization(format!("invalid UTF-8: {}", e))),
            _ => Ok(None),
        }
    }
}
