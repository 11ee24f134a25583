//! JSON codec owned by each `ApiClient`.
//!
//! serde already gives the behavior the client relies on: unknown fields are
//! skipped unless a type opts into `deny_unknown_fields`, and the chrono/time
//! serde impls write timestamps as RFC 3339 strings rather than epoch numbers.
//!
//! Decoding has no nesting limit. serde_json's recursion guard is disabled and
//! `serde_stacker` grows the stack on demand instead.

use serde::de::{Deserialize, DeserializeOwned};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }

    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(ApiError::Encode)
    }

    /// Parse text into a generic JSON tree. Blank input yields `Value::Null`.
    pub fn decode_tree(&self, text: &str) -> Result<Value> {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        self.decode(text)
    }

    pub fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let value = T::deserialize(serde_stacker::Deserializer::new(&mut de)).map_err(ApiError::Decode)?;
        de.end().map_err(ApiError::Decode)?;
        Ok(value)
    }
}
