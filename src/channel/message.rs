//! Row payloads: plain text, or structured data written as JSON.

use crate::Error;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(String),
    /// Pretty-printed with Unicode left unescaped.
    Value(Value),
}

impl Message {
    /// Structured message from any serializable value.
    ///
    /// # Errors
    /// `Error::Format` when `value` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        Ok(Self::Value(serde_json::to_value(value)?))
    }

    pub(crate) fn into_text(self) -> Result<String, Error> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Value(value) => Ok(serde_json::to_string_pretty(&value)?),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for Message {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}
