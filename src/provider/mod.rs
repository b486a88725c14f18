pub mod catalog;
pub mod http;

use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
  #[error("request failed: {0}")]
  Request(String),

  #[error("unexpected status: {0}")]
  Status(u16),

  #[error("malformed payload: {0}")]
  Malformed(String),
}

/// Supplies the destination country vocabulary.
#[async_trait]
pub trait CountryProvider: Send + Sync {
  async fn countries(&self) -> Result<Vec<String>, ProviderError>;
}

/// Supplies city names for one country. `country` is already lower-cased.
#[async_trait]
pub trait CityProvider: Send + Sync {
  async fn cities(&self, country: &str) -> Result<Vec<String>, ProviderError>;
}

/// Accept only a JSON array of strings.
pub fn string_list(value: Value) -> Result<Vec<String>, ProviderError> {
  let items = match value {
    Value::Array(items) => items,
    other => {
      return Err(ProviderError::Malformed(format!(
        "expected an array, got {}",
        json_kind(&other)
      )))
    }
  };

  items
    .into_iter()
    .map(|item| match item {
      Value::String(s) => Ok(s),
      other => Err(ProviderError::Malformed(format!(
        "expected string entries, got {}",
        json_kind(&other)
      ))),
    })
    .collect()
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
