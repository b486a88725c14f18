use super::{CityProvider, CountryProvider, ProviderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Offline country/city vocabulary.
///
/// JSON layout: `{ "countries": ["Italy", ...], "cities": { "italy": ["Rome", ...] } }`.
/// City keys are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
  #[serde(default)]
  countries: Vec<String>,
  #[serde(default)]
  cities: BTreeMap<String, Vec<String>>,
}

impl Catalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_country(mut self, country: &str, cities: &[&str]) -> Self {
    self.countries.push(country.to_string());
    self.cities.insert(
      country.to_lowercase(),
      cities.iter().map(|c| c.to_string()).collect(),
    );
    self
  }

  pub fn from_json(content: &str) -> Result<Self, ProviderError> {
    let raw: Catalog =
      serde_json::from_str(content).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    let cities = raw
      .cities
      .into_iter()
      .map(|(k, v)| (k.to_lowercase(), v))
      .collect();
    Ok(Self {
      countries: raw.countries,
      cities,
    })
  }

  pub fn load(path: &Path) -> Result<Self, ProviderError> {
    let content = std::fs::read_to_string(path)
      .map_err(|e| ProviderError::Request(format!("{}: {}", path.display(), e)))?;
    Self::from_json(&content)
  }
}

#[async_trait]
impl CountryProvider for Catalog {
  async fn countries(&self) -> Result<Vec<String>, ProviderError> {
    Ok(self.countries.clone())
  }
}

#[async_trait]
impl CityProvider for Catalog {
  async fn cities(&self, country: &str) -> Result<Vec<String>, ProviderError> {
    Ok(
      self
        .cities
        .get(&country.to_lowercase())
        .cloned()
        .unwrap_or_default(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn builder_catalog_serves_lists() {
    let catalog = Catalog::new()
      .with_country("Italy", &["Rome", "Milan"])
      .with_country("France", &["Paris"]);

    assert_eq!(catalog.countries().await.expect("countries"), vec!["Italy", "France"]);
    assert_eq!(catalog.cities("italy").await.expect("cities"), vec!["Rome", "Milan"]);
    assert!(catalog.cities("spain").await.expect("cities").is_empty());
  }

  #[tokio::test]
  async fn json_catalog_normalizes_city_keys() {
    let catalog = Catalog::from_json(
      r#"{ "countries": ["Japan"], "cities": { "Japan": ["Tokyo", "Kyoto"] } }"#,
    )
    .expect("catalog");
    assert_eq!(catalog.cities("japan").await.expect("cities"), vec!["Tokyo", "Kyoto"]);
  }

  #[test]
  fn bad_json_is_malformed() {
    assert!(matches!(
      Catalog::from_json("[1, 2]"),
      Err(ProviderError::Malformed(_))
    ));
  }
}
