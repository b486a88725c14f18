use super::{string_list, CityProvider, CountryProvider, ProviderError};
use crate::config::{ConfigError, WizardConfig};
use async_trait::async_trait;
use reqwest::{Client, Url};

/// Country and city lists served by the travel API.
pub struct TravelApiClient {
  client: Client,
  countries_url: Url,
  cities_url: Url,
}

impl TravelApiClient {
  pub fn new(config: &WizardConfig) -> Result<Self, ConfigError> {
    Self::with_client(Client::new(), config)
  }

  pub fn with_client(client: Client, config: &WizardConfig) -> Result<Self, ConfigError> {
    let base = config.base_url()?;
    let join = |path: &str| {
      base.join(path.trim_start_matches('/')).map_err(|e| ConfigError::InvalidBaseUrl {
        url: config.api_base_url.clone(),
        reason: e.to_string(),
      })
    };

    Ok(Self {
      countries_url: join(config.countries_path.as_str())?,
      cities_url: join(config.cities_path.as_str())?,
      client,
    })
  }

  pub fn countries_url(&self) -> &Url {
    &self.countries_url
  }

  pub fn cities_url(&self, country: &str) -> Url {
    let mut url = self.cities_url.clone();
    url.query_pairs_mut().append_pair("country", country);
    url
  }

  async fn get_list(&self, url: Url) -> Result<Vec<String>, ProviderError> {
    log::debug!("GET {}", url);
    let resp = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|e| ProviderError::Request(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
      return Err(ProviderError::Status(status.as_u16()));
    }

    let body: serde_json::Value = resp
      .json()
      .await
      .map_err(|e| ProviderError::Malformed(e.to_string()))?;
    string_list(body)
  }
}

#[async_trait]
impl CountryProvider for TravelApiClient {
  async fn countries(&self) -> Result<Vec<String>, ProviderError> {
    self.get_list(self.countries_url.clone()).await
  }
}

#[async_trait]
impl CityProvider for TravelApiClient {
  async fn cities(&self, country: &str) -> Result<Vec<String>, ProviderError> {
    self.get_list(self.cities_url(country)).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client(base: &str) -> TravelApiClient {
    let config = WizardConfig {
      api_base_url: base.to_string(),
      ..WizardConfig::default()
    };
    TravelApiClient::new(&config).expect("client")
  }

  #[test]
  fn countries_url_joins_under_base() {
    let c = client("https://travel.example.com/app");
    assert_eq!(
      c.countries_url().as_str(),
      "https://travel.example.com/app/api/TravelApp/countries"
    );
  }

  #[test]
  fn cities_url_encodes_country_query() {
    let c = client("http://localhost:5000");
    assert_eq!(
      c.cities_url("united kingdom").as_str(),
      "http://localhost:5000/api/TravelApp/cities?country=united+kingdom"
    );
  }
}
