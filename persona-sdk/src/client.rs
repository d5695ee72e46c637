//! HTTP client for the name-inference sources

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::LookupError;
use crate::types::{
    AgeResponse, GenderResponse, LikelyAge, LikelyGender, LikelyNationality, NationalityResponse,
};

const USER_AGENT: &str = concat!("persona/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_AGE_URL: &str = "https://api.agify.io";
pub const DEFAULT_GENDER_URL: &str = "https://api.genderize.io";
pub const DEFAULT_NATIONALITY_URL: &str = "https://api.nationalize.io";

/// The three independent sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupSource {
    Age,
    Gender,
    Nationality,
}

impl LookupSource {
    pub fn as_str(self) -> &'static str {
        match self {
            LookupSource::Age => "age",
            LookupSource::Gender => "gender",
            LookupSource::Nationality => "nationality",
        }
    }
}

/// Async lookup interface consumed by the enrichment aggregator
#[async_trait]
pub trait NameLookup: Send + Sync {
    async fn likely_age(&self, name: &str) -> Result<LikelyAge, LookupError>;

    async fn likely_gender(&self, name: &str) -> Result<LikelyGender, LookupError>;

    async fn likely_nationality(&self, name: &str) -> Result<LikelyNationality, LookupError>;
}

/// Client construction settings
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub age_url: String,
    pub gender_url: String,
    pub nationality_url: String,
    /// Sent as the `apikey` query parameter when non-blank
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            age_url: DEFAULT_AGE_URL.to_string(),
            gender_url: DEFAULT_GENDER_URL.to_string(),
            nationality_url: DEFAULT_NATIONALITY_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// reqwest-backed lookup client
#[derive(Debug, Clone)]
pub struct NameInfoClient {
    http_client: reqwest::Client,
    age_url: Url,
    gender_url: Url,
    nationality_url: Url,
    api_key: Option<String>,
}

impl NameInfoClient {
    pub fn new(settings: ClientSettings) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| LookupError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            age_url: parse_url(&settings.age_url)?,
            gender_url: parse_url(&settings.gender_url)?,
            nationality_url: parse_url(&settings.nationality_url)?,
            api_key: settings.api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Request URL for `source` with the `name` (and optional `apikey`) parameter
    pub fn build_url(&self, source: LookupSource, name: &str) -> Url {
        let mut url = match source {
            LookupSource::Age => self.age_url.clone(),
            LookupSource::Gender => self.gender_url.clone(),
            LookupSource::Nationality => self.nationality_url.clone(),
        };

        {
            let mut query = url.query_pairs_mut();
            if let Some(key) = &self.api_key {
                query.append_pair("apikey", key);
            }
            query.append_pair("name", name);
        }

        url
    }

    /// Issue one GET against `source` and decode the JSON body as `T`
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        source: LookupSource,
        name: &str,
    ) -> Result<T, LookupError> {
        let url = self.build_url(source, name);

        tracing::debug!(source = source.as_str(), name = %name, "Querying lookup source");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(
                source = source.as_str(),
                status = status.as_u16(),
                "Lookup source returned non-success status"
            );
            return Err(LookupError::Upstream(status.as_u16(), error_text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))
    }
}

#[async_trait]
impl NameLookup for NameInfoClient {
    async fn likely_age(&self, name: &str) -> Result<LikelyAge, LookupError> {
        let response: AgeResponse = self.fetch(LookupSource::Age, name).await?;
        let likely = response.into_likely(name);
        tracing::info!(name = %name, age = likely.age, "Retrieved likely age");
        Ok(likely)
    }

    async fn likely_gender(&self, name: &str) -> Result<LikelyGender, LookupError> {
        let response: GenderResponse = self.fetch(LookupSource::Gender, name).await?;
        let likely = response.into_likely(name);
        tracing::info!(name = %name, gender = %likely.gender, "Retrieved likely gender");
        Ok(likely)
    }

    async fn likely_nationality(&self, name: &str) -> Result<LikelyNationality, LookupError> {
        let response: NationalityResponse = self.fetch(LookupSource::Nationality, name).await?;
        let candidates = response.countries.len();
        let likely = response.into_likely(name);
        tracing::info!(
            name = %name,
            nationality = %likely.nationality,
            candidates,
            "Retrieved likely nationality"
        );
        Ok(likely)
    }
}

fn parse_url(raw: &str) -> Result<Url, LookupError> {
    Url::parse(raw).map_err(|e| LookupError::InvalidUrl(raw.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = NameInfoClient::new(ClientSettings::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let settings = ClientSettings {
            age_url: "not a url".to_string(),
            ..ClientSettings::default()
        };
        assert!(matches!(
            NameInfoClient::new(settings),
            Err(LookupError::InvalidUrl(_, _))
        ));
    }

    #[test]
    fn test_build_url_without_api_key() {
        let client = NameInfoClient::new(ClientSettings::default()).unwrap();
        let url = client.build_url(LookupSource::Gender, "Dmitriy");

        assert_eq!(url.host_str(), Some("api.genderize.io"));
        assert_eq!(url.query(), Some("name=Dmitriy"));
    }

    #[test]
    fn test_build_url_with_api_key_and_escaping() {
        let settings = ClientSettings {
            api_key: Some("k3y".to_string()),
            ..ClientSettings::default()
        };
        let client = NameInfoClient::new(settings).unwrap();
        let url = client.build_url(LookupSource::Nationality, "Anna Maria");

        assert_eq!(url.host_str(), Some("api.nationalize.io"));
        assert_eq!(url.query(), Some("apikey=k3y&name=Anna+Maria"));
    }

    #[test]
    fn test_blank_api_key_is_dropped() {
        let settings = ClientSettings {
            api_key: Some("  ".to_string()),
            ..ClientSettings::default()
        };
        let client = NameInfoClient::new(settings).unwrap();
        let url = client.build_url(LookupSource::Age, "Olga");

        assert_eq!(url.query(), Some("name=Olga"));
    }
}
