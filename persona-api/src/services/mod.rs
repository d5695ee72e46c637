//! Enrichment and person services

pub mod aggregator;
pub mod person_service;

pub use aggregator::{CombinedInfo, Enricher};
pub use person_service::{EnrichedPerson, PersonService};

use persona_common::config::LookupConfig;
use persona_sdk::{ClientSettings, LookupError, NameInfoClient};
use std::time::Duration;

/// Build the HTTP lookup client from configuration
pub fn build_lookup_client(config: &LookupConfig) -> Result<NameInfoClient, LookupError> {
    NameInfoClient::new(ClientSettings {
        age_url: config.age_url.clone(),
        gender_url: config.gender_url.clone(),
        nationality_url: config.nationality_url.clone(),
        api_key: config.api_key.clone(),
        timeout: Duration::from_secs(config.timeout_secs),
    })
}
