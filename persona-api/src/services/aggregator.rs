//! Enrichment aggregator
//!
//! Fans one name out to the age, gender and nationality sources and fans the
//! three answers back in. Each lookup runs as its own spawned task whose
//! `JoinHandle` is the single slot its result lands in. All three slots are
//! awaited: a failing or slow source neither cancels nor short-circuits the
//! others. There is no deadline here beyond the HTTP client's own timeout.

use persona_common::models::CharacteristicFields;
use persona_common::{Error, Result};
use persona_sdk::{LookupError, LookupSource, NameLookup};
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{debug, error, warn};

/// All three lookup results for one name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedInfo {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub nationality: String,
}

impl CombinedInfo {
    pub fn to_characteristic(&self) -> CharacteristicFields {
        CharacteristicFields {
            age: self.age,
            gender: self.gender.clone(),
            nationality: self.nationality.clone(),
        }
    }
}

/// Concurrent fan-out over a [`NameLookup`]
#[derive(Clone)]
pub struct Enricher {
    lookup: Arc<dyn NameLookup>,
}

impl Enricher {
    pub fn new(lookup: Arc<dyn NameLookup>) -> Self {
        Self { lookup }
    }

    /// All-or-nothing enrichment
    ///
    /// Fails with [`Error::PartialEnrichment`] when any source fails; the
    /// caller is not told which one.
    pub async fn combine(&self, name: &str) -> Result<CombinedInfo> {
        debug!(name = %name, "Dispatching lookups");

        let age_task = {
            let lookup = Arc::clone(&self.lookup);
            let name = name.to_string();
            tokio::spawn(async move { lookup.likely_age(&name).await })
        };
        let gender_task = {
            let lookup = Arc::clone(&self.lookup);
            let name = name.to_string();
            tokio::spawn(async move { lookup.likely_gender(&name).await })
        };
        let nationality_task = {
            let lookup = Arc::clone(&self.lookup);
            let name = name.to_string();
            tokio::spawn(async move { lookup.likely_nationality(&name).await })
        };

        let (age, gender, nationality) = tokio::join!(age_task, gender_task, nationality_task);

        let age = settle(LookupSource::Age, name, age);
        let gender = settle(LookupSource::Gender, name, gender);
        let nationality = settle(LookupSource::Nationality, name, nationality);

        match (age, gender, nationality) {
            (Some(age), Some(gender), Some(nationality)) => Ok(CombinedInfo {
                name: name.to_string(),
                age: age.age,
                gender: gender.gender,
                nationality: nationality.nationality,
            }),
            _ => Err(Error::PartialEnrichment),
        }
    }
}

/// Collapse a task outcome into the value or `None`, logging the failure
fn settle<T>(
    source: LookupSource,
    name: &str,
    outcome: std::result::Result<std::result::Result<T, LookupError>, JoinError>,
) -> Option<T> {
    match outcome {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!(source = source.as_str(), name = %name, error = %e, "Lookup failed");
            None
        }
        Err(e) => {
            error!(source = source.as_str(), name = %name, error = %e, "Lookup task did not complete");
            None
        }
    }
}
