//! Shared fixtures for persona-api integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use persona_common::config::QueryDefaults;
use persona_common::models::PersonFields;
use persona_sdk::{LikelyAge, LikelyGender, LikelyNationality, LookupError, NameLookup};
use sqlx::SqlitePool;
use std::sync::Arc;

use persona_api::AppState;

/// Lookup that answers every name with the same characteristic
#[derive(Debug, Clone)]
pub struct StubLookup {
    pub age: u32,
    pub gender: String,
    pub nationality: String,
    /// When set, the nationality source reports itself unavailable
    pub nationality_down: bool,
}

impl Default for StubLookup {
    fn default() -> Self {
        Self {
            age: 42,
            gender: "male".to_string(),
            nationality: "UA".to_string(),
            nationality_down: false,
        }
    }
}

impl StubLookup {
    pub fn failing() -> Self {
        Self {
            nationality_down: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl NameLookup for StubLookup {
    async fn likely_age(&self, name: &str) -> Result<LikelyAge, LookupError> {
        Ok(LikelyAge {
            name: name.to_string(),
            age: self.age,
        })
    }

    async fn likely_gender(&self, name: &str) -> Result<LikelyGender, LookupError> {
        Ok(LikelyGender {
            name: name.to_string(),
            gender: self.gender.clone(),
        })
    }

    async fn likely_nationality(&self, name: &str) -> Result<LikelyNationality, LookupError> {
        if self.nationality_down {
            return Err(LookupError::Unavailable("nationality source down".to_string()));
        }
        Ok(LikelyNationality {
            name: name.to_string(),
            nationality: self.nationality.clone(),
        })
    }
}

pub async fn memory_pool() -> SqlitePool {
    persona_api::db::init_memory_pool().await.unwrap()
}

pub async fn test_state_with(lookup: StubLookup) -> AppState {
    AppState::new(memory_pool().await, Arc::new(lookup), QueryDefaults::default())
}

pub async fn test_state() -> AppState {
    test_state_with(StubLookup::default()).await
}

pub fn person(name: &str, surname: &str) -> PersonFields {
    PersonFields {
        name: name.to_string(),
        surname: surname.to_string(),
        patronymic: None,
    }
}
