//! Wire formats of the three sources and their normalized results

use serde::{Deserialize, Serialize};

/// Age source response, e.g. `{"count": 1244, "name": "dmitriy", "age": 42}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgeResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub name: String,
    /// `null` when the source has no data for the name
    pub age: Option<u32>,
}

/// Gender source response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenderResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub name: String,
    pub gender: Option<String>,
    #[serde(default)]
    pub probability: f64,
}

/// Nationality source response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NationalityResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "country", default)]
    pub countries: Vec<Country>,
}

/// One nationality candidate
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Country {
    pub country_id: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikelyAge {
    pub name: String,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikelyGender {
    pub name: String,
    /// Empty when the source could not decide
    pub gender: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikelyNationality {
    pub name: String,
    /// Empty when the source returned no candidates
    pub nationality: String,
}

/// Pick the candidate with the highest probability.
///
/// Scans in order; a later candidate replaces the current pick only when its
/// probability is strictly greater, so among equal maxima the first one wins.
pub fn most_likely_country(countries: &[Country]) -> Option<&Country> {
    let mut best: Option<&Country> = None;
    for candidate in countries {
        match best {
            Some(current) if candidate.probability <= current.probability => {}
            _ => best = Some(candidate),
        }
    }
    best
}

impl AgeResponse {
    pub fn into_likely(self, name: &str) -> LikelyAge {
        LikelyAge {
            name: name.to_string(),
            age: self.age.unwrap_or(0),
        }
    }
}

impl GenderResponse {
    pub fn into_likely(self, name: &str) -> LikelyGender {
        LikelyGender {
            name: name.to_string(),
            gender: self.gender.unwrap_or_default(),
        }
    }
}

impl NationalityResponse {
    pub fn into_likely(self, name: &str) -> LikelyNationality {
        LikelyNationality {
            name: name.to_string(),
            nationality: most_likely_country(&self.countries)
                .map(|c| c.country_id.clone())
                .unwrap_or_default(),
        }
    }
}
