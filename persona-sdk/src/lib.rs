//! Name-inference lookup client
//!
//! Talks to three independent sources that guess a person's age, gender and
//! nationality from a first name. One HTTP GET per call, no caching, no retries.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientSettings, LookupSource, NameInfoClient, NameLookup};
pub use error::LookupError;
pub use types::{Country, LikelyAge, LikelyGender, LikelyNationality};
