//! # Persona Common Library
//!
//! Shared code for the persona workspace:
//! - Error taxonomy used by the store, the services and the HTTP layer
//! - Configuration loading (TOML + environment)
//! - Domain models (person, characteristic, query modifiers)

pub mod config;
pub mod error;
pub mod models;

pub use error::{Error, Result};
