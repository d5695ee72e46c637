//! Domain models shared by the store, the services and the HTTP layer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Derived demographic attributes owned by exactly one person
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    pub id: i64,
    pub age: u32,
    /// Free-form token ("male", "female", ...); empty when undetermined
    pub gender: String,
    /// Country code; empty when undetermined
    pub nationality: String,
}

/// Characteristic values without identity, as written by create and update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacteristicFields {
    pub age: u32,
    pub gender: String,
    pub nationality: String,
}

/// Stored person together with its characteristic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
    pub characteristic: Characteristic,
}

/// Person values without identity, as written by create and update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonFields {
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    /// Case-insensitive: "asc", "ASC", "Desc" are all accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(Error::BadRequest(format!(
                "sort order must be asc or desc, got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Columns a person listing may be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Id,
    Name,
    Surname,
    Patronymic,
    Age,
    Gender,
    Nationality,
}

impl SortField {
    /// Qualified column for the persons/characteristics join
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "p.id",
            SortField::Name => "p.name",
            SortField::Surname => "p.surname",
            SortField::Patronymic => "p.patronymic",
            SortField::Age => "c.age",
            SortField::Gender => "c.gender",
            SortField::Nationality => "c.nationality",
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(SortField::Id),
            "name" => Ok(SortField::Name),
            "surname" => Ok(SortField::Surname),
            "patronymic" => Ok(SortField::Patronymic),
            "age" => Ok(SortField::Age),
            "gender" => Ok(SortField::Gender),
            "nationality" => Ok(SortField::Nationality),
            _ => Err(Error::BadRequest(format!("cannot sort by '{}'", s))),
        }
    }
}
