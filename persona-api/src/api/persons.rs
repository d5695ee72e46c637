//! Person endpoints
//!
//! POST   /api/persons           create (enriched from the lookup sources)
//! GET    /api/persons           list (`id`, `sort_by`, `sort_order`, `page`, `per_page`)
//! GET    /api/persons/count     total rows
//! GET    /api/persons/:id       one person
//! PUT    /api/persons/:id       overwrite person + characteristic
//! DELETE /api/persons/:id       remove person + characteristic

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use persona_common::models::{CharacteristicFields, Person, PersonFields};
use persona_common::Error;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::query::{self, RawPaginate, RawSort};
use crate::services::EnrichedPerson;
use crate::{ApiResult, AppState};

const MAX_AGE: u32 = 200;

/// POST /api/persons body
#[derive(Debug, Deserialize)]
pub struct CreatePersonRequest {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub patronymic: Option<String>,
}

/// PUT /api/persons/:id body
#[derive(Debug, Deserialize)]
pub struct UpdatePersonRequest {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub patronymic: Option<String>,
    pub age: u32,
    pub gender: String,
    pub nationality: String,
}

/// GET /api/persons query string
#[derive(Debug, Default, Deserialize)]
pub struct ListPersonsQuery {
    pub id: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Flat view of a person as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonResponse {
    pub id: i64,
    pub name: String,
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    pub age: u32,
    pub gender: String,
    pub nationality: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListPersonsResponse {
    pub persons: Vec<PersonResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

impl From<Person> for PersonResponse {
    fn from(p: Person) -> Self {
        Self {
            id: p.id,
            name: p.name,
            surname: p.surname,
            patronymic: p.patronymic,
            age: p.characteristic.age,
            gender: p.characteristic.gender,
            nationality: p.characteristic.nationality,
        }
    }
}

impl From<EnrichedPerson> for PersonResponse {
    fn from(e: EnrichedPerson) -> Self {
        Self {
            id: e.person.id,
            name: e.person.name,
            surname: e.person.surname,
            patronymic: e.person.patronymic,
            age: e.combined.age,
            gender: e.combined.gender,
            nationality: e.combined.nationality,
        }
    }
}

impl CreatePersonRequest {
    fn into_fields(self) -> Result<PersonFields, Error> {
        Ok(PersonFields {
            name: required("name", self.name)?,
            surname: required("surname", self.surname)?,
            patronymic: optional(self.patronymic),
        })
    }
}

impl UpdatePersonRequest {
    fn into_fields(self) -> Result<(PersonFields, CharacteristicFields), Error> {
        if self.age > MAX_AGE {
            return Err(Error::Validation(format!("age must be in 0..={}", MAX_AGE)));
        }

        Ok((
            PersonFields {
                name: required("name", self.name)?,
                surname: required("surname", self.surname)?,
                patronymic: optional(self.patronymic),
            },
            CharacteristicFields {
                age: self.age,
                gender: required("gender", self.gender)?,
                nationality: required("nationality", self.nationality)?,
            },
        ))
    }
}

fn required(field: &str, value: String) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn valid_id(id: i64) -> Result<i64, Error> {
    if id < 1 {
        return Err(Error::Validation(format!("id must be >= 1, got {}", id)));
    }
    Ok(id)
}

/// POST /api/persons
pub async fn create_person(
    State(state): State<AppState>,
    payload: Result<Json<CreatePersonRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PersonResponse>)> {
    let Json(payload) = payload?;
    let fields = payload.into_fields()?;

    let enriched = state.persons.create_person_info(&fields).await?;
    info!(person_id = enriched.person.id, "Person info created");

    Ok((StatusCode::CREATED, Json(enriched.into())))
}

/// GET /api/persons
///
/// With `id`, returns just that person and ignores sorting and paging.
pub async fn list_persons(
    State(state): State<AppState>,
    query: Result<Query<ListPersonsQuery>, QueryRejection>,
) -> ApiResult<Json<ListPersonsResponse>> {
    let Query(query) = query?;

    if let Some(id) = query.id {
        let person = state.persons.get_person_info(valid_id(id)?).await?;
        return Ok(Json(ListPersonsResponse {
            persons: vec![person.into()],
            total: 1,
            page: 0,
            per_page: 1,
        }));
    }

    let raw_sort = RawSort {
        sort_by: query.sort_by,
        sort_order: query.sort_order,
    };
    let raw_paginate = RawPaginate {
        page: query.page,
        per_page: query.per_page,
    };
    let (sort, paginate) = query::resolve(&raw_sort, &raw_paginate, &state.query_defaults)?;

    let persons = state
        .persons
        .get_all_person_info(Some(sort), Some(paginate))
        .await?;
    let total = state.persons.get_person_count().await?;

    Ok(Json(ListPersonsResponse {
        persons: persons.into_iter().map(PersonResponse::from).collect(),
        total,
        page: paginate.page,
        per_page: paginate.per_page,
    }))
}

/// GET /api/persons/:id
pub async fn get_person(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<PersonResponse>> {
    let Path(id) = id?;
    let person = state.persons.get_person_info(valid_id(id)?).await?;
    Ok(Json(person.into()))
}

/// PUT /api/persons/:id
pub async fn update_person(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdatePersonRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let id = valid_id(id)?;
    let Json(payload) = payload?;
    let (person, characteristic) = payload.into_fields()?;

    state
        .persons
        .update_person_info(id, &person, &characteristic)
        .await?;
    info!(person_id = id, "Person info updated");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/persons/:id
pub async fn delete_person(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.persons.delete_person_info(valid_id(id)?).await?;
    info!(person_id = id, "Person info deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/persons/count
pub async fn count_persons(State(state): State<AppState>) -> ApiResult<Json<CountResponse>> {
    let count = state.persons.get_person_count().await?;
    Ok(Json(CountResponse { count }))
}

/// Build person routes
pub fn person_routes() -> Router<AppState> {
    Router::new()
        .route("/api/persons", get(list_persons).post(create_person))
        .route("/api/persons/count", get(count_persons))
        .route(
            "/api/persons/:id",
            get(get_person).put(update_person).delete(delete_person),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_trims_and_drops_blank_patronymic() {
        let request = CreatePersonRequest {
            name: "  Dmitriy ".to_string(),
            surname: "Ushakov".to_string(),
            patronymic: Some("   ".to_string()),
        };

        let fields = request.into_fields().unwrap();
        assert_eq!(fields.name, "Dmitriy");
        assert_eq!(fields.patronymic, None);
    }

    #[test]
    fn test_create_request_requires_surname() {
        let request = CreatePersonRequest {
            name: "Dmitriy".to_string(),
            surname: "".to_string(),
            patronymic: None,
        };

        assert!(matches!(request.into_fields(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_update_request_rejects_implausible_age() {
        let request = UpdatePersonRequest {
            name: "Dmitriy".to_string(),
            surname: "Ushakov".to_string(),
            patronymic: None,
            age: 201,
            gender: "male".to_string(),
            nationality: "UA".to_string(),
        };

        assert!(matches!(request.into_fields(), Err(Error::Validation(_))));
    }
}
