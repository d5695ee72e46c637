//! Person enrichment service
//!
//! Orchestrates the aggregator and the record store for the create path and
//! forwards every other operation to the store.

use persona_common::models::{CharacteristicFields, Person, PersonFields};
use persona_common::{Error, Result};
use persona_sdk::NameLookup;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::error;

use crate::db::persons::{self, PersonOrder, PersonPage};
use crate::query::{PaginateOptions, SortOptions};
use crate::services::aggregator::{CombinedInfo, Enricher};

/// Result of a successful create: the stored row and the enrichment it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedPerson {
    pub person: Person,
    pub combined: CombinedInfo,
}

#[derive(Clone)]
pub struct PersonService {
    db: SqlitePool,
    enricher: Enricher,
}

impl PersonService {
    pub fn new(db: SqlitePool, lookup: Arc<dyn NameLookup>) -> Self {
        Self {
            db,
            enricher: Enricher::new(lookup),
        }
    }

    /// Enrich by first name, then persist person and characteristic together
    ///
    /// Enrichment failure is reported as `Internal`; store errors pass through.
    pub async fn create_person_info(&self, person: &PersonFields) -> Result<EnrichedPerson> {
        let combined = self.enricher.combine(&person.name).await.map_err(|e| {
            error!(name = %person.name, error = %e, "Error fetching data from lookup sources");
            Error::Internal("enrichment failed".to_string())
        })?;

        let stored = persons::create(&self.db, person, &combined.to_characteristic()).await?;

        Ok(EnrichedPerson {
            person: stored,
            combined,
        })
    }

    pub async fn delete_person_info(&self, id: i64) -> Result<()> {
        persons::delete(&self.db, id).await
    }

    pub async fn update_person_info(
        &self,
        id: i64,
        person: &PersonFields,
        characteristic: &CharacteristicFields,
    ) -> Result<()> {
        persons::update(&self.db, id, person, characteristic).await
    }

    pub async fn get_person_info(&self, id: i64) -> Result<Person> {
        persons::get_by_id(&self.db, id).await
    }

    pub async fn get_all_person_info(
        &self,
        sort: Option<SortOptions>,
        paginate: Option<PaginateOptions>,
    ) -> Result<Vec<Person>> {
        persons::get_all(&self.db, sort.map(to_order), paginate.map(to_page)).await
    }

    pub async fn get_person_count(&self) -> Result<i64> {
        persons::count(&self.db).await
    }
}

fn to_order(sort: SortOptions) -> PersonOrder {
    PersonOrder {
        field: sort.field,
        order: sort.order,
    }
}

fn to_page(paginate: PaginateOptions) -> PersonPage {
    PersonPage {
        limit: paginate.per_page,
        offset: paginate.offset(),
    }
}
