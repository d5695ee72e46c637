//! Person + characteristic persistence
//!
//! Every person row references exactly one characteristic row
//! (`persons.characteristic_id`). Create and update run in a transaction;
//! delete is two dependent statements without a compensating rollback.
//!
//! Failures are logged here and surfaced as [`Error::NotFound`] or
//! [`Error::Internal`]; raw sqlx errors never leave this module.

use persona_common::models::{
    Characteristic, CharacteristicFields, Person, PersonFields, SortField, SortOrder,
};
use persona_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{error, info};

/// Rows returned by [`get_all`] when no page is requested
pub const DEFAULT_LIMIT: i64 = 50;

const SELECT_PERSON: &str = r#"
    SELECT p.id, p.name, p.surname, p.patronymic,
           c.id AS characteristic_id, c.age, c.gender, c.nationality
    FROM persons p
    JOIN characteristics c ON c.id = p.characteristic_id
"#;

/// Store-level ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonOrder {
    pub field: SortField,
    pub order: SortOrder,
}

/// Store-level window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonPage {
    pub limit: i64,
    pub offset: i64,
}

impl Default for PersonOrder {
    fn default() -> Self {
        Self {
            field: SortField::Id,
            order: SortOrder::Asc,
        }
    }
}

impl Default for PersonPage {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Insert characteristic and person as one unit
pub async fn create(
    pool: &SqlitePool,
    person: &PersonFields,
    characteristic: &CharacteristicFields,
) -> Result<Person> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| internal("Failed to begin create transaction", e))?;

    let characteristic_id = sqlx::query(
        "INSERT INTO characteristics (age, gender, nationality) VALUES (?, ?, ?)",
    )
    .bind(i64::from(characteristic.age))
    .bind(&characteristic.gender)
    .bind(&characteristic.nationality)
    .execute(&mut *tx)
    .await
    .map_err(|e| internal("Failed to insert characteristic", e))?
    .last_insert_rowid();

    let person_id = sqlx::query(
        "INSERT INTO persons (name, surname, patronymic, characteristic_id) VALUES (?, ?, ?, ?)",
    )
    .bind(&person.name)
    .bind(&person.surname)
    .bind(&person.patronymic)
    .bind(characteristic_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| internal("Failed to insert person", e))?
    .last_insert_rowid();

    tx.commit()
        .await
        .map_err(|e| internal("Failed to commit create transaction", e))?;

    info!(person_id, characteristic_id, "Person created");

    Ok(Person {
        id: person_id,
        name: person.name.clone(),
        surname: person.surname.clone(),
        patronymic: person.patronymic.clone(),
        characteristic: Characteristic {
            id: characteristic_id,
            age: characteristic.age,
            gender: characteristic.gender.clone(),
            nationality: characteristic.nationality.clone(),
        },
    })
}

/// Load a person with its characteristic
pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Person> {
    let sql = format!("{} WHERE p.id = ?", SELECT_PERSON);

    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| internal("Failed to load person", e))?;

    match row {
        Some(row) => row_to_person(&row).map_err(|e| internal("Failed to decode person", e)),
        None => {
            error!(person_id = id, "Person not found");
            Err(Error::NotFound(format!("person {}", id)))
        }
    }
}

/// Load one ordered window of persons
///
/// `None` order means `id ASC`; `None` page means the first [`DEFAULT_LIMIT`] rows.
/// Rows that tie on the sort column are ordered by id.
pub async fn get_all(
    pool: &SqlitePool,
    order: Option<PersonOrder>,
    page: Option<PersonPage>,
) -> Result<Vec<Person>> {
    let order = order.unwrap_or_default();
    let page = page.unwrap_or_default();

    let mut sql = format!(
        "{} ORDER BY {} {}",
        SELECT_PERSON,
        order.field.column(),
        order.order.as_sql()
    );
    if order.field != SortField::Id {
        sql.push_str(", p.id ASC");
    }
    sql.push_str(" LIMIT ? OFFSET ?");

    let rows = sqlx::query(&sql)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await
        .map_err(|e| internal("Failed to list persons", e))?;

    rows.iter()
        .map(row_to_person)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| internal("Failed to decode person", e))
}

/// Total number of persons, independent of paging
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM persons")
        .fetch_one(pool)
        .await
        .map_err(|e| internal("Failed to count persons", e))
}

/// Remove a person and its characteristic
///
/// Known limitation: the two deletes are independent statements. If the
/// characteristic delete fails after the person row is gone, the
/// characteristic is left behind and the call reports `Internal`.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let characteristic_id: Option<i64> =
        sqlx::query_scalar("SELECT characteristic_id FROM persons WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| internal("Failed to look up person for delete", e))?;

    let Some(characteristic_id) = characteristic_id else {
        error!(person_id = id, "Person not found while deleting");
        return Err(Error::NotFound(format!("person {}", id)));
    };

    sqlx::query("DELETE FROM persons WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| internal("Failed to delete person", e))?;

    sqlx::query("DELETE FROM characteristics WHERE id = ?")
        .bind(characteristic_id)
        .execute(pool)
        .await
        .map_err(|e| {
            error!(
                person_id = id,
                characteristic_id, "Person deleted but characteristic delete failed"
            );
            internal("Failed to delete person characteristic", e)
        })?;

    info!(person_id = id, characteristic_id, "Person deleted");
    Ok(())
}

/// Overwrite a person's fields and its characteristic atomically
///
/// The characteristic link itself is never rewritten.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    person: &PersonFields,
    characteristic: &CharacteristicFields,
) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| internal("Failed to begin update transaction", e))?;

    // The first statement in the transaction must be a write; a leading read
    // leaves concurrent updaters unable to upgrade their locks (SQLITE_BUSY).
    let characteristic_id: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE characteristics
        SET age = ?, gender = ?, nationality = ?
        WHERE id = (SELECT characteristic_id FROM persons WHERE id = ?)
        RETURNING id
        "#,
    )
    .bind(i64::from(characteristic.age))
    .bind(&characteristic.gender)
    .bind(&characteristic.nationality)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| internal("Failed to update characteristic", e))?;

    // Returning early drops `tx`, which rolls back
    let Some(characteristic_id) = characteristic_id else {
        error!(person_id = id, "Person not found while updating");
        return Err(Error::NotFound(format!("person {}", id)));
    };

    sqlx::query(
        r#"
        UPDATE persons
        SET name = ?, surname = ?, patronymic = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&person.name)
    .bind(&person.surname)
    .bind(&person.patronymic)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(|e| internal("Failed to update person", e))?;

    tx.commit()
        .await
        .map_err(|e| internal("Failed to commit update transaction", e))?;

    info!(person_id = id, characteristic_id, "Person updated");
    Ok(())
}

fn row_to_person(row: &SqliteRow) -> std::result::Result<Person, sqlx::Error> {
    let age: i64 = row.try_get("age")?;
    let age = u32::try_from(age).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(Person {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        surname: row.try_get("surname")?,
        patronymic: row.try_get("patronymic")?,
        characteristic: Characteristic {
            id: row.try_get("characteristic_id")?,
            age,
            gender: row.try_get("gender")?,
            nationality: row.try_get("nationality")?,
        },
    })
}

fn internal(context: &str, e: sqlx::Error) -> Error {
    error!(error = %e, "{}", context);
    Error::Internal(context.to_string())
}
