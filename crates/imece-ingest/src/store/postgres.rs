//! Postgres record store
//!
//! Bulk inserts one batch per statement through a [`sqlx::QueryBuilder`].
//! Expected table shape (wider tables work; only these columns are
//! written):
//!
//! ```sql
//! CREATE TABLE beneficiaries (
//!     id              BIGSERIAL PRIMARY KEY,
//!     first_name      TEXT,
//!     last_name       TEXT,
//!     nationality     TEXT,
//!     birth_date      DATE,
//!     gender          TEXT,
//!     blood_type      TEXT,
//!     identity_number TEXT,
//!     email           TEXT,
//!     mobile_phone    TEXT,
//!     landline_phone  TEXT,
//!     foreign_phone   TEXT,
//!     country         TEXT,
//!     city            TEXT,
//!     district        TEXT,
//!     neighborhood    TEXT,
//!     address         TEXT,
//!     iban            TEXT
//! );
//! ```

use super::{RecordStore, StoreError};
use crate::normalize::Beneficiary;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

const COLUMNS: &str = "first_name, last_name, nationality, birth_date, gender, blood_type, \
     identity_number, email, mobile_phone, landline_phone, foreign_phone, country, city, \
     district, neighborhood, address, iban";

/// Record store backed by a Postgres connection pool
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self::new(pool))
    }
}

/// Build one multi-row INSERT for a batch
///
/// Table names cannot be bound as parameters; the identifier comes from
/// run configuration, not row data. Birth dates are bound as text and cast,
/// so an impossible date rejects the batch wholesale instead of being
/// silently coerced.
fn build_insert<'args>(
    table: &str,
    records: &'args [Beneficiary],
) -> QueryBuilder<'args, Postgres> {
    let mut builder = QueryBuilder::new(format!("INSERT INTO {} ({}) ", table, COLUMNS));
    builder.push_values(records, |mut row, record| {
        row.push_bind(&record.first_name)
            .push_bind(&record.last_name)
            .push_bind(&record.nationality);
        row.push_bind(&record.birth_date).push_unseparated("::date");
        row.push_bind(&record.gender)
            .push_bind(&record.blood_type)
            .push_bind(&record.identity_number)
            .push_bind(&record.email)
            .push_bind(&record.mobile_phone)
            .push_bind(&record.landline_phone)
            .push_bind(&record.foreign_phone)
            .push_bind(&record.country)
            .push_bind(&record.city)
            .push_bind(&record.district)
            .push_bind(&record.neighborhood)
            .push_bind(&record.address)
            .push_bind(&record.iban);
    });
    builder
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert_many(
        &self,
        table: &str,
        records: &[Beneficiary],
    ) -> Result<Option<usize>, StoreError> {
        if records.is_empty() {
            return Ok(Some(0));
        }

        let mut builder = build_insert(table, records);
        let result = builder.build().execute(&self.pool).await?;

        debug!("inserted {} row(s) into {}", result.rows_affected(), table);
        Ok(Some(result.rows_affected() as usize))
    }
}
