use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool, Transaction, sqlite::SqliteRow};
use std::marker::PhantomData;

use crate::{
    domain::{
        errors::{StoreError, StoreResult},
        models::{Attachment, EntityDetails, Record, RecordFilter, RecordUpdate},
        value_objects::{Identifier, RecordKey},
    },
    ports::storage::DocumentStore,
};

const COLUMNS: &str = "record_key, identifier, created_at, details, attachment, attachment_data";

/// SQL-based implementation of DocumentStore using SQLite
///
/// One table per collection. Details and attachment metadata are stored as
/// JSON text, the attachment bytes in a BLOB column next to them.
pub struct SqlDocumentStore<D: EntityDetails> {
    pool: SqlitePool,
    _kind: PhantomData<fn() -> D>,
}

impl<D: EntityDetails> Clone for SqlDocumentStore<D> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<D: EntityDetails> SqlDocumentStore<D> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _kind: PhantomData,
        }
    }

    fn table(&self) -> &'static str {
        D::KIND.collection()
    }

    /// Initialize the collection table
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        let table = self.table();
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                record_key TEXT PRIMARY KEY NOT NULL,
                identifier INTEGER NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                details TEXT NOT NULL,
                attachment TEXT NOT NULL,
                attachment_data BLOB NOT NULL
            )
            "#
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn map_error(&self, err: sqlx::Error) -> StoreError {
        StoreError::backend(format!("Query on '{}' failed", self.table()), err)
    }

    /// Translate unique constraint violations into their store errors
    fn map_write_error(&self, err: sqlx::Error, record: &Record<D>) -> StoreError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return if db_err.message().contains(".identifier") {
                    StoreError::DuplicateIdentifier {
                        collection: self.table(),
                        identifier: record.identifier,
                    }
                } else {
                    StoreError::DuplicateKey {
                        collection: self.table(),
                        key: record.key,
                    }
                };
            }
        }
        self.map_error(err)
    }

    fn serialization_error(&self, err: impl std::fmt::Display) -> StoreError {
        StoreError::Serialization {
            collection: self.table(),
            message: err.to_string(),
        }
    }

    fn encode(&self, record: &Record<D>) -> StoreResult<EncodedRecord> {
        let mut attachment = record.attachment.clone();
        let data = std::mem::take(&mut attachment.data);

        Ok(EncodedRecord {
            key: record.key.to_string(),
            identifier: identifier_to_sql(record.identifier),
            created_at: record.created_at,
            details: serde_json::to_string(&record.details)
                .map_err(|e| self.serialization_error(e))?,
            attachment: serde_json::to_string(&attachment)
                .map_err(|e| self.serialization_error(e))?,
            data,
        })
    }

    fn decode(&self, row: &SqliteRow) -> StoreResult<Record<D>> {
        let key: String = row.try_get("record_key").map_err(|e| self.map_error(e))?;
        let identifier: i64 = row.try_get("identifier").map_err(|e| self.map_error(e))?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(|e| self.map_error(e))?;
        let details: String = row.try_get("details").map_err(|e| self.map_error(e))?;
        let attachment: String = row.try_get("attachment").map_err(|e| self.map_error(e))?;
        let data: Vec<u8> = row
            .try_get("attachment_data")
            .map_err(|e| self.map_error(e))?;

        let mut attachment: Attachment =
            serde_json::from_str(&attachment).map_err(|e| self.serialization_error(e))?;
        attachment.data = data;

        Ok(Record {
            identifier: Identifier::new(identifier as u64),
            key: key.parse::<RecordKey>().map_err(|e| self.serialization_error(e))?,
            created_at,
            details: serde_json::from_str(&details).map_err(|e| self.serialization_error(e))?,
            attachment,
        })
    }

    /// Start a transaction holding the database write lock from its first statement.
    ///
    /// A deferred transaction that reads before writing cannot upgrade its lock
    /// while another connection does the same, and SQLite fails one of them
    /// with SQLITE_BUSY without consulting the busy timeout.
    async fn begin_write(&self) -> StoreResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| self.map_error(e))
    }

    fn select(&self, filter: &RecordFilter) -> QueryBuilder<'static, Sqlite> {
        let mut query = QueryBuilder::new(format!("SELECT {} FROM {}", COLUMNS, self.table()));
        push_filter(&mut query, filter);
        query
    }
}

struct EncodedRecord {
    key: String,
    identifier: i64,
    created_at: DateTime<Utc>,
    details: String,
    attachment: String,
    data: Vec<u8>,
}

fn identifier_to_sql(identifier: Identifier) -> i64 {
    identifier.value() as i64
}

/// Append a WHERE clause selecting the filter's records
fn push_filter(query: &mut QueryBuilder<'static, Sqlite>, filter: &RecordFilter) {
    match filter {
        RecordFilter::All => {}
        RecordFilter::ByIdentifier(identifier) => {
            query.push(" WHERE identifier = ");
            query.push_bind(identifier_to_sql(*identifier));
        }
        RecordFilter::ByKey(key) => {
            query.push(" WHERE record_key = ");
            query.push_bind(key.to_string());
        }
        RecordFilter::IdentifierIn(identifiers) if identifiers.is_empty() => {
            query.push(" WHERE 0");
        }
        RecordFilter::IdentifierIn(identifiers) => {
            query.push(" WHERE identifier IN (");
            let mut list = query.separated(", ");
            for identifier in identifiers {
                list.push_bind(identifier_to_sql(*identifier));
            }
            list.push_unseparated(")");
        }
        RecordFilter::KeyIn(keys) if keys.is_empty() => {
            query.push(" WHERE 0");
        }
        RecordFilter::KeyIn(keys) => {
            query.push(" WHERE record_key IN (");
            let mut list = query.separated(", ");
            for key in keys {
                list.push_bind(key.to_string());
            }
            list.push_unseparated(")");
        }
    }
}

const INSERT: &str = "(record_key, identifier, created_at, details, attachment, attachment_data) \
     VALUES (?, ?, ?, ?, ?, ?)";

#[async_trait]
impl<D: EntityDetails> DocumentStore<D> for SqlDocumentStore<D> {
    async fn find_one(&self, filter: &RecordFilter) -> StoreResult<Option<Record<D>>> {
        let mut query = self.select(filter);
        query.push(" ORDER BY identifier LIMIT 1");

        let row = query
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.map_error(e))?;

        row.map(|row| self.decode(&row)).transpose()
    }

    async fn find_many(&self, filter: &RecordFilter) -> StoreResult<Vec<Record<D>>> {
        let mut query = self.select(filter);
        query.push(" ORDER BY identifier");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| self.map_error(e))?;

        rows.iter().map(|row| self.decode(row)).collect()
    }

    async fn find_max_identifier(&self) -> StoreResult<Option<Identifier>> {
        let max: Option<i64> =
            sqlx::query_scalar(&format!("SELECT MAX(identifier) FROM {}", self.table()))
                .fetch_one(&self.pool)
                .await
                .map_err(|e| self.map_error(e))?;

        Ok(max.map(|value| Identifier::new(value as u64)))
    }

    async fn insert_one(&self, record: Record<D>) -> StoreResult<Record<D>> {
        let encoded = self.encode(&record)?;
        let sql = format!("INSERT INTO {} {}", self.table(), INSERT);

        sqlx::query(&sql)
            .bind(&encoded.key)
            .bind(encoded.identifier)
            .bind(encoded.created_at)
            .bind(&encoded.details)
            .bind(&encoded.attachment)
            .bind(&encoded.data)
            .execute(&self.pool)
            .await
            .map_err(|e| self.map_write_error(e, &record))?;

        Ok(record)
    }

    async fn insert_many(&self, records: Vec<Record<D>>) -> StoreResult<Vec<Record<D>>> {
        let sql = format!("INSERT INTO {} {}", self.table(), INSERT);
        let mut tx = self.begin_write().await?;

        for record in &records {
            let encoded = self.encode(record)?;
            sqlx::query(&sql)
                .bind(&encoded.key)
                .bind(encoded.identifier)
                .bind(encoded.created_at)
                .bind(&encoded.details)
                .bind(&encoded.attachment)
                .bind(&encoded.data)
                .execute(&mut *tx)
                .await
                .map_err(|e| self.map_write_error(e, record))?;
        }

        // Dropping the transaction on any error above rolls the batch back
        tx.commit().await.map_err(|e| self.map_error(e))?;

        Ok(records)
    }

    async fn update_one(
        &self,
        filter: &RecordFilter,
        update: &RecordUpdate<D>,
    ) -> StoreResult<Option<Record<D>>> {
        // Read and write under one write lock so concurrent updates queue on the busy timeout
        let mut tx = self.begin_write().await?;

        let mut query = self.select(filter);
        query.push(" ORDER BY identifier LIMIT 1");
        let row = query
            .build()
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| self.map_error(e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut record = self.decode(&row)?;
        update.apply(&mut record);
        let encoded = self.encode(&record)?;

        sqlx::query(&format!(
            "UPDATE {} SET details = ?, attachment = ?, attachment_data = ? WHERE identifier = ?",
            self.table()
        ))
        .bind(&encoded.details)
        .bind(&encoded.attachment)
        .bind(&encoded.data)
        .bind(encoded.identifier)
        .execute(&mut *tx)
        .await
        .map_err(|e| self.map_error(e))?;

        tx.commit().await.map_err(|e| self.map_error(e))?;

        Ok(Some(record))
    }

    async fn delete_one(&self, filter: &RecordFilter) -> StoreResult<bool> {
        let table = self.table();
        let mut query = QueryBuilder::new(format!(
            "DELETE FROM {table} WHERE identifier IN (SELECT identifier FROM {table}"
        ));
        push_filter(&mut query, filter);
        query.push(" ORDER BY identifier LIMIT 1)");

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| self.map_error(e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, filter: &RecordFilter) -> StoreResult<u64> {
        let mut query = QueryBuilder::new(format!("DELETE FROM {}", self.table()));
        push_filter(&mut query, filter);

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| self.map_error(e))?;

        Ok(result.rows_affected())
    }
}
