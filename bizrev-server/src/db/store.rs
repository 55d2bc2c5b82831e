//! The storage seam shared by every entity

use async_trait::async_trait;

use super::schema::{Fields, Row, Schema};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("column '{column}' could not be decoded as {expected}")]
    Decode {
        column: &'static str,
        expected: &'static str,
    },

    #[error("constraint violation: {table}.{column} {reason}")]
    Constraint {
        table: &'static str,
        column: &'static str,
        reason: &'static str,
    },

    #[error("duplicate row in {table}")]
    Duplicate { table: &'static str },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Entity-agnostic CRUD over a relational store.
///
/// Every method targets the table described by `schema`. Absence is
/// reported as `None` (reads) or an affected count of `0` (writes); errors
/// are reserved for store-level failures.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    /// Insert a row and return its generated id.
    async fn create_record(&self, schema: &'static Schema, fields: &Fields) -> Result<i64, DbError>;

    /// Fetch the row with the given id.
    async fn read_record(&self, schema: &'static Schema, id: i64) -> Result<Option<Row>, DbError>;

    /// Fetch every row whose columns equal all `filters`, in insertion order.
    ///
    /// An empty filter list selects the whole table.
    async fn read_filtered(
        &self,
        schema: &'static Schema,
        filters: &Fields,
    ) -> Result<Vec<Row>, DbError>;

    /// Apply `fields` to the row with the given id, returning rows affected.
    async fn update_record(
        &self,
        schema: &'static Schema,
        id: i64,
        fields: &Fields,
    ) -> Result<u64, DbError>;

    /// Remove the row with the given id, returning rows affected.
    async fn delete_record(&self, schema: &'static Schema, id: i64) -> Result<u64, DbError>;

    /// Round-trip to the store to prove it is reachable.
    async fn ping(&self) -> Result<(), DbError>;
}
