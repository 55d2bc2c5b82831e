//! The capability an entity provides to the generic CRUD handler
//!
//! Businesses and reviews differ only in their schema, their payload types,
//! and which columns they can be filtered by. Everything else lives once in
//! [`Crud`](crate::crud::Crud) and the generic HTTP routes.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ValidationError;
use crate::db::{ColumnKind, DbError, Fields, Row, Schema};

/// Query-string key and the column it filters on
#[derive(Debug, Clone, Copy)]
pub struct Filter {
    pub param: &'static str,
    pub column: &'static str,
}

pub trait Resource: Send + Sync + 'static {
    /// Singular name used in messages ("business")
    const NAME: &'static str;

    /// Path segment of the collection ("businesses")
    const COLLECTION: &'static str;

    const SCHEMA: &'static Schema;

    /// Accepted filters for list requests
    const FILTERS: &'static [Filter];

    /// Columns whose combined values may appear at most once
    const UNIQUE_TOGETHER: &'static [&'static str] = &[];

    /// Response shape
    type Record: Serialize + Send;

    /// Create payload
    type New: DeserializeOwned + Send;

    /// Partial update payload
    type Patch: DeserializeOwned + Send;

    /// Validate a create payload into the columns to insert.
    fn new_fields(new: Self::New) -> Result<Fields, ValidationError>;

    /// Validate an update payload into the columns to change.
    ///
    /// Implementations return only supplied fields; an empty result is
    /// rejected by the caller.
    fn patch_fields(patch: Self::Patch) -> Result<Fields, ValidationError>;

    fn from_row(row: Row) -> Result<Self::Record, DbError>;

    /// Link to a single record.
    fn self_link(id: i64) -> String {
        format!("/{}/{}", Self::COLLECTION, id)
    }
}

/// Turn raw query pairs into typed equality filters for `R`.
///
/// Unknown keys, repeated keys and values that do not parse as the
/// column's type are validation errors.
pub fn parse_filters<R: Resource>(pairs: Vec<(String, String)>) -> Result<Fields, ValidationError> {
    let mut filters = Fields::new();

    for (key, raw) in pairs {
        let filter = R::FILTERS
            .iter()
            .find(|f| f.param == key)
            .ok_or(ValidationError::UnknownFilter { name: key })?;

        if filters.get(filter.column).is_some() {
            return Err(ValidationError::DuplicateFilter { name: filter.param });
        }

        let kind = R::SCHEMA
            .column(filter.column)
            .map(|c| c.kind)
            .unwrap_or(ColumnKind::Text);

        match kind {
            ColumnKind::Int => {
                let value: i64 = raw.trim().parse().map_err(|_| ValidationError::InvalidFormat {
                    field: filter.param,
                    reason: "must be an integer",
                })?;
                filters.push(filter.column, value);
            }
            ColumnKind::Text => filters.push(filter.column, raw),
        }
    }

    Ok(filters)
}
