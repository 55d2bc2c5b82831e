//! Generic resource handler
//!
//! One implementation of create / read / filtered read / update / delete,
//! parameterized over a [`Resource`]. Validation happens here, before the
//! store is touched.

use std::marker::PhantomData;

use crate::db::{DbError, Fields, RecordStore, Row};
use crate::models::{Resource, ValidationError};

/// Outcome of a failed resource operation
#[derive(Debug, thiserror::Error)]
pub enum CrudError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("{message}")]
    Conflict { message: String },

    #[error(transparent)]
    Persistence(#[from] DbError),
}

/// CRUD operations for one resource type over a borrowed store
pub struct Crud<'a, R: Resource> {
    store: &'a dyn RecordStore,
    _resource: PhantomData<fn() -> R>,
}

impl<'a, R: Resource> Crud<'a, R> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    /// Validate and insert a new record.
    pub async fn create(&self, new: R::New) -> Result<R::Record, CrudError> {
        let fields = R::new_fields(new)?;
        self.ensure_unique(&fields).await?;

        let id = match self.store.create_record(R::SCHEMA, &fields).await {
            Ok(id) => id,
            Err(DbError::Duplicate { .. }) => return Err(Self::conflict()),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(resource = R::NAME, id, "created");

        // The stored row is exactly what was inserted
        let row = Row::from_fields(R::SCHEMA, id, &fields);
        Ok(R::from_row(row)?)
    }

    pub async fn get(&self, id: i64) -> Result<R::Record, CrudError> {
        let row = self
            .store
            .read_record(R::SCHEMA, id)
            .await?
            .ok_or(CrudError::NotFound {
                resource: R::NAME,
                id,
            })?;
        Ok(R::from_row(row)?)
    }

    /// Every record matching all `filters`; empty filters list everything.
    pub async fn list(&self, filters: &Fields) -> Result<Vec<R::Record>, CrudError> {
        let rows = self.store.read_filtered(R::SCHEMA, filters).await?;
        tracing::debug!(resource = R::NAME, filters = filters.len(), count = rows.len(), "listed");
        rows.into_iter()
            .map(|row| R::from_row(row).map_err(CrudError::from))
            .collect()
    }

    /// Apply a partial update and return the record as stored afterwards.
    pub async fn update(&self, id: i64, patch: R::Patch) -> Result<R::Record, CrudError> {
        let fields = R::patch_fields(patch)?;
        if fields.is_empty() {
            return Err(ValidationError::NoChanges.into());
        }

        let affected = self.store.update_record(R::SCHEMA, id, &fields).await?;
        if affected == 0 {
            return Err(CrudError::NotFound {
                resource: R::NAME,
                id,
            });
        }
        tracing::info!(resource = R::NAME, id, fields = fields.len(), "updated");

        self.get(id).await
    }

    /// Delete one record. Nothing else is touched.
    pub async fn delete(&self, id: i64) -> Result<(), CrudError> {
        let affected = self.store.delete_record(R::SCHEMA, id).await?;
        if affected == 0 {
            return Err(CrudError::NotFound {
                resource: R::NAME,
                id,
            });
        }
        tracing::info!(resource = R::NAME, id, "deleted");
        Ok(())
    }

    fn conflict() -> CrudError {
        CrudError::Conflict {
            message: format!(
                "a {} with the same {} already exists",
                R::NAME,
                R::UNIQUE_TOGETHER.join(" and ")
            ),
        }
    }

    // Concurrent creates can both pass this read; a unique index in the
    // store rejects the loser, which create() reports the same way.
    async fn ensure_unique(&self, fields: &Fields) -> Result<(), CrudError> {
        if R::UNIQUE_TOGETHER.is_empty() {
            return Ok(());
        }

        let mut key = Fields::new();
        for column in R::UNIQUE_TOGETHER {
            if let Some(value) = fields.get(column) {
                key.push(*column, value.clone());
            }
        }

        let existing = self.store.read_filtered(R::SCHEMA, &key).await?;
        if !existing.is_empty() {
            return Err(Self::conflict());
        }
        Ok(())
    }
}
