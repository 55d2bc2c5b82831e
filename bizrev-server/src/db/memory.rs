//! In-process record store
//!
//! Mirrors the observable behaviour of [`PgStore`](super::PgStore):
//! sequence-assigned ids starting at 1, insertion-ordered reads, NOT NULL
//! enforcement, and affected counts of 0 or 1. Backs the router tests and
//! `bizrev serve --in-memory`.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::schema::{Fields, Row, Schema, Value};
use super::store::{DbError, RecordStore};

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Row>,
}

/// Record store held entirely in memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<&'static str, Table>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the database were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), DbError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

/// Reject columns the table does not have and NULLs in NOT NULL columns.
fn check_fields(schema: &'static Schema, fields: &Fields) -> Result<(), DbError> {
    for (name, value) in fields.iter() {
        let column = schema.column(name).ok_or(DbError::Constraint {
            table: schema.table,
            column: *name,
            reason: "does not exist",
        })?;
        if *value == Value::Null && !column.nullable {
            return Err(DbError::Constraint {
                table: schema.table,
                column: column.name,
                reason: "violates not-null constraint",
            });
        }
    }
    Ok(())
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create_record(&self, schema: &'static Schema, fields: &Fields) -> Result<i64, DbError> {
        self.check_online()?;
        check_fields(schema, fields)?;
        if let Some(missing) = schema
            .columns
            .iter()
            .find(|c| !c.nullable && fields.get(c.name).is_none())
        {
            return Err(DbError::Constraint {
                table: schema.table,
                column: missing.name,
                reason: "violates not-null constraint",
            });
        }

        let mut tables = self.tables.write().await;
        let table = tables.entry(schema.table).or_default();
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(id, Row::from_fields(schema, id, fields));
        Ok(id)
    }

    async fn read_record(&self, schema: &'static Schema, id: i64) -> Result<Option<Row>, DbError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        Ok(tables
            .get(schema.table)
            .and_then(|t| t.rows.get(&id))
            .cloned())
    }

    async fn read_filtered(
        &self,
        schema: &'static Schema,
        filters: &Fields,
    ) -> Result<Vec<Row>, DbError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        Ok(tables
            .get(schema.table)
            .map(|t| {
                t.rows
                    .values()
                    .filter(|row| row.matches(filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_record(
        &self,
        schema: &'static Schema,
        id: i64,
        fields: &Fields,
    ) -> Result<u64, DbError> {
        self.check_online()?;
        check_fields(schema, fields)?;

        let mut tables = self.tables.write().await;
        let Some(row) = tables.get_mut(schema.table).and_then(|t| t.rows.get_mut(&id)) else {
            return Ok(0);
        };
        for (column, value) in fields.iter() {
            row.set(*column, value.clone());
        }
        Ok(1)
    }

    async fn delete_record(&self, schema: &'static Schema, id: i64) -> Result<u64, DbError> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        let removed = tables
            .get_mut(schema.table)
            .and_then(|t| t.rows.remove(&id))
            .is_some();
        Ok(u64::from(removed))
    }

    async fn ping(&self) -> Result<(), DbError> {
        self.check_online()
    }
}
