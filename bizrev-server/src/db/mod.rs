//! Data access layer - schema-driven record store
//!
//! # Design Principles
//!
//! - One object-safe [`RecordStore`] trait; entities never talk SQL directly
//! - Column names come from static [`Schema`]s, values are always bound
//! - Connection pool per process, one pooled connection per statement
//! - Not-found is `None` or an affected count of 0, never an error

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;
pub mod schema;
pub mod store;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_options};
pub use postgres::PgStore;
pub use schema::{Column, ColumnKind, Fields, Row, Schema, Value, ID_COLUMN};
pub use store::{DbError, RecordStore};

pub use sqlx::PgPool;
