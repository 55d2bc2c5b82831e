//! PostgreSQL record store
//!
//! Every statement is assembled with `sqlx::QueryBuilder`: identifiers are
//! pushed from the static schema, values go through `push_bind`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row as _};

use super::schema::{ColumnKind, Fields, Row, Schema, Value, ID_COLUMN};
use super::store::{DbError, RecordStore};

/// Record store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &Value) {
    match value {
        Value::Int(v) => qb.push_bind(*v),
        Value::Text(v) => qb.push_bind(v.clone()),
        Value::Null => qb.push_bind(Option::<String>::None),
    };
}

/// Append `WHERE a = $1 AND b = $2 ...` for the given predicates.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &Fields) {
    for (i, (column, value)) in filters.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        qb.push(*column);
        if *value == Value::Null {
            qb.push(" IS NULL");
        } else {
            qb.push(" = ");
            push_value(qb, value);
        }
    }
}

fn unique_violation(schema: &Schema, err: sqlx::Error) -> DbError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => DbError::Duplicate {
            table: schema.table,
        },
        _ => DbError::Sqlx(err),
    }
}

fn select_from(schema: &Schema) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(schema.select_list());
    qb.push(" FROM ");
    qb.push(schema.table);
    qb
}

fn decode_row(schema: &Schema, row: &PgRow) -> Result<Row, DbError> {
    let mut record = Row::new(row.try_get::<i64, _>(ID_COLUMN)?);
    for column in schema.columns {
        let value = match column.kind {
            ColumnKind::Int => Value::from(row.try_get::<Option<i64>, _>(column.name)?),
            ColumnKind::Text => Value::from(row.try_get::<Option<String>, _>(column.name)?),
        };
        record.set(column.name, value);
    }
    Ok(record)
}

#[async_trait]
impl RecordStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create_record(&self, schema: &'static Schema, fields: &Fields) -> Result<i64, DbError> {
        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO ");
        qb.push(schema.table);

        if fields.is_empty() {
            qb.push(" DEFAULT VALUES");
        } else {
            qb.push(" (");
            for (i, (column, _)) in fields.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                qb.push(*column);
            }
            qb.push(") VALUES (");
            for (i, (_, value)) in fields.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                push_value(&mut qb, value);
            }
            qb.push(")");
        }
        qb.push(" RETURNING ");
        qb.push(ID_COLUMN);

        let id: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_violation(schema, e))?;
        tracing::debug!(table = schema.table, id, "row inserted");
        Ok(id)
    }

    async fn read_record(&self, schema: &'static Schema, id: i64) -> Result<Option<Row>, DbError> {
        let mut qb = select_from(schema);
        qb.push(" WHERE ");
        qb.push(ID_COLUMN);
        qb.push(" = ");
        qb.push_bind(id);

        let row = qb.build().fetch_optional(&self.pool).await?;
        row.map(|r| decode_row(schema, &r)).transpose()
    }

    async fn read_filtered(
        &self,
        schema: &'static Schema,
        filters: &Fields,
    ) -> Result<Vec<Row>, DbError> {
        let mut qb = select_from(schema);
        push_filters(&mut qb, filters);
        // Ids are sequence-assigned, so this is insertion order
        qb.push(" ORDER BY ");
        qb.push(ID_COLUMN);

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(|r| decode_row(schema, r)).collect()
    }

    async fn update_record(
        &self,
        schema: &'static Schema,
        id: i64,
        fields: &Fields,
    ) -> Result<u64, DbError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE ");
        qb.push(schema.table);
        qb.push(" SET ");

        if fields.is_empty() {
            // No-op assignment still reports whether the row exists
            qb.push(ID_COLUMN);
            qb.push(" = ");
            qb.push(ID_COLUMN);
        } else {
            for (i, (column, value)) in fields.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                qb.push(*column);
                qb.push(" = ");
                push_value(&mut qb, value);
            }
        }

        qb.push(" WHERE ");
        qb.push(ID_COLUMN);
        qb.push(" = ");
        qb.push_bind(id);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete_record(&self, schema: &'static Schema, id: i64) -> Result<u64, DbError> {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM ");
        qb.push(schema.table);
        qb.push(" WHERE ");
        qb.push(ID_COLUMN);
        qb.push(" = ");
        qb.push_bind(id);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::Column;

    const NOTES: Schema = Schema {
        table: "notes",
        columns: &[Column::int("author_id"), Column::text("body").nullable()],
    };

    #[test]
    fn filters_are_bound_not_inlined() {
        let mut qb = select_from(&NOTES);
        push_filters(
            &mut qb,
            &Fields::new()
                .with("author_id", 5_i64)
                .with("body", "'; DROP TABLE notes; --"),
        );

        assert_eq!(
            qb.sql(),
            "SELECT id, author_id, body FROM notes WHERE author_id = $1 AND body = $2"
        );
    }

    #[test]
    fn null_filter_uses_is_null() {
        let mut qb = select_from(&NOTES);
        push_filters(&mut qb, &Fields::new().with("body", Value::Null));

        assert_eq!(qb.sql(), "SELECT id, author_id, body FROM notes WHERE body IS NULL");
    }

    #[test]
    fn empty_filters_select_everything() {
        let mut qb = select_from(&NOTES);
        push_filters(&mut qb, &Fields::new());

        assert_eq!(qb.sql(), "SELECT id, author_id, body FROM notes");
    }
}
