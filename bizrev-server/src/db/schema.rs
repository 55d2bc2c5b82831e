//! Table descriptions and bindable values
//!
//! Column names that end up in SQL text come only from the static
//! [`Schema`] constants declared next to each entity. Values supplied by
//! clients travel as [`Value`]s and are always bound as parameters.

use std::collections::BTreeMap;

use super::DbError;

/// Name of the server-assigned primary key column in every table
pub const ID_COLUMN: &str = "id";

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Text,
}

/// A non-key column of a table
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
}

impl Column {
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Int,
            nullable: false,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Text,
            nullable: false,
        }
    }

    pub const fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }
}

/// Static description of a table: its name and its non-key columns
#[derive(Debug)]
pub struct Schema {
    pub table: &'static str,
    pub columns: &'static [Column],
}

impl Schema {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Comma-separated column list for SELECT statements, key first.
    pub fn select_list(&self) -> String {
        std::iter::once(ID_COLUMN)
            .chain(self.columns.iter().map(|c| c.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A single bindable column value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
    Null,
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Ordered `(column, value)` pairs.
///
/// Used both as the payload of inserts/updates and as the equality
/// predicates of filtered reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(&'static str, Value)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style push.
    pub fn with(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    /// Set `column`, replacing an earlier value for the same column.
    pub fn push(&mut self, column: &'static str, value: impl Into<Value>) {
        let value = value.into();
        match self.0.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.0.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.iter().find(|(c, _)| *c == column).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A decoded record: its key plus one value per schema column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: i64,
    values: BTreeMap<&'static str, Value>,
}

impl Row {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            values: BTreeMap::new(),
        }
    }

    /// Build the row a freshly inserted record would read back as.
    ///
    /// Columns absent from `fields` are `Null`.
    pub fn from_fields(schema: &Schema, id: i64, fields: &Fields) -> Self {
        let mut row = Self::new(id);
        for column in schema.columns {
            let value = fields.get(column.name).cloned().unwrap_or(Value::Null);
            row.set(column.name, value);
        }
        row
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn set(&mut self, column: &'static str, value: Value) {
        self.values.insert(column, value);
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Whether every `(column, value)` pair in `filters` matches this row.
    pub fn matches(&self, filters: &Fields) -> bool {
        filters
            .iter()
            .all(|(column, value)| self.values.get(column) == Some(value))
    }

    pub fn int(&self, column: &'static str) -> Result<i64, DbError> {
        match self.values.get(column) {
            Some(Value::Int(v)) => Ok(*v),
            _ => Err(DbError::Decode {
                column,
                expected: "integer",
            }),
        }
    }

    pub fn text(&self, column: &'static str) -> Result<String, DbError> {
        match self.values.get(column) {
            Some(Value::Text(v)) => Ok(v.clone()),
            _ => Err(DbError::Decode {
                column,
                expected: "text",
            }),
        }
    }

    pub fn opt_text(&self, column: &'static str) -> Result<Option<String>, DbError> {
        match self.values.get(column) {
            Some(Value::Text(v)) => Ok(Some(v.clone())),
            Some(Value::Null) | None => Ok(None),
            Some(Value::Int(_)) => Err(DbError::Decode {
                column,
                expected: "text or null",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PETS: Schema = Schema {
        table: "pets",
        columns: &[
            Column::int("owner_id"),
            Column::text("name"),
            Column::text("nickname").nullable(),
        ],
    };

    #[test]
    fn select_list_puts_key_first() {
        assert_eq!(PETS.select_list(), "id, owner_id, name, nickname");
    }

    #[test]
    fn push_replaces_existing_column() {
        let mut fields = Fields::new().with("name", "Rex");
        fields.push("name", "Fido");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("name"), Some(&Value::Text("Fido".into())));
    }

    #[test]
    fn row_from_fields_fills_missing_with_null() {
        let fields = Fields::new().with("owner_id", 7_i64).with("name", "Rex");
        let row = Row::from_fields(&PETS, 3, &fields);

        assert_eq!(row.id(), 3);
        assert_eq!(row.int("owner_id").unwrap(), 7);
        assert_eq!(row.text("name").unwrap(), "Rex");
        assert_eq!(row.opt_text("nickname").unwrap(), None);
    }

    #[test]
    fn typed_getters_reject_wrong_kind() {
        let row = Row::from_fields(&PETS, 1, &Fields::new().with("name", "Rex"));
        assert!(matches!(
            row.int("name"),
            Err(DbError::Decode { column: "name", .. })
        ));
    }

    #[test]
    fn matches_requires_every_filter() {
        let row = Row::from_fields(
            &PETS,
            1,
            &Fields::new().with("owner_id", 7_i64).with("name", "Rex"),
        );
        assert!(row.matches(&Fields::new()));
        assert!(row.matches(&Fields::new().with("owner_id", 7_i64)));
        assert!(!row.matches(&Fields::new().with("owner_id", 7_i64).with("name", "Fido")));
    }
}
