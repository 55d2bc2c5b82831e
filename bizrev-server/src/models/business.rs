//! Business entity

use serde::{Deserialize, Serialize};

use super::resource::{Filter, Resource};
use super::validation::{self, ValidationError};
use crate::db::{Column, DbError, Fields, Row, Schema};

const MAX_NAME_LEN: usize = 50;
const MAX_STREET_LEN: usize = 100;
const MAX_CITY_LEN: usize = 50;

pub const BUSINESS_SCHEMA: Schema = Schema {
    table: "businesses",
    columns: &[
        Column::int("owner_id"),
        Column::text("name"),
        Column::text("street_address"),
        Column::text("city"),
        Column::text("state"),
        Column::text("zip_code"),
    ],
};

/// Business as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(rename = "self")]
    pub self_link: String,
}

/// POST /businesses body; every field is required
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewBusiness {
    pub owner_id: i64,
    pub name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// PUT /businesses/{id} body; only supplied fields change
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BusinessPatch {
    pub owner_id: Option<i64>,
    pub name: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl Resource for Business {
    const NAME: &'static str = "business";
    const COLLECTION: &'static str = "businesses";
    const SCHEMA: &'static Schema = &BUSINESS_SCHEMA;
    const FILTERS: &'static [Filter] = &[Filter {
        param: "owner",
        column: "owner_id",
    }];

    type Record = Business;
    type New = NewBusiness;
    type Patch = BusinessPatch;

    fn new_fields(new: NewBusiness) -> Result<Fields, ValidationError> {
        Ok(Fields::new()
            .with("owner_id", validation::positive_id("owner_id", new.owner_id)?)
            .with("name", validation::text("name", new.name, MAX_NAME_LEN)?)
            .with(
                "street_address",
                validation::text("street_address", new.street_address, MAX_STREET_LEN)?,
            )
            .with("city", validation::text("city", new.city, MAX_CITY_LEN)?)
            .with("state", validation::state_code("state", new.state)?)
            .with("zip_code", validation::zip_code("zip_code", new.zip_code)?))
    }

    fn patch_fields(patch: BusinessPatch) -> Result<Fields, ValidationError> {
        let mut fields = Fields::new();
        if let Some(owner_id) = patch.owner_id {
            fields.push("owner_id", validation::positive_id("owner_id", owner_id)?);
        }
        if let Some(name) = patch.name {
            fields.push("name", validation::text("name", name, MAX_NAME_LEN)?);
        }
        if let Some(street) = patch.street_address {
            fields.push(
                "street_address",
                validation::text("street_address", street, MAX_STREET_LEN)?,
            );
        }
        if let Some(city) = patch.city {
            fields.push("city", validation::text("city", city, MAX_CITY_LEN)?);
        }
        if let Some(state) = patch.state {
            fields.push("state", validation::state_code("state", state)?);
        }
        if let Some(zip) = patch.zip_code {
            fields.push("zip_code", validation::zip_code("zip_code", zip)?);
        }
        Ok(fields)
    }

    fn from_row(row: Row) -> Result<Business, DbError> {
        Ok(Business {
            id: row.id(),
            owner_id: row.int("owner_id")?,
            name: row.text("name")?,
            street_address: row.text("street_address")?,
            city: row.text("city")?,
            state: row.text("state")?,
            zip_code: row.text("zip_code")?,
            self_link: Self::self_link(row.id()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Value;

    fn cafe() -> NewBusiness {
        NewBusiness {
            owner_id: 1,
            name: "Cafe".into(),
            street_address: "1 Main St".into(),
            city: "Corvallis".into(),
            state: "OR".into(),
            zip_code: "97331".into(),
        }
    }

    #[test]
    fn new_business_maps_every_column() {
        let fields = Business::new_fields(cafe()).unwrap();
        assert_eq!(fields.len(), BUSINESS_SCHEMA.columns.len());
        assert_eq!(fields.get("owner_id"), Some(&Value::Int(1)));
        assert_eq!(fields.get("zip_code"), Some(&Value::Text("97331".into())));
    }

    #[test]
    fn new_business_rejects_long_name() {
        let mut new = cafe();
        new.name = "x".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            Business::new_fields(new),
            Err(ValidationError::TooLong { field: "name", .. })
        ));
    }

    #[test]
    fn new_business_rejects_bad_zip() {
        let mut new = cafe();
        new.zip_code = "ABCDE".into();
        assert!(matches!(
            Business::new_fields(new),
            Err(ValidationError::InvalidFormat { field: "zip_code", .. })
        ));
    }

    #[test]
    fn patch_only_carries_supplied_fields() {
        let patch = BusinessPatch {
            name: Some("New Cafe".into()),
            ..Default::default()
        };
        let fields = Business::patch_fields(patch).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("name"), Some(&Value::Text("New Cafe".into())));
    }

    #[test]
    fn empty_patch_yields_no_fields() {
        assert!(Business::patch_fields(BusinessPatch::default()).unwrap().is_empty());
    }

    #[test]
    fn unknown_body_fields_are_rejected() {
        let err = serde_json::from_str::<BusinessPatch>(r#"{"id": 3}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn row_round_trip() {
        let fields = Business::new_fields(cafe()).unwrap();
        let row = Row::from_fields(&BUSINESS_SCHEMA, 9, &fields);
        let business = Business::from_row(row).unwrap();

        assert_eq!(business.id, 9);
        assert_eq!(business.name, "Cafe");
        assert_eq!(business.self_link, "/businesses/9");
    }
}
