//! Review entity
//!
//! `business_id` is a plain column: nothing checks that the business exists,
//! and deleting a business leaves its reviews in place.

use serde::{Deserialize, Serialize};

use super::business::Business;
use super::resource::{Filter, Resource};
use super::validation::{self, ValidationError};
use crate::db::{Column, DbError, Fields, Row, Schema};

const MIN_STARS: i64 = 0;
const MAX_STARS: i64 = 5;
const MAX_REVIEW_TEXT_LEN: usize = 1000;

pub const REVIEW_SCHEMA: Schema = Schema {
    table: "reviews",
    columns: &[
        Column::int("user_id"),
        Column::int("business_id"),
        Column::int("stars"),
        Column::text("review_text").nullable(),
    ],
};

/// Review as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub business_id: i64,
    pub stars: i64,
    pub review_text: Option<String>,
    /// Link to the reviewed business (which may no longer exist)
    pub business: String,
    #[serde(rename = "self")]
    pub self_link: String,
}

/// POST /reviews body
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewReview {
    pub user_id: i64,
    pub business_id: i64,
    pub stars: i64,
    #[serde(default)]
    pub review_text: Option<String>,
}

/// PUT /reviews/{id} body. Author and business are fixed at creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewPatch {
    pub stars: Option<i64>,
    pub review_text: Option<String>,
}

impl Resource for Review {
    const NAME: &'static str = "review";
    const COLLECTION: &'static str = "reviews";
    const SCHEMA: &'static Schema = &REVIEW_SCHEMA;
    const FILTERS: &'static [Filter] = &[
        Filter {
            param: "user",
            column: "user_id",
        },
        Filter {
            param: "business",
            column: "business_id",
        },
    ];
    // One review per user per business
    const UNIQUE_TOGETHER: &'static [&'static str] = &["user_id", "business_id"];

    type Record = Review;
    type New = NewReview;
    type Patch = ReviewPatch;

    fn new_fields(new: NewReview) -> Result<Fields, ValidationError> {
        let review_text = new
            .review_text
            .map(|t| validation::free_text("review_text", t, MAX_REVIEW_TEXT_LEN))
            .transpose()?;

        Ok(Fields::new()
            .with("user_id", validation::positive_id("user_id", new.user_id)?)
            .with(
                "business_id",
                validation::positive_id("business_id", new.business_id)?,
            )
            .with(
                "stars",
                validation::in_range("stars", new.stars, MIN_STARS, MAX_STARS)?,
            )
            .with("review_text", review_text))
    }

    fn patch_fields(patch: ReviewPatch) -> Result<Fields, ValidationError> {
        let mut fields = Fields::new();
        if let Some(stars) = patch.stars {
            fields.push(
                "stars",
                validation::in_range("stars", stars, MIN_STARS, MAX_STARS)?,
            );
        }
        if let Some(text) = patch.review_text {
            fields.push(
                "review_text",
                validation::free_text("review_text", text, MAX_REVIEW_TEXT_LEN)?,
            );
        }
        Ok(fields)
    }

    fn from_row(row: Row) -> Result<Review, DbError> {
        let business_id = row.int("business_id")?;
        Ok(Review {
            id: row.id(),
            user_id: row.int("user_id")?,
            business_id,
            stars: row.int("stars")?,
            review_text: row.opt_text("review_text")?,
            business: Business::self_link(business_id),
            self_link: Self::self_link(row.id()),
        })
    }
}
