//! Domain models with validation at construction
//!
//! All client input is validated before it becomes [`Fields`](crate::db::Fields).
//! Invalid input returns ValidationError, not panic.

pub mod business;
pub mod resource;
pub mod review;
pub mod validation;

pub use business::{Business, BusinessPatch, NewBusiness, BUSINESS_SCHEMA};
pub use resource::{parse_filters, Filter, Resource};
pub use review::{NewReview, Review, ReviewPatch, REVIEW_SCHEMA};
pub use validation::ValidationError;
