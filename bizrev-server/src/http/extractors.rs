//! Custom Axum extractors
//!
//! Rejections from the stock extractors are plain text; these wrappers turn
//! every malformed path, query or body into a JSON validation error before
//! a handler runs.

use std::marker::PhantomData;

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::db::Fields;
use crate::models::{parse_filters, Resource, ValidationError};

/// Extract a numeric record id from a single-segment path parameter
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        let id = raw.parse::<i64>().map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "must be an integer",
            })
        })?;

        Ok(Self(id))
    }
}

/// JSON body whose parse failures become validation errors
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::Validation(ValidationError::Malformed {
                target: "request body",
                detail: rejection.body_text(),
            })
        })?;
        Ok(Self(value))
    }
}

/// Equality filters for list requests on `R`
pub struct FilterQuery<R> {
    pub filters: Fields,
    _resource: PhantomData<fn() -> R>,
}

impl<S, R> FromRequestParts<S> for FilterQuery<R>
where
    S: Send + Sync,
    R: Resource,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs): Query<Vec<(String, String)>> = Query::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::Malformed {
                    target: "query string",
                    detail: rejection.body_text(),
                })
            })?;

        Ok(Self {
            filters: parse_filters::<R>(pairs)?,
            _resource: PhantomData,
        })
    }
}
