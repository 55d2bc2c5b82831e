//! Generic collection endpoints
//!
//! For a resource mounted at `/{collection}`:
//!
//! - `GET    /{collection}?filter=..` list (filtered or whole table)
//! - `POST   /{collection}`           create, 201
//! - `GET    /{collection}/{id}`      read
//! - `PUT    /{collection}/{id}`      partial update
//! - `DELETE /{collection}/{id}`      delete, 204

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::crud::Crud;
use crate::http::error::ApiError;
use crate::http::extractors::{FilterQuery, RecordId, ValidJson};
use crate::models::Resource;
use crate::state::AppState;

async fn list<R: Resource>(
    State(state): State<AppState>,
    query: FilterQuery<R>,
) -> Result<Json<Vec<R::Record>>, ApiError> {
    let records = Crud::<R>::new(state.store()).list(&query.filters).await?;
    Ok(Json(records))
}

async fn create<R: Resource>(
    State(state): State<AppState>,
    ValidJson(new): ValidJson<R::New>,
) -> Result<(StatusCode, Json<R::Record>), ApiError> {
    let record = Crud::<R>::new(state.store()).create(new).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn read<R: Resource>(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<Json<R::Record>, ApiError> {
    let record = Crud::<R>::new(state.store()).get(id).await?;
    Ok(Json(record))
}

async fn update<R: Resource>(
    State(state): State<AppState>,
    RecordId(id): RecordId,
    ValidJson(patch): ValidJson<R::Patch>,
) -> Result<Json<R::Record>, ApiError> {
    let record = Crud::<R>::new(state.store()).update(id, patch).await?;
    Ok(Json(record))
}

async fn remove<R: Resource>(
    State(state): State<AppState>,
    RecordId(id): RecordId,
) -> Result<StatusCode, ApiError> {
    Crud::<R>::new(state.store()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Collection and item routes for `R`
pub fn router<R: Resource>() -> Router<AppState> {
    let collection = format!("/{}", R::COLLECTION);
    let item = format!("/{}/{{id}}", R::COLLECTION);

    Router::new()
        .route(&collection, get(list::<R>).post(create::<R>))
        .route(&item, get(read::<R>).put(update::<R>).delete(remove::<R>))
}
