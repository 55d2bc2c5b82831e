//! Business endpoints
//!
//! CRUD under `/businesses`, plus `/owners/{owner_id}/businesses` as a path
//! form of `GET /businesses?owner={owner_id}`.

use axum::{extract::State, routing::get, Json, Router};

use super::resource;
use crate::crud::Crud;
use crate::db::Fields;
use crate::http::error::ApiError;
use crate::http::extractors::RecordId;
use crate::models::Business;
use crate::state::AppState;

/// GET /owners/{owner_id}/businesses
async fn list_for_owner(
    State(state): State<AppState>,
    RecordId(owner_id): RecordId,
) -> Result<Json<Vec<Business>>, ApiError> {
    let filters = Fields::new().with("owner_id", owner_id);
    let businesses = Crud::<Business>::new(state.store()).list(&filters).await?;
    Ok(Json(businesses))
}

/// Business routes
pub fn router() -> Router<AppState> {
    resource::router::<Business>().route("/owners/{owner_id}/businesses", get(list_for_owner))
}
