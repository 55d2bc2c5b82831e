//! Review endpoints
//!
//! CRUD under `/reviews`, plus `/users/{user_id}/reviews` as a path form of
//! `GET /reviews?user={user_id}`.

use axum::{extract::State, routing::get, Json, Router};

use super::resource;
use crate::crud::Crud;
use crate::db::Fields;
use crate::http::error::ApiError;
use crate::http::extractors::RecordId;
use crate::models::Review;
use crate::state::AppState;

/// GET /users/{user_id}/reviews
async fn list_for_user(
    State(state): State<AppState>,
    RecordId(user_id): RecordId,
) -> Result<Json<Vec<Review>>, ApiError> {
    let filters = Fields::new().with("user_id", user_id);
    let reviews = Crud::<Review>::new(state.store()).list(&filters).await?;
    Ok(Json(reviews))
}

/// Review routes
pub fn router() -> Router<AppState> {
    resource::router::<Review>().route("/users/{user_id}/reviews", get(list_for_user))
}
