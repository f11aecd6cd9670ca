use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{error::AppError, models::trip::Trip, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", get(trips_index))
        .route("/trips/:id", get(trip_show))
}

async fn trips_index(State(state): State<AppState>) -> Json<Vec<Trip>> {
    Json(state.storage.list_trips().await)
}

async fn trip_show(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<Trip>, AppError> {
    let trip = state
        .storage
        .get_trip(&trip_id)
        .await
        .ok_or(AppError::NotFound)?;
    Ok(Json(trip))
}
