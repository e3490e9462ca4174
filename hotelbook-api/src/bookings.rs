use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Json, Path, State},
    routing::{get, put},
    Extension, Router,
};
use hotelbook_shared::{BookingReceipt, BookingWithRoom};
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub room_id: Option<i32>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/booking", get(get_booking).post(create_booking))
        .route("/booking/{booking_id}", put(update_booking))
}

/// GET /booking
async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<BookingWithRoom>, AppError> {
    let booking = state.bookings.get_booking(user.user_id).await?;
    Ok(Json(booking))
}

/// POST /booking
async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingReceipt>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;

    let receipt = state.bookings.create_booking(user.user_id, req.room_id).await?;
    Ok(Json(receipt))
}

/// PUT /booking/:booking_id
async fn update_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    booking_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingReceipt>, AppError> {
    let Path(booking_id) = booking_id.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let Json(req) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;

    let receipt = state
        .bookings
        .update_booking(user.user_id, booking_id, req.room_id)
        .await?;
    Ok(Json(receipt))
}
