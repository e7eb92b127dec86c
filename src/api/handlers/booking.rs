use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use crate::api::dtos::requests::{CreateBookingRequest, ListBookingsQuery, UpdateNotesRequest};
use crate::api::dtos::responses::{BookingActionResponse, BookingCreatedResponse};
use crate::domain::models::booking::BookingStatus;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.lifecycle.submit_inquiry(payload.into_draft()).await?;
    Ok(Json(BookingCreatedResponse {
        booking_id: booking.id,
    }))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = match query.status.as_deref() {
        Some(raw) => {
            let status = BookingStatus::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown status '{}'", raw)))?;
            state.booking_repo.list_by_status(status).await?
        }
        None => state.booking_repo.list().await?,
    };
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    Ok(Json(booking))
}

pub async fn update_notes(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateNotesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo
        .update_notes(&booking_id, payload.notes.as_deref())
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    info!("Notes updated for booking {}", booking.id);
    Ok(Json(booking))
}

pub async fn send_quote(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (booking, notification) = state.lifecycle.send_quote(&booking_id).await?;
    Ok(Json(BookingActionResponse {
        booking,
        notification,
    }))
}

pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (booking, notification) = state.lifecycle.confirm(&booking_id).await?;
    Ok(Json(BookingActionResponse {
        booking,
        notification,
    }))
}

pub async fn reject_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.lifecycle.reject(&booking_id).await?;
    Ok(Json(booking))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.lifecycle.cancel(&booking_id).await?;
    Ok(Json(booking))
}

pub async fn advance_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.lifecycle.advance(&booking_id).await?;
    Ok(Json(booking))
}

pub async fn refund_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.lifecycle.refund(&booking_id).await?;
    Ok(Json(booking))
}
