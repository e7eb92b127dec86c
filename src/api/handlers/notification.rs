use axum::{extract::State, response::IntoResponse, Json};
use crate::api::dtos::requests::PaymentReminderRequest;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn send_payment_reminder(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PaymentReminderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = state.lifecycle
        .send_payment_reminder(&payload.booking_id, payload.recipient)
        .await?;
    Ok(Json(attempt))
}
