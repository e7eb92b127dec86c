use axum::{extract::State, response::IntoResponse, Json};
use crate::api::dtos::requests::{ConfirmPaymentRequest, CreatePaymentIntentRequest};
use crate::api::dtos::responses::{
    PaymentConfirmedResponse, PaymentIntentCreatedResponse, PaymentIntentSummary,
};
use crate::api::extractors::client_ip::ClientIp;
use crate::domain::models::payment::CreateIntentParams;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn create_payment_intent(
    State(state): State<Arc<AppState>>,
    ClientIp(client_ip): ClientIp,
    Json(payload): Json<CreatePaymentIntentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let decision = state.rate_limiter.check(&client_ip).await;
    if !decision.allowed {
        warn!(client = %client_ip, "payment intent creation rate limited");
        return Err(AppError::RateLimited {
            retry_after_secs: decision.retry_after_secs,
        });
    }

    let booking = state.booking_repo.find_by_id(&payload.booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if payload.amount <= 0 {
        return Err(AppError::Validation("amount must be positive".into()));
    }
    let payment_type = payload
        .payment_type
        .unwrap_or_else(|| "deposit".to_string());

    // The amount is taken as charged; it is only checked against the
    // booking for the logs.
    if payload.amount != booking.deposit_amount
        && payload.amount != booking.remaining_amount
        && payload.amount != booking.total_amount
    {
        warn!(
            booking_id = %booking.id,
            amount = payload.amount,
            deposit = booking.deposit_amount,
            remaining = booking.remaining_amount,
            "requested payment amount matches neither deposit, remaining nor total"
        );
    }

    let receipt_email = payload
        .customer_info
        .and_then(|info| info.email)
        .or_else(|| Some(booking.customer_email.clone()));

    let intent = state.payment_gateway
        .create_intent(CreateIntentParams {
            amount_minor: payload.amount * 100,
            currency: state.config.currency.clone(),
            booking_id: booking.id.clone(),
            payment_type,
            receipt_email,
            description: Some(format!(
                "{} for {} on {}",
                booking.package_name, booking.customer_name, booking.event_date
            )),
        })
        .await?;

    info!(booking_id = %booking.id, intent_id = %intent.id, "payment intent created");
    Ok(Json(PaymentIntentCreatedResponse {
        client_secret: intent.client_secret.clone(),
        payment_intent_id: intent.id,
    }))
}

pub async fn confirm_payment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (booking, intent) = state.lifecycle
        .record_payment_success(&payload.payment_intent_id, &payload.booking_id)
        .await?;

    Ok(Json(PaymentConfirmedResponse {
        payment: PaymentIntentSummary::from(&intent),
        booking,
    }))
}
