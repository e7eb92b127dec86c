use crate::domain::models::booking::Booking;
use crate::domain::models::notification::NotificationAttempt;
use crate::domain::models::payment::PaymentIntent;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreatedResponse {
    pub booking_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentCreatedResponse {
    pub client_secret: Option<String>,
    pub payment_intent_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentSummary {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub payment_type: Option<String>,
}

impl From<&PaymentIntent> for PaymentIntentSummary {
    fn from(intent: &PaymentIntent) -> Self {
        Self {
            id: intent.id.clone(),
            status: intent.status.clone(),
            amount: intent.amount,
            payment_type: intent.payment_type().map(str::to_string),
        }
    }
}

#[derive(Serialize)]
pub struct PaymentConfirmedResponse {
    pub booking: Booking,
    pub payment: PaymentIntentSummary,
}

#[derive(Serialize)]
pub struct BookingActionResponse {
    pub booking: Booking,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationAttempt>,
}
