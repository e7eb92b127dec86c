use crate::domain::models::payment::{CreateIntentParams, PaymentIntent};
use crate::domain::ports::PaymentGateway;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::error;

/// Thin client for the Stripe payment-intents API. The metadata written
/// on create is what `retrieve_intent` later uses to correlate an intent
/// back to its booking.
pub struct StripeGateway {
    client: Client,
    api_base: String,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(api_base: String, secret_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build gateway HTTP client");
        Self {
            client,
            api_base,
            secret_key,
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(&self, params: CreateIntentParams) -> Result<PaymentIntent, AppError> {
        let mut form: Vec<(&str, String)> = vec![
            ("amount", params.amount_minor.to_string()),
            ("currency", params.currency.clone()),
            ("metadata[booking_id]", params.booking_id.clone()),
            ("metadata[payment_type]", params.payment_type.clone()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];
        if let Some(email) = params.receipt_email {
            form.push(("receipt_email", email));
        }
        if let Some(description) = params.description {
            form.push(("description", description));
        }

        let res = self.client.post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!("Payment gateway connection error: {}", e);
                AppError::Gateway(format!("connection error: {}", e))
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            error!("Payment intent creation failed. Status: {}, Body: {}", status, text);
            return Err(AppError::Gateway(format!("create intent failed with status {}", status)));
        }

        res.json::<PaymentIntent>()
            .await
            .map_err(|e| AppError::Gateway(format!("invalid create response: {}", e)))
    }

    async fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, AppError> {
        let res = self.client.get(format!("{}/v1/payment_intents/{}", self.api_base, intent_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| {
                error!("Payment gateway connection error: {}", e);
                AppError::Gateway(format!("connection error: {}", e))
            })?;

        if res.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Payment intent {} not found", intent_id)));
        }
        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            error!("Payment intent retrieval failed. Status: {}, Body: {}", status, text);
            return Err(AppError::Gateway(format!("retrieve intent failed with status {}", status)));
        }

        res.json::<PaymentIntent>()
            .await
            .map_err(|e| AppError::Gateway(format!("invalid retrieve response: {}", e)))
    }
}
