use crate::domain::models::{
    booking::{Booking, BookingStatus, PaymentStatus},
    notification::FallbackEntry,
    payment::{CreateIntentParams, PaymentIntent},
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list(&self) -> Result<Vec<Booking>, AppError>;
    async fn list_by_status(&self, status: BookingStatus) -> Result<Vec<Booking>, AppError>;
    async fn update_notes(&self, id: &str, notes: Option<&str>) -> Result<Option<Booking>, AppError>;

    /// Compare-and-swap on `status`: the update only applies while the
    /// stored status is one of `from`. `None` means nothing matched,
    /// either because the booking does not exist or its status moved on.
    async fn transition_status(
        &self,
        id: &str,
        from: &[BookingStatus],
        to: BookingStatus,
    ) -> Result<Option<Booking>, AppError>;

    /// Compare-and-swap on `payment_status`, also promoting a
    /// pre-confirmation booking to `confirmed`. The `from` guard keeps
    /// the payment status from ever moving backward.
    async fn apply_payment(
        &self,
        id: &str,
        from: &[PaymentStatus],
        to: PaymentStatus,
        payment_intent_id: Option<&str>,
    ) -> Result<Option<Booking>, AppError>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(&self, params: CreateIntentParams) -> Result<PaymentIntent, AppError>;
    async fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, AppError>;
}

/// One credentialed delivery channel. The dispatcher owns the ordering
/// and fallback policy; a transport only knows how to send.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}

/// Append-only store for messages every channel failed to deliver.
#[async_trait]
pub trait FallbackLog: Send + Sync {
    async fn append(&self, entry: &FallbackEntry) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub retry_after_secs: u64,
}

/// Bounds request rates per client key. Always returns a verdict; a
/// limiter backend that cannot answer should fail open rather than
/// block the payment flow.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check(&self, key: &str) -> RateLimitDecision;
}
