use crate::config::Config;
use crate::domain::ports::{BookingRepository, PaymentGateway, RateLimiter};
use crate::domain::services::lifecycle::LifecycleService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub lifecycle: Arc<LifecycleService>,
}
