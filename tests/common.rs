use venue_booking_backend::{
    api::router::create_router,
    config::Config,
    domain::models::payment::{CreateIntentParams, PaymentIntent},
    domain::ports::{BookingRepository, MailTransport, PaymentGateway, RateLimiter},
    domain::services::dispatcher::{MailChannel, NotificationDispatcher},
    domain::services::lifecycle::LifecycleService,
    error::AppError,
    infra::factory::build_templates,
    infra::fallback::json_fallback_log::JsonFallbackLog,
    infra::rate_limit::sliding_window::SlidingWindowLimiter,
    infra::repositories::sqlite_booking_repo::SqliteBookingRepo,
    state::AppState,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Records sends instead of talking to a mail relay. Failures can be
/// scripted globally or per recipient.
pub struct MockMailTransport {
    fail_all: AtomicBool,
    fail_recipients: Mutex<HashSet<String>>,
    sent: Mutex<Vec<SentMail>>,
}

#[allow(dead_code)]
impl MockMailTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail_all: AtomicBool::new(false),
            fail_recipients: Mutex::new(HashSet::new()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    pub fn fail_for(&self, recipient: &str) {
        self.fail_recipients.lock().unwrap().insert(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn deliveries_to(&self, recipient: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|mail| mail.recipient == recipient)
            .count()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(AppError::Mail("simulated channel outage".into()));
        }
        if self.fail_recipients.lock().unwrap().contains(recipient) {
            return Err(AppError::Mail("simulated recipient failure".into()));
        }
        self.sent.lock().unwrap().push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: html_body.to_string(),
        });
        Ok(())
    }
}

/// In-memory stand-in for the payment processor. Tests seed intents in
/// whatever state the scenario needs.
pub struct MockPaymentGateway {
    intents: Mutex<HashMap<String, PaymentIntent>>,
}

#[allow(dead_code)]
impl MockPaymentGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            intents: Mutex::new(HashMap::new()),
        })
    }

    pub fn seed_intent(
        &self,
        intent_id: &str,
        booking_id: &str,
        amount_minor: i64,
        payment_type: &str,
        status: &str,
    ) {
        let mut metadata = HashMap::new();
        metadata.insert("booking_id".to_string(), booking_id.to_string());
        metadata.insert("payment_type".to_string(), payment_type.to_string());
        self.intents.lock().unwrap().insert(
            intent_id.to_string(),
            PaymentIntent {
                id: intent_id.to_string(),
                client_secret: Some(format!("{}_secret", intent_id)),
                amount: amount_minor,
                currency: "usd".to_string(),
                status: status.to_string(),
                metadata,
            },
        );
    }

    pub fn seed_succeeded(&self, intent_id: &str, booking_id: &str, amount_minor: i64, payment_type: &str) {
        self.seed_intent(intent_id, booking_id, amount_minor, payment_type, "succeeded");
    }

    pub fn mark_succeeded(&self, intent_id: &str) {
        if let Some(intent) = self.intents.lock().unwrap().get_mut(intent_id) {
            intent.status = "succeeded".to_string();
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_intent(&self, params: CreateIntentParams) -> Result<PaymentIntent, AppError> {
        let id = format!("pi_{}", Uuid::new_v4().simple());
        let mut metadata = HashMap::new();
        metadata.insert("booking_id".to_string(), params.booking_id);
        metadata.insert("payment_type".to_string(), params.payment_type);
        let intent = PaymentIntent {
            id: id.clone(),
            client_secret: Some(format!("{}_secret", id)),
            amount: params.amount_minor,
            currency: params.currency,
            status: "requires_payment_method".to_string(),
            metadata,
        };
        self.intents.lock().unwrap().insert(id, intent.clone());
        Ok(intent)
    }

    async fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, AppError> {
        self.intents
            .lock()
            .unwrap()
            .get(intent_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Payment intent {} not found", intent_id)))
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub primary_mail: Arc<MockMailTransport>,
    pub backup_mail: Arc<MockMailTransport>,
    pub gateway: Arc<MockPaymentGateway>,
    pub fallback_path: PathBuf,
    db_filename: String,
    _tmp: tempfile::TempDir,
}

#[allow(dead_code)]
pub const INTERNAL_ADDR: &str = "events@venue.test";

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let tmp = tempfile::tempdir().expect("Failed to create temp dir");
        let fallback_path = tmp.path().join("undelivered.jsonl");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            public_base_url: "http://venue.test".to_string(),
            currency: "usd".to_string(),
            stripe_secret_key: "sk_test_dummy".to_string(),
            stripe_api_base: "http://localhost:9".to_string(),
            mail_channels: vec![],
            internal_notify_addr: INTERNAL_ADDR.to_string(),
            fallback_log_path: fallback_path.display().to_string(),
            rate_limit_window_secs: 300,
            rate_limit_max_attempts: 3,
            mail_timeout_secs: 5,
            gateway_timeout_secs: 5,
        };

        let primary_mail = MockMailTransport::new();
        let backup_mail = MockMailTransport::new();
        let dispatcher = Arc::new(NotificationDispatcher::new(
            vec![
                MailChannel {
                    name: "primary".to_string(),
                    transport: primary_mail.clone(),
                },
                MailChannel {
                    name: "backup".to_string(),
                    transport: backup_mail.clone(),
                },
            ],
            Arc::new(JsonFallbackLog::new(&fallback_path)),
            Some(config.internal_notify_addr.clone()),
        ));

        let booking_repo: Arc<dyn BookingRepository> = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let gateway = MockPaymentGateway::new();
        let payment_gateway: Arc<dyn PaymentGateway> = gateway.clone();
        let rate_limiter: Arc<dyn RateLimiter> = Arc::new(SlidingWindowLimiter::new(
            Duration::from_secs(config.rate_limit_window_secs),
            config.rate_limit_max_attempts as usize,
        ));
        let templates = Arc::new(build_templates());

        let lifecycle = Arc::new(LifecycleService::new(
            booking_repo.clone(),
            payment_gateway.clone(),
            dispatcher,
            templates,
            config.clone(),
        ));

        let state = Arc::new(AppState {
            config,
            booking_repo,
            payment_gateway,
            rate_limiter,
            lifecycle,
        });

        let router = create_router(state.clone());

        Self {
            router,
            state,
            primary_mail,
            backup_mail,
            gateway,
            fallback_path,
            db_filename,
            _tmp: tmp,
        }
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn post_json_from(&self, uri: &str, body: Value, client_ip: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("X-Forwarded-For", client_ip)
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Submits the standard wedding inquiry and returns the booking id.
    pub async fn submit_booking(&self) -> String {
        self.submit_booking_with(2500, "Wedding & Reception").await
    }

    pub async fn submit_booking_with(&self, base_price: i64, package: &str) -> String {
        let res = self
            .post_json(
                "/api/v1/bookings",
                json!({
                    "name": "Alice Smith",
                    "email": "alice@example.com",
                    "phone": "+1 555 0100",
                    "eventType": "wedding",
                    "eventDate": "2026-10-03",
                    "guestCount": 120,
                    "message": "Outdoor ceremony if possible",
                    "packageName": package,
                    "basePrice": base_price
                }),
            )
            .await;
        assert!(res.status().is_success(), "booking submission failed: {}", res.status());
        let body = parse_body(res).await;
        body["bookingId"].as_str().expect("bookingId missing").to_string()
    }

    pub async fn get_booking(&self, booking_id: &str) -> Value {
        let res = self.get(&format!("/api/v1/bookings/{}", booking_id)).await;
        assert!(res.status().is_success());
        parse_body(res).await
    }

    pub fn fallback_entries(&self) -> Vec<Value> {
        match std::fs::read_to_string(&self.fallback_path) {
            Ok(contents) => contents
                .lines()
                .map(|line| serde_json::from_str(line).expect("invalid fallback entry"))
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
