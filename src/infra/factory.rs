use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use tera::Tera;
use tracing::info;

use crate::config::Config;
use crate::domain::ports::{BookingRepository, FallbackLog, PaymentGateway, RateLimiter};
use crate::domain::services::dispatcher::{MailChannel, NotificationDispatcher};
use crate::domain::services::lifecycle::LifecycleService;
use crate::infra::email::http_mail_transport::HttpMailTransport;
use crate::infra::fallback::json_fallback_log::JsonFallbackLog;
use crate::infra::payments::stripe_gateway::StripeGateway;
use crate::infra::rate_limit::sliding_window::SlidingWindowLimiter;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, sqlite_booking_repo::SqliteBookingRepo,
};
use crate::state::AppState;

pub fn build_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template("inquiry_received.html", include_str!("../templates/inquiry_received.html"))
        .expect("Failed to load inquiry template");
    tera.add_raw_template("quote.html", include_str!("../templates/quote.html"))
        .expect("Failed to load quote template");
    tera.add_raw_template("payment_request.html", include_str!("../templates/payment_request.html"))
        .expect("Failed to load payment request template");
    tera.add_raw_template("payment_received.html", include_str!("../templates/payment_received.html"))
        .expect("Failed to load payment received template");
    tera.add_raw_template("payment_reminder.html", include_str!("../templates/payment_reminder.html"))
        .expect("Failed to load payment reminder template");
    tera.add_raw_template("booking_rejected.html", include_str!("../templates/booking_rejected.html"))
        .expect("Failed to load rejection template");
    tera
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let templates = Arc::new(build_templates());

    let mail_timeout = Duration::from_secs(config.mail_timeout_secs);
    let channels: Vec<MailChannel> = config
        .mail_channels
        .iter()
        .map(|channel| MailChannel {
            name: channel.name.clone(),
            transport: Arc::new(HttpMailTransport::new(channel, mail_timeout)),
        })
        .collect();
    info!("Configured {} mail channel(s)", channels.len());

    let fallback_log: Arc<dyn FallbackLog> = Arc::new(JsonFallbackLog::new(&config.fallback_log_path));
    let dispatcher = Arc::new(NotificationDispatcher::new(
        channels,
        fallback_log,
        Some(config.internal_notify_addr.clone()),
    ));

    let payment_gateway: Arc<dyn PaymentGateway> = Arc::new(StripeGateway::new(
        config.stripe_api_base.clone(),
        config.stripe_secret_key.clone(),
        Duration::from_secs(config.gateway_timeout_secs),
    ));

    let rate_limiter: Arc<dyn RateLimiter> = Arc::new(SlidingWindowLimiter::new(
        Duration::from_secs(config.rate_limit_window_secs),
        config.rate_limit_max_attempts as usize,
    ));

    let database_url = &config.database_url;
    let booking_repo: Arc<dyn BookingRepository> = if database_url.starts_with("postgres://")
        || database_url.starts_with("postgresql://")
    {
        info!("Initializing PostgreSQL connection...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        Arc::new(PostgresBookingRepo::new(pool))
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        Arc::new(SqliteBookingRepo::new(pool))
    };

    let lifecycle = Arc::new(LifecycleService::new(
        booking_repo.clone(),
        payment_gateway.clone(),
        dispatcher,
        templates,
        config.clone(),
    ));

    AppState {
        config: config.clone(),
        booking_repo,
        payment_gateway,
        rate_limiter,
        lifecycle,
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
