use std::env;

#[derive(Clone)]
pub struct MailChannelConfig {
    pub name: String,
    pub api_url: String,
    pub api_key: String,
    pub sender: String,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Base URL embedded in customer-facing payment links.
    pub public_base_url: String,
    pub currency: String,
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    /// Ordered delivery channels; the dispatcher tries them front to back.
    pub mail_channels: Vec<MailChannelConfig>,
    pub internal_notify_addr: String,
    pub fallback_log_path: String,
    pub rate_limit_window_secs: u64,
    pub rate_limit_max_attempts: u32,
    pub mail_timeout_secs: u64,
    pub gateway_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let mut mail_channels = vec![MailChannelConfig {
            name: "primary".to_string(),
            api_url: env::var("MAIL_PRIMARY_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            api_key: env::var("MAIL_PRIMARY_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            sender: env::var("MAIL_PRIMARY_SENDER").unwrap_or_else(|_| "bookings@venue.example".to_string()),
        }];

        if let Ok(backup_url) = env::var("MAIL_BACKUP_URL") {
            mail_channels.push(MailChannelConfig {
                name: "backup".to_string(),
                api_url: backup_url,
                api_key: env::var("MAIL_BACKUP_TOKEN").unwrap_or_else(|_| "test-token-2".to_string()),
                sender: env::var("MAIL_BACKUP_SENDER").unwrap_or_else(|_| "bookings@venue.example".to_string()),
            });
        }

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            public_base_url: env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            currency: env::var("CURRENCY").unwrap_or_else(|_| "usd".to_string()),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY must be set"),
            stripe_api_base: env::var("STRIPE_API_BASE").unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            mail_channels,
            internal_notify_addr: env::var("INTERNAL_NOTIFY_ADDR").unwrap_or_else(|_| "events@venue.example".to_string()),
            fallback_log_path: env::var("FALLBACK_LOG_PATH").unwrap_or_else(|_| "./logs/undelivered-notifications.jsonl".to_string()),
            rate_limit_window_secs: env::var("RATE_LIMIT_WINDOW_SECS").unwrap_or_else(|_| "300".to_string()).parse().expect("RATE_LIMIT_WINDOW_SECS must be a number"),
            rate_limit_max_attempts: env::var("RATE_LIMIT_MAX_ATTEMPTS").unwrap_or_else(|_| "3".to_string()).parse().expect("RATE_LIMIT_MAX_ATTEMPTS must be a number"),
            mail_timeout_secs: env::var("MAIL_TIMEOUT_SECS").unwrap_or_else(|_| "10".to_string()).parse().expect("MAIL_TIMEOUT_SECS must be a number"),
            gateway_timeout_secs: env::var("GATEWAY_TIMEOUT_SECS").unwrap_or_else(|_| "15".to_string()).parse().expect("GATEWAY_TIMEOUT_SECS must be a number"),
        }
    }
}
