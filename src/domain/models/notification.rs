use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fully rendered message handed to the dispatcher. Templating happens
/// upstream; the dispatcher only moves bytes.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
    pub booking_id: Option<String>,
    /// Carried through to the fallback log so an operator can still act
    /// on an undeliverable payment request.
    pub payment_link: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status")]
pub enum DeliveryOutcome {
    #[serde(rename = "delivered", rename_all = "camelCase")]
    Delivered { channel: String },
    #[serde(rename = "manual", rename_all = "camelCase")]
    Manual {
        #[serde(skip_serializing_if = "Option::is_none")]
        payment_link: Option<String>,
    },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Record of one dispatch: which channels were tried, in order, and how
/// it ended.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationAttempt {
    pub recipient: String,
    pub subject: String,
    pub channels_tried: Vec<String>,
    pub outcome: DeliveryOutcome,
}

/// Durable record of a message no channel could deliver, appended to the
/// fallback log for manual follow-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackEntry {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
    pub booking_id: Option<String>,
    pub payment_link: Option<String>,
    pub queued_at: DateTime<Utc>,
}
