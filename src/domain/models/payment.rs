use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Gateway-side payment intent. Only the fields the booking flow needs
/// to correlate an intent back to a booking are modelled; the gateway
/// owns the rest.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    /// Amount in the gateway's minor units (cents).
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl PaymentIntent {
    pub fn succeeded(&self) -> bool {
        self.status == "succeeded"
    }

    pub fn booking_id(&self) -> Option<&str> {
        self.metadata.get("booking_id").map(String::as_str)
    }

    pub fn payment_type(&self) -> Option<&str> {
        self.metadata.get("payment_type").map(String::as_str)
    }
}

/// Whether a payment covers the deposit or settles the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentKind {
    Deposit,
    Final,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Deposit => "deposit",
            PaymentKind::Final => "final",
        }
    }

    /// Anything that is not explicitly a deposit settles the balance.
    pub fn from_marker(marker: &str) -> Self {
        if marker == "deposit" {
            PaymentKind::Deposit
        } else {
            PaymentKind::Final
        }
    }
}

pub struct CreateIntentParams {
    /// Amount in minor units (cents).
    pub amount_minor: i64,
    pub currency: String,
    pub booking_id: String,
    pub payment_type: String,
    pub receipt_email: Option<String>,
    pub description: Option<String>,
}
