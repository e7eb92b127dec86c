use crate::domain::services::pricing;
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Booking progression. Forward-only, except `Cancelled` which is
/// reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Inquiry,
    QuoteSent,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Inquiry => "inquiry",
            BookingStatus::QuoteSent => "quote_sent",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "inquiry" => Some(BookingStatus::Inquiry),
            "quote_sent" => Some(BookingStatus::QuoteSent),
            "confirmed" => Some(BookingStatus::Confirmed),
            "in_progress" => Some(BookingStatus::InProgress),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// States from which an operator may still confirm the booking.
    pub const CONFIRMABLE: &'static [BookingStatus] =
        &[BookingStatus::Inquiry, BookingStatus::QuoteSent];

    /// States from which cancellation is still possible.
    pub const CANCELLABLE: &'static [BookingStatus] = &[
        BookingStatus::Inquiry,
        BookingStatus::QuoteSent,
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
    ];
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment progression. Never moves backward; `Refunded` is reachable
/// only through the explicit refund action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    DepositPaid,
    FullyPaid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::DepositPaid => "deposit_paid",
            PaymentStatus::FullyPaid => "fully_paid",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "deposit_paid" => Some(PaymentStatus::DepositPaid),
            "fully_paid" => Some(PaymentStatus::FullyPaid),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }

    /// Ordering used for the forward-only guard.
    pub fn rank(&self) -> u8 {
        match self {
            PaymentStatus::Pending => 0,
            PaymentStatus::DepositPaid => 1,
            PaymentStatus::FullyPaid => 2,
            PaymentStatus::Refunded => 3,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub unit_price: i64,
    pub category: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub event_type: String,
    pub event_date: NaiveDate,
    pub guest_count: i32,
    pub message: Option<String>,
    pub package_name: String,
    pub add_ons: Json<Vec<AddOn>>,
    pub total_amount: i64,
    pub deposit_amount: i64,
    pub remaining_amount: i64,
    pub status: String,
    pub payment_status: String,
    pub payment_intent_id: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer-supplied draft from the public booking form. Optional fields
/// are validated in `Booking::from_draft` so missing input surfaces as a
/// field-level validation error rather than a deserialization failure.
pub struct BookingDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub event_type: String,
    pub event_date: Option<NaiveDate>,
    pub guest_count: i32,
    pub message: Option<String>,
    pub package_name: String,
    pub base_price: i64,
    pub add_ons: Vec<AddOn>,
}

impl Booking {
    pub fn from_draft(draft: BookingDraft) -> Result<Self, AppError> {
        if draft.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }
        if draft.email.trim().is_empty() {
            return Err(AppError::Validation("email is required".into()));
        }
        if !draft.email.contains('@') {
            return Err(AppError::Validation("email is not a valid address".into()));
        }
        if draft.event_type.trim().is_empty() {
            return Err(AppError::Validation("event_type is required".into()));
        }
        let event_date = draft
            .event_date
            .ok_or_else(|| AppError::Validation("event_date is required".into()))?;
        if draft.guest_count <= 0 {
            return Err(AppError::Validation("guest_count must be positive".into()));
        }
        if draft.package_name.trim().is_empty() {
            return Err(AppError::Validation("package_name is required".into()));
        }
        if draft.base_price < 0 {
            return Err(AppError::Validation("base_price cannot be negative".into()));
        }
        for add_on in &draft.add_ons {
            if add_on.quantity <= 0 {
                return Err(AppError::Validation(format!(
                    "add-on '{}' must have a positive quantity",
                    add_on.name
                )));
            }
            if add_on.unit_price < 0 {
                return Err(AppError::Validation(format!(
                    "add-on '{}' cannot have a negative price",
                    add_on.name
                )));
            }
        }

        let add_on_total: i64 = draft
            .add_ons
            .iter()
            .map(|a| a.unit_price * a.quantity as i64)
            .sum();
        let total_amount = draft.base_price + add_on_total;
        let deposit_amount = pricing::deposit_for(total_amount);

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            customer_name: draft.name,
            customer_email: draft.email,
            customer_phone: draft.phone,
            event_type: draft.event_type,
            event_date,
            guest_count: draft.guest_count,
            message: draft.message,
            package_name: draft.package_name,
            add_ons: Json(draft.add_ons),
            total_amount,
            deposit_amount,
            remaining_amount: total_amount - deposit_amount,
            status: BookingStatus::Inquiry.as_str().to_string(),
            payment_status: PaymentStatus::Pending.as_str().to_string(),
            payment_intent_id: None,
            admin_notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn booking_status(&self) -> Option<BookingStatus> {
        BookingStatus::parse(&self.status)
    }

    pub fn current_payment_status(&self) -> Option<PaymentStatus> {
        PaymentStatus::parse(&self.payment_status)
    }
}
