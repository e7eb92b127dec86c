use crate::domain::models::booking::{AddOn, BookingDraft};
use crate::domain::models::quote::QuoteItem;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOnDto {
    pub id: String,
    pub name: String,
    pub unit_price: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Public booking form. Required fields default to empty so missing
/// input reaches the lifecycle validation and comes back as a
/// field-level error instead of a deserialization failure.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub event_type: String,
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub guest_count: i32,
    pub message: Option<String>,
    #[serde(default)]
    pub package_name: String,
    #[serde(default)]
    pub base_price: i64,
    #[serde(default)]
    pub add_ons: Vec<AddOnDto>,
}

impl CreateBookingRequest {
    pub fn into_draft(self) -> BookingDraft {
        BookingDraft {
            name: self.name,
            email: self.email,
            phone: self.phone,
            event_type: self.event_type,
            event_date: self.event_date,
            guest_count: self.guest_count,
            message: self.message,
            package_name: self.package_name,
            base_price: self.base_price,
            add_ons: self
                .add_ons
                .into_iter()
                .map(|a| AddOn {
                    id: a.id,
                    name: a.name,
                    unit_price: a.unit_price,
                    category: a.category,
                    quantity: a.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfoDto {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    pub amount: i64,
    pub booking_id: String,
    pub customer_info: Option<CustomerInfoDto>,
    pub payment_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    pub payment_intent_id: String,
    pub booking_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItemDto {
    pub id: String,
    pub name: String,
    pub unit_price: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    pub items: Vec<QuoteItemDto>,
    pub event_type: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub guest_count: Option<i32>,
}

impl CreateQuoteRequest {
    pub fn into_items(self) -> Vec<QuoteItem> {
        self.items
            .into_iter()
            .map(|i| QuoteItem {
                id: i.id,
                name: i.name,
                unit_price: i.unit_price,
                category: i.category,
                quantity: i.quantity,
            })
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReminderRequest {
    pub booking_id: String,
    pub recipient: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotesRequest {
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<String>,
}
