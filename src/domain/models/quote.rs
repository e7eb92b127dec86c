use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuoteItem {
    pub id: String,
    pub name: String,
    pub unit_price: i64,
    pub category: String,
    pub quantity: i32,
}

/// Informational price quote. Not persisted; a quote only becomes
/// binding once it is converted into a booking.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub quote_number: String,
    pub subtotal: i64,
    pub deposit: i64,
    pub total: i64,
}
