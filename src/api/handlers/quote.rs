use axum::{extract::State, response::IntoResponse, Json};
use crate::api::dtos::requests::CreateQuoteRequest;
use crate::domain::services::pricing;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn create_quote(
    State(_state): State<Arc<AppState>>,
    Json(payload): Json<CreateQuoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let items = payload.into_items();
    if items.is_empty() {
        return Err(AppError::Validation("at least one quote item is required".into()));
    }
    for item in &items {
        if item.unit_price < 0 {
            return Err(AppError::Validation(format!(
                "item '{}' cannot have a negative price",
                item.name
            )));
        }
        if item.quantity <= 0 {
            return Err(AppError::Validation(format!(
                "item '{}' must have a positive quantity",
                item.name
            )));
        }
    }

    let quote = pricing::generate_quote(&items);
    info!(quote_number = %quote.quote_number, total = quote.total, "quote generated");
    Ok(Json(quote))
}
