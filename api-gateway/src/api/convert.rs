//! Conversion API handler

use std::sync::Arc;

use axum::extract::{Query, State};
use converter::{ConverterSession, Quote};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::response::ApiResponse;
use crate::error::ApiError;
use crate::AppState;

/// Conversion query parameters
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConvertQuery {
    /// Source asset id
    #[serde(default = "default_from")]
    pub from: String,
    /// Destination asset id
    #[serde(default = "default_to")]
    pub to: String,
    /// Amount as typed; malformed input converts as 0
    #[serde(default = "default_amount")]
    pub amount: String,
}

fn default_from() -> String {
    ConverterSession::default().from_id().to_string()
}

fn default_to() -> String {
    ConverterSession::default().to_id().to_string()
}

fn default_amount() -> String {
    ConverterSession::default().amount().to_string()
}

/// Conversion result
#[derive(Debug, Serialize, ToSchema)]
pub struct ConversionData {
    pub from: String,
    pub to: String,
    /// Parsed source amount
    pub amount: f64,
    /// Converted amount, full precision
    pub result: f64,
    /// Converted amount with 8 fractional digits
    pub result_text: String,
    /// Destination units per source unit, 6 fractional digits
    pub rate: String,
    /// Source amount in the reference currency
    pub from_value: f64,
    /// Converted amount in the reference currency
    pub to_value: f64,
    /// Whether both ids were found in the snapshot
    pub resolved: bool,
}

impl ConversionData {
    fn new(quote: Quote, resolved: bool) -> Self {
        Self {
            from: quote.from_id,
            to: quote.to_id,
            amount: quote.amount,
            result: quote.result,
            result_text: quote.result_text,
            rate: quote.rate_text,
            from_value: quote.from_value,
            to_value: quote.to_value,
            resolved,
        }
    }
}

/// Convert an amount between two tracked assets
#[utoipa::path(
    get,
    path = "/api/v1/convert",
    params(
        ("from" = Option<String>, Query, description = "Source asset id, default bitcoin"),
        ("to" = Option<String>, Query, description = "Destination asset id, default ethereum"),
        ("amount" = Option<String>, Query, description = "Amount, default 1")
    ),
    responses(
        (status = 200, description = "Conversion at current prices", body = ConversionData)
    ),
    tag = "convert"
)]
pub async fn convert(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConvertQuery>,
) -> Result<ApiResponse<ConversionData>, ApiError> {
    let entries = state.controller.entries();
    let session = ConverterSession::new(&query.from, &query.to, &query.amount);

    let resolved = session.is_resolved(&entries);
    let quote = session.quote(&entries);
    Ok(ApiResponse::new(ConversionData::new(quote, resolved)))
}
