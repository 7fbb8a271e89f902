//! Market price HTTP handlers.
//!
//! ```text
//! GET /api/v1/price/btc-aud
//! ```

use actix_web::{get, web};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::AssetPair;
use crate::domain::ports::QuoteView;
use crate::inbound::http::error::{ApiResult, ErrorBody};
use crate::inbound::http::state::HttpState;

/// A market quote as served to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuoteResponseBody {
    pub price: Decimal,
    /// Quote currency symbol.
    #[schema(example = "AUD")]
    pub currency: String,
    /// Whether the quote came from cache.
    pub cached: bool,
    /// Present (and `true`) only when a stale cached quote was served
    /// because the live fetch failed.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stale: bool,
}

impl From<QuoteView> for QuoteResponseBody {
    fn from(value: QuoteView) -> Self {
        Self {
            price: value.price,
            currency: value.currency,
            cached: value.cached,
            stale: value.stale,
        }
    }
}

/// Current BTC/AUD price used for collateral valuation.
#[utoipa::path(
    get,
    path = "/api/v1/price/btc-aud",
    responses(
        (status = 200, description = "Current quote", body = QuoteResponseBody),
        (status = 503, description = "Market data unavailable", body = ErrorBody)
    ),
    tags = ["price"],
    operation_id = "getBtcAudPrice"
)]
#[get("/price/btc-aud")]
pub async fn get_btc_aud_price(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<QuoteResponseBody>> {
    let view = state.price.quote(AssetPair::btc_aud()).await?;
    Ok(web::Json(view.into()))
}
