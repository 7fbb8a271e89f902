//! Capital supply HTTP handlers.
//!
//! ```text
//! GET  /api/v1/capital?userId=&token=&status=
//! POST /api/v1/capital
//! POST /api/v1/capital/deposit-address
//! GET  /api/v1/capital/deposit-addresses?userId=
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::IssuedDepositAddress;
use crate::domain::{
    CapitalSupply, CapitalSupplyFilter, CapitalToken, DepositAddress, Error, NewCapitalSupply,
    SupplyStatus,
};
use crate::inbound::http::error::{ApiResult, ErrorBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_token, require_field};

/// Request payload for registering a capital supply.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCapitalSupplyRequestBody {
    pub user_id: Option<i64>,
    /// `AAUD`, `USDC`, or `USDT`.
    pub token: Option<String>,
    pub amount: Option<Decimal>,
    pub wallet_address: Option<String>,
    pub tx_hash: Option<String>,
}

/// Request payload for issuing a deposit address.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositAddressRequestBody {
    pub user_id: Option<i64>,
    /// `AAUD`, `USDC`, or `USDT`.
    pub token: Option<String>,
}

/// Query filters accepted by the supply listing.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListSuppliesQuery {
    pub user_id: Option<i64>,
    pub token: Option<String>,
    pub status: Option<String>,
}

/// Query parameters for the deposit address listing.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListDepositAddressesQuery {
    pub user_id: Option<i64>,
}

/// A capital supply as served to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CapitalSupplyBody {
    pub id: i64,
    pub user_id: i64,
    #[schema(value_type = String, example = "USDC")]
    pub token: CapitalToken,
    pub amount: Decimal,
    pub wallet_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[schema(value_type = String, example = "pending")]
    pub status: SupplyStatus,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<CapitalSupply> for CapitalSupplyBody {
    fn from(value: CapitalSupply) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            token: value.token,
            amount: value.amount,
            wallet_address: value.wallet_address,
            tx_hash: value.tx_hash,
            status: value.status,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// A deposit address as served to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositAddressBody {
    pub id: i64,
    pub user_id: i64,
    #[schema(value_type = String, example = "USDC")]
    pub token: CapitalToken,
    pub address: String,
    pub active: bool,
    pub swept: bool,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<DepositAddress> for DepositAddressBody {
    fn from(value: DepositAddress) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            token: value.token,
            address: value.address,
            active: value.active,
            swept: value.swept,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Response payload for the deposit address issue route.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedDepositAddressBody {
    #[serde(flatten)]
    pub address: DepositAddressBody,
    pub is_new: bool,
}

impl From<IssuedDepositAddress> for IssuedDepositAddressBody {
    fn from(value: IssuedDepositAddress) -> Self {
        Self {
            address: value.address.into(),
            is_new: value.is_new,
        }
    }
}

fn parse_supply_filter(query: ListSuppliesQuery) -> Result<CapitalSupplyFilter, Error> {
    let token = query.token.as_deref().map(parse_token).transpose()?;
    let status = query
        .status
        .map(|raw| {
            SupplyStatus::from_str(&raw)
                .map_err(|_| Error::invalid_request(format!("unknown supply status: {raw}")))
        })
        .transpose()?;
    Ok(CapitalSupplyFilter {
        user_id: query.user_id,
        token,
        status,
    })
}

/// List capital supplies, optionally filtered.
#[utoipa::path(
    get,
    path = "/api/v1/capital",
    params(ListSuppliesQuery),
    responses(
        (status = 200, description = "Supplies, newest first", body = [CapitalSupplyBody]),
        (status = 400, description = "Invalid filter", body = ErrorBody)
    ),
    tags = ["capital"],
    operation_id = "listCapitalSupplies"
)]
#[get("/capital")]
pub async fn list_capital_supplies(
    state: web::Data<HttpState>,
    query: web::Query<ListSuppliesQuery>,
) -> ApiResult<web::Json<Vec<CapitalSupplyBody>>> {
    let filter = parse_supply_filter(query.into_inner())?;
    let supplies = state.capital_query.list_supplies(filter).await?;
    Ok(web::Json(
        supplies.into_iter().map(CapitalSupplyBody::from).collect(),
    ))
}

/// Register a capital supply in `pending` status.
#[utoipa::path(
    post,
    path = "/api/v1/capital",
    request_body = CreateCapitalSupplyRequestBody,
    responses(
        (status = 201, description = "Supply created", body = CapitalSupplyBody),
        (status = 400, description = "Invalid request", body = ErrorBody)
    ),
    tags = ["capital"],
    operation_id = "createCapitalSupply"
)]
#[post("/capital")]
pub async fn create_capital_supply(
    state: web::Data<HttpState>,
    payload: web::Json<CreateCapitalSupplyRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let token_raw = require_field(body.token, FieldName::new("token"))?;
    let new = NewCapitalSupply {
        user_id: require_field(body.user_id, FieldName::new("userId"))?,
        token: parse_token(&token_raw)?,
        amount: require_field(body.amount, FieldName::new("amount"))?,
        wallet_address: require_field(body.wallet_address, FieldName::new("walletAddress"))?,
        tx_hash: body.tx_hash,
    };

    let supply = state.capital.create_supply(new).await?;
    Ok(HttpResponse::Created().json(CapitalSupplyBody::from(supply)))
}

/// Return the caller's active deposit address for a token, generating one
/// when none exists.
#[utoipa::path(
    post,
    path = "/api/v1/capital/deposit-address",
    request_body = DepositAddressRequestBody,
    responses(
        (status = 200, description = "Existing address returned", body = IssuedDepositAddressBody),
        (status = 201, description = "Fresh address generated", body = IssuedDepositAddressBody),
        (status = 400, description = "Invalid request", body = ErrorBody)
    ),
    tags = ["capital"],
    operation_id = "issueDepositAddress"
)]
#[post("/capital/deposit-address")]
pub async fn issue_deposit_address(
    state: web::Data<HttpState>,
    payload: web::Json<DepositAddressRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let user_id = require_field(body.user_id, FieldName::new("userId"))?;
    let token_raw = require_field(body.token, FieldName::new("token"))?;
    let token = parse_token(&token_raw)?;

    let issued = state.capital.issue_deposit_address(user_id, token).await?;
    let response = if issued.is_new {
        HttpResponse::Created().json(IssuedDepositAddressBody::from(issued))
    } else {
        HttpResponse::Ok().json(IssuedDepositAddressBody::from(issued))
    };
    Ok(response)
}

/// List a user's deposit addresses, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/capital/deposit-addresses",
    params(ListDepositAddressesQuery),
    responses(
        (status = 200, description = "Deposit addresses", body = [DepositAddressBody]),
        (status = 400, description = "Missing userId", body = ErrorBody)
    ),
    tags = ["capital"],
    operation_id = "listDepositAddresses"
)]
#[get("/capital/deposit-addresses")]
pub async fn list_deposit_addresses(
    state: web::Data<HttpState>,
    query: web::Query<ListDepositAddressesQuery>,
) -> ApiResult<web::Json<Vec<DepositAddressBody>>> {
    let user_id = require_field(query.into_inner().user_id, FieldName::new("userId"))?;
    let addresses = state.capital_query.list_deposit_addresses(user_id).await?;
    Ok(web::Json(
        addresses.into_iter().map(DepositAddressBody::from).collect(),
    ))
}
