//! Disbursement HTTP handlers.
//!
//! ```text
//! POST /api/v1/disbursements
//! GET  /api/v1/disbursements/{id}
//! GET  /api/v1/disbursements/loan/{loanId}
//! GET  /api/v1/disbursements/customer/{customerId}
//! GET  /api/v1/disbursements/balance/{method}
//! ```

use actix_web::{HttpResponse, get, post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{ProcessDisbursementOutcome, ProcessDisbursementRequest};
use crate::domain::{Balance, Disbursement, DisbursementMethod, DisbursementStatus, Error};
use crate::inbound::http::error::{ApiResult, ErrorBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_method, require_field, require_non_blank, require_positive,
};

/// Request payload for creating and processing a disbursement.
///
/// Fields are optional at the serde layer so absence surfaces as a 400 with
/// the offending field named, not a deserialisation error.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDisbursementRequestBody {
    pub loan_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub amount_aud: Option<Decimal>,
    pub recipient_address: Option<String>,
    /// `on_chain` or `api`.
    pub method: Option<String>,
}

/// A disbursement record as served to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisbursementBody {
    pub id: i64,
    pub loan_id: i64,
    pub customer_id: i64,
    pub amount_aud: Decimal,
    #[schema(value_type = String, example = "on_chain")]
    pub method: DisbursementMethod,
    #[schema(value_type = String, example = "completed")]
    pub status: DisbursementStatus,
    pub recipient_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<Disbursement> for DisbursementBody {
    fn from(value: Disbursement) -> Self {
        Self {
            id: value.id(),
            loan_id: value.loan_id(),
            customer_id: value.customer_id(),
            amount_aud: value.amount_aud(),
            method: value.method(),
            status: value.status(),
            recipient_address: value.recipient_address().to_owned(),
            tx_hash: value.tx_hash().map(str::to_owned),
            error_message: value.error_message().map(str::to_owned),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
        }
    }
}

/// Envelope returned by `POST /disbursements`: 201 on completion, 500 with
/// the recorded failure attached.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessDisbursementResponseBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub disbursement: DisbursementBody,
}

/// Balance tiers of a payout account.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceBody {
    pub available_balance: Decimal,
    pub pending_balance: Decimal,
    pub total_balance: Decimal,
}

impl From<Balance> for BalanceBody {
    fn from(value: Balance) -> Self {
        Self {
            available_balance: value.available,
            pending_balance: value.pending,
            total_balance: value.total,
        }
    }
}

/// Response payload for the per-method balance query.
#[derive(Debug, Serialize, ToSchema)]
pub struct MethodBalanceResponseBody {
    #[schema(value_type = String, example = "on_chain")]
    pub method: DisbursementMethod,
    pub balance: BalanceBody,
}

fn parse_create_request(
    body: CreateDisbursementRequestBody,
) -> Result<ProcessDisbursementRequest, Error> {
    let method_raw = require_field(body.method, FieldName::new("method"))?;
    let amount_aud = require_field(body.amount_aud, FieldName::new("amountAud"))?;
    let recipient_address =
        require_field(body.recipient_address, FieldName::new("recipientAddress"))?;

    Ok(ProcessDisbursementRequest {
        loan_id: require_field(body.loan_id, FieldName::new("loanId"))?,
        customer_id: require_field(body.customer_id, FieldName::new("customerId"))?,
        amount_aud: require_positive(amount_aud, FieldName::new("amountAud"))?,
        recipient_address: require_non_blank(
            recipient_address,
            FieldName::new("recipientAddress"),
        )?,
        method: parse_method(&method_raw)?,
    })
}

fn outcome_response(outcome: ProcessDisbursementOutcome) -> HttpResponse {
    match outcome.failure {
        None => HttpResponse::Created().json(ProcessDisbursementResponseBody {
            success: true,
            error: None,
            disbursement: outcome.disbursement.into(),
        }),
        Some(cause) => HttpResponse::InternalServerError().json(ProcessDisbursementResponseBody {
            success: false,
            error: Some(cause),
            disbursement: outcome.disbursement.into(),
        }),
    }
}

/// Create a disbursement and process it to a terminal state.
#[utoipa::path(
    post,
    path = "/api/v1/disbursements",
    request_body = CreateDisbursementRequestBody,
    responses(
        (status = 201, description = "Disbursement completed", body = ProcessDisbursementResponseBody),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 500, description = "Disbursement failed and was recorded", body = ProcessDisbursementResponseBody)
    ),
    tags = ["disbursements"],
    operation_id = "createDisbursement"
)]
#[post("/disbursements")]
pub async fn create_disbursement(
    state: web::Data<HttpState>,
    payload: web::Json<CreateDisbursementRequestBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_create_request(payload.into_inner())?;
    let outcome = state.disbursements.process(request).await?;
    Ok(outcome_response(outcome))
}

/// Live balance of the payout account behind a method.
#[utoipa::path(
    get,
    path = "/api/v1/disbursements/balance/{method}",
    params(("method" = String, Path, description = "`on_chain` or `api`")),
    responses(
        (status = 200, description = "Balance snapshot", body = MethodBalanceResponseBody),
        (status = 400, description = "Unsupported method", body = ErrorBody),
        (status = 503, description = "Backend unreachable", body = ErrorBody)
    ),
    tags = ["disbursements"],
    operation_id = "getDisbursementBalance"
)]
#[get("/disbursements/balance/{method}")]
pub async fn get_method_balance(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MethodBalanceResponseBody>> {
    let method = parse_method(&path.into_inner())?;
    let balance = state.disbursements_query.balance(method).await?;
    Ok(web::Json(MethodBalanceResponseBody {
        method,
        balance: balance.into(),
    }))
}

/// Disbursements for a loan, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/disbursements/loan/{loanId}",
    params(("loanId" = i64, Path, description = "Loan identifier")),
    responses(
        (status = 200, description = "Disbursements for the loan", body = [DisbursementBody])
    ),
    tags = ["disbursements"],
    operation_id = "listDisbursementsByLoan"
)]
#[get("/disbursements/loan/{loan_id}")]
pub async fn list_disbursements_by_loan(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<DisbursementBody>>> {
    let records = state
        .disbursements_query
        .list_by_loan(path.into_inner())
        .await?;
    Ok(web::Json(
        records.into_iter().map(DisbursementBody::from).collect(),
    ))
}

/// Disbursements for a customer, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/disbursements/customer/{customerId}",
    params(("customerId" = i64, Path, description = "Customer identifier")),
    responses(
        (status = 200, description = "Disbursements for the customer", body = [DisbursementBody])
    ),
    tags = ["disbursements"],
    operation_id = "listDisbursementsByCustomer"
)]
#[get("/disbursements/customer/{customer_id}")]
pub async fn list_disbursements_by_customer(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<DisbursementBody>>> {
    let records = state
        .disbursements_query
        .list_by_customer(path.into_inner())
        .await?;
    Ok(web::Json(
        records.into_iter().map(DisbursementBody::from).collect(),
    ))
}

/// Fetch a disbursement by id.
#[utoipa::path(
    get,
    path = "/api/v1/disbursements/{id}",
    params(("id" = i64, Path, description = "Disbursement identifier")),
    responses(
        (status = 200, description = "The disbursement", body = DisbursementBody),
        (status = 404, description = "No such disbursement", body = ErrorBody)
    ),
    tags = ["disbursements"],
    operation_id = "getDisbursement"
)]
#[get("/disbursements/{id}")]
pub async fn get_disbursement(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<DisbursementBody>> {
    let record = state.disbursements_query.get(path.into_inner()).await?;
    Ok(web::Json(record.into()))
}

#[cfg(test)]
#[path = "disbursements_tests.rs"]
mod tests;
