//! Loan HTTP handlers.
//!
//! ```text
//! GET  /api/v1/loans?customerId=&status=
//! POST /api/v1/loans
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Loan, LoanFilter, LoanStatus, NewLoan};
use crate::inbound::http::error::{ApiResult, ErrorBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_field};

/// Request payload for a loan application.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequestBody {
    pub customer_id: Option<i64>,
    pub amount_aud: Option<Decimal>,
    pub collateral_btc: Option<Decimal>,
    pub btc_price_at_creation: Option<Decimal>,
}

/// Query filters accepted by the loan listing.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListLoansQuery {
    pub customer_id: Option<i64>,
    /// `pending`, `active`, `repaid`, or `liquidated`.
    pub status: Option<String>,
}

/// A loan as served to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanBody {
    pub id: i64,
    pub customer_id: i64,
    pub amount_aud: Decimal,
    pub collateral_btc: Decimal,
    pub btc_price_at_creation: Decimal,
    #[schema(value_type = String, example = "pending")]
    pub status: LoanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derivation_path: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<Loan> for LoanBody {
    fn from(value: Loan) -> Self {
        Self {
            id: value.id,
            customer_id: value.customer_id,
            amount_aud: value.amount_aud,
            collateral_btc: value.collateral_btc,
            btc_price_at_creation: value.btc_price_at_creation,
            status: value.status,
            deposit_address: value.deposit_address,
            derivation_path: value.derivation_path,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

fn parse_filter(query: ListLoansQuery) -> Result<LoanFilter, Error> {
    let status = query
        .status
        .map(|raw| {
            LoanStatus::from_str(&raw)
                .map_err(|_| Error::invalid_request(format!("unknown loan status: {raw}")))
        })
        .transpose()?;
    Ok(LoanFilter {
        customer_id: query.customer_id,
        status,
    })
}

/// List loans, optionally filtered by customer and status.
#[utoipa::path(
    get,
    path = "/api/v1/loans",
    params(ListLoansQuery),
    responses(
        (status = 200, description = "Loans, newest first", body = [LoanBody]),
        (status = 400, description = "Invalid filter", body = ErrorBody)
    ),
    tags = ["loans"],
    operation_id = "listLoans"
)]
#[get("/loans")]
pub async fn list_loans(
    state: web::Data<HttpState>,
    query: web::Query<ListLoansQuery>,
) -> ApiResult<web::Json<Vec<LoanBody>>> {
    let filter = parse_filter(query.into_inner())?;
    let loans = state.loans_query.list(filter).await?;
    Ok(web::Json(loans.into_iter().map(LoanBody::from).collect()))
}

/// Accept a loan application in `pending` status.
#[utoipa::path(
    post,
    path = "/api/v1/loans",
    request_body = CreateLoanRequestBody,
    responses(
        (status = 201, description = "Loan created", body = LoanBody),
        (status = 400, description = "Invalid request", body = ErrorBody)
    ),
    tags = ["loans"],
    operation_id = "createLoan"
)]
#[post("/loans")]
pub async fn create_loan(
    state: web::Data<HttpState>,
    payload: web::Json<CreateLoanRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let new = NewLoan {
        customer_id: require_field(body.customer_id, FieldName::new("customerId"))?,
        amount_aud: require_field(body.amount_aud, FieldName::new("amountAud"))?,
        collateral_btc: require_field(body.collateral_btc, FieldName::new("collateralBtc"))?,
        btc_price_at_creation: require_field(
            body.btc_price_at_creation,
            FieldName::new("btcPriceAtCreation"),
        )?,
    };

    let loan = state.loans.create(new).await?;
    Ok(HttpResponse::Created().json(LoanBody::from(loan)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{MockLoanCommand, MockLoanQuery};

    fn loan(id: i64, status: LoanStatus) -> Loan {
        let now = Utc::now();
        Loan {
            id,
            customer_id: 7,
            amount_aud: dec!(50000),
            collateral_btc: dec!(1.5),
            btc_price_at_creation: dec!(150000),
            status,
            deposit_address: Some("bc1qexample".to_owned()),
            derivation_path: Some("m/86'/0'/0'/0/7".to_owned()),
            created_at: now,
            updated_at: now,
        }
    }

    #[actix_web::test]
    async fn listing_parses_status_filter() {
        let mut query = MockLoanQuery::new();
        query
            .expect_list()
            .withf(|filter| {
                filter.customer_id == Some(7) && filter.status == Some(LoanStatus::Active)
            })
            .return_once(|_| Ok(vec![loan(1, LoanStatus::Active)]));

        let mut state = HttpState::fixture();
        state.loans_query = Arc::new(query);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(list_loans),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/loans?customerId=7&status=active")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body[0]["status"], json!("active"));
        assert_eq!(body[0]["depositAddress"], json!("bc1qexample"));
    }

    #[actix_web::test]
    async fn listing_rejects_unknown_status() {
        let mut state = HttpState::fixture();
        state.loans_query = Arc::new(MockLoanQuery::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(list_loans),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/loans?status=defaulted")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn create_requires_every_field() {
        let mut state = HttpState::fixture();
        state.loans = Arc::new(MockLoanCommand::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(create_loan),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/loans")
                .set_json(json!({ "customerId": 7, "amountAud": 50000 }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], json!("missing required field: collateralBtc"));
    }

    #[actix_web::test]
    async fn create_returns_201_with_the_pending_loan() {
        let mut command = MockLoanCommand::new();
        command
            .expect_create()
            .return_once(|_| Ok(loan(3, LoanStatus::Pending)));

        let mut state = HttpState::fixture();
        state.loans = Arc::new(command);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(create_loan),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/loans")
                .set_json(json!({
                    "customerId": 7,
                    "amountAud": 50000,
                    "collateralBtc": 1.5,
                    "btcPriceAtCreation": 150000
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["id"], json!(3));
        assert_eq!(body["status"], json!("pending"));
    }
}
