//! Handler coverage for the disbursement routes.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Utc;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockDisbursementCommand, MockDisbursementQuery};
use crate::domain::DisbursementDraft;

fn record(
    id: i64,
    status: DisbursementStatus,
    tx_hash: Option<&str>,
    error_message: Option<&str>,
) -> Disbursement {
    let now = Utc::now();
    Disbursement::new(DisbursementDraft {
        id,
        loan_id: 1,
        customer_id: 1,
        amount_aud: dec!(100),
        method: DisbursementMethod::OnChain,
        status,
        recipient_address: "0xabc".to_owned(),
        tx_hash: tx_hash.map(str::to_owned),
        error_message: error_message.map(str::to_owned),
        created_at: now,
        updated_at: now,
    })
    .expect("valid test record")
}

fn state_with_command(command: MockDisbursementCommand) -> HttpState {
    let mut state = HttpState::fixture();
    state.disbursements = Arc::new(command);
    state
}

fn state_with_query(query: MockDisbursementQuery) -> HttpState {
    let mut state = HttpState::fixture();
    state.disbursements_query = Arc::new(query);
    state
}

macro_rules! disbursement_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .service(create_disbursement)
                .service(get_method_balance)
                .service(list_disbursements_by_loan)
                .service(list_disbursements_by_customer)
                .service(get_disbursement),
        )
        .await
    };
}

fn valid_create_body() -> Value {
    json!({
        "loanId": 1,
        "customerId": 1,
        "amountAud": 100,
        "recipientAddress": "0xabc",
        "method": "on_chain"
    })
}

#[actix_web::test]
async fn completed_disbursement_returns_201_with_tx_hash() {
    let mut command = MockDisbursementCommand::new();
    command
        .expect_process()
        .withf(|req| {
            req.loan_id == 1
                && req.customer_id == 1
                && req.amount_aud == dec!(100)
                && req.recipient_address == "0xabc"
                && req.method == DisbursementMethod::OnChain
        })
        .return_once(|_| {
            Ok(ProcessDisbursementOutcome {
                disbursement: record(7, DisbursementStatus::Completed, Some("0xfeed"), None),
                failure: None,
            })
        });
    let app = disbursement_app!(state_with_command(command));

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/disbursements")
            .set_json(valid_create_body())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["disbursement"]["status"], json!("completed"));
    let tx_hash = body["disbursement"]["txHash"]
        .as_str()
        .expect("txHash present");
    assert!(!tx_hash.is_empty());
    assert!(body["disbursement"].get("errorMessage").is_none());
}

#[actix_web::test]
async fn failed_disbursement_returns_500_with_the_recorded_record() {
    let mut command = MockDisbursementCommand::new();
    command.expect_process().return_once(|_| {
        Ok(ProcessDisbursementOutcome {
            disbursement: record(8, DisbursementStatus::Failed, None, Some("RPC timeout")),
            failure: Some("RPC timeout".to_owned()),
        })
    });
    let app = disbursement_app!(state_with_command(command));

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/disbursements")
            .set_json(valid_create_body())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("RPC timeout"));
    assert_eq!(body["disbursement"]["status"], json!("failed"));
    assert_eq!(body["disbursement"]["errorMessage"], json!("RPC timeout"));
}

#[actix_web::test]
async fn missing_field_is_rejected_before_processing() {
    // No expectations: reaching the orchestrator fails the test.
    let app = disbursement_app!(state_with_command(MockDisbursementCommand::new()));

    let mut body = valid_create_body();
    body.as_object_mut()
        .expect("object body")
        .remove("loanId");
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/disbursements")
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], json!("missing required field: loanId"));
}

#[actix_web::test]
async fn unknown_method_is_rejected_before_processing() {
    let app = disbursement_app!(state_with_command(MockDisbursementCommand::new()));

    let mut body = valid_create_body();
    body["method"] = json!("wire");
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/disbursements")
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], json!("Invalid disbursement method"));
}

#[actix_web::test]
async fn unknown_disbursement_is_404_with_spec_body() {
    let mut query = MockDisbursementQuery::new();
    query
        .expect_get()
        .withf(|id| *id == 999)
        .return_once(|_| Err(Error::not_found("Disbursement not found")));
    let app = disbursement_app!(state_with_query(query));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/disbursements/999")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "error": "Disbursement not found" }));
}

#[actix_web::test]
async fn balance_with_unsupported_method_never_touches_a_backend() {
    // No expectations on the query port: a balance call fails the test.
    let app = disbursement_app!(state_with_query(MockDisbursementQuery::new()));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/disbursements/balance/cheque")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], json!("Invalid disbursement method"));
}

#[actix_web::test]
async fn balance_reports_method_and_tiers() {
    let mut query = MockDisbursementQuery::new();
    query
        .expect_balance()
        .withf(|method| *method == DisbursementMethod::Api)
        .return_once(|_| Ok(Balance::from_tiers(dec!(250000), dec!(5000))));
    let app = disbursement_app!(state_with_query(query));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/disbursements/balance/api")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["method"], json!("api"));
    assert_eq!(body["balance"]["availableBalance"], json!(250000.0));
    assert_eq!(body["balance"]["pendingBalance"], json!(5000.0));
    assert_eq!(body["balance"]["totalBalance"], json!(255000.0));
}

#[actix_web::test]
async fn loan_listing_serialises_camel_case_records() {
    let mut query = MockDisbursementQuery::new();
    query
        .expect_list_by_loan()
        .withf(|loan_id| *loan_id == 1)
        .return_once(|_| {
            Ok(vec![record(
                7,
                DisbursementStatus::Completed,
                Some("0xfeed"),
                None,
            )])
        });
    let app = disbursement_app!(state_with_query(query));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/disbursements/loan/1")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let first = &body[0];
    assert_eq!(first["loanId"], json!(1));
    assert_eq!(first["customerId"], json!(1));
    assert_eq!(first["recipientAddress"], json!("0xabc"));
    assert_eq!(first["method"], json!("on_chain"));
    assert!(first["createdAt"].is_string());
}
