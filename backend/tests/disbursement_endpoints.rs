//! End-to-end coverage of the disbursement HTTP surface.
//!
//! The composed app runs the real orchestrator and query services over
//! in-memory doubles, exercising the wire contract without a database.

mod support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use backend::domain::ports::PayoutBackends;
use backend::domain::{DisbursementCommandService, DisbursementQueryService};
use backend::inbound::http::disbursements::{
    create_disbursement, get_disbursement, get_method_balance, list_disbursements_by_customer,
    list_disbursements_by_loan,
};
use backend::inbound::http::state::HttpState;
use serde_json::{Value, json};
use support::{InMemoryDisbursementStore, StubPayoutBackend};

fn state_over(store: Arc<InMemoryDisbursementStore>, on_chain: StubPayoutBackend) -> HttpState {
    let backends = PayoutBackends::new(
        Arc::new(on_chain),
        Arc::new(StubPayoutBackend::succeeding("PAY-TEST")),
    );
    let mut state = HttpState::fixture();
    state.disbursements = Arc::new(DisbursementCommandService::new(
        store.clone(),
        backends.clone(),
    ));
    state.disbursements_query = Arc::new(DisbursementQueryService::new(store, backends));
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

fn create_body(loan_id: i64) -> Value {
    json!({
        "loanId": loan_id,
        "customerId": 1,
        "amountAud": 100,
        "recipientAddress": "0xabc",
        "method": "on_chain"
    })
}

#[actix_web::test]
async fn completed_disbursement_is_persisted_and_readable() {
    let store = Arc::new(InMemoryDisbursementStore::new());
    let app = disbursement_app!(state_over(store, StubPayoutBackend::succeeding("0xfeed")));

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/disbursements")
            .set_json(create_body(1))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["disbursement"]["status"], json!("completed"));
    assert_eq!(body["disbursement"]["txHash"], json!("0xfeed"));

    let id = body["disbursement"]["id"].as_i64().expect("record id");
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/disbursements/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(res).await;
    assert_eq!(fetched["status"], json!("completed"));
    assert_eq!(fetched["txHash"], json!("0xfeed"));
}

#[actix_web::test]
async fn failed_disbursement_is_recorded_with_its_cause() {
    let store = Arc::new(InMemoryDisbursementStore::new());
    let app = disbursement_app!(state_over(
        store.clone(),
        StubPayoutBackend::failing("RPC timeout")
    ));

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/disbursements")
            .set_json(create_body(1))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("RPC timeout"));
    assert_eq!(body["disbursement"]["status"], json!("failed"));
    assert_eq!(body["disbursement"]["errorMessage"], json!("RPC timeout"));
    assert!(body["disbursement"].get("txHash").is_none());

    // The failure is an audit record, not a rollback.
    assert_eq!(store.len(), 1);
}

#[actix_web::test]
async fn unknown_disbursement_returns_404_with_error_body() {
    let store = Arc::new(InMemoryDisbursementStore::new());
    let app = disbursement_app!(state_over(store, StubPayoutBackend::succeeding("0xfeed")));

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
async fn loan_listing_is_scoped_and_newest_first() {
    let store = Arc::new(InMemoryDisbursementStore::new());
    let app = disbursement_app!(state_over(store, StubPayoutBackend::succeeding("0xfeed")));

    for loan_id in [1, 1, 2] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/disbursements")
                .set_json(create_body(loan_id))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/disbursements/loan/1")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let listed = body.as_array().expect("array body");

    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|record| record["loanId"] == json!(1)));
    let first_id = listed[0]["id"].as_i64().expect("id");
    let second_id = listed[1]["id"].as_i64().expect("id");
    assert!(first_id > second_id, "newest record must come first");
}

#[actix_web::test]
async fn balance_endpoint_reports_the_backend_snapshot() {
    let store = Arc::new(InMemoryDisbursementStore::new());
    let app = disbursement_app!(state_over(store, StubPayoutBackend::succeeding("0xfeed")));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/disbursements/balance/on_chain")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["method"], json!("on_chain"));
    assert_eq!(body["balance"]["availableBalance"], json!(100000.0));
    assert_eq!(body["balance"]["totalBalance"], json!(100000.0));
}

#[actix_web::test]
async fn concurrent_posts_for_same_loan_produce_distinct_records() {
    let store = Arc::new(InMemoryDisbursementStore::new());
    let app = disbursement_app!(state_over(
        store.clone(),
        StubPayoutBackend::succeeding("0xfeed")
    ));

    let first = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/disbursements")
            .set_json(create_body(1))
            .to_request(),
    );
    let second = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/disbursements")
            .set_json(create_body(1))
            .to_request(),
    );
    let (first, second) = futures::join!(first, second);

    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(second.status(), StatusCode::CREATED);

    let first_body: Value = test::read_body_json(first).await;
    let second_body: Value = test::read_body_json(second).await;
    let first_id = first_body["disbursement"]["id"].as_i64().expect("id");
    let second_id = second_body["disbursement"]["id"].as_i64().expect("id");

    // No per-loan mutual exclusion: both requests land as independent rows.
    assert_ne!(first_id, second_id);
    assert_eq!(store.len(), 2);
}
