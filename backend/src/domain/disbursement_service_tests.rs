//! Behaviour coverage for the disbursement orchestrator.

use chrono::Utc;
use mockall::Sequence;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    DisbursementCommand, DisbursementQuery, MockDisbursementStore, MockPayoutBackend,
    PayoutBackendError, PayoutBackends, ProcessDisbursementRequest,
};
use crate::domain::{
    DisbursementDraft, DisbursementMethod, DisbursementStatus, ErrorCode,
};

fn record(id: i64, status: DisbursementStatus, change: Option<&StatusChange>) -> Disbursement {
    let now = Utc::now();
    Disbursement::new(DisbursementDraft {
        id,
        loan_id: 1,
        customer_id: 1,
        amount_aud: dec!(100),
        method: DisbursementMethod::OnChain,
        status,
        recipient_address: "0xabc".to_owned(),
        tx_hash: change.and_then(|c| c.tx_hash().map(str::to_owned)),
        error_message: change.and_then(|c| c.error_message().map(str::to_owned)),
        created_at: now,
        updated_at: now,
    })
    .expect("valid test record")
}

fn request(method: DisbursementMethod) -> ProcessDisbursementRequest {
    ProcessDisbursementRequest {
        loan_id: 1,
        customer_id: 1,
        amount_aud: dec!(100),
        recipient_address: "0xabc".to_owned(),
        method,
    }
}

fn backends(
    on_chain: MockPayoutBackend,
    api: MockPayoutBackend,
) -> PayoutBackends {
    PayoutBackends::new(Arc::new(on_chain), Arc::new(api))
}

fn store_expecting_lifecycle(final_change_matches: fn(&StatusChange) -> bool) -> MockDisbursementStore {
    let mut store = MockDisbursementStore::new();
    let mut seq = Sequence::new();
    store
        .expect_create()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(record(42, DisbursementStatus::Pending, None)));
    store
        .expect_apply()
        .withf(|id, change| *id == 42 && matches!(change, StatusChange::Processing))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|id, change| Ok(Some(record(id, change.status(), Some(&change)))));
    store
        .expect_apply()
        .withf(move |id, change| *id == 42 && final_change_matches(change))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|id, change| Ok(Some(record(id, change.status(), Some(&change)))));
    store
}

#[tokio::test]
async fn healthy_backend_lands_completed_with_tx_hash() {
    let store = store_expecting_lifecycle(|change| change.tx_hash() == Some("0xfeed"));
    let mut on_chain = MockPayoutBackend::new();
    on_chain
        .expect_send()
        .withf(|amount, recipient| *amount == dec!(100) && recipient == "0xabc")
        .times(1)
        .returning(|_, _| Ok("0xfeed".to_owned()));
    // The API backend has no expectations: a call into it fails the test.
    let api = MockPayoutBackend::new();

    let service = DisbursementCommandService::new(Arc::new(store), backends(on_chain, api));
    let outcome = service
        .process(request(DisbursementMethod::OnChain))
        .await
        .expect("orchestration succeeds");

    assert!(outcome.is_completed());
    assert!(outcome.disbursement.status().is_terminal());
    assert_eq!(outcome.disbursement.status(), DisbursementStatus::Completed);
    assert_eq!(outcome.disbursement.tx_hash(), Some("0xfeed"));
    assert!(outcome.disbursement.error_message().is_none());
}

#[tokio::test]
async fn backend_failure_lands_failed_with_cause_preserved() {
    let store = store_expecting_lifecycle(|change| change.error_message() == Some("RPC timeout"));
    let mut on_chain = MockPayoutBackend::new();
    on_chain
        .expect_send()
        .times(1)
        .returning(|_, _| Err(PayoutBackendError::timeout("RPC timeout")));
    let api = MockPayoutBackend::new();

    let service = DisbursementCommandService::new(Arc::new(store), backends(on_chain, api));
    let outcome = service
        .process(request(DisbursementMethod::OnChain))
        .await
        .expect("failure is a recorded outcome, not an error");

    assert_eq!(outcome.failure.as_deref(), Some("RPC timeout"));
    assert!(outcome.disbursement.status().is_terminal());
    assert_eq!(outcome.disbursement.status(), DisbursementStatus::Failed);
    assert_eq!(outcome.disbursement.error_message(), Some("RPC timeout"));
    assert!(outcome.disbursement.tx_hash().is_none());
}

#[tokio::test]
async fn api_method_dispatches_to_api_backend() {
    let store = store_expecting_lifecycle(|change| change.tx_hash() == Some("PAY-1"));
    let on_chain = MockPayoutBackend::new();
    let mut api = MockPayoutBackend::new();
    api.expect_send()
        .times(1)
        .returning(|_, _| Ok("PAY-1".to_owned()));

    let service = DisbursementCommandService::new(Arc::new(store), backends(on_chain, api));
    let outcome = service
        .process(request(DisbursementMethod::Api))
        .await
        .expect("orchestration succeeds");

    assert_eq!(outcome.disbursement.tx_hash(), Some("PAY-1"));
}

#[rstest]
#[case::zero(dec!(0))]
#[case::negative(dec!(-5))]
#[tokio::test]
async fn non_positive_amount_is_rejected_before_any_write(#[case] amount: Decimal) {
    // Mocks carry no expectations, so any store or backend call panics.
    let store = MockDisbursementStore::new();
    let service = DisbursementCommandService::new(
        Arc::new(store),
        backends(MockPayoutBackend::new(), MockPayoutBackend::new()),
    );

    let mut bad = request(DisbursementMethod::OnChain);
    bad.amount_aud = amount;
    let error = service.process(bad).await.expect_err("must fail");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn blank_recipient_is_rejected_before_any_write() {
    let store = MockDisbursementStore::new();
    let service = DisbursementCommandService::new(
        Arc::new(store),
        backends(MockPayoutBackend::new(), MockPayoutBackend::new()),
    );

    let mut bad = request(DisbursementMethod::OnChain);
    bad.recipient_address = "   ".to_owned();
    let error = service.process(bad).await.expect_err("must fail");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn store_connection_failure_maps_to_service_unavailable() {
    let mut store = MockDisbursementStore::new();
    store
        .expect_create()
        .returning(|_| Err(DisbursementStoreError::connection("pool exhausted")));

    let service = DisbursementCommandService::new(
        Arc::new(store),
        backends(MockPayoutBackend::new(), MockPayoutBackend::new()),
    );
    let error = service
        .process(request(DisbursementMethod::OnChain))
        .await
        .expect_err("must fail");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert!(error.message().contains("pool exhausted"));
}

#[tokio::test]
async fn get_maps_missing_record_to_not_found() {
    let mut store = MockDisbursementStore::new();
    store.expect_find_by_id().returning(|_| Ok(None));

    let service = DisbursementQueryService::new(
        Arc::new(store),
        backends(MockPayoutBackend::new(), MockPayoutBackend::new()),
    );
    let error = service.get(999).await.expect_err("must fail");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Disbursement not found");
}

#[tokio::test]
async fn balance_query_reads_the_selected_backend() {
    let store = MockDisbursementStore::new();
    let on_chain = MockPayoutBackend::new();
    let mut api = MockPayoutBackend::new();
    api.expect_balance()
        .times(1)
        .returning(|| Ok(Balance::from_tiers(dec!(250000), dec!(5000))));

    let service = DisbursementQueryService::new(Arc::new(store), backends(on_chain, api));
    let balance = service
        .balance(DisbursementMethod::Api)
        .await
        .expect("balance succeeds");

    assert_eq!(balance.available, dec!(250000));
    assert_eq!(balance.pending, dec!(5000));
    assert_eq!(balance.total, dec!(255000));
}

#[tokio::test]
async fn balance_backend_failure_maps_to_service_unavailable() {
    let store = MockDisbursementStore::new();
    let mut on_chain = MockPayoutBackend::new();
    on_chain
        .expect_balance()
        .returning(|| Err(PayoutBackendError::transport("connection refused")));

    let service = DisbursementQueryService::new(
        Arc::new(store),
        backends(on_chain, MockPayoutBackend::new()),
    );
    let error = service
        .balance(DisbursementMethod::OnChain)
        .await
        .expect_err("must fail");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert!(error.message().contains("connection refused"));
}
