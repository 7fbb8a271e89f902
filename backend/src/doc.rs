//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint and the request/response schemas
//! they exchange. The generated specification backs Swagger UI in debug
//! builds.

use utoipa::OpenApi;

use crate::inbound::http::capital::{
    CapitalSupplyBody, CreateCapitalSupplyRequestBody, DepositAddressBody,
    DepositAddressRequestBody, IssuedDepositAddressBody,
};
use crate::inbound::http::disbursements::{
    BalanceBody, CreateDisbursementRequestBody, DisbursementBody, MethodBalanceResponseBody,
    ProcessDisbursementResponseBody,
};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::loans::{CreateLoanRequestBody, LoanBody};
use crate::inbound::http::price::QuoteResponseBody;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lending platform API",
        description = "BTC-collateralised AUD lending: disbursements, loans, \
                       capital supplies, and collateral pricing."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::disbursements::create_disbursement,
        crate::inbound::http::disbursements::get_method_balance,
        crate::inbound::http::disbursements::list_disbursements_by_loan,
        crate::inbound::http::disbursements::list_disbursements_by_customer,
        crate::inbound::http::disbursements::get_disbursement,
        crate::inbound::http::loans::list_loans,
        crate::inbound::http::loans::create_loan,
        crate::inbound::http::capital::list_capital_supplies,
        crate::inbound::http::capital::create_capital_supply,
        crate::inbound::http::capital::issue_deposit_address,
        crate::inbound::http::capital::list_deposit_addresses,
        crate::inbound::http::price::get_btc_aud_price,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorBody,
        CreateDisbursementRequestBody,
        DisbursementBody,
        ProcessDisbursementResponseBody,
        BalanceBody,
        MethodBalanceResponseBody,
        CreateLoanRequestBody,
        LoanBody,
        CreateCapitalSupplyRequestBody,
        CapitalSupplyBody,
        DepositAddressRequestBody,
        DepositAddressBody,
        IssuedDepositAddressBody,
        QuoteResponseBody,
    )),
    tags(
        (name = "disbursements", description = "Loan payout lifecycle and balances"),
        (name = "loans", description = "BTC-collateralised loan records"),
        (name = "capital", description = "Supplied capital and deposit addresses"),
        (name = "price", description = "Collateral market pricing"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;
