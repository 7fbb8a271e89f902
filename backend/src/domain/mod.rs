//! Domain entities, services, and ports.
//!
//! Types here are transport and storage agnostic. Inbound adapters map them
//! to HTTP payloads; outbound adapters persist them or carry them to payout
//! and market-data integrations.

pub mod balance;
pub mod capital;
pub mod disbursement;
pub mod error;
pub mod loan;
pub mod ports;
pub mod pricing;

mod capital_service;
mod disbursement_service;
mod loan_service;
mod price_service;

pub use self::balance::Balance;
pub use self::capital::{
    CapitalSupply, CapitalSupplyFilter, CapitalToken, DepositAddress, NewCapitalSupply,
    ParseCapitalTokenError, SupplyStatus,
};
pub use self::disbursement::{
    Disbursement, DisbursementDraft, DisbursementMethod, DisbursementStatus,
    DisbursementValidationError, NewDisbursement, ParseDisbursementMethodError,
    ParseDisbursementStatusError, StatusChange,
};
pub use self::error::{Error, ErrorCode};
pub use self::loan::{Loan, LoanFilter, LoanStatus, NewLoan, ParseLoanStatusError};
pub use self::pricing::{AssetPair, PriceCache, PriceQuote};
pub use capital_service::CapitalService;
pub use disbursement_service::{DisbursementCommandService, DisbursementQueryService};
pub use loan_service::LoanService;
pub use price_service::PriceQueryService;
