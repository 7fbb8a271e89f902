//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::{CapitalToken, DisbursementMethod, Error};

/// Newtype wrapper for request field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Unwrap an optional body field, rejecting absent values.
pub(crate) fn require_field<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| {
        Error::invalid_request(format!("missing required field: {}", field.as_str()))
    })
}

/// Reject zero and negative monetary amounts.
pub(crate) fn require_positive(value: Decimal, field: FieldName) -> Result<Decimal, Error> {
    if value <= Decimal::ZERO {
        return Err(Error::invalid_request(format!(
            "{} must be positive",
            field.as_str()
        )));
    }
    Ok(value)
}

/// Reject blank strings.
pub(crate) fn require_non_blank(value: String, field: FieldName) -> Result<String, Error> {
    if value.trim().is_empty() {
        return Err(Error::invalid_request(format!(
            "{} must not be empty",
            field.as_str()
        )));
    }
    Ok(value)
}

/// Parse a disbursement method, rejecting unsupported values.
pub(crate) fn parse_method(value: &str) -> Result<DisbursementMethod, Error> {
    DisbursementMethod::from_str(value)
        .map_err(|_| Error::invalid_request("Invalid disbursement method"))
}

/// Parse a capital token symbol, rejecting unsupported values.
pub(crate) fn parse_token(value: &str) -> Result<CapitalToken, Error> {
    CapitalToken::from_str(value).map_err(|_| {
        let accepted = CapitalToken::ALL.map(CapitalToken::as_str).join(", ");
        Error::invalid_request(format!("Invalid token. Must be one of: {accepted}"))
    })
}
