//! Payment models.

use crate::payments::Currency;

/// Charge Request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    /// Amount in minor currency units.
    pub amount: u64,
    pub currency: Currency,
    pub description: String,

    /// Tokenized payment source to charge.
    pub source: String,
}

/// Confirmed charge returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charge {
    pub id: String,

    /// Amount captured, in minor currency units.
    pub amount: u64,

    pub currency: String,
    pub description: Option<String>,

    /// Identifier of the payment source that was consumed.
    pub source: Option<String>,
}

/// Refund of a previously captured charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refund {
    pub id: String,
    pub charge: String,
    pub amount: u64,
    pub status: String,
}
