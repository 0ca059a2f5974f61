//! Orders Data

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{orders::records::Brew, users::UserId};

/// Default page size for list and search.
pub const DEFAULT_LIMIT: u32 = 100;

/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 1_000;

/// Checkout Request
///
/// Everything the customer submits at checkout. The owning user is not part
/// of it: that comes from the authenticated caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub address: String,
    pub amount: Decimal,
    pub brews: Vec<Brew>,
    pub postal_code: String,
    pub city: String,

    /// Tokenized payment source issued by the gateway's client SDK.
    pub token: String,
}

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user: UserId,
    pub address: String,
    pub amount: Decimal,
    pub brews: Vec<Brew>,
    pub postal_code: String,
    pub city: String,
    pub charge: String,
}

/// Order Update Data
///
/// Amount, owner and charge are bound to the payment and cannot change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderUpdate {
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub brews: Option<Vec<Brew>>,
}

impl OrderUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.address.is_none()
            && self.postal_code.is_none()
            && self.city.is_none()
            && self.brews.is_none()
    }
}

/// Sort order for order listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderSort {
    #[default]
    OldestFirst,
    NewestFirst,
}

impl OrderSort {
    #[must_use]
    pub const fn newest_first(self) -> bool {
        matches!(self, Self::NewestFirst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported sort \"{0}\", expected createdAt:ASC or createdAt:DESC")]
pub struct OrderSortParseError(String);

impl FromStr for OrderSort {
    type Err = OrderSortParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (field, direction) = value.split_once(':').unwrap_or((value, "ASC"));

        if field != "createdAt" {
            return Err(OrderSortParseError(value.to_string()));
        }

        if direction.eq_ignore_ascii_case("asc") {
            Ok(Self::OldestFirst)
        } else if direction.eq_ignore_ascii_case("desc") {
            Ok(Self::NewestFirst)
        } else {
            Err(OrderSortParseError(value.to_string()))
        }
    }
}

/// Order Query
///
/// Equality filters and paging shared by list, search and count. Count
/// ignores paging and sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderQuery {
    pub user: Option<UserId>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub limit: Option<u32>,
    pub start: Option<u32>,
    pub sort: OrderSort,
}

impl OrderQuery {
    /// Page size clamped to [`MAX_LIMIT`].
    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
    }

    #[must_use]
    pub fn effective_start(&self) -> u32 {
        self.start.unwrap_or(0)
    }
}
