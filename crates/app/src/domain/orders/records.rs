//! Order Records

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{domain::users::UserId, ids::TypedId};

/// Order identifier.
pub type OrderId = TypedId<OrderRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub id: OrderId,
    pub user: UserId,
    pub address: String,
    pub postal_code: String,
    pub city: String,

    /// Order total in major currency units.
    pub amount: Decimal,

    pub brews: Vec<Brew>,

    /// Gateway charge that paid for this order.
    pub charge: String,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A brew line item, stored with its order as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brew {
    /// Catalogue identifier of the brew.
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    /// Unit price in major currency units.
    pub price: Decimal,

    pub quantity: u32,
}
