//! Order Models

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use brewhouse_app::domain::orders::{
    data::{CheckoutRequest, OrderUpdate},
    records::{Brew, OrderRecord},
};

/// Brew line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct BrewPayload {
    /// Catalogue identifier of the brew
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    /// Unit price
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,

    pub quantity: u32,
}

impl From<Brew> for BrewPayload {
    fn from(brew: Brew) -> Self {
        BrewPayload {
            id: brew.id,
            name: brew.name,
            price: brew.price,
            quantity: brew.quantity,
        }
    }
}

impl From<BrewPayload> for Brew {
    fn from(payload: BrewPayload) -> Self {
        Brew {
            id: payload.id,
            name: payload.name,
            price: payload.price,
            quantity: payload.quantity,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    #[serde(rename = "_id")]
    pub id: String,

    /// Owning user
    pub user: String,

    pub address: String,
    pub postal_code: String,
    pub city: String,

    /// Order total in major currency units
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,

    pub brews: Vec<BrewPayload>,

    /// Payment gateway charge id
    pub charge: String,

    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            id: order.id.to_string(),
            user: order.user.to_string(),
            address: order.address,
            postal_code: order.postal_code,
            city: order.city,
            amount: order.amount,
            brews: order.brews.into_iter().map(Into::into).collect(),
            charge: order.charge,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Checkout Request
///
/// A `user` field in the body is ignored; orders belong to the caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutPayload {
    pub address: String,

    /// Total to charge in major currency units
    pub amount: Decimal,

    pub brews: Vec<BrewPayload>,
    pub postal_code: String,
    pub city: String,

    /// Tokenized card from the payment gateway's client SDK
    pub token: String,
}

impl From<CheckoutPayload> for CheckoutRequest {
    fn from(payload: CheckoutPayload) -> Self {
        CheckoutRequest {
            address: payload.address,
            amount: payload.amount,
            brews: payload.brews.into_iter().map(Into::into).collect(),
            postal_code: payload.postal_code,
            city: payload.city,
            token: payload.token,
        }
    }
}

/// Update Order Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateOrderPayload {
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub postal_code: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub brews: Option<Vec<BrewPayload>>,
}

impl From<UpdateOrderPayload> for OrderUpdate {
    fn from(payload: UpdateOrderPayload) -> Self {
        OrderUpdate {
            address: payload.address,
            postal_code: payload.postal_code,
            city: payload.city,
            brews: payload
                .brews
                .map(|brews| brews.into_iter().map(Into::into).collect()),
        }
    }
}
