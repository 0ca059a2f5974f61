//! Payment gateway integration.

mod errors;
mod gateway;
mod models;
mod money;
pub mod stripe;

pub use errors::*;
pub use gateway::*;
pub use models::*;
pub use money::*;
pub use stripe::{StripeClient, StripeConfig};
