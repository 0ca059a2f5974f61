//! Payment gateway capability.

use async_trait::async_trait;
use mockall::automock;

use crate::payments::{Charge, ChargeRequest, PaymentError, Refund};

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Capture a charge against a tokenized payment source.
    async fn create_charge(&self, request: ChargeRequest) -> Result<Charge, PaymentError>;

    /// Refund a captured charge in full.
    async fn refund_charge(&self, charge: &str) -> Result<Refund, PaymentError>;
}
