//! Stripe Charges API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::{
    payments::{Charge, ChargeRequest, Currency, PaymentError, PaymentGateway, Refund},
    secrets::Secret,
};

/// Default Stripe API address.
pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Configuration for the Stripe client.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// API base address, e.g. `"https://api.stripe.com"`.
    pub api_base: String,

    /// Secret API key used as the bearer credential.
    pub secret_key: Secret,

    /// Currency every checkout is charged in.
    pub currency: Currency,

    /// Upper bound on a single gateway round trip.
    pub timeout: Duration,
}

/// HTTP client for Stripe charges and refunds.
#[derive(Debug, Clone)]
pub struct StripeClient {
    config: StripeConfig,
    http: Client,
}

impl StripeClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: StripeConfig) -> Result<Self, PaymentError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base.trim_end_matches('/'))
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<Response, PaymentError> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(self.config.secret_key.expose())
            .form(form)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(error_from_response(status, &text));
        }

        Ok(response)
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_charge(&self, request: ChargeRequest) -> Result<Charge, PaymentError> {
        let response = self.post_form("/v1/charges", &charge_form(&request)).await?;
        let status = response.status();

        let body = response.text().await.map_err(|source| {
            error!(
                %status,
                amount = request.amount,
                currency = %request.currency,
                description = %request.description,
                "stripe accepted a charge but its response was lost, reconcile manually: {source}"
            );

            transport_error(source)
        })?;

        let parsed = decode_accepted_charge(status, &body, &request)?;

        debug!(charge = %parsed.id, status = %parsed.status, "stripe charge created");

        parsed.try_into()
    }

    async fn refund_charge(&self, charge: &str) -> Result<Refund, PaymentError> {
        let response = self
            .post_form("/v1/refunds", &[("charge", charge.to_string())])
            .await?;

        let parsed: StripeRefund = response.json().await.map_err(transport_error)?;

        if parsed.status == "failed" || parsed.status == "canceled" {
            warn!(refund = %parsed.id, status = %parsed.status, "stripe refund not completed");

            return Err(PaymentError::UnexpectedResponse(format!(
                "refund {} ended in status {}",
                parsed.id, parsed.status
            )));
        }

        Ok(parsed.into())
    }
}

fn charge_form(request: &ChargeRequest) -> Vec<(&'static str, String)> {
    vec![
        ("amount", request.amount.to_string()),
        ("currency", request.currency.to_string()),
        ("description", request.description.clone()),
        ("source", request.source.clone()),
    ]
}

/// Decode a 2xx charge body. The card may already be captured when this
/// fails, so the failure is logged with what is needed to find the charge.
fn decode_accepted_charge(
    status: StatusCode,
    body: &str,
    request: &ChargeRequest,
) -> Result<StripeCharge, PaymentError> {
    serde_json::from_str::<StripeCharge>(body).map_err(|source| {
        let charge = serde_json::from_str::<StripeChargeId>(body)
            .map_or_else(|_ignored| "unknown".to_string(), |charge| charge.id);

        error!(
            %status,
            %charge,
            amount = request.amount,
            currency = %request.currency,
            description = %request.description,
            "stripe accepted a charge but its response could not be decoded, reconcile manually: {source}"
        );

        PaymentError::UnexpectedResponse(format!(
            "undecodable response for accepted charge {charge}: {source}"
        ))
    })
}

fn transport_error(error: reqwest::Error) -> PaymentError {
    if error.is_timeout() || error.is_connect() {
        return PaymentError::Unavailable(error.to_string());
    }

    PaymentError::Transport(error)
}

/// Map a non-2xx Stripe response onto a payment error.
fn error_from_response(status: StatusCode, body: &str) -> PaymentError {
    let detail = serde_json::from_str::<StripeErrorResponse>(body)
        .map(|response| response.error)
        .ok();

    let message = detail
        .as_ref()
        .and_then(|detail| detail.message.clone())
        .unwrap_or_else(|| format!("request failed with status {status}"));

    let is_card_error = detail
        .as_ref()
        .is_some_and(|detail| detail.kind.as_deref() == Some("card_error"));

    match status {
        StatusCode::PAYMENT_REQUIRED => PaymentError::Declined {
            code: detail.and_then(|detail| detail.decline_code.or(detail.code)),
            message,
        },
        _ if is_card_error => PaymentError::Declined {
            code: detail.and_then(|detail| detail.decline_code.or(detail.code)),
            message,
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PaymentError::Authentication,
        StatusCode::TOO_MANY_REQUESTS => PaymentError::Unavailable(message),
        status if status.is_server_error() => PaymentError::Unavailable(message),
        status if status.is_client_error() => PaymentError::InvalidRequest(message),
        _ => PaymentError::UnexpectedResponse(format!("status {status}: {message}")),
    }
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<String>,
    decline_code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeCharge {
    id: String,
    amount: u64,
    currency: String,
    description: Option<String>,
    source: Option<StripeSource>,
    status: String,
    failure_code: Option<String>,
    failure_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeChargeId {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StripeSource {
    id: String,
}

impl TryFrom<StripeCharge> for Charge {
    type Error = PaymentError;

    fn try_from(charge: StripeCharge) -> Result<Self, Self::Error> {
        if charge.status == "failed" {
            return Err(PaymentError::Declined {
                code: charge.failure_code,
                message: charge
                    .failure_message
                    .unwrap_or_else(|| format!("charge {} failed", charge.id)),
            });
        }

        Ok(Self {
            id: charge.id,
            amount: charge.amount,
            currency: charge.currency,
            description: charge.description,
            source: charge.source.map(|source| source.id),
        })
    }
}

#[derive(Debug, Deserialize)]
struct StripeRefund {
    id: String,
    charge: String,
    amount: u64,
    status: String,
}

impl From<StripeRefund> for Refund {
    fn from(refund: StripeRefund) -> Self {
        Self {
            id: refund.id,
            charge: refund.charge,
            amount: refund.amount,
            status: refund.status,
        }
    }
}
