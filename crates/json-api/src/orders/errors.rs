//! Order Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use brewhouse_app::{
    domain::orders::{OrderStoreError, OrdersServiceError},
    payments::PaymentError,
};

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::Validation(source) => StatusError::bad_request().brief(source.to_string()),
        OrdersServiceError::NotFound | OrdersServiceError::Store(OrderStoreError::NotFound) => {
            StatusError::not_found()
        }
        OrdersServiceError::Payment(source) => payment_status_error(source),
        OrdersServiceError::Persistence {
            source,
            charge,
            refunded,
        } => {
            error!(%charge, refunded, "order not saved after charge: {source}");

            StatusError::internal_server_error().brief("Order could not be saved")
        }
        OrdersServiceError::Store(
            OrderStoreError::InvalidData | OrderStoreError::MissingRequiredData,
        ) => StatusError::bad_request().brief("Invalid order payload"),
        OrdersServiceError::Store(source) => {
            error!("order storage failed: {source:?}");

            StatusError::internal_server_error()
        }
    }
}

fn payment_status_error(error: PaymentError) -> StatusError {
    match error {
        PaymentError::Declined { message, .. } | PaymentError::InvalidRequest(message) => {
            StatusError::payment_required().brief(message)
        }
        PaymentError::Unavailable(message) => {
            warn!("payment gateway unavailable: {message}");

            StatusError::service_unavailable().brief("Payment gateway unavailable")
        }
        other @ (PaymentError::Authentication
        | PaymentError::Transport(_)
        | PaymentError::UnexpectedResponse(_)) => {
            error!("payment gateway failure: {other}");

            StatusError::bad_gateway().brief("Payment gateway error")
        }
    }
}
