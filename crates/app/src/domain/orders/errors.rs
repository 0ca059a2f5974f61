//! Orders errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::payments::{AmountError, PaymentError};

#[derive(Debug, Error)]
pub enum OrderStoreError {
    #[error("order not found")]
    NotFound,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrderStoreError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error("brew quantity must be at least 1")]
    EmptyBrewQuantity,

    #[error("update contains no fields")]
    EmptyUpdate,
}

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("invalid order: {0}")]
    Validation(#[from] ValidationError),

    #[error("order not found")]
    NotFound,

    #[error("payment failed")]
    Payment(#[source] PaymentError),

    /// The charge went through but the order could not be saved.
    #[error("failed to persist order after charge {charge} (refunded: {refunded})")]
    Persistence {
        #[source]
        source: OrderStoreError,
        charge: String,
        refunded: bool,
    },

    #[error("order storage failed")]
    Store(#[source] OrderStoreError),
}

impl From<OrderStoreError> for OrdersServiceError {
    fn from(error: OrderStoreError) -> Self {
        match error {
            OrderStoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

impl From<PaymentError> for OrdersServiceError {
    fn from(error: PaymentError) -> Self {
        Self::Payment(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let error = OrderStoreError::from(Error::RowNotFound);

        assert!(
            matches!(error, OrderStoreError::NotFound),
            "expected NotFound, got {error:?}"
        );
    }

    #[test]
    fn store_not_found_becomes_service_not_found() {
        let error = OrdersServiceError::from(OrderStoreError::NotFound);

        assert!(
            matches!(error, OrdersServiceError::NotFound),
            "expected NotFound, got {error:?}"
        );
    }

    #[test]
    fn other_store_errors_stay_wrapped() {
        let error = OrdersServiceError::from(OrderStoreError::InvalidData);

        assert!(
            matches!(error, OrdersServiceError::Store(OrderStoreError::InvalidData)),
            "expected Store(InvalidData), got {error:?}"
        );
    }
}
