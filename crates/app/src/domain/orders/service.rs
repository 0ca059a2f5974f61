//! Orders service.
//!
//! Checkout is a two-step saga: the charge is captured first, and the order
//! is written only once the gateway has confirmed it. When that write fails
//! the charge is refunded.
//!
//! | Charge  | Persist | Compensation    | Result                           |
//! |---------|---------|-----------------|----------------------------------|
//! | fail    | skipped | none            | `Payment`                        |
//! | success | success | none            | the stored order                 |
//! | success | fail    | refund accepted | `Persistence { refunded: true }` |
//! | success | fail    | refund failed   | `Persistence { refunded: false }`|

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::{
    domain::{
        orders::{
            data::{CheckoutRequest, NewOrder, OrderQuery, OrderUpdate},
            errors::{OrdersServiceError, ValidationError},
            records::{Brew, OrderId, OrderRecord},
            store::OrderStore,
        },
        users::UserId,
    },
    payments::{ChargeRequest, Currency, PaymentGateway, to_minor_units},
};

#[derive(Clone)]
pub struct CheckoutOrdersService {
    store: Arc<dyn OrderStore>,
    gateway: Arc<dyn PaymentGateway>,
    currency: Currency,
}

impl CheckoutOrdersService {
    #[must_use]
    pub fn new(
        store: Arc<dyn OrderStore>,
        gateway: Arc<dyn PaymentGateway>,
        currency: Currency,
    ) -> Self {
        Self {
            store,
            gateway,
            currency,
        }
    }

    /// Undo a captured charge after the order could not be stored.
    async fn compensate(&self, charge: &str) -> bool {
        match self.gateway.refund_charge(charge).await {
            Ok(refund) => {
                warn!(
                    charge,
                    refund = %refund.id,
                    status = %refund.status,
                    "refunded charge for unsaved order"
                );

                true
            }
            Err(refund_error) => {
                error!(
                    charge,
                    error = %refund_error,
                    "refund failed for unsaved order; charge needs manual reconciliation"
                );

                false
            }
        }
    }
}

#[async_trait]
impl OrdersService for CheckoutOrdersService {
    async fn list_orders(&self, query: OrderQuery) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        Ok(self.store.fetch_all(query).await?)
    }

    async fn search_orders(
        &self,
        text: String,
        query: OrderQuery,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        Ok(self.store.search(text, query).await?)
    }

    async fn count_orders(&self, query: OrderQuery) -> Result<u64, OrdersServiceError> {
        Ok(self.store.count(query).await?)
    }

    async fn get_order(&self, order: OrderId) -> Result<OrderRecord, OrdersServiceError> {
        Ok(self.store.fetch(order).await?)
    }

    async fn create_order(
        &self,
        user: UserId,
        request: CheckoutRequest,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let minor_units = validate_checkout(&request)?;

        let charge = self
            .gateway
            .create_charge(ChargeRequest {
                amount: minor_units,
                currency: self.currency.clone(),
                description: charge_description(Timestamp::now(), user),
                source: request.token,
            })
            .await
            .inspect_err(|payment_error| {
                warn!(%user, error = %payment_error, "checkout charge failed");
            })?;

        info!(%user, charge = %charge.id, amount = charge.amount, "checkout charge captured");

        let new_order = NewOrder {
            user,
            address: request.address,
            amount: request.amount,
            brews: request.brews,
            postal_code: request.postal_code,
            city: request.city,
            charge: charge.id.clone(),
        };

        match self.store.add(new_order).await {
            Ok(order) => {
                info!(order = %order.id, charge = %charge.id, "order created");

                Ok(order)
            }
            Err(source) => {
                error!(%user, charge = %charge.id, error = %source, "failed to store paid order");

                let refunded = self.compensate(&charge.id).await;

                Err(OrdersServiceError::Persistence {
                    source,
                    charge: charge.id,
                    refunded,
                })
            }
        }
    }

    async fn update_order(
        &self,
        order: OrderId,
        update: OrderUpdate,
    ) -> Result<OrderRecord, OrdersServiceError> {
        validate_update(&update)?;

        Ok(self.store.edit(order, update).await?)
    }

    async fn delete_order(&self, order: OrderId) -> Result<OrderRecord, OrdersServiceError> {
        Ok(self.store.remove(order).await?)
    }
}

/// The human-readable description attached to a checkout charge.
#[must_use]
pub fn charge_description(now: Timestamp, user: UserId) -> String {
    format!("Order {now} - User {user}")
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }

    Ok(())
}

fn validate_brews(brews: &[Brew]) -> Result<(), ValidationError> {
    if brews.iter().any(|brew| brew.quantity == 0) {
        return Err(ValidationError::EmptyBrewQuantity);
    }

    Ok(())
}

/// Check a checkout request and return the amount to charge in minor units.
fn validate_checkout(request: &CheckoutRequest) -> Result<u64, ValidationError> {
    require(&request.address, "address")?;
    require(&request.postal_code, "postalCode")?;
    require(&request.city, "city")?;
    require(&request.token, "token")?;

    if request.amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }

    validate_brews(&request.brews)?;

    Ok(to_minor_units(request.amount)?)
}

fn validate_update(update: &OrderUpdate) -> Result<(), ValidationError> {
    if update.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }

    if let Some(address) = &update.address {
        require(address, "address")?;
    }

    if let Some(postal_code) = &update.postal_code {
        require(postal_code, "postalCode")?;
    }

    if let Some(city) = &update.city {
        require(city, "city")?;
    }

    if let Some(brews) = &update.brews {
        validate_brews(brews)?;
    }

    Ok(())
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Retrieve a page of orders.
    async fn list_orders(&self, query: OrderQuery) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Retrieve a page of orders whose address, city or postal code contains `text`.
    async fn search_orders(
        &self,
        text: String,
        query: OrderQuery,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Count the orders matching the query's filters.
    async fn count_orders(&self, query: OrderQuery) -> Result<u64, OrdersServiceError>;

    /// Retrieve a single order.
    async fn get_order(&self, order: OrderId) -> Result<OrderRecord, OrdersServiceError>;

    /// Charge the customer and, once the charge is confirmed, store the order
    /// for `user`.
    async fn create_order(
        &self,
        user: UserId,
        request: CheckoutRequest,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Change delivery details or line items of an existing order.
    async fn update_order(
        &self,
        order: OrderId,
        update: OrderUpdate,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Delete an order, returning what was removed.
    async fn delete_order(&self, order: OrderId) -> Result<OrderRecord, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use mockall::predicate::eq;
    use testresult::TestResult;

    use crate::{
        domain::orders::{errors::OrderStoreError, store::MockOrderStore},
        payments::{AmountError, Charge, MockPaymentGateway, PaymentError, Refund},
    };

    use super::*;

    fn checkout(amount: &str) -> Result<CheckoutRequest, rust_decimal::Error> {
        Ok(CheckoutRequest {
            address: "1 Main St".to_string(),
            amount: Decimal::from_str(amount)?,
            brews: vec![Brew {
                id: "5bf9a1c2d3e4f5a6b7c8d9e1".to_string(),
                name: "Cold Brew".to_string(),
                price: Decimal::from_str("6.25")?,
                quantity: 2,
            }],
            postal_code: "97201".to_string(),
            city: "Portland".to_string(),
            token: "tok_visa".to_string(),
        })
    }

    fn charge(request: &ChargeRequest) -> Charge {
        Charge {
            id: "ch_123".to_string(),
            amount: request.amount,
            currency: request.currency.to_string(),
            description: Some(request.description.clone()),
            source: Some("card_456".to_string()),
        }
    }

    fn stored(order: NewOrder) -> OrderRecord {
        let now = Timestamp::now();

        OrderRecord {
            id: OrderId::generate(),
            user: order.user,
            address: order.address,
            postal_code: order.postal_code,
            city: order.city,
            amount: order.amount,
            brews: order.brews,
            charge: order.charge,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(store: MockOrderStore, gateway: MockPaymentGateway) -> CheckoutOrdersService {
        CheckoutOrdersService::new(Arc::new(store), Arc::new(gateway), Currency::usd())
    }

    #[tokio::test]
    async fn create_order_charges_then_stores_for_caller() -> TestResult {
        let user = UserId::generate();
        let mut store = MockOrderStore::new();
        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_create_charge()
            .once()
            .withf(move |request| {
                request.amount == 1999
                    && request.currency == Currency::usd()
                    && request.source == "tok_visa"
                    && request.description.starts_with("Order ")
                    && request.description.ends_with(&format!(" - User {user}"))
            })
            .returning(|request| Ok(charge(&request)));

        store
            .expect_add()
            .once()
            .withf(move |order| {
                order.user == user
                    && order.charge == "ch_123"
                    && order.amount.to_string() == "19.995"
            })
            .returning(|order| Ok(stored(order)));

        gateway.expect_refund_charge().never();

        let order = service(store, gateway)
            .create_order(user, checkout("19.995")?)
            .await?;

        assert_eq!(order.user, user);
        assert_eq!(order.charge, "ch_123");
        assert_eq!(order.city, "Portland");

        Ok(())
    }

    #[tokio::test]
    async fn declined_charge_never_reaches_store() -> TestResult {
        let mut store = MockOrderStore::new();
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_create_charge().once().returning(|_| {
            Err(PaymentError::Declined {
                code: Some("card_declined".to_string()),
                message: "Your card was declined.".to_string(),
            })
        });

        store.expect_add().never();

        let result = service(store, gateway)
            .create_order(UserId::generate(), checkout("12.50")?)
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Payment(PaymentError::Declined { .. }))
            ),
            "expected Payment(Declined), got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn gateway_outage_never_reaches_store() -> TestResult {
        let mut store = MockOrderStore::new();
        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_create_charge()
            .once()
            .returning(|_| Err(PaymentError::Unavailable("timed out".to_string())));

        store.expect_add().never();

        let result = service(store, gateway)
            .create_order(UserId::generate(), checkout("12.50")?)
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Payment(PaymentError::Unavailable(_)))
            ),
            "expected Payment(Unavailable), got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_store_refunds_the_charge() -> TestResult {
        let mut store = MockOrderStore::new();
        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_create_charge()
            .once()
            .returning(|request| Ok(charge(&request)));

        store
            .expect_add()
            .once()
            .returning(|_| Err(OrderStoreError::InvalidData));

        gateway
            .expect_refund_charge()
            .once()
            .withf(|charge| charge == "ch_123")
            .returning(|charge| {
                Ok(Refund {
                    id: "re_1".to_string(),
                    charge: charge.to_string(),
                    amount: 1250,
                    status: "succeeded".to_string(),
                })
            });

        let result = service(store, gateway)
            .create_order(UserId::generate(), checkout("12.50")?)
            .await;

        assert!(
            matches!(
                &result,
                Err(OrdersServiceError::Persistence { charge, refunded: true, .. })
                    if charge == "ch_123"
            ),
            "expected refunded Persistence error, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_refund_is_reported() -> TestResult {
        let mut store = MockOrderStore::new();
        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_create_charge()
            .once()
            .returning(|request| Ok(charge(&request)));

        store
            .expect_add()
            .once()
            .returning(|_| Err(OrderStoreError::MissingRequiredData));

        gateway
            .expect_refund_charge()
            .once()
            .returning(|_| Err(PaymentError::Unavailable("gateway down".to_string())));

        let result = service(store, gateway)
            .create_order(UserId::generate(), checkout("12.50")?)
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Persistence {
                    refunded: false,
                    ..
                })
            ),
            "expected unrefunded Persistence error, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn invalid_checkout_never_reaches_gateway() -> TestResult {
        let cases = [
            (
                CheckoutRequest {
                    address: "  ".to_string(),
                    ..checkout("12.50")?
                },
                ValidationError::MissingField("address"),
            ),
            (
                CheckoutRequest {
                    token: String::new(),
                    ..checkout("12.50")?
                },
                ValidationError::MissingField("token"),
            ),
            (checkout("0")?, ValidationError::NonPositiveAmount),
            (checkout("-3.00")?, ValidationError::NonPositiveAmount),
            (
                checkout("0.004")?,
                ValidationError::Amount(AmountError::BelowMinorUnit),
            ),
        ];

        for (request, expected) in cases {
            let mut store = MockOrderStore::new();
            let mut gateway = MockPaymentGateway::new();

            gateway.expect_create_charge().never();
            store.expect_add().never();

            let result = service(store, gateway)
                .create_order(UserId::generate(), request)
                .await;

            assert!(
                matches!(&result, Err(OrdersServiceError::Validation(error)) if *error == expected),
                "expected Validation({expected:?}), got {result:?}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_brews_are_rejected() -> TestResult {
        let mut request = checkout("12.50")?;

        for brew in &mut request.brews {
            brew.quantity = 0;
        }

        let mut gateway = MockPaymentGateway::new();

        gateway.expect_create_charge().never();

        let result = service(MockOrderStore::new(), gateway)
            .create_order(UserId::generate(), request)
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Validation(
                    ValidationError::EmptyBrewQuantity
                ))
            ),
            "expected EmptyBrewQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_order_maps_missing_to_not_found() {
        let mut store = MockOrderStore::new();

        store
            .expect_fetch()
            .once()
            .returning(|_| Err(OrderStoreError::NotFound));

        let result = service(store, MockPaymentGateway::new())
            .get_order(OrderId::generate())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_and_search_pass_query_through() -> TestResult {
        let mut store = MockOrderStore::new();
        let query = OrderQuery {
            city: Some("Portland".to_string()),
            ..OrderQuery::default()
        };

        store
            .expect_fetch_all()
            .once()
            .with(eq(query.clone()))
            .returning(|_| Ok(Vec::new()));

        store
            .expect_search()
            .once()
            .with(eq("main".to_string()), eq(query.clone()))
            .returning(|_, _| Ok(Vec::new()));

        store
            .expect_count()
            .once()
            .with(eq(query.clone()))
            .returning(|_| Ok(7));

        let service = service(store, MockPaymentGateway::new());

        assert!(service.list_orders(query.clone()).await?.is_empty());
        assert!(
            service
                .search_orders("main".to_string(), query.clone())
                .await?
                .is_empty()
        );
        assert_eq!(service.count_orders(query).await?, 7);

        Ok(())
    }

    #[tokio::test]
    async fn empty_update_is_rejected_before_store() {
        let mut store = MockOrderStore::new();

        store.expect_edit().never();

        let result = service(store, MockPaymentGateway::new())
            .update_order(OrderId::generate(), OrderUpdate::default())
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Validation(ValidationError::EmptyUpdate))
            ),
            "expected EmptyUpdate, got {result:?}"
        );
    }

    #[tokio::test]
    async fn delete_order_returns_removed_order() -> TestResult {
        let user = UserId::generate();
        let mut store = MockOrderStore::new();

        let removed = stored(NewOrder {
            user,
            address: "1 Main St".to_string(),
            amount: Decimal::from(5),
            brews: Vec::new(),
            postal_code: "97201".to_string(),
            city: "Portland".to_string(),
            charge: "ch_9".to_string(),
        });
        let id = removed.id;

        store
            .expect_remove()
            .once()
            .with(eq(id))
            .returning(move |_| Ok(removed.clone()));

        let order = service(store, MockPaymentGateway::new())
            .delete_order(id)
            .await?;

        assert_eq!(order.id, id);

        Ok(())
    }

    #[test]
    fn charge_description_names_time_and_user() -> TestResult {
        let user: UserId = "5bf9a1c2d3e4f5a6b7c8d9e0".parse()?;
        let now: Timestamp = "2018-11-24T22:21:09Z".parse()?;

        assert_eq!(
            charge_description(now, user),
            "Order 2018-11-24T22:21:09Z - User 5bf9a1c2d3e4f5a6b7c8d9e0"
        );

        Ok(())
    }
}
