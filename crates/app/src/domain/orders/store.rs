//! Orders store.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::orders::{
        data::{NewOrder, OrderQuery, OrderUpdate},
        errors::OrderStoreError,
        records::{OrderId, OrderRecord},
        repository::PgOrdersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrderStore {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrderStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn fetch(&self, order: OrderId) -> Result<OrderRecord, OrderStoreError> {
        let mut tx = self.db.begin().await?;

        let order = self.repository.get_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn fetch_all(&self, query: OrderQuery) -> Result<Vec<OrderRecord>, OrderStoreError> {
        let mut tx = self.db.begin().await?;

        let orders = self.repository.list_orders(&mut tx, &query).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn search(
        &self,
        text: String,
        query: OrderQuery,
    ) -> Result<Vec<OrderRecord>, OrderStoreError> {
        let mut tx = self.db.begin().await?;

        let orders = self.repository.search_orders(&mut tx, &text, &query).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn count(&self, query: OrderQuery) -> Result<u64, OrderStoreError> {
        let mut tx = self.db.begin().await?;

        let count = self.repository.count_orders(&mut tx, &query).await?;

        tx.commit().await?;

        Ok(count)
    }

    async fn add(&self, order: NewOrder) -> Result<OrderRecord, OrderStoreError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_order(&mut tx, OrderId::generate(), &order)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn edit(
        &self,
        order: OrderId,
        update: OrderUpdate,
    ) -> Result<OrderRecord, OrderStoreError> {
        let mut tx = self.db.begin().await?;

        let updated = self.repository.update_order(&mut tx, order, &update).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn remove(&self, order: OrderId) -> Result<OrderRecord, OrderStoreError> {
        let mut tx = self.db.begin().await?;

        let removed = self.repository.delete_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(removed)
    }
}

/// Persistence for orders. Each call runs in its own transaction.
#[automock]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Retrieve a single order.
    async fn fetch(&self, order: OrderId) -> Result<OrderRecord, OrderStoreError>;

    /// Retrieve the orders matching the query's filters, one page at a time.
    async fn fetch_all(&self, query: OrderQuery) -> Result<Vec<OrderRecord>, OrderStoreError>;

    /// Like [`OrderStore::fetch_all`], further narrowed to orders whose address,
    /// city or postal code contains `text`.
    async fn search(
        &self,
        text: String,
        query: OrderQuery,
    ) -> Result<Vec<OrderRecord>, OrderStoreError>;

    /// Count the orders matching the query's filters.
    async fn count(&self, query: OrderQuery) -> Result<u64, OrderStoreError>;

    /// Persist a new order under a freshly generated id.
    async fn add(&self, order: NewOrder) -> Result<OrderRecord, OrderStoreError>;

    /// Apply a partial update.
    async fn edit(
        &self,
        order: OrderId,
        update: OrderUpdate,
    ) -> Result<OrderRecord, OrderStoreError>;

    /// Delete an order, returning what was removed.
    async fn remove(&self, order: OrderId) -> Result<OrderRecord, OrderStoreError>;
}
