//! Test context for store-level integration tests.

use crate::{database::Db, domain::orders::PgOrderStore};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub orders: PgOrderStore,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = TestDb::new().await;

        Self {
            orders: PgOrderStore::new(Db::new(db.pool().clone())),
            db,
        }
    }
}
