//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar, types::Json,
};

use crate::{
    domain::orders::{
        data::{NewOrder, OrderQuery, OrderUpdate},
        records::{Brew, OrderId, OrderRecord},
    },
    ids::{IdParseError, TypedId},
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const SEARCH_ORDERS_SQL: &str = include_str!("sql/search_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("sql/count_orders.sql");
const UPDATE_ORDER_SQL: &str = include_str!("sql/update_order.sql");
const DELETE_ORDER_SQL: &str = include_str!("sql/delete_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.to_string())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        query: &OrderQuery,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(query.user.map(|user| user.to_string()))
            .bind(query.city.as_deref())
            .bind(query.postal_code.as_deref())
            .bind(query.sort.newest_first())
            .bind(i64::from(query.effective_limit()))
            .bind(i64::from(query.effective_start()))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn search_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        text: &str,
        query: &OrderQuery,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(SEARCH_ORDERS_SQL)
            .bind(query.user.map(|user| user.to_string()))
            .bind(query.city.as_deref())
            .bind(query.postal_code.as_deref())
            .bind(query.sort.newest_first())
            .bind(i64::from(query.effective_limit()))
            .bind(i64::from(query.effective_start()))
            .bind(like_pattern(text))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        query: &OrderQuery,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_ORDERS_SQL)
            .bind(query.user.map(|user| user.to_string()))
            .bind(query.city.as_deref())
            .bind(query.postal_code.as_deref())
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
        new: &NewOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.to_string())
            .bind(new.user.to_string())
            .bind(&new.address)
            .bind(&new.postal_code)
            .bind(&new.city)
            .bind(new.amount)
            .bind(Json(&new.brews))
            .bind(&new.charge)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
        update: &OrderUpdate,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_ORDER_SQL)
            .bind(order.to_string())
            .bind(update.address.as_deref())
            .bind(update.postal_code.as_deref())
            .bind(update.city.as_deref())
            .bind(update.brews.as_ref().map(Json))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(DELETE_ORDER_SQL)
            .bind(order.to_string())
            .fetch_one(&mut **tx)
            .await
    }
}

/// Build a case-insensitive substring pattern, escaping `LIKE` wildcards.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);

    pattern.push('%');

    for ch in text.trim().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }

        pattern.push(ch);
    }

    pattern.push('%');

    pattern
}

fn decode_id<T>(row: &PgRow, column: &str) -> sqlx::Result<TypedId<T>> {
    let raw: String = row.try_get(column)?;

    raw.trim()
        .parse()
        .map_err(|e: IdParseError| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(brews): Json<Vec<Brew>> = row.try_get("brews")?;

        Ok(Self {
            id: decode_id(row, "id")?,
            user: decode_id(row, "user_id")?,
            address: row.try_get("address")?,
            postal_code: row.try_get("postal_code")?,
            city: row.try_get("city")?,
            amount: row.try_get::<Decimal, _>("amount")?,
            brews,
            charge: row.try_get("charge_id")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
