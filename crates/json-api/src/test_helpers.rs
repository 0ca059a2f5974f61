//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};

use brewhouse_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        orders::{
            MockOrdersService,
            records::{Brew, OrderId, OrderRecord},
        },
        users::UserId,
    },
    ids::TypedId,
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_ID: UserId = TypedId::from_bytes([
    0x5b, 0xf9, 0xa1, 0xc2, 0xd3, 0xe4, 0xf5, 0xa6, 0xb7, 0xc8, 0xd9, 0xe0,
]);

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_id(TEST_USER_ID);
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_list_orders().never();
    orders.expect_search_orders().never();
    orders.expect_count_orders().never();
    orders.expect_get_order().never();
    orders.expect_create_order().never();
    orders.expect_update_order().never();
    orders.expect_delete_order().never();

    orders
}

fn state(orders: MockOrdersService, auth: MockAuthService) -> Arc<State> {
    State::from_app_context(AppContext {
        orders: Arc::new(orders),
        auth: Arc::new(auth),
    })
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state(strict_orders_mock(), auth)
}

/// Serve `route` as [`TEST_USER_ID`], backed by the given orders mock.
pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(orders, strict_auth_mock())))
            .hoop(inject_user)
            .push(route),
    )
}

/// A stored order owned by [`TEST_USER_ID`].
pub(crate) fn make_order(id: OrderId) -> OrderRecord {
    OrderRecord {
        id,
        user: TEST_USER_ID,
        address: "1 Hop Lane".to_string(),
        postal_code: "97201".to_string(),
        city: "Portland".to_string(),
        amount: Decimal::new(1250, 2),
        brews: vec![Brew {
            id: "5bf9a1c2d3e4f5a6b7c8d9ff".to_string(),
            name: "Pale Ale".to_string(),
            price: Decimal::new(625, 2),
            quantity: 2,
        }],
        charge: "ch_123".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
