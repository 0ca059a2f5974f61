//! Auth middleware.

use std::sync::Arc;

use brewhouse_app::auth::AuthServiceError;
use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::{debug, error};

use crate::{extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
        ctrl.skip_rest();

        return;
    };

    let Ok(state) = depot.obtain::<Arc<State>>() else {
        error!("application state missing from depot");
        res.render(StatusError::internal_server_error());
        ctrl.skip_rest();

        return;
    };

    let user = match state.app.auth.authenticate_bearer(token).await {
        Ok(user) => user,
        Err(AuthServiceError::Expired) => {
            res.render(StatusError::unauthorized().brief("Token has expired"));
            ctrl.skip_rest();

            return;
        }
        Err(rejected) => {
            debug!("bearer token rejected: {rejected}");
            res.render(StatusError::unauthorized().brief("Invalid token"));
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_user_id(user);

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
