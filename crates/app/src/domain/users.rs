//! Users
//!
//! Users are owned by the identity provider; orders only reference them.

use crate::ids::TypedId;

/// User marker.
#[derive(Debug)]
pub struct User;

/// User identifier.
pub type UserId = TypedId<User>;
