//! Orders

mod errors;
mod handlers;
mod models;
mod params;

pub(crate) use handlers::*;
