//! Orders domain, persistence and payment modules for the storefront.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod ids;
pub mod payments;
pub mod secrets;

#[cfg(test)]
mod test;
