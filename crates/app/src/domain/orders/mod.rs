//! Orders

pub mod data;
mod errors;
pub mod records;
mod repository;
mod service;
mod store;

pub use errors::*;
pub use service::*;
pub use store::*;
