//! Test Helpers

mod context;

pub(crate) use context::TestContext;
