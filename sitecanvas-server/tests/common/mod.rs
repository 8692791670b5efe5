//! Shared helpers for the gateway integration tests.

mod server;

#[allow(unused_imports)]
pub use server::{TestServer, OWNER};
