//! HTTP API surface (feature `api`)

pub mod handlers;
pub mod models;
pub mod server;

pub use server::start_http_server;
