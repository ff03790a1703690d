//! Library exports for httpserver, shared between the binary and tests.

pub mod config;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod startup;
pub mod state;
pub mod utils;
