//! HTTP surface: configuration, router, handlers, and error mapping.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
