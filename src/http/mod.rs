//! HTTP surface: command gateway and query routes

pub mod routes;

pub use routes::build_router;
