//! Local HTTP API, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Inject shared application state (`AppState`) into handlers.
//! - Translate module errors into status codes and [`common::protocol::ErrorResponse`] bodies.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
