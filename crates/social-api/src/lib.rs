//! # social-api
//!
//! REST API server built with Axum: account, friend and guild endpoints
//! behind a Redis-backed session cookie.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
