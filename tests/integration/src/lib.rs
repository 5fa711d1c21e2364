//! Integration test utilities for the social server
//!
//! Spawns the real application against PostgreSQL and Redis and drives it
//! over HTTP with cookie-aware clients.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
