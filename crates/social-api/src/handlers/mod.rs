//! Route handlers, grouped by resource

pub mod account;
pub mod guilds;
pub mod health;
