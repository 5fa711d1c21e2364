//! Cookie sessions

mod store;

pub use store::{SessionData, SessionStore};
