//! Database models - `FromRow` structs mirroring the tables

mod guild;
mod user;

pub use guild::GuildModel;
pub use user::{PendingRequestModel, UserModel};
