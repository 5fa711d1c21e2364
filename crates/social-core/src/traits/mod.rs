//! Ports implemented by the infrastructure layer

mod repositories;

pub use repositories::{BanRepository, FriendRepository, GuildRepository, RepoResult, UserRepository};
