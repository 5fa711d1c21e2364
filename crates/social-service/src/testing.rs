//! In-memory doubles for service tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use social_cache::{RedisPool, RedisPoolConfig};
use social_core::entities::{Ban, FriendRequest, Guild, PendingRequest, RequestDirection, User};
use social_core::traits::{BanRepository, FriendRepository, GuildRepository, RepoResult, UserRepository};
use social_core::{DomainError, Relationship, Snowflake, SnowflakeGenerator};

use crate::mail::{MailError, Mailer, OutgoingEmail};
use crate::services::{
    ResetTokens, ServiceContext, ServiceContextBuilder, ServiceResult, ServiceSettings,
    SessionRevoker,
};
use crate::storage::{FileStorage, ImageUpload, StorageError};

#[derive(Default)]
struct State {
    users: HashMap<Snowflake, (User, String)>,
    friends: HashSet<(Snowflake, Snowflake)>,
    requests: Vec<FriendRequest>,
    guilds: HashMap<Snowflake, Guild>,
    members: HashSet<(Snowflake, Snowflake)>,
    bans: HashMap<(Snowflake, Snowflake), Ban>,
}

/// Implements every repository trait over one shared state
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    update_conflict: AtomicBool,
}

impl MemoryStore {
    /// Make every later user update fail as if another account had just
    /// taken the email
    pub fn fail_updates_with_email_conflict(&self) {
        self.update_conflict.store(true, Ordering::SeqCst);
    }

    fn with<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        let state = self.state.lock().unwrap();
        f(&state)
    }

    fn user(state: &State, id: Snowflake) -> Option<User> {
        state.users.get(&id).map(|(user, _)| user.clone())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.read(|s| Self::user(s, id)))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.read(|s| {
            s.users
                .values()
                .find(|(user, _)| user.email == email)
                .map(|(user, _)| user.clone())
        }))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        self.with(|s| {
            if s.users.values().any(|(u, _)| u.email == user.email) {
                return Err(DomainError::EmailAlreadyExists);
            }
            s.users.insert(user.id, (user.clone(), password_hash.to_string()));
            Ok(())
        })
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        if self.update_conflict.load(Ordering::SeqCst) {
            return Err(DomainError::EmailAlreadyExists);
        }
        self.with(|s| {
            if s.users.values().any(|(u, _)| u.email == user.email && u.id != user.id) {
                return Err(DomainError::EmailAlreadyExists);
            }
            let entry = s.users.get_mut(&user.id).ok_or(DomainError::UserNotFound(user.id))?;
            entry.0.username.clone_from(&user.username);
            entry.0.email.clone_from(&user.email);
            entry.0.image.clone_from(&user.image);
            entry.0.updated_at = user.updated_at;
            Ok(())
        })
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self.read(|s| s.users.get(&id).map(|(_, hash)| hash.clone())))
    }

    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        self.with(|s| {
            let entry = s.users.get_mut(&id).ok_or(DomainError::UserNotFound(id))?;
            entry.1 = password_hash.to_string();
            Ok(())
        })
    }

    async fn update_presence(&self, user: &User) -> RepoResult<()> {
        self.with(|s| {
            let entry = s.users.get_mut(&user.id).ok_or(DomainError::UserNotFound(user.id))?;
            entry.0.is_online = user.is_online;
            entry.0.last_seen = user.last_seen;
            Ok(())
        })
    }
}

#[async_trait]
impl FriendRepository for MemoryStore {
    async fn relationship(&self, user_id: Snowflake, other_id: Snowflake) -> RepoResult<Relationship> {
        if user_id == other_id {
            return Ok(Relationship::SelfUser);
        }
        Ok(self.read(|s| {
            let has = |from: Snowflake, to: Snowflake| {
                s.requests
                    .iter()
                    .any(|r| r.sender_id == from && r.receiver_id == to)
            };
            if s.friends.contains(&(user_id, other_id)) {
                Relationship::Friends
            } else if has(other_id, user_id) {
                Relationship::Incoming
            } else if has(user_id, other_id) {
                Relationship::Outgoing
            } else {
                Relationship::None
            }
        }))
    }

    async fn list_friends(&self, user_id: Snowflake) -> RepoResult<Vec<User>> {
        Ok(self.read(|s| {
            let mut friends: Vec<User> = s
                .friends
                .iter()
                .filter(|(user, _)| *user == user_id)
                .filter_map(|(_, friend)| Self::user(s, *friend))
                .collect();
            friends.sort_by(|a, b| a.username.cmp(&b.username));
            friends
        }))
    }

    async fn list_pending(&self, user_id: Snowflake) -> RepoResult<Vec<PendingRequest>> {
        Ok(self.read(|s| {
            s.requests
                .iter()
                .rev()
                .filter_map(|r| {
                    let direction = r.direction_for(user_id)?;
                    let other = match direction {
                        RequestDirection::Incoming => r.sender_id,
                        RequestDirection::Outgoing => r.receiver_id,
                    };
                    Some(PendingRequest {
                        user: Self::user(s, other)?,
                        direction,
                    })
                })
                .collect()
        }))
    }

    async fn create_request(&self, request: &FriendRequest) -> RepoResult<()> {
        self.with(|s| {
            let exists = s
                .requests
                .iter()
                .any(|r| r.sender_id == request.sender_id && r.receiver_id == request.receiver_id);
            if !exists {
                s.requests.push(request.clone());
            }
        });
        Ok(())
    }

    async fn delete_request(&self, sender_id: Snowflake, receiver_id: Snowflake) -> RepoResult<bool> {
        Ok(self.with(|s| {
            let before = s.requests.len();
            s.requests
                .retain(|r| !(r.sender_id == sender_id && r.receiver_id == receiver_id));
            s.requests.len() != before
        }))
    }

    async fn accept_request(&self, sender_id: Snowflake, receiver_id: Snowflake) -> RepoResult<()> {
        self.with(|s| {
            s.requests
                .retain(|r| !(r.sender_id == sender_id && r.receiver_id == receiver_id));
            s.friends.insert((sender_id, receiver_id));
            s.friends.insert((receiver_id, sender_id));
        });
        Ok(())
    }

    async fn remove_friend(&self, user_id: Snowflake, friend_id: Snowflake) -> RepoResult<bool> {
        Ok(self.with(|s| {
            let removed = s.friends.remove(&(user_id, friend_id));
            s.friends.remove(&(friend_id, user_id)) || removed
        }))
    }
}

#[async_trait]
impl GuildRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Guild>> {
        Ok(self.read(|s| s.guilds.get(&id).cloned()))
    }

    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Guild>> {
        Ok(self.read(|s| {
            let mut guilds: Vec<Guild> = s
                .members
                .iter()
                .filter(|(_, user)| *user == user_id)
                .filter_map(|(guild, _)| s.guilds.get(guild).cloned())
                .collect();
            guilds.sort_by_key(|g| g.id);
            guilds
        }))
    }

    async fn create(&self, guild: &Guild) -> RepoResult<()> {
        self.with(|s| {
            s.guilds.insert(guild.id, guild.clone());
            s.members.insert((guild.id, guild.owner_id));
        });
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        self.with(|s| {
            s.guilds.remove(&id);
            s.members.retain(|(guild, _)| *guild != id);
            s.bans.retain(|(guild, _), _| *guild != id);
        });
        Ok(())
    }

    async fn is_member(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self.read(|s| s.members.contains(&(guild_id, user_id))))
    }

    async fn add_member(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        self.with(|s| {
            if s.members.insert((guild_id, user_id)) {
                Ok(())
            } else {
                Err(DomainError::AlreadyMember)
            }
        })
    }

    async fn remove_member(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self.with(|s| s.members.remove(&(guild_id, user_id))))
    }
}

#[async_trait]
impl BanRepository for MemoryStore {
    async fn is_banned(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self.read(|s| s.bans.contains_key(&(guild_id, user_id))))
    }

    async fn list_banned_users(&self, guild_id: Snowflake) -> RepoResult<Vec<User>> {
        Ok(self.read(|s| {
            s.bans
                .keys()
                .filter(|(guild, _)| *guild == guild_id)
                .filter_map(|(_, user)| Self::user(s, *user))
                .collect()
        }))
    }

    async fn create(&self, ban: &Ban) -> RepoResult<()> {
        self.with(|s| {
            s.bans.insert((ban.guild_id, ban.user_id), ban.clone());
            s.members.remove(&(ban.guild_id, ban.user_id));
        });
        Ok(())
    }

    async fn delete(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self.with(|s| s.bans.remove(&(guild_id, user_id)).is_some()))
    }
}

/// Keeps every message instead of sending it
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    failing: AtomicBool,
}

impl RecordingMailer {
    /// Reject every later message as an unreachable relay would
    pub fn fail_sends(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::Address(email.to.clone()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Single-use reset tokens in a map
#[derive(Default)]
pub struct MemoryResetTokens {
    tokens: Mutex<HashMap<String, Snowflake>>,
}

impl MemoryResetTokens {
    /// Forget a token as if its TTL ran out
    pub fn expire(&self, token: &str) {
        self.tokens.lock().unwrap().remove(token);
    }
}

#[async_trait]
impl ResetTokens for MemoryResetTokens {
    async fn issue(&self, user_id: Snowflake) -> ServiceResult<String> {
        let token = uuid::Uuid::new_v4().to_string();
        self.tokens.lock().unwrap().insert(token.clone(), user_id);
        Ok(token)
    }

    async fn consume(&self, token: &str) -> ServiceResult<Option<Snowflake>> {
        Ok(self.tokens.lock().unwrap().remove(token))
    }
}

/// Counts open sessions per user and records revocations
#[derive(Default)]
pub struct MemorySessions {
    open: Mutex<HashMap<Snowflake, usize>>,
    pub revoked: Mutex<Vec<Snowflake>>,
}

impl MemorySessions {
    pub fn open(&self, user_id: Snowflake) {
        *self.open.lock().unwrap().entry(user_id).or_default() += 1;
    }

    pub fn open_count(&self, user_id: Snowflake) -> usize {
        self.open.lock().unwrap().get(&user_id).copied().unwrap_or(0)
    }
}

#[async_trait]
impl SessionRevoker for MemorySessions {
    async fn revoke_all(&self, user_id: Snowflake) -> ServiceResult<usize> {
        self.revoked.lock().unwrap().push(user_id);
        Ok(self.open.lock().unwrap().remove(&user_id).unwrap_or(0))
    }
}

/// Storage that keeps the URLs it handed out instead of writing files
#[derive(Default)]
pub struct MemoryStorage {
    next: AtomicUsize,
    pub files: Mutex<Vec<(Snowflake, String)>>,
}

impl MemoryStorage {
    pub fn urls_for(&self, user_id: Snowflake) -> Vec<String> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, url)| url.clone())
            .collect()
    }
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn save_avatar(&self, user_id: Snowflake, image: &ImageUpload) -> Result<String, StorageError> {
        let ext = image
            .extension()
            .ok_or_else(|| StorageError::UnsupportedType(image.content_type.clone()))?;
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        let url = format!("/files/avatars/{user_id}/avatar-{n}.{ext}");
        self.files.lock().unwrap().push((user_id, url.clone()));
        Ok(url)
    }

    async fn discard_avatar(&self, user_id: Snowflake, url: &str) -> Result<(), StorageError> {
        self.files
            .lock()
            .unwrap()
            .retain(|(owner, stored)| !(*owner == user_id && stored == url));
        Ok(())
    }

    async fn prune_avatars(&self, user_id: Snowflake, keep_url: &str) -> Result<(), StorageError> {
        self.files
            .lock()
            .unwrap()
            .retain(|(owner, stored)| *owner != user_id || stored == keep_url);
        Ok(())
    }
}

pub struct TestContext {
    pub ctx: ServiceContext,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub storage: Arc<MemoryStorage>,
    pub reset_tokens: Arc<MemoryResetTokens>,
    pub sessions: Arc<MemorySessions>,
}

/// Context over in-memory repositories and stores. The PostgreSQL and Redis
/// pools never connect; anything reaching them fails.
pub fn test_context() -> TestContext {
    let store = Arc::new(MemoryStore::default());
    let mailer = Arc::new(RecordingMailer::default());
    let storage = Arc::new(MemoryStorage::default());
    let reset_tokens = Arc::new(MemoryResetTokens::default());
    let sessions = Arc::new(MemorySessions::default());

    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://unused@127.0.0.1:1/unused")
        .unwrap();
    let redis_pool = RedisPool::new(RedisPoolConfig {
        url: "redis://127.0.0.1:1".to_string(),
        max_connections: 1,
    })
    .unwrap();

    let ctx = ServiceContextBuilder::new()
        .pool(pool)
        .redis_pool(Arc::new(redis_pool))
        .user_repo(store.clone())
        .friend_repo(store.clone())
        .guild_repo(store.clone())
        .ban_repo(store.clone())
        .session_ttl_seconds(60)
        .session_revoker(sessions.clone())
        .reset_tokens(reset_tokens.clone())
        .mailer(mailer.clone())
        .storage(storage.clone())
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
        .settings(ServiceSettings {
            client_url: "http://client.test".to_string(),
            max_avatar_bytes: 1024,
        })
        .build()
        .unwrap();

    TestContext {
        ctx,
        store,
        mailer,
        storage,
        reset_tokens,
        sessions,
    }
}
