//! User entity - an account holder

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub email: String,
    /// Avatar URL, either an uploaded file or a gravatar identicon
    pub image: String,
    pub is_online: bool,
    pub last_seen: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new offline user. The email is normalized on the way in.
    pub fn new(id: Snowflake, username: String, email: &str, image: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email: Self::normalize_email(email),
            image,
            is_online: false,
            last_seen: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Emails are compared and stored trimmed and lower-cased
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Update the profile fields editable from the account page
    pub fn update_profile(&mut self, username: String, email: &str) {
        self.username = username;
        self.email = Self::normalize_email(email);
        self.updated_at = Utc::now();
    }

    pub fn set_image(&mut self, image: String) {
        self.image = image;
        self.updated_at = Utc::now();
    }

    /// Mark online; called on login
    pub fn go_online(&mut self) {
        self.is_online = true;
    }

    /// Mark offline and stamp the last time the user was seen
    pub fn go_offline(&mut self) {
        self.is_online = false;
        self.last_seen = Some(Utc::now());
    }
}
