//! Account service
//!
//! Registration, login bookkeeping, password changes and resets, and the
//! account page. Sessions themselves are started and ended by the HTTP layer;
//! this service only reports which user a session belongs to.

use sha2::{Digest, Sha256};
use social_common::auth::{hash_password, verify_password};
use social_common::AppError;
use social_core::entities::User;
use social_core::{DomainError, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, UpdateAccountRequest,
};
use crate::mail::password_reset_email;
use crate::storage::ImageUpload;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const EMAIL_IN_USE: &str = "Email already in use";

/// Identicon avatar for an email address
pub fn gravatar_url(email: &str) -> String {
    let digest = Sha256::digest(User::normalize_email(email).as_bytes());
    format!("https://gravatar.com/avatar/{}?d=identicon", hex::encode(digest))
}

pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an account and mark it online
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<User> {
        let email = User::normalize_email(&request.email);

        if self.ctx.user_repo().find_by_email(&email).await?.is_some() {
            return Err(ServiceError::field("email", EMAIL_IN_USE));
        }

        let password_hash = hash_password(&request.password)?;

        let mut user = User::new(
            self.ctx.generate_id(),
            request.username,
            &email,
            gravatar_url(&email),
        );
        user.go_online();

        // The unique index still wins a race between two registrations
        self.ctx
            .user_repo()
            .create(&user, &password_hash)
            .await
            .map_err(email_conflict_to_field)?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials. Unknown email and wrong password look the same.
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<User> {
        let email = User::normalize_email(&request.email);

        let Some(mut user) = self.ctx.user_repo().find_by_email(&email).await? else {
            warn!("Login failed: unknown email");
            return Err(AppError::InvalidCredentials.into());
        };

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(AppError::InvalidCredentials.into());
        }

        user.go_online();
        self.ctx.user_repo().update_presence(&user).await?;

        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Mark the user offline. A user deleted in the meantime is ignored.
    #[instrument(skip(self))]
    pub async fn logout(&self, user_id: Snowflake) -> ServiceResult<()> {
        if let Some(mut user) = self.ctx.user_repo().find_by_id(user_id).await? {
            user.go_offline();
            self.ctx.user_repo().update_presence(&user).await?;
            info!(user_id = %user_id, "User logged out");
        }
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        user_id: Snowflake,
        request: ChangePasswordRequest,
    ) -> ServiceResult<bool> {
        let current_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        if !verify_password(&request.current_password, &current_hash)? {
            return Err(ServiceError::field("current_password", "Invalid password"));
        }

        let new_hash = hash_password(&request.new_password)?;
        self.ctx.user_repo().update_password(user_id, &new_hash).await?;

        info!(user_id = %user_id, "Password changed");
        Ok(true)
    }

    /// Mail a reset link if the address belongs to an account. The answer is
    /// always `true` so the endpoint does not reveal which emails exist.
    #[instrument(skip(self, request))]
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> ServiceResult<bool> {
        let email = User::normalize_email(&request.email);

        let Some(user) = self.ctx.user_repo().find_by_email(&email).await? else {
            return Ok(true);
        };

        let token = self.ctx.reset_tokens().issue(user.id).await?;
        let link = format!("{}/reset-password/{token}", self.ctx.settings().client_url);

        if let Err(e) = self.ctx.mailer().send(&password_reset_email(&user.email, &link)).await {
            warn!(user_id = %user.id, error = %e, "Failed to send password reset email");
        } else {
            info!(user_id = %user.id, "Password reset email sent");
        }

        Ok(true)
    }

    /// Redeem a reset token, set the new password and revoke every session of
    /// the user
    #[instrument(skip(self, request))]
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> ServiceResult<User> {
        let user_id = self
            .ctx
            .reset_tokens()
            .consume(&request.token)
            .await?
            .ok_or_else(|| ServiceError::field("token", "Token expired"))?;

        let Some(mut user) = self.ctx.user_repo().find_by_id(user_id).await? else {
            return Err(ServiceError::field("token", "User no longer exists"));
        };

        let new_hash = hash_password(&request.new_password)?;
        self.ctx.user_repo().update_password(user_id, &new_hash).await?;

        let revoked = self.ctx.session_revoker().revoke_all(user_id).await?;

        user.go_online();
        self.ctx.user_repo().update_presence(&user).await?;

        info!(user_id = %user_id, revoked_sessions = revoked, "Password reset");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn current_user(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }

    /// Update username and email, and replace the avatar when a file came
    /// with the form
    #[instrument(skip(self, request, image))]
    pub async fn update_account(
        &self,
        user_id: Snowflake,
        request: UpdateAccountRequest,
        image: Option<ImageUpload>,
    ) -> ServiceResult<User> {
        if let Some(image) = &image {
            self.check_image(image)?;
        }

        let mut user = self.current_user(user_id).await?;
        let email = User::normalize_email(&request.email);

        if email != user.email {
            if let Some(other) = self.ctx.user_repo().find_by_email(&email).await? {
                if other.id != user_id {
                    return Err(ServiceError::field("email", EMAIL_IN_USE));
                }
            }
        }

        user.update_profile(request.username, &email);

        let new_avatar = match image {
            Some(image) => {
                let url = self.ctx.storage().save_avatar(user_id, &image).await?;
                user.set_image(url.clone());
                Some(url)
            }
            None => None,
        };

        if let Err(e) = self.ctx.user_repo().update(&user).await {
            if let Some(url) = &new_avatar {
                if let Err(err) = self.ctx.storage().discard_avatar(user_id, url).await {
                    warn!(user_id = %user_id, error = %err, "Failed to discard uncommitted avatar");
                }
            }
            return Err(email_conflict_to_field(e));
        }

        if let Some(url) = &new_avatar {
            if let Err(e) = self.ctx.storage().prune_avatars(user_id, url).await {
                warn!(user_id = %user_id, error = %e, "Failed to remove old avatars");
            }
        }

        info!(user_id = %user_id, "Account updated");
        Ok(user)
    }

    fn check_image(&self, image: &ImageUpload) -> ServiceResult<()> {
        if image.is_empty() {
            return Err(ServiceError::field("image", "File is empty"));
        }
        if image.len() > self.ctx.settings().max_avatar_bytes {
            let limit = format_size(self.ctx.settings().max_avatar_bytes);
            return Err(ServiceError::field("image", format!("File must be at most {limit}")));
        }
        if !image.is_image() || image.extension().is_none() {
            return Err(ServiceError::field(
                "image",
                "Only png, jpeg, gif, webp, avif or bmp images are allowed",
            ));
        }
        Ok(())
    }
}

/// Human size for limits, in the largest unit that divides it evenly
fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;
    if bytes >= MB && bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{} KB", bytes / KB)
    } else {
        format!("{bytes} bytes")
    }
}

fn email_conflict_to_field(err: DomainError) -> ServiceError {
    match err {
        DomainError::EmailAlreadyExists => ServiceError::field("email", EMAIL_IN_USE),
        other => other.into(),
    }
}
