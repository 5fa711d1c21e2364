//! API integration tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestClient, TestServer,
};
use reqwest::{multipart, StatusCode};
use serde_json::json;

/// Register a fresh user on `client`, leaving it logged in
async fn register(client: &TestClient) -> (RegisterRequest, AccountResponse) {
    let request = RegisterRequest::unique();
    let response = client.post_json("/account/register", &request).await.unwrap();
    let account = assert_json(response, StatusCode::CREATED).await.unwrap();
    (request, account)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();

    assert_status(client.get("/health").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_status(client.get("/health/ready").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
}

// ============================================================================
// Account Tests
// ============================================================================

#[tokio::test]
async fn test_register_starts_session() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();
    let (request, account) = register(&client).await;

    assert_eq!(account.username, request.username);
    assert_eq!(account.email, request.email);
    assert!(account.image.starts_with("https://gravatar.com/avatar/"));
    assert!(account.is_online);

    let me: AccountResponse = assert_json(client.get("/account").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(me.id, account.id);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = register(&server.client().unwrap()).await;

    let other = server.client().unwrap();
    let response = other.post_json("/account/register", &request).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(error.error.code, "VALIDATION_ERROR");
    assert_eq!(error.field("email"), Some("Email already in use"));
}

#[tokio::test]
async fn test_register_invalid_form() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();

    let body = json!({ "email": "nope", "username": "ab", "password": "1" });
    let response = client.post_json("/account/register", &body).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert!(error.field("email").is_some());
    assert!(error.field("username").is_some());
    assert!(error.field("password").is_some());
}

#[tokio::test]
async fn test_login_and_logout() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, account) = register(&server.client().unwrap()).await;

    let client = server.client().unwrap();
    assert_status(client.get("/account").await.unwrap(), StatusCode::UNAUTHORIZED)
        .await
        .unwrap();

    let response = client
        .post_json("/account/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let logged_in: AccountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(logged_in.id, account.id);

    assert_status(client.get("/account").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();

    let logged_out: bool = assert_json(client.post("/account/logout").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(logged_out);

    let response = client.get("/account").await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(error.error.message, "Not authenticated");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = register(&server.client().unwrap()).await;
    let client = server.client().unwrap();

    let wrong_password = LoginRequest {
        email: request.email.clone(),
        password: "not-the-password".to_string(),
    };
    let response = client.post_json("/account/login", &wrong_password).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let unknown = LoginRequest {
        email: format!("missing{}@example.com", unique_suffix()),
        password: "whatever".to_string(),
    };
    let response = client.post_json("/account/login", &unknown).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_change_password() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();
    let (request, _) = register(&client).await;

    let wrong = ChangePasswordRequest {
        current_password: "incorrect".to_string(),
        new_password: "NewPass123!".to_string(),
        confirm_new_password: "NewPass123!".to_string(),
    };
    let response = client.put_json("/account/change-password", &wrong).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.field("current_password"), Some("Invalid password"));

    let mismatch = ChangePasswordRequest {
        current_password: request.password.clone(),
        new_password: "NewPass123!".to_string(),
        confirm_new_password: "Different123!".to_string(),
    };
    let response = client.put_json("/account/change-password", &mismatch).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.field("confirm_new_password"), Some("Passwords do not match"));

    let change = ChangePasswordRequest {
        current_password: request.password.clone(),
        new_password: "NewPass123!".to_string(),
        confirm_new_password: "NewPass123!".to_string(),
    };
    let response = client.put_json("/account/change-password", &change).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let fresh = server.client().unwrap();
    let login = LoginRequest {
        email: request.email.clone(),
        password: "NewPass123!".to_string(),
    };
    let response = fresh.post_json("/account/login", &login).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_forgot_password_always_succeeds() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();

    let body = json!({ "email": format!("nobody{}@example.com", unique_suffix()) });
    let response = client.post_json("/account/forgot-password", &body).await.unwrap();
    let sent: bool = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(sent);
}

#[tokio::test]
async fn test_reset_password_flow() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let old_session = server.client().unwrap();
    let (request, account) = register(&old_session).await;

    let token = server.issue_reset_token(&account.id).await.unwrap();
    let reset = ResetPasswordRequest {
        token: token.clone(),
        new_password: "ResetPass123!".to_string(),
        confirm_new_password: "ResetPass123!".to_string(),
    };

    let client = server.client().unwrap();
    let response = client.post_json("/account/reset-password", &reset).await.unwrap();
    let user: AccountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.id, account.id);

    // New session on the resetting client, old sessions revoked
    assert_status(client.get("/account").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_status(old_session.get("/account").await.unwrap(), StatusCode::UNAUTHORIZED)
        .await
        .unwrap();

    // Tokens are single use
    let response = client.post_json("/account/reset-password", &reset).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.field("token"), Some("Token expired"));

    let login = LoginRequest {
        email: request.email,
        password: "ResetPass123!".to_string(),
    };
    let response = server.client().unwrap().post_json("/account/login", &login).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_update_account_with_avatar() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();
    let (_, account) = register(&client).await;

    let new_name: String = format!("r{}", unique_suffix()).chars().take(20).collect();
    let image = multipart::Part::bytes(b"\x89PNG\r\n\x1a\nfake".to_vec())
        .file_name("avatar.png")
        .mime_str("image/png")
        .unwrap();
    let form = multipart::Form::new()
        .text("email", account.email.clone())
        .text("username", new_name.clone())
        .part("image", image);

    let response = client.put_multipart("/account", form).await.unwrap();
    let updated: AccountResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(updated.username, new_name);
    assert!(updated.image.starts_with("/files/avatars/"));
    assert!(updated.image.ends_with(".png"));

    let served = client.get(&updated.image).await.unwrap();
    assert_status(served, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_update_account_rejects_taken_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, first) = register(&server.client().unwrap()).await;
    let client = server.client().unwrap();
    let (_, second) = register(&client).await;

    let form = multipart::Form::new()
        .text("email", first.email.clone())
        .text("username", second.username.clone());
    let response = client.put_multipart("/account", form).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.field("email"), Some("Email already in use"));
}

// ============================================================================
// Friend Tests
// ============================================================================

#[tokio::test]
async fn test_friend_request_lifecycle() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.client().unwrap();
    let bob = server.client().unwrap();
    let (_, alice_account) = register(&alice).await;
    let (_, bob_account) = register(&bob).await;

    let response = alice
        .post(&format!("/account/{}/friend", bob_account.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let pending: Vec<PendingRequestResponse> =
        assert_json(alice.get("/account/me/pending").await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, bob_account.id);
    assert_eq!(pending[0].kind, "outgoing");

    let pending: Vec<PendingRequestResponse> =
        assert_json(bob.get("/account/me/pending").await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, alice_account.id);
    assert_eq!(pending[0].kind, "incoming");

    let response = bob
        .post(&format!("/account/{}/friend/accept", alice_account.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let friends: Vec<FriendResponse> =
        assert_json(alice.get("/account/me/friends").await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].id, bob_account.id);
    assert_eq!(friends[0].username, bob_account.username);

    let response = alice
        .post(&format!("/account/{}/friend", bob_account.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    let response = bob
        .delete(&format!("/account/{}/friend", alice_account.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let friends: Vec<FriendResponse> =
        assert_json(alice.get("/account/me/friends").await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert!(friends.is_empty());
}

#[tokio::test]
async fn test_friend_request_cancel_and_self() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.client().unwrap();
    let bob = server.client().unwrap();
    let (_, alice_account) = register(&alice).await;
    let (_, bob_account) = register(&bob).await;

    let response = alice
        .post(&format!("/account/{}/friend", alice_account.id))
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.message, "You cannot add yourself");

    alice
        .post(&format!("/account/{}/friend", bob_account.id))
        .await
        .unwrap();
    let response = bob
        .post(&format!("/account/{}/friend/cancel", alice_account.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let pending: Vec<PendingRequestResponse> =
        assert_json(alice.get("/account/me/pending").await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert!(pending.is_empty());

    let response = alice.post("/account/not-a-number/friend").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Guild Tests
// ============================================================================

#[tokio::test]
async fn test_guild_membership_and_bans() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.client().unwrap();
    let member = server.client().unwrap();
    let (_, owner_account) = register(&owner).await;
    let (_, member_account) = register(&member).await;

    let response = owner.post_json("/guilds", &CreateGuildRequest::unique()).await.unwrap();
    let guild: GuildResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(guild.owner_id, owner_account.id);

    let members_path = format!("/guilds/{}/members", guild.id);
    assert_status(member.post(&members_path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_status(member.post(&members_path).await.unwrap(), StatusCode::CONFLICT)
        .await
        .unwrap();

    let guilds: Vec<GuildResponse> = assert_json(member.get("/guilds").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(guilds.iter().any(|g| g.id == guild.id));

    // Only the owner manages bans
    let ban_path = format!("/guilds/{}/bans/{}", guild.id, member_account.id);
    let response = member
        .post(&format!("/guilds/{}/bans/{}", guild.id, owner_account.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    assert_status(owner.post(&ban_path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();

    let bans: Vec<PublicUserResponse> = assert_json(
        owner.get(&format!("/guilds/{}/bans", guild.id)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(bans.len(), 1);
    assert_eq!(bans[0].id, member_account.id);

    let response = member.post(&members_path).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(error.error.code, "USER_BANNED");

    assert_status(owner.delete(&ban_path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_status(member.post(&members_path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_status(member.delete(&members_path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();

    let response = owner.delete(&members_path).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "CANNOT_LEAVE_OWNED_GUILD");

    let response = owner.post(&format!("/guilds/{}/bans/{}", guild.id, owner_account.id)).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let guild_path = format!("/guilds/{}", guild.id);
    assert_status(member.delete(&guild_path).await.unwrap(), StatusCode::FORBIDDEN)
        .await
        .unwrap();
    assert_status(owner.delete(&guild_path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_status(member.post(&members_path).await.unwrap(), StatusCode::NOT_FOUND)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_guild_routes_require_session() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.client().unwrap();

    let response = client.post_json("/guilds", &CreateGuildRequest::unique()).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}
