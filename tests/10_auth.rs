mod common;

use anyhow::Result;
use chrono::Duration;
use reqwest::StatusCode;
use serde_json::{json, Value};

use mun_platform_api::auth::TokenAuthority;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn signup_returns_public_user_view() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.signup("a@x.com", "alice", "s3cret-pass").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["username"], "alice");
    assert!(body["id"].is_string());
    assert!(body["created_at"].is_string());
    assert!(body.get("password").is_none(), "hash must not be returned: {}", body);
    Ok(())
}

#[tokio::test]
async fn signup_twice_with_same_email_conflicts() -> Result<()> {
    let server = common::spawn_server().await?;

    let first = server.signup("a@x.com", "alice", "pw-one").await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = server.signup("a@x.com", "alice-again", "pw-two").await?;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body = second.json::<Value>().await?;
    assert_eq!(body["detail"], "Email already registered");
    Ok(())
}

#[tokio::test]
async fn signup_stores_only_a_hash() -> Result<()> {
    let server = common::spawn_server().await?;
    server.signup("hash@x.com", "hasher", "plaintext-pw").await?;

    let stored = server
        .state
        .users
        .find_by_email("hash@x.com")
        .await?
        .expect("user stored");
    assert_ne!(stored.password_hash, "plaintext-pw");
    assert!(server.state.passwords.verify("plaintext-pw", &stored.password_hash));
    Ok(())
}

#[tokio::test]
async fn signup_validates_fields() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.signup("not-an-email", "", "").await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = res.json::<Value>().await?;
    assert!(body["field_errors"]["email"].is_string());
    assert!(body["field_errors"]["username"].is_string());
    assert!(body["field_errors"]["password"].is_string());
    Ok(())
}

#[tokio::test]
async fn malformed_auth_bodies_use_error_shape() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/auth/signup"))
        .json(&json!({ "email": "a@x.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "UNPROCESSABLE_ENTITY");
    assert!(body["detail"].is_string());

    let res = server
        .client
        .post(server.url("/auth/token"))
        .form(&[("username", "a@x.com")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.json::<Value>().await?["code"], "UNPROCESSABLE_ENTITY");
    Ok(())
}

#[tokio::test]
async fn login_issues_bearer_token_for_identity() -> Result<()> {
    let server = common::spawn_server().await?;
    let res = server.signup("b@x.com", "bob", "correct-pw").await?;
    let user = res.json::<Value>().await?;

    let res = server
        .client
        .post(server.url("/auth/login"))
        .json(&json!({ "email": "b@x.com", "password": "correct-pw" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap();

    let claims = server.state.tokens.verify(token)?;
    assert_eq!(claims.sub, user["id"].as_str().unwrap());
    assert_eq!(claims.exp - claims.iat, 5 * 60);
    Ok(())
}

#[tokio::test]
async fn token_endpoint_accepts_oauth2_form() -> Result<()> {
    let server = common::spawn_server().await?;
    server.signup("c@x.com", "carol", "form-pw").await?;

    let res = server
        .client
        .post(server.url("/auth/token"))
        .form(&[
            ("grant_type", "password"),
            ("username", "c@x.com"),
            ("password", "form-pw"),
            ("scope", ""),
        ])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthenticated() -> Result<()> {
    let server = common::spawn_server().await?;
    server.signup("d@x.com", "dave", "right-pw").await?;

    let res = server
        .client
        .post(server.url("/auth/login"))
        .json(&json!({ "email": "d@x.com", "password": "wrong-pw" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()["www-authenticate"], "Bearer");

    let body = res.json::<Value>().await?;
    assert_eq!(body["detail"], "Incorrect email or password");
    Ok(())
}

#[tokio::test]
async fn login_with_unknown_email_is_unauthenticated() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/auth/token"))
        .form(&[("username", "nobody@x.com"), ("password", "whatever")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["detail"], "Incorrect email or password");
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_missing_and_forged_tokens() -> Result<()> {
    let server = common::spawn_server().await?;
    let (user_id, _) = server.register("e@x.com").await?;

    let res = server.client.get(server.url("/documents/")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Signed with a different secret, e.g. before a rotation
    let other = TokenAuthority::new(b"some-other-secret", jsonwebtoken::Algorithm::HS256, Duration::minutes(5))?;
    let forged = other.issue_default(&user_id)?;
    let res = server
        .client
        .get(server.url("/documents/"))
        .bearer_auth(forged)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server
        .client
        .get(server.url("/documents/"))
        .bearer_auth("garbage")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["detail"], "Could not validate credentials");
    Ok(())
}
