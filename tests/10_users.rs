mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{TestServer, PASSWORD};

#[tokio::test]
async fn register_returns_user_without_password() -> Result<()> {
    let server = TestServer::spawn().await?;
    let user = server.register("alice", "alice@mygram.test").await?;

    assert!(user["id"].as_i64().is_some());
    assert_eq!(user["username"], "alice");
    assert_eq!(user["email"], "alice@mygram.test");
    assert_eq!(user["age"], 21);
    assert!(user.get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn register_rejects_invalid_fields() -> Result<()> {
    let server = TestServer::spawn().await?;

    let cases = [
        (json!({"username": "a", "email": "a@b.com", "password": "12345", "age": 20}),
         "Password has to have a minimum length of 6 characters"),
        (json!({"username": "a", "email": "a@b.com", "password": "123456", "age": 7}),
         "minimum 8 years old"),
        (json!({"username": "a", "email": "not-an-email", "password": "123456", "age": 20}),
         "Invalid email format"),
        (json!({"email": "a@b.com", "password": "123456", "age": 20}),
         "Your username is required"),
    ];

    for (body, message) in cases {
        let res = server.client.post(server.url("/users/register")).json(&body).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let err: Value = res.json().await?;
        assert_eq!(err["error"], true);
        assert_eq!(err["message"], message);
    }
    Ok(())
}

#[tokio::test]
async fn duplicate_email_conflicts() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register("alice", "alice@mygram.test").await?;

    let res = server
        .client
        .post(server.url("/users/register"))
        .json(&json!({
            "username": "alice2",
            "email": "alice@mygram.test",
            "password": PASSWORD,
            "age": 30
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn login_failure_is_indistinguishable() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register("alice", "alice@mygram.test").await?;

    let wrong_password = server.login("alice@mygram.test", "nope-nope").await?;
    let unknown_email = server.login("nobody@mygram.test", PASSWORD).await?;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a: Value = wrong_password.json().await?;
    let b: Value = unknown_email.json().await?;
    assert_eq!(a, b);
    assert_eq!(a["message"], "username / password is not match");
    Ok(())
}

#[tokio::test]
async fn login_returns_token() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user_token("alice").await?;
    assert_eq!(token.split('.').count(), 3);
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_missing_or_bad_tokens() -> Result<()> {
    let server = TestServer::spawn().await?;

    let missing = server.client.get(server.url("/photos")).send().await?;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = server.get("/photos", "not.a.token").send().await?;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    let body: Value = garbage.json().await?;
    assert_eq!(body["error"], true);

    let basic = server
        .client
        .get(server.url("/photos"))
        .basic_auth("alice", Some(PASSWORD))
        .send()
        .await?;
    assert_eq!(basic.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn update_changes_only_supplied_fields() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user_token("alice").await?;

    let res = server
        .put("/users", &token)
        .json(&json!({"username": "alicia"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let user: Value = res.json().await?;
    assert_eq!(user["username"], "alicia");
    assert_eq!(user["email"], "alice@mygram.test");
    assert!(user.get("updated_at").is_some());
    assert!(user.get("password").is_none());

    let bad = server
        .put("/users", &token)
        .json(&json!({"email": "broken"}))
        .send()
        .await?;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn list_users_hides_passwords() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user_token("alice").await?;
    server.register("bob", "bob@mygram.test").await?;

    let users: Vec<Value> = server.get("/users", &token).send().await?.json().await?;
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password").is_none()));
    Ok(())
}

#[tokio::test]
async fn deleted_account_disappears() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user_token("alice").await?;

    let res = server.delete("/users", &token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Your account has been successfully deleted");

    let again = server.delete("/users", &token).send().await?;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    let login = server.login("alice@mygram.test", PASSWORD).await?;
    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn concurrent_logins_all_complete() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register("alice", "alice@mygram.test").await?;

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = server.client.clone();
        let url = server.url("/users/login");
        let (email, password) = match i % 3 {
            0 => ("alice@mygram.test", PASSWORD),
            1 => ("alice@mygram.test", "wrong-password"),
            _ => ("ghost@mygram.test", PASSWORD),
        };
        let expected = if i % 3 == 0 { StatusCode::OK } else { StatusCode::UNAUTHORIZED };
        handles.push(tokio::spawn(async move {
            let res = client
                .post(url)
                .json(&json!({ "email": email, "password": password }))
                .send()
                .await?;
            anyhow::ensure!(res.status() == expected, "unexpected status {}", res.status());
            Ok::<_, anyhow::Error>(())
        }));
    }

    for handle in handles {
        handle.await??;
    }
    Ok(())
}
