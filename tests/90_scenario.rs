mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{TestServer, PASSWORD};

/// Register, log in, post a photo, get a comment from someone else,
/// then clean everything up
#[tokio::test]
async fn photo_sharing_round_trip() -> Result<()> {
    let server = TestServer::spawn().await?;

    let health = server.client.get(server.url("/health")).send().await?;
    assert_eq!(health.status(), StatusCode::OK);

    let alice = server.user_token("alice").await?;
    let bob = server.user_token("bob").await?;

    let photo_id = server.create_photo(&alice, "holiday").await?;
    let comment: Value = server
        .post("/comments", &bob)
        .json(&json!({"message": "jealous", "photo_id": photo_id}))
        .send()
        .await?
        .json()
        .await?;
    assert!(comment["user_id"].as_i64().is_some());

    // Bob cannot remove Alice's photo, but Alice can
    let denied = server.delete(&format!("/photos/{photo_id}"), &bob).send().await?;
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    let removed = server.delete(&format!("/photos/{photo_id}"), &alice).send().await?;
    assert_eq!(removed.status(), StatusCode::OK);

    // The comment outlives the photo and can still be removed by its author
    let comments: Vec<Value> = server.get("/comments", &alice).send().await?.json().await?;
    assert_eq!(comments.len(), 1);
    let path = format!("/comments/{}", comment["id"]);
    assert_eq!(server.delete(&path, &bob).send().await?.status(), StatusCode::OK);

    // Alice leaves; her credentials stop working for login
    assert_eq!(server.delete("/users", &alice).send().await?.status(), StatusCode::OK);
    let login = server.login("alice@mygram.test", PASSWORD).await?;
    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn stranger_cannot_edit_photo() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/users/register"))
        .json(&json!({"username": "al", "email": "a@b.com", "password": "secret1", "age": 20}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let al: Value = res.json().await?;
    assert!(al.get("password").is_none());

    let wrong = server.login("a@b.com", "secret2").await?;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let login: Value = server.login("a@b.com", "secret1").await?.json().await?;
    let token = login["token"].as_str().unwrap_or_default().to_string();

    let photo: Value = server
        .post("/photos", &token)
        .json(&json!({"title": "t", "caption": "c", "photo_url": "https://img.example/t.jpg"}))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(photo["user_id"], al["id"]);

    let stranger = server.user_token("mallory").await?;
    let denied = server
        .put(&format!("/photos/{}", photo["id"]), &stranger)
        .json(&json!({"title": "hijacked", "caption": "c", "photo_url": "https://evil.example"}))
        .send()
        .await?;
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    let body: Value = denied.json().await?;
    assert_eq!(body["message"], "you're not allowed to update this photo");

    let photos: Vec<Value> = server.get("/photos", &token).send().await?.json().await?;
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0]["title"], "t");
    Ok(())
}
